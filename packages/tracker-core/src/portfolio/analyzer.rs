//! Portfolio performance analysis.
//!
//! A single forward pass over date-ordered transactions accumulates invested,
//! withdrawn and dividend cash, the split-adjusted share count per symbol, and
//! the time-weighted cash flow used by the Modified Dietz yield. Valuation
//! uses the final share counts at the current prices.

use crate::portfolio::merger::{merge_transactions, CorporateActionSource};
use crate::types::{AnalyzedPortfolio, PriceTable, Transaction, TransactionKind};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const DAYS_PER_YEAR: f64 = 365.0;

/// Analyze `transactions` (ascending by date) as of `today`.
///
/// Transactions whose symbol has no entry in `prices` are skipped entirely:
/// they move neither cash totals nor share counts. Degenerate ratios (zero
/// denominators, zero-day periods, non-finite results) are reported as `0.0`.
pub fn analyze_transactions(
    transactions: &[Transaction],
    prices: &PriceTable,
    today: NaiveDate,
) -> AnalyzedPortfolio {
    let (Some(first), Some(last)) = (transactions.first(), transactions.last()) else {
        return AnalyzedPortfolio::zero();
    };

    let days_since_inception = days_between(first.date, today);

    let mut symbols_count: BTreeMap<String, i32> = BTreeMap::new();
    let mut total_invested: i64 = 0;
    let mut total_withdrawn: i64 = 0;
    let mut total_dividends: i64 = 0;
    let mut weighted_cash_flow: i64 = 0;
    let mut skipped = 0usize;

    for t in transactions {
        let symbol = t.folded_symbol();
        if !prices.contains(&symbol) {
            tracing::warn!("Missing price for {}, skipping transaction {}", t.symbol, t.id);
            skipped += 1;
            continue;
        }

        let tr_value = i64::from(t.quantity) * i64::from(t.price_per_share);
        let weight = time_weight(days_between(t.date, today), days_since_inception);
        let count = symbols_count.entry(symbol).or_insert(0);

        match t.kind {
            TransactionKind::Buy => {
                total_invested = total_invested.saturating_add(tr_value);
                weighted_cash_flow = weighted_cash_flow.saturating_add(weighted(tr_value, weight));
                *count = count.saturating_add(t.quantity);
            }
            TransactionKind::Sell => {
                total_withdrawn = total_withdrawn.saturating_add(tr_value);
                weighted_cash_flow = weighted_cash_flow.saturating_sub(weighted(tr_value, weight));
                *count = count.saturating_sub(t.quantity);
            }
            TransactionKind::Dividend => {
                // Paid on the shares held at this point of the replay.
                let dividend = i64::from(t.price_per_share) * i64::from(*count);
                total_dividends = total_dividends.saturating_add(dividend);
                weighted_cash_flow = weighted_cash_flow.saturating_sub(weighted(dividend, weight));
            }
            TransactionKind::Split => {
                *count = split_count(*count, t.price_per_share);
            }
        }
    }

    let value = symbols_count
        .iter()
        .filter_map(|(symbol, count)| {
            prices
                .get(symbol)
                .map(|price| i64::from(*count) * i64::from(price.adj_price))
        })
        .fold(0i64, i64::saturating_add);

    let gain_value = value
        .saturating_add(total_dividends)
        .saturating_add(total_withdrawn)
        .saturating_sub(total_invested);

    let gain = ratio(gain_value, total_invested);

    let (modified_dietz_yield, annualized_yield) = if days_since_inception == 0 {
        (0.0, 0.0)
    } else {
        let dietz = ratio(gain_value, total_invested.saturating_add(weighted_cash_flow));
        let annualized =
            (1.0 + gain).powf(DAYS_PER_YEAR / days_since_inception as f64) - 1.0;
        (dietz, finite_or_zero(annualized))
    };

    tracing::debug!(
        "Analyzed {} transactions ({} skipped) over {} days: value={} invested={} withdrawn={} dividends={}",
        transactions.len(),
        skipped,
        days_since_inception,
        value,
        total_invested,
        total_withdrawn,
        total_dividends
    );

    AnalyzedPortfolio {
        value,
        total_invested,
        total_withdrawn,
        total_dividends,
        gain_value,
        gain,
        modified_dietz_yield,
        annualized_yield,
        first_transaction: Some(first.clone()),
        last_transaction: Some(last.clone()),
        symbols_count,
        transactions: transactions.to_vec(),
    }
}

/// Merge `trades` with their corporate actions and analyze the result.
///
/// Empty `trades` return the zero portfolio without running the analysis.
pub fn analyze_account<S>(
    trades: &[Transaction],
    source: &S,
    prices: &PriceTable,
    today: NaiveDate,
) -> AnalyzedPortfolio
where
    S: CorporateActionSource + ?Sized,
{
    if trades.is_empty() {
        return AnalyzedPortfolio::zero();
    }

    let merged = merge_transactions(trades, source);
    analyze_transactions(&merged, prices, today)
}

/// Whole days from `from` to `to`; negative when `from` is in the future.
fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Fraction of the measurement period a cash flow has been invested.
///
/// A flow on the first day weighs 1.0 and a flow on `today` weighs 0.0.
fn time_weight(days_since_transaction: i64, days_since_inception: i64) -> f64 {
    if days_since_inception == 0 {
        return 0.0;
    }
    days_since_transaction as f64 / days_since_inception as f64
}

/// Weighted flow truncated to whole cents.
fn weighted(value: i64, weight: f64) -> i64 {
    // Float-to-int `as` saturates and maps NaN to 0.
    (value as f64 * weight) as i64
}

/// Share count after a split encoded as ratio x100, rounded down.
fn split_count(count: i32, ratio_x100: i32) -> i32 {
    let adjusted = (i64::from(count) * i64::from(ratio_x100)).div_euclid(100);
    adjusted.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    finite_or_zero(numerator as f64 / denominator as f64)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
