//! Assembles the date-ordered event stream the analyzer consumes.
//!
//! Trades (Buy/Sell) and corporate actions (Dividend/Split) are stored
//! separately. For a set of trades, the corporate actions of every traded
//! symbol dated on or after the earliest trade are merged in and the result
//! is sorted by date. The sort is stable over `trades ++ corporate_actions`:
//! on equal dates trades come first, and each side keeps its arrival order.

use crate::types::{fold_symbol, Transaction};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// Lookup of dividend and split events.
pub trait CorporateActionSource {
    /// Corporate actions for `symbols` (folded) dated on or after `since`.
    fn dividends_and_splits(&self, symbols: &BTreeSet<String>, since: NaiveDate)
        -> Vec<Transaction>;
}

/// In-memory corporate actions keyed by folded symbol.
#[derive(Debug, Clone, Default)]
pub struct CorporateActions {
    by_symbol: BTreeMap<String, Vec<Transaction>>,
}

impl CorporateActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a corporate action. Buy and Sell events are ignored.
    pub fn push(&mut self, action: Transaction) {
        if !action.kind.is_corporate_action() {
            tracing::debug!(
                "Ignoring {} event {} in corporate actions",
                action.kind,
                action.id
            );
            return;
        }
        self.by_symbol
            .entry(action.folded_symbol())
            .or_default()
            .push(action);
    }

    pub fn len(&self) -> usize {
        self.by_symbol.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl FromIterator<Transaction> for CorporateActions {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        let mut actions = CorporateActions::new();
        for action in iter {
            actions.push(action);
        }
        actions
    }
}

impl CorporateActionSource for CorporateActions {
    fn dividends_and_splits(
        &self,
        symbols: &BTreeSet<String>,
        since: NaiveDate,
    ) -> Vec<Transaction> {
        symbols
            .iter()
            .filter_map(|symbol| self.by_symbol.get(symbol))
            .flatten()
            .filter(|action| action.date >= since)
            .cloned()
            .collect()
    }
}

/// Folded, ordered set of the symbols appearing in `transactions`.
pub fn extract_symbols(transactions: &[Transaction]) -> BTreeSet<String> {
    transactions.iter().map(|t| fold_symbol(&t.symbol)).collect()
}

/// Earliest date in `transactions`, regardless of their order.
pub fn first_trade_date(transactions: &[Transaction]) -> Option<NaiveDate> {
    transactions.iter().map(|t| t.date).min()
}

/// Group transactions by account, keeping their relative order.
pub fn transactions_by_account(transactions: &[Transaction]) -> BTreeMap<String, Vec<Transaction>> {
    let mut map: BTreeMap<String, Vec<Transaction>> = BTreeMap::new();

    for transaction in transactions {
        map.entry(transaction.account_id.clone())
            .or_default()
            .push(transaction.clone());
    }

    map
}

/// Merge `trades` with their corporate actions into one date-ordered stream.
///
/// Empty `trades` yields an empty stream without consulting `source`.
pub fn merge_transactions<S>(trades: &[Transaction], source: &S) -> Vec<Transaction>
where
    S: CorporateActionSource + ?Sized,
{
    let Some(since) = first_trade_date(trades) else {
        return Vec::new();
    };

    let symbols = extract_symbols(trades);
    let actions = source.dividends_and_splits(&symbols, since);

    tracing::debug!(
        "Merging {} trades with {} corporate actions for {} symbols since {}",
        trades.len(),
        actions.len(),
        symbols.len(),
        since
    );

    let mut merged = Vec::with_capacity(trades.len() + actions.len());
    merged.extend_from_slice(trades);
    merged.extend(actions);
    // `sort_by_key` is stable, which is what fixes the equal-date order.
    merged.sort_by_key(|t| t.date);
    merged
}
