//! Overall and per-account analysis for a set of accounts.

use crate::config::DisplayCurrency;
use crate::portfolio::analyzer::analyze_account;
use crate::portfolio::merger::{transactions_by_account, CorporateActionSource};
use crate::types::{Account, AnalyzedPortfolio, PriceTable, Transaction};
use crate::{Error, Result};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Analysis of every account plus the union of all of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// Account metadata, as supplied
    pub accounts: Vec<Account>,
    /// All trades of all accounts analyzed together
    pub overall: AnalyzedPortfolio,
    /// One analysis per account id
    pub by_account: BTreeMap<String, AnalyzedPortfolio>,
    /// Display-only currency settings for presentation layers
    pub display: DisplayCurrency,
    /// Day the analysis was computed for
    pub as_of: Option<NaiveDate>,
}

impl PortfolioReport {
    /// Analysis of a single account.
    pub fn account(&self, id: &str) -> Result<&AnalyzedPortfolio> {
        self.by_account
            .get(id)
            .ok_or_else(|| Error::AccountNotFound(id.to_string()))
    }

    /// Metadata of a single account, if it was supplied.
    pub fn account_metadata(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }
}

/// Analyze all `trades` together and each account on its own, in parallel.
///
/// Every account in `accounts` and every `account_id` found in `trades` gets an
/// entry in `by_account`; accounts without trades get the zero portfolio.
/// Each account merges corporate actions from its own earliest trade.
pub fn build_report<S>(
    accounts: &[Account],
    trades: &[Transaction],
    source: &S,
    prices: &PriceTable,
    today: NaiveDate,
    display: DisplayCurrency,
) -> PortfolioReport
where
    S: CorporateActionSource + Sync + ?Sized,
{
    let mut grouped = transactions_by_account(trades);
    for account in accounts {
        grouped.entry(account.id.clone()).or_default();
    }

    tracing::info!(
        "Building report for {} accounts from {} trades as of {}",
        grouped.len(),
        trades.len(),
        today
    );

    let (overall, by_account) = rayon::join(
        || analyze_account(trades, source, prices, today),
        || {
            grouped
                .par_iter()
                .map(|(account_id, account_trades)| {
                    let portfolio = analyze_account(account_trades, source, prices, today);
                    tracing::debug!(
                        "Account {}: {} transactions, value={}",
                        account_id,
                        portfolio.transactions.len(),
                        portfolio.value
                    );
                    (account_id.clone(), portfolio)
                })
                .collect::<BTreeMap<_, _>>()
        },
    );

    PortfolioReport {
        accounts: accounts.to_vec(),
        overall,
        by_account,
        display,
        as_of: Some(today),
    }
}
