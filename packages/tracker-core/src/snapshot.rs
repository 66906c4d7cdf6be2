//! JSON snapshot of accounts, trades, corporate actions and prices.

use crate::config::DisplayCurrency;
use crate::portfolio::{build_report, merge_transactions, CorporateActions, PortfolioReport};
use crate::types::{Account, PriceTable, SymbolPrice, Transaction};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to analyze a set of accounts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    /// Buy and Sell events
    pub transactions: Vec<Transaction>,
    /// Dividend and Split events, not tied to an account
    pub corporate_actions: Vec<Transaction>,
    pub prices: Vec<SymbolPrice>,
}

impl Snapshot {
    /// Load and validate a snapshot file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;

        tracing::debug!(
            "Loaded snapshot {}: {} accounts, {} transactions, {} corporate actions, {} prices",
            path.display(),
            snapshot.accounts.len(),
            snapshot.transactions.len(),
            snapshot.corporate_actions.len(),
            snapshot.prices.len()
        );

        Ok(snapshot)
    }

    /// Save as pretty JSON, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Trades must be Buy/Sell and corporate actions Dividend/Split.
    pub fn validate(&self) -> Result<()> {
        if let Some(t) = self.transactions.iter().find(|t| !t.kind.is_trade()) {
            return Err(Error::InvalidSnapshot(format!(
                "transaction {} is a {} event, expected buy or sell",
                t.id, t.kind
            )));
        }

        if let Some(t) = self
            .corporate_actions
            .iter()
            .find(|t| !t.kind.is_corporate_action())
        {
            return Err(Error::InvalidSnapshot(format!(
                "corporate action {} is a {} event, expected dividend or split",
                t.id, t.kind
            )));
        }

        Ok(())
    }

    pub fn price_table(&self) -> PriceTable {
        self.prices.iter().cloned().collect()
    }

    pub fn corporate_actions(&self) -> CorporateActions {
        self.corporate_actions.iter().cloned().collect()
    }

    /// Trades of one account, or of all accounts when `account_id` is `None`.
    pub fn trades(&self, account_id: Option<&str>) -> Result<Vec<Transaction>> {
        let Some(id) = account_id else {
            return Ok(self.transactions.clone());
        };

        let known = self.accounts.iter().any(|a| a.id == id)
            || self.transactions.iter().any(|t| t.account_id == id);
        if !known {
            return Err(Error::AccountNotFound(id.to_string()));
        }

        Ok(self
            .transactions
            .iter()
            .filter(|t| t.account_id == id)
            .cloned()
            .collect())
    }

    /// Date-ordered trades and corporate actions of one or all accounts.
    pub fn merged_transactions(&self, account_id: Option<&str>) -> Result<Vec<Transaction>> {
        let trades = self.trades(account_id)?;
        Ok(merge_transactions(&trades, &self.corporate_actions()))
    }

    /// Overall and per-account analysis as of `today`.
    pub fn report(&self, today: NaiveDate, display: DisplayCurrency) -> PortfolioReport {
        build_report(
            &self.accounts,
            &self.transactions,
            &self.corporate_actions(),
            &self.price_table(),
            today,
            display,
        )
    }
}
