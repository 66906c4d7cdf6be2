//! Core data types for the portfolio tracker.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Fold a ticker symbol to the canonical (upper case) form used as a map key.
pub fn fold_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Kind of an ownership-changing event.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Buy,
    Sell,
    Dividend,
    Split,
}

impl TransactionKind {
    /// Lower-case name, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Buy => "buy",
            TransactionKind::Sell => "sell",
            TransactionKind::Dividend => "dividend",
            TransactionKind::Split => "split",
        }
    }

    /// Buy and Sell are trades; Dividend and Split are corporate actions.
    pub fn is_trade(&self) -> bool {
        matches!(self, TransactionKind::Buy | TransactionKind::Sell)
    }

    pub fn is_corporate_action(&self) -> bool {
        !self.is_trade()
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "buy" => Ok(TransactionKind::Buy),
            "sell" => Ok(TransactionKind::Sell),
            "dividend" => Ok(TransactionKind::Dividend),
            "split" => Ok(TransactionKind::Split),
            _ => Err(Error::InvalidTransactionKind(value.to_string())),
        }
    }
}

/// A dated event that changes what an account owns.
///
/// `price_per_share` is in cents for Buy, Sell and Dividend. For Split it
/// holds the split ratio scaled by 100, so a 2-for-1 split is `200`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Share delta for Buy/Sell; ignored for Dividend and Split
    pub quantity: i32,
    #[serde(alias = "pps")]
    pub price_per_share: i32,
}

impl Transaction {
    /// Create a transaction with empty identifiers.
    pub fn new(
        symbol: &str,
        date: NaiveDate,
        kind: TransactionKind,
        quantity: i32,
        price_per_share: i32,
    ) -> Self {
        Self {
            id: String::new(),
            account_id: String::new(),
            symbol: symbol.to_string(),
            date,
            kind,
            quantity,
            price_per_share,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = account_id.into();
        self
    }

    /// Calendar date of the event.
    pub fn as_date(&self) -> NaiveDate {
        self.date
    }

    /// Symbol folded for price-table and share-count lookups.
    pub fn folded_symbol(&self) -> String {
        fold_symbol(&self.symbol)
    }
}

/// Latest known market price for a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolPrice {
    pub symbol: String,
    /// Price in cents
    pub adj_price: i32,
}

impl SymbolPrice {
    pub fn new(symbol: &str, adj_price: i32) -> Self {
        Self {
            symbol: symbol.to_string(),
            adj_price,
        }
    }
}

/// Price lookup keyed by folded symbol.
///
/// A missing entry means the price is unknown, which is not the same as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceTable {
    prices: HashMap<String, SymbolPrice>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the price for a symbol.
    pub fn insert(&mut self, price: SymbolPrice) {
        self.prices.insert(fold_symbol(&price.symbol), price);
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolPrice> {
        self.prices.get(&fold_symbol(symbol))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<SymbolPrice> for PriceTable {
    fn from_iter<I: IntoIterator<Item = SymbolPrice>>(iter: I) -> Self {
        let mut table = PriceTable::new();
        for price in iter {
            table.insert(price);
        }
        table
    }
}

/// Account metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Result of analyzing a sequence of transactions as of one day.
///
/// Amounts are cents; `gain`, `modified_dietz_yield` and `annualized_yield`
/// are ratios (0.1 means 10%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedPortfolio {
    /// Market value of all held shares at current prices
    pub value: i64,
    pub total_invested: i64,
    pub total_withdrawn: i64,
    pub total_dividends: i64,
    /// `(value + total_dividends + total_withdrawn) - total_invested`
    pub gain_value: i64,
    pub gain: f64,
    pub modified_dietz_yield: f64,
    pub annualized_yield: f64,
    pub first_transaction: Option<Transaction>,
    pub last_transaction: Option<Transaction>,
    /// Split-adjusted share count per folded symbol
    pub symbols_count: BTreeMap<String, i32>,
    pub transactions: Vec<Transaction>,
}

impl AnalyzedPortfolio {
    /// The all-zero result of analyzing nothing.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Symbols with a non-zero share count, in symbol order.
    pub fn holdings(&self) -> impl Iterator<Item = (&str, i32)> {
        self.symbols_count
            .iter()
            .filter(|(_, count)| **count != 0)
            .map(|(symbol, count)| (symbol.as_str(), *count))
    }
}

/// JSON envelope used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_transaction_kind_from_str() {
        assert_eq!(
            "dividend".parse::<TransactionKind>().unwrap(),
            TransactionKind::Dividend
        );
        assert_eq!("SPLIT".parse::<TransactionKind>().unwrap(), TransactionKind::Split);
        assert!(matches!(
            "transfer".parse::<TransactionKind>(),
            Err(Error::InvalidTransactionKind(_))
        ));
    }

    #[test]
    fn test_transaction_from_json() {
        let json = r#"{"id":"t1","account_id":"a1","symbol":"HDV","date":"2024-06-11","type":"dividend","quantity":0,"pps":93}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(t.symbol, "HDV");
        assert_eq!(t.date, date("2024-06-11"));
        assert_eq!(t.kind, TransactionKind::Dividend);
        assert_eq!(t.price_per_share, 93);
    }

    #[test]
    fn test_transaction_json_uses_type_key() {
        let t = Transaction::new("AAPL", date("2024-01-02"), TransactionKind::Sell, 3, 150);
        let value = serde_json::to_value(&t).unwrap();

        assert_eq!(value["type"], "sell");
        assert_eq!(value["date"], "2024-01-02");
        assert_eq!(value["price_per_share"], 150);
    }

    #[test]
    fn test_price_table_is_case_insensitive() {
        let table: PriceTable = vec![SymbolPrice::new("aapl", 12)].into_iter().collect();

        assert_eq!(table.get("AAPL").map(|p| p.adj_price), Some(12));
        assert_eq!(table.get(" Aapl ").map(|p| p.adj_price), Some(12));
        assert!(table.get("MSFT").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_zero_portfolio() {
        let zero = AnalyzedPortfolio::zero();
        assert_eq!(zero, AnalyzedPortfolio::default());
        assert_eq!(zero.value, 0);
        assert!(zero.first_transaction.is_none());
        assert!(zero.symbols_count.is_empty());
    }

    #[test]
    fn test_holdings_skip_closed_positions() {
        let mut portfolio = AnalyzedPortfolio::zero();
        portfolio.symbols_count.insert("AAPL".to_string(), 0);
        portfolio.symbols_count.insert("MSFT".to_string(), 4);

        let holdings: Vec<_> = portfolio.holdings().collect();
        assert_eq!(holdings, vec![("MSFT", 4)]);
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
