//! Tracker Core - Portfolio performance analysis library.
//!
//! This crate folds an account's dated transactions into one analysis:
//!
//! - **Event model**: buy/sell trades and dividend/split corporate actions
//! - **Merging**: corporate actions joined into a date-ordered trade stream
//! - **Analysis**: value, invested/withdrawn/dividend totals, gain, Modified
//!   Dietz and annualized yields
//! - **Reports**: overall and per-account analysis computed in parallel
//!
//! All amounts are integer cents. The day to analyze "as of" is always passed
//! in, the library never reads the clock.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use tracker_core::{analyze_account, CorporateActions, PriceTable, SymbolPrice, Transaction, TransactionKind};
//!
//! let day = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
//! let trades = vec![
//!     Transaction::new("AAPL", day("2024-01-01"), TransactionKind::Buy, 10, 100),
//! ];
//! let actions: CorporateActions = vec![
//!     Transaction::new("AAPL", day("2024-06-01"), TransactionKind::Split, 0, 200),
//! ].into_iter().collect();
//! let prices: PriceTable = vec![SymbolPrice::new("AAPL", 60)].into_iter().collect();
//!
//! let portfolio = analyze_account(&trades, &actions, &prices, day("2025-01-01"));
//! assert_eq!(portfolio.symbols_count["AAPL"], 20);
//! assert_eq!(portfolio.value, 1200);
//! ```

pub mod config;
pub mod portfolio;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use config::{DisplayCurrency, TrackerConfig};
pub use snapshot::Snapshot;
pub use types::{
    fold_symbol, Account, AnalyzedPortfolio, ApiResponse, PriceTable, SymbolPrice, Transaction,
    TransactionKind,
};

// Re-export main functionality
pub use portfolio::{
    analyze_account, analyze_transactions, build_report, merge_transactions,
    CorporateActionSource, CorporateActions, PortfolioReport,
};

/// Error types for tracker-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid transaction type: {0}")]
    InvalidTransactionKind(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),
}

/// Result type for tracker-core operations.
pub type Result<T> = std::result::Result<T, Error>;
