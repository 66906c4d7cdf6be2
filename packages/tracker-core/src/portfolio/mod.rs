//! Portfolio analysis module.
//!
//! Provides transaction merging, performance analysis and per-account reports.

mod analyzer;
mod merger;
mod report;

pub use analyzer::{analyze_account, analyze_transactions};
pub use merger::{
    extract_symbols, first_trade_date, merge_transactions, transactions_by_account,
    CorporateActionSource, CorporateActions,
};
pub use report::{build_report, PortfolioReport};
