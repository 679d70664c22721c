//! stocklab-core: domain types shared by the stocklab crates
//!
//! Holds the stock report schema, symbol normalization and the application
//! configuration layer.

pub mod config;
pub mod report;
pub mod symbol;

pub use config::{A2aSettings, AppConfig};
pub use report::{ReportError, StockReport};
pub use symbol::{SymbolError, current_date, normalize_symbol};
