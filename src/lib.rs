//! # stocklens
//!
//! A multi-timeframe technical and fundamental analytics engine for equity
//! data. stocklens ingests per-instrument daily OHLCV bars and financial
//! statements and produces null-safe, JSON-serializable report structures
//! for downstream consumers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use stocklens::prelude::*;
//!
//! fn main() -> stocklens::error::Result<()> {
//!     let bars = stocklens::data::load_bars("0700.HK_daily.csv".as_ref())?;
//!     let report = technical_report(&bars)?;
//!     println!("{}", serde_json::to_string_pretty(&report)?);
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod data;
pub mod error;
pub mod fundamentals;
pub mod indicators;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::analysis::{analyze, analyze_batch, technical_report, InstrumentData, InstrumentReport};
    pub use crate::data::{load_bars, load_profile, load_statements, normalize, resample};
    pub use crate::error::{Result, StockLensError};
    pub use crate::fundamentals::{
        fundamental_report, CompanyProfile, FundamentalReport, StatementTable,
    };
    pub use crate::indicators::{enrich, extract_latest, FeatureSnapshot, TechnicalReport};
    pub use crate::types::{Bar, Timeframe};
}
