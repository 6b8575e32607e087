//! Foreign exchange (FX) rates and currency conversion
//!
//! Converts transaction amounts into a single reference currency using a
//! historical rate file.
//!
//! # Components
//!
//! - **base**: `Currency` codes and the `RateLookup` trait
//! - **rate_table**: wide, date-sorted, forward-filled rate storage
//! - **loader**: reads long or wide rate files into a `RateTable`
//! - **convert**: per-row and whole-frame conversion
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fraud_eda::data::fx::{Currency, RateLookup, RateTable};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let table = RateTable::from_wide(
//!     vec![Currency::from("EUR"), Currency::from("JPY")],
//!     vec![(date, vec![Some(0.92), Some(150.1)])],
//! );
//!
//! assert_eq!(table.rate(date, "JPY"), Some(150.1));
//! ```

pub mod base;
pub mod convert;
pub mod loader;
pub mod rate_table;

pub use base::{Currency, RateLookup};
pub use convert::{
    convert_amount, convert_transactions, Conversion, ConversionFailure, ConversionFailures,
    DATE_COLUMN,
};
pub use loader::{load_rate_table, rate_table_from_frame, RateLayout};
pub use rate_table::RateTable;
