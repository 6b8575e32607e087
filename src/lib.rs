//! # fraud-eda
//!
//! Exploratory data analysis for transaction fraud datasets.
//!
//! The crate loads a transaction table, summarizes it (types, missing
//! values, class balance, grouped averages) and can convert every amount into
//! a reference currency using a historical exchange-rate table before
//! summarizing the converted amounts.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fraud_eda::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = EdaConfig::default();
//!     let transactions = load_transactions("transaction_fraud_data.parquet")?;
//!     println!("{}", DescriptiveReport::build(&transactions, &config)?);
//!
//!     let rates = load_rate_table("historical_currency_exchange.parquet", &config.rates)?;
//!     let conversion = convert_transactions(&transactions, &rates, &config)?;
//!     println!("{}", conversion);
//!     println!("{}", ConvertedReport::build(&conversion.frame, &config)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::config::{EdaConfig, RateColumns, TransactionColumns};
    pub use crate::data::fx::{
        convert_transactions, load_rate_table, Conversion, Currency, RateLookup, RateTable,
    };
    pub use crate::data::load_transactions;
    pub use crate::error::{EdaError, Result};
    pub use crate::report::{ConvertedReport, DescriptiveReport};
}
