//! Base FX types - currency codes and the rate lookup trait

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Currency code as it appears in transaction and rate files.
///
/// Codes are compared exactly: `"usd"` and `"USD"` are different currencies,
/// matching how rate columns are named in the source data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Self {
        Currency(code.into())
    }

    /// US Dollar, the default reference currency
    pub fn usd() -> Self {
        Currency::new("USD")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Currency::new(code)
    }
}

impl Borrow<str> for Currency {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Currency {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Date-keyed exchange-rate lookup.
///
/// Rates follow the "units of foreign currency per one unit of the reference
/// currency" convention, so `reference_amount = amount / rate`.
pub trait RateLookup {
    /// Rate for `currency` on exactly `date`, if one is known
    fn rate(&self, date: NaiveDate, currency: &str) -> Option<f64>;

    /// Whether the table has a row for `date`
    fn has_date(&self, date: NaiveDate) -> bool;

    /// Whether the table has a column for `currency`
    fn has_currency(&self, currency: &str) -> bool;
}
