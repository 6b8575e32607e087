//! Conversion of transaction amounts into the reference currency

use super::base::{Currency, RateLookup};
use crate::config::EdaConfig;
use crate::data::dates::{date_series, to_dates};
use crate::data::{has_column, require_column};
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::*;
use std::fmt;

/// Name of the per-transaction calendar date column attached by conversion
pub const DATE_COLUMN: &str = "date";

/// Why a single row could not be converted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFailure {
    MissingAmount,
    MissingCurrency,
    /// No rate for the row's date and currency
    NoRate,
}

/// Convert one amount.
///
/// Amounts already in `reference` are returned unchanged without consulting
/// the rate table; everything else is divided by the rate quoted for
/// `currency` on `date`. Any quoted rate is used as is, so a zero rate
/// yields an infinite amount and a negative rate a negative one.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use fraud_eda::data::fx::{convert_amount, Currency, RateTable};
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let rates = RateTable::from_long(vec![(date, Currency::from("EUR"), Some(0.8))]);
///
/// let usd = convert_amount(&rates, Some(100.0), Some("EUR"), Some(date), &Currency::usd());
/// assert_eq!(usd, Ok(125.0));
/// ```
pub fn convert_amount<R: RateLookup + ?Sized>(
    rates: &R,
    amount: Option<f64>,
    currency: Option<&str>,
    date: Option<NaiveDate>,
    reference: &Currency,
) -> std::result::Result<f64, ConversionFailure> {
    let amount = amount
        .filter(|a| !a.is_nan())
        .ok_or(ConversionFailure::MissingAmount)?;
    let currency = currency.ok_or(ConversionFailure::MissingCurrency)?;

    if reference == currency {
        return Ok(amount);
    }

    let rate = date
        .and_then(|date| rates.rate(date, currency))
        .ok_or(ConversionFailure::NoRate)?;

    Ok(amount / rate)
}

/// Failed-row counts by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionFailures {
    pub missing_amount: usize,
    pub missing_currency: usize,
    pub no_rate: usize,
}

impl ConversionFailures {
    fn record(&mut self, failure: ConversionFailure) {
        match failure {
            ConversionFailure::MissingAmount => self.missing_amount += 1,
            ConversionFailure::MissingCurrency => self.missing_currency += 1,
            ConversionFailure::NoRate => self.no_rate += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.missing_amount + self.missing_currency + self.no_rate
    }
}

/// Result of converting a transaction frame
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Input frame plus the date and converted-amount columns
    pub frame: DataFrame,
    /// Name of the converted-amount column
    pub column: String,
    pub reference: Currency,
    pub failures: ConversionFailures,
}

impl Conversion {
    pub fn total_rows(&self) -> usize {
        self.frame.height()
    }

    /// Rows whose converted amount is missing
    pub fn failed(&self) -> usize {
        self.failures.total()
    }

    pub fn converted(&self) -> usize {
        self.total_rows() - self.failed()
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Rows that could not be converted to {}: {} of {}",
            self.reference,
            self.failed(),
            self.total_rows()
        )?;
        if self.failed() > 0 {
            let failures = &self.failures;
            writeln!(f, "  missing amount:   {}", failures.missing_amount)?;
            writeln!(f, "  missing currency: {}", failures.missing_currency)?;
            writeln!(f, "  no rate for date: {}", failures.no_rate)?;
        }
        Ok(())
    }
}

/// Attach a calendar date and the reference-currency amount to every
/// transaction.
///
/// The transaction frame must have a timestamp column. Missing amount or
/// currency columns are treated as all-missing, so every non-reference row
/// fails to convert instead of aborting the run.
pub fn convert_transactions<R: RateLookup + ?Sized>(
    df: &DataFrame,
    rates: &R,
    config: &EdaConfig,
) -> Result<Conversion> {
    let columns = &config.columns;
    let reference = Currency::new(config.reference_currency.as_str());
    let output = config.converted_column();
    let height = df.height();

    let dates = to_dates(require_column(df, &columns.timestamp, "transactions")?)?;

    let amounts: Vec<Option<f64>> = if has_column(df, &columns.amount) {
        let amounts = df.column(&columns.amount)?.cast(&DataType::Float64)?;
        amounts.f64()?.into_iter().collect()
    } else {
        vec![None; height]
    };

    let codes = if has_column(df, &columns.currency) {
        Some(df.column(&columns.currency)?.cast(&DataType::String)?)
    } else {
        None
    };
    let codes: Vec<Option<&str>> = match &codes {
        Some(series) => series.str()?.into_iter().collect(),
        None => vec![None; height],
    };

    let mut failures = ConversionFailures::default();
    let mut non_finite = 0usize;
    let converted: Vec<Option<f64>> = amounts
        .iter()
        .zip(codes.iter())
        .zip(dates.iter())
        .map(|((amount, code), date)| {
            match convert_amount(rates, *amount, *code, *date, &reference) {
                Ok(value) => {
                    if !value.is_finite() {
                        non_finite += 1;
                    }
                    Some(value)
                }
                Err(failure) => {
                    failures.record(failure);
                    None
                }
            }
        })
        .collect();

    if non_finite > 0 {
        log::warn!(
            "{} converted amounts are not finite, check for zero rates",
            non_finite
        );
    }
    log::info!(
        "Converted {} of {} transactions to {}",
        height - failures.total(),
        height,
        reference
    );
    log::debug!("Conversion failures: {:?}", failures);

    let mut frame = df.clone();
    frame.with_column(date_series(DATE_COLUMN, &dates)?)?;
    frame.with_column(Series::new(&output, converted))?;

    Ok(Conversion {
        frame,
        column: output,
        reference,
        failures,
    })
}
