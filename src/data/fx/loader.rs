//! Exchange-rate file loading and normalization
//!
//! Accepts either layout of the rate file:
//!
//! - long: `date, currency, rate` with one quote per row,
//! - wide: `date` plus one column per currency code.

use super::base::Currency;
use super::rate_table::RateTable;
use crate::config::RateColumns;
use crate::data::dates::to_dates;
use crate::data::{has_column, read_table, require_column};
use crate::error::Result;
use polars::prelude::*;
use std::path::Path;

const TABLE: &str = "exchange rates";

/// Layout detected in a rate frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLayout {
    Long,
    Wide,
}

impl RateLayout {
    /// Long layout when both the currency and rate columns are present
    pub fn detect(df: &DataFrame, columns: &RateColumns) -> Self {
        if has_column(df, &columns.currency) && has_column(df, &columns.rate) {
            RateLayout::Long
        } else {
            RateLayout::Wide
        }
    }
}

/// Read a rate file and normalize it into a wide, forward-filled table
pub fn load_rate_table(path: impl AsRef<Path>, columns: &RateColumns) -> Result<RateTable> {
    let path = path.as_ref();
    log::info!("Loading exchange rates from {}", path.display());

    let df = read_table(path)?;
    let table = rate_table_from_frame(&df, columns)?;

    let (dates, currencies) = table.shape();
    log::info!(
        "Rate table ready: {} dates x {} currencies",
        dates,
        currencies
    );
    Ok(table)
}

/// Normalize an in-memory rate frame
pub fn rate_table_from_frame(df: &DataFrame, columns: &RateColumns) -> Result<RateTable> {
    let dates = to_dates(require_column(df, &columns.date, TABLE)?)?;

    let dropped = dates.iter().filter(|d| d.is_none()).count();
    if dropped > 0 {
        log::warn!(
            "Dropping {} of {} rate rows with a missing or unparseable date",
            dropped,
            dates.len()
        );
    }

    let layout = RateLayout::detect(df, columns);
    log::debug!("Rate file layout: {:?}", layout);

    let table = match layout {
        RateLayout::Long => {
            let codes = df.column(&columns.currency)?.cast(&DataType::String)?;
            let rates = df.column(&columns.rate)?.cast(&DataType::Float64)?;

            let records: Vec<_> = dates
                .iter()
                .zip(codes.str()?.into_iter())
                .zip(rates.f64()?.into_iter())
                .filter_map(|((date, code), rate)| Some(((*date)?, Currency::new(code?), rate)))
                .collect();
            RateTable::from_long(records)
        }
        RateLayout::Wide => {
            let mut currencies = Vec::new();
            let mut values: Vec<Vec<Option<f64>>> = Vec::new();
            for series in df.get_columns() {
                if series.name() == columns.date {
                    continue;
                }
                let rates = series.cast(&DataType::Float64)?;
                currencies.push(Currency::new(series.name()));
                values.push(rates.f64()?.into_iter().collect());
            }

            let rows: Vec<_> = dates
                .iter()
                .enumerate()
                .filter_map(|(i, date)| {
                    let row = values.iter().map(|column| column[i]).collect();
                    Some(((*date)?, row))
                })
                .collect();
            RateTable::from_wide(currencies, rows)
        }
    };

    Ok(table)
}
