//! Grouped report over amounts converted to the reference currency

use super::grouped::{mean_by, GroupOrder, KeyedValue};
use super::{when_present, write_title, write_values};
use crate::config::{EdaConfig, TransactionColumns};
use crate::error::Result;
use polars::prelude::*;
use std::fmt;

/// Mean converted amount by fraud class, city, vendor category and vendor
/// type. Rows without a converted amount are left out of every group.
#[derive(Debug, Clone)]
pub struct ConvertedReport {
    /// Converted-amount column the report was built from
    pub column: String,
    /// Rows that carried a converted amount
    pub rows_used: usize,
    pub fraud_mean: Option<Vec<KeyedValue>>,
    pub top_cities: Option<Vec<KeyedValue>>,
    pub top_vendor_categories: Option<Vec<KeyedValue>>,
    pub top_vendor_types: Option<Vec<KeyedValue>>,
    reference: String,
    columns: TransactionColumns,
    top_n: usize,
}

impl ConvertedReport {
    pub fn build(df: &DataFrame, config: &EdaConfig) -> Result<Self> {
        let columns = &config.columns;
        let column = config.converted_column();
        let value = column.as_str();
        let top_n = Some(config.top_n);

        let converted = when_present(df, &[value], || {
            Ok(df.clone().lazy().filter(col(value).is_not_null()).collect()?)
        })?;
        // Without the converted column every section is skipped
        let valid = converted.unwrap_or_else(|| df.clear());

        let fraud = columns.fraud_flag.as_str();
        let city = columns.city.as_str();
        let vendor_category = columns.vendor_category.as_str();
        let vendor_type = columns.vendor_type.as_str();

        let fraud_mean = when_present(&valid, &[fraud, value], || {
            mean_by(&valid, fraud, value, GroupOrder::KeyAscending, None)
        })?;
        let top_cities = when_present(&valid, &[city, value], || {
            mean_by(&valid, city, value, GroupOrder::ValueDescending, top_n)
        })?;
        let top_vendor_categories = when_present(&valid, &[vendor_category, value], || {
            mean_by(&valid, vendor_category, value, GroupOrder::ValueDescending, top_n)
        })?;
        let top_vendor_types = when_present(&valid, &[vendor_type, value], || {
            mean_by(&valid, vendor_type, value, GroupOrder::ValueDescending, top_n)
        })?;

        Ok(Self {
            rows_used: valid.height(),
            column,
            fraud_mean,
            top_cities,
            top_vendor_categories,
            top_vendor_types,
            reference: config.reference_currency.clone(),
            columns: columns.clone(),
            top_n: config.top_n,
        })
    }
}

impl fmt::Display for ConvertedReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let columns = &self.columns;
        let reference = &self.reference;

        write_title(f, &format!("Converted amounts ({})", self.column))?;
        writeln!(f, "  rows with a {} amount: {}", reference, self.rows_used)?;

        if let Some(rows) = &self.fraud_mean {
            let title = format!("Mean amount ({}) by class ({})", reference, columns.fraud_flag);
            write_values(f, &title, &columns.fraud_flag, rows)?;
        }
        if let Some(rows) = &self.top_cities {
            let title = format!("Top-{} cities by mean amount ({})", self.top_n, reference);
            write_values(f, &title, &columns.city, rows)?;
        }
        if let Some(rows) = &self.top_vendor_categories {
            let title = format!(
                "Top-{} {} by mean amount ({})",
                self.top_n, columns.vendor_category, reference
            );
            write_values(f, &title, &columns.vendor_category, rows)?;
        }
        if let Some(rows) = &self.top_vendor_types {
            let title = format!(
                "Top-{} {} by mean amount ({})",
                self.top_n, columns.vendor_type, reference
            );
            write_values(f, &title, &columns.vendor_type, rows)?;
        }
        Ok(())
    }
}
