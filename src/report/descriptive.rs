//! Descriptive report over the raw transaction frame

use super::grouped::{mean_by, shares, value_counts, GroupOrder, KeyedCount, KeyedValue};
use super::summary::{describe, NumericSummary};
use super::{format_float, when_present, write_counts, write_title, write_values};
use crate::config::{EdaConfig, TransactionColumns};
use crate::error::Result;
use polars::prelude::*;
use std::fmt;

/// Overview, schema, missing values, class balance and grouped means of a
/// transaction frame
#[derive(Debug, Clone)]
pub struct DescriptiveReport {
    /// `(rows, columns)`
    pub shape: (usize, usize),
    pub head: DataFrame,
    /// Column name and data type
    pub dtypes: Vec<(String, String)>,
    /// Column name and null count
    pub missing: Vec<(String, usize)>,
    pub numeric: Vec<NumericSummary>,
    /// Percentage of rows per fraud class
    pub fraud_share: Option<Vec<KeyedValue>>,
    /// Mean amount per fraud class
    pub fraud_mean: Option<Vec<KeyedValue>>,
    pub top_cities_by_count: Option<Vec<KeyedCount>>,
    pub top_cities_by_mean: Option<Vec<KeyedValue>>,
    pub top_vendor_categories: Option<Vec<KeyedValue>>,
    pub top_vendor_types: Option<Vec<KeyedValue>>,
    columns: TransactionColumns,
    top_n: usize,
}

impl DescriptiveReport {
    pub fn build(df: &DataFrame, config: &EdaConfig) -> Result<Self> {
        let columns = &config.columns;
        let top_n = Some(config.top_n);
        let amount = columns.amount.as_str();
        let fraud = columns.fraud_flag.as_str();
        let city = columns.city.as_str();
        let vendor_category = columns.vendor_category.as_str();
        let vendor_type = columns.vendor_type.as_str();

        let dtypes = df
            .get_columns()
            .iter()
            .map(|s| (s.name().to_string(), s.dtype().to_string()))
            .collect();
        let missing = df
            .get_columns()
            .iter()
            .map(|s| (s.name().to_string(), s.null_count()))
            .collect();

        let fraud_share = when_present(df, &[fraud], || {
            Ok(shares(&value_counts(df, fraud, None)?))
        })?;
        let fraud_mean = when_present(df, &[fraud, amount], || {
            mean_by(df, fraud, amount, GroupOrder::KeyAscending, None)
        })?;
        let top_cities_by_count = when_present(df, &[city], || value_counts(df, city, top_n))?;
        let top_cities_by_mean = when_present(df, &[city, amount], || {
            mean_by(df, city, amount, GroupOrder::ValueDescending, top_n)
        })?;
        let top_vendor_categories = when_present(df, &[vendor_category, amount], || {
            mean_by(df, vendor_category, amount, GroupOrder::ValueDescending, top_n)
        })?;
        let top_vendor_types = when_present(df, &[vendor_type, amount], || {
            mean_by(df, vendor_type, amount, GroupOrder::ValueDescending, top_n)
        })?;

        Ok(Self {
            shape: df.shape(),
            head: df.head(Some(config.head_rows)),
            dtypes,
            missing,
            numeric: describe(df)?,
            fraud_share,
            fraud_mean,
            top_cities_by_count,
            top_cities_by_mean,
            top_vendor_categories,
            top_vendor_types,
            columns: columns.clone(),
            top_n: config.top_n,
        })
    }
}

impl fmt::Display for DescriptiveReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let columns = &self.columns;
        let amount = &columns.amount;

        writeln!(f, "Dataset shape: ({}, {})", self.shape.0, self.shape.1)?;
        write_title(f, "First rows")?;
        writeln!(f, "{}", self.head)?;

        write_title(f, "Column types")?;
        for (name, dtype) in &self.dtypes {
            writeln!(f, "  {:<24} {}", name, dtype)?;
        }

        write_title(f, "Missing values per column")?;
        for (name, nulls) in &self.missing {
            writeln!(f, "  {:<24} {}", name, nulls)?;
        }

        write_title(f, "Numeric summary")?;
        if self.numeric.is_empty() {
            writeln!(f, "  (no numeric columns)")?;
        } else {
            write!(f, "  {:<6}", "")?;
            for summary in &self.numeric {
                write!(f, " {:>16}", summary.column)?;
            }
            writeln!(f)?;
            for (i, label) in NumericSummary::STATISTICS.iter().enumerate() {
                write!(f, "  {:<6}", label)?;
                for summary in &self.numeric {
                    write!(f, " {:>16}", format_float(Some(summary.statistic(i))))?;
                }
                writeln!(f)?;
            }
        }

        if let Some(rows) = &self.fraud_share {
            write_values(f, "Fraud share (%)", &columns.fraud_flag, rows)?;
        }
        if let Some(rows) = &self.fraud_mean {
            let title = format!("Mean {} by class ({})", amount, columns.fraud_flag);
            write_values(f, &title, &columns.fraud_flag, rows)?;
        }
        if let Some(rows) = &self.top_cities_by_count {
            let title = format!("Top-{} cities by transaction count", self.top_n);
            write_counts(f, &title, &columns.city, rows)?;
        }
        if let Some(rows) = &self.top_cities_by_mean {
            let title = format!("Top-{} cities by mean {}", self.top_n, amount);
            write_values(f, &title, &columns.city, rows)?;
        }
        if let Some(rows) = &self.top_vendor_categories {
            let title = format!("Top-{} {} by mean {}", self.top_n, columns.vendor_category, amount);
            write_values(f, &title, &columns.vendor_category, rows)?;
        }
        if let Some(rows) = &self.top_vendor_types {
            let title = format!("Top-{} {} by mean {}", self.top_n, columns.vendor_type, amount);
            write_values(f, &title, &columns.vendor_type, rows)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transactions() -> DataFrame {
        df!(
            "timestamp" => &["2024-01-01 10:00:00", "2024-01-02 11:00:00", "2024-01-02 12:00:00"],
            "amount" => &[Some(100.0), None, Some(50.0)],
            "currency" => &["USD", "EUR", "USD"],
            "city" => &["Paris", "Paris", "Tokyo"],
            "vendor_category" => &["Retail", "Travel", "Retail"],
            "vendor_type" => &["online", "offline", "online"],
            "is_fraud" => &[false, true, false]
        )
        .unwrap()
    }

    #[test]
    fn test_full_report() {
        let report = DescriptiveReport::build(&transactions(), &EdaConfig::default()).unwrap();

        assert_eq!(report.shape, (3, 7));
        assert_eq!(report.head.height(), 3);
        assert_eq!(report.dtypes.len(), 7);
        assert!(report.missing.contains(&("amount".to_string(), 1)));
        assert_eq!(report.numeric.len(), 1);

        let fraud_mean = report.fraud_mean.as_ref().unwrap();
        assert_eq!(fraud_mean[0].key, "false");
        assert_eq!(fraud_mean[0].value, Some(75.0));
        // The only fraudulent row has no amount
        assert_eq!(fraud_mean[1].value, None);

        let by_count = report.top_cities_by_count.as_ref().unwrap();
        assert_eq!(by_count[0].key, "Paris");
        assert_eq!(by_count[0].count, 2);

        let by_mean = report.top_cities_by_mean.as_ref().unwrap();
        assert_eq!(by_mean[0].key, "Paris");
        assert_eq!(by_mean[0].value, Some(100.0));

        let text = report.to_string();
        assert!(text.contains("Dataset shape: (3, 7)"));
        assert!(text.contains("Fraud share (%)"));
        assert!(text.contains("Top-10 vendor_type by mean amount"));
    }

    #[test]
    fn test_missing_fraud_flag_skips_sections() {
        let df = transactions().drop("is_fraud").unwrap();
        let report = DescriptiveReport::build(&df, &EdaConfig::default()).unwrap();

        assert!(report.fraud_share.is_none());
        assert!(report.fraud_mean.is_none());
        assert!(report.top_cities_by_mean.is_some());

        let text = report.to_string();
        assert!(!text.contains("Fraud share"));
        assert!(!text.contains("by class"));
    }

    #[test]
    fn test_missing_amount_skips_mean_sections() {
        let df = transactions().drop("amount").unwrap();
        let report = DescriptiveReport::build(&df, &EdaConfig::default()).unwrap();

        assert!(report.fraud_share.is_some());
        assert!(report.fraud_mean.is_none());
        assert!(report.top_cities_by_count.is_some());
        assert!(report.top_cities_by_mean.is_none());
        assert!(report.top_vendor_categories.is_none());
        assert!(report.top_vendor_types.is_none());
        assert!(report.to_string().contains("(no numeric columns)"));
    }

    #[test]
    fn test_zero_rows() {
        let df = transactions().head(Some(0));
        let report = DescriptiveReport::build(&df, &EdaConfig::default()).unwrap();

        assert_eq!(report.shape, (0, 7));
        assert_eq!(report.numeric[0].count, 0);
        assert!(report.fraud_share.as_ref().unwrap().is_empty());
        assert!(report.top_vendor_types.as_ref().unwrap().is_empty());
        assert!(report.to_string().contains("(no rows)"));
    }
}
