//! Integration tests for FX loading and conversion
//!
//! Rate and transaction fixtures are written to temporary Parquet/CSV files
//! and read back through the public loaders.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use fraud_eda::prelude::*;
use polars::prelude::*;
use proptest::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn write_parquet(dir: &Path, name: &str, mut df: DataFrame) -> PathBuf {
    let path = dir.join(name);
    ParquetWriter::new(File::create(&path).unwrap())
        .finish(&mut df)
        .unwrap();
    path
}

fn transactions() -> DataFrame {
    df!(
        "timestamp" => &[
            "2024-01-01 09:00:00",
            "2024-01-02 10:00:00",
            "2024-01-03 11:00:00",
            "2024-01-03 12:00:00",
            "2024-01-04 13:00:00"
        ],
        "amount" => &[100.0, 100.0, 40.0, 55.5, 10.0],
        "currency" => &["GBP", "EUR", "GBP", "USD", "EUR"],
        "city" => &["London", "Berlin", "London", "Boston", "Berlin"],
        "vendor_category" => &["Retail", "Travel", "Retail", "Food", "Travel"],
        "vendor_type" => &["online", "offline", "online", "online", "offline"],
        "is_fraud" => &[true, false, false, true, false]
    )
    .unwrap()
}

#[test]
fn test_long_parquet_with_duplicates() {
    let dir = tempdir().unwrap();
    let rates = df!(
        "date" => &["2024-01-02", "2024-01-02", "2024-01-03", "2024-01-03"],
        "currency" => &["EUR", "EUR", "GBP", "EUR"],
        "rate" => &[Some(0.9), Some(0.8), Some(0.5), None]
    )
    .unwrap();
    let path = write_parquet(dir.path(), "rates.parquet", rates);

    let table = load_rate_table(&path, &RateColumns::default()).unwrap();
    assert_eq!(table.shape(), (2, 2));
    // Last duplicate wins
    assert_eq!(table.rate(day(2), "EUR"), Some(0.8));
    // Missing EUR quote on day 3 is forward-filled from day 2
    assert_eq!(table.rate(day(3), "EUR"), Some(0.8));
    assert_eq!(table.rate(day(3), "GBP"), Some(0.5));
}

#[test]
fn test_wide_csv_rates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rates.csv");
    fs::write(
        &path,
        "date,EUR,GBP\n2024-01-03,,0.5\n2024-01-02,0.8,\n2024-01-04,0.85,\n",
    )
    .unwrap();

    let table = load_rate_table(&path, &RateColumns::default()).unwrap();
    assert_eq!(table.dates().collect::<Vec<_>>(), vec![day(2), day(3), day(4)]);
    assert_eq!(table.rate(day(3), "EUR"), Some(0.8));
    assert_eq!(table.rate(day(4), "GBP"), Some(0.5));
    assert_eq!(table.rate(day(2), "GBP"), None);
}

#[test]
fn test_end_to_end_conversion() {
    let dir = tempdir().unwrap();
    let rates = df!(
        "date" => &["2024-01-02", "2024-01-03"],
        "currency" => &["EUR", "GBP"],
        "rate" => &[0.8, 0.5]
    )
    .unwrap();
    let rates_path = write_parquet(dir.path(), "rates.parquet", rates);
    let tx_path = write_parquet(dir.path(), "tx.parquet", transactions());

    let config = EdaConfig::default();
    let transactions = load_transactions(&tx_path).unwrap();
    let table = load_rate_table(&rates_path, &config.rates).unwrap();
    let conversion = convert_transactions(&transactions, &table, &config).unwrap();

    let usd: Vec<Option<f64>> = conversion
        .frame
        .column("amount_usd")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();

    // GBP on day 1 predates every GBP quote; day 4 has no rate row at all
    assert_eq!(usd, vec![None, Some(125.0), Some(80.0), Some(55.5), None]);
    assert_eq!(conversion.failed(), 2);
    assert_eq!(conversion.failures.no_rate, 2);

    // The unconverted London row still counts in the base report...
    let base = DescriptiveReport::build(&transactions, &config).unwrap();
    let london = base
        .top_cities_by_mean
        .as_ref()
        .unwrap()
        .iter()
        .find(|row| row.key == "London")
        .unwrap();
    assert_relative_eq!(london.value.unwrap(), 70.0);

    // ...and only drops out of the converted one
    let converted = ConvertedReport::build(&conversion.frame, &config).unwrap();
    assert_eq!(converted.rows_used, 3);
    let cities = converted.top_cities.as_ref().unwrap();
    let london = cities.iter().find(|row| row.key == "London").unwrap();
    assert_relative_eq!(london.value.unwrap(), 80.0);
    assert_eq!(cities[0].key, "Berlin");
    assert_relative_eq!(cities[0].value.unwrap(), 125.0);
}

#[test]
fn test_reference_currency_rows_are_unchanged() {
    let table = RateTable::from_long(Vec::new());
    let df = df!(
        "timestamp" => &["2030-06-01", "not a timestamp"],
        "amount" => &[19.99, 1234.5678],
        "currency" => &["USD", "USD"]
    )
    .unwrap();

    let conversion = convert_transactions(&df, &table, &EdaConfig::default()).unwrap();
    let converted: Vec<Option<f64>> = conversion
        .frame
        .column("amount_usd")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(converted, vec![Some(19.99), Some(1234.5678)]);
    assert_eq!(conversion.failed(), 0);
}

#[test]
fn test_missing_rate_file_column() {
    let dir = tempdir().unwrap();
    let rates = df!("day" => &["2024-01-01"], "EUR" => &[0.9]).unwrap();
    let path = write_parquet(dir.path(), "rates.parquet", rates);

    let err = load_rate_table(&path, &RateColumns::default()).unwrap_err();
    assert!(matches!(err, EdaError::MissingColumn { .. }));
}

#[test]
fn test_missing_rate_file() {
    let err = load_rate_table("/nonexistent/rates.parquet", &RateColumns::default()).unwrap_err();
    assert!(matches!(err, EdaError::FileNotFound(_)));
}

proptest! {
    /// A quote on day `quoted` is visible on every later table date until
    /// the next quote for the same currency
    #[test]
    fn prop_forward_fill_carries_last_quote(
        quoted in 1u32..10,
        later in 0u32..10,
        rate in 0.01f64..1000.0,
        other in 0.01f64..1000.0,
    ) {
        let later = (quoted + later).min(28);
        let table = RateTable::from_long(vec![
            (day(quoted), Currency::from("EUR"), Some(rate)),
            // A different currency creates the later table row
            (day(later), Currency::from("JPY"), Some(other)),
        ]);

        prop_assert_eq!(table.rate(day(later), "EUR"), Some(rate));
        if quoted > 1 {
            prop_assert_eq!(table.rate(day(quoted - 1), "EUR"), None);
        }
    }
}
