//! Text reports over transaction frames
//!
//! Reports are built as plain values first and rendered through `Display`,
//! so tests can inspect every section without parsing stdout. Sections
//! that depend on optional columns are `None` when a column is absent and are
//! left out of the rendered text.

pub mod converted;
pub mod descriptive;
pub mod grouped;
pub mod summary;

pub use converted::ConvertedReport;
pub use descriptive::DescriptiveReport;
pub use grouped::{mean_by, value_counts, GroupOrder, KeyedCount, KeyedValue};
pub use summary::{describe, NumericSummary};

use crate::data::has_column;
use crate::error::Result;
use polars::prelude::DataFrame;
use std::fmt;

/// Run `build` only when every column in `required` is present
fn when_present<T, F>(df: &DataFrame, required: &[&str], build: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match required.iter().find(|column| !has_column(df, column)) {
        Some(missing) => {
            log::debug!("Skipping section, column '{}' is absent", missing);
            Ok(None)
        }
        None => build().map(Some),
    }
}

/// Format a float the way every section prints numbers
pub(crate) fn format_float(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.4}", v),
        Some(v) if v.is_infinite() => (if v > 0.0 { "inf" } else { "-inf" }).to_string(),
        _ => "NaN".to_string(),
    }
}

fn write_title(f: &mut fmt::Formatter, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{}:", title)
}

/// Two-column listing: group key and its value
fn write_pairs<'a, I>(f: &mut fmt::Formatter, title: &str, header: &str, rows: I) -> fmt::Result
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    write_title(f, title)?;
    let rows: Vec<(&str, String)> = rows.into_iter().collect();
    if rows.is_empty() {
        return writeln!(f, "  (no rows)");
    }

    let width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0);
    writeln!(f, "  {:<width$}", header, width = width)?;
    for (key, value) in rows {
        writeln!(f, "  {:<width$}  {:>12}", key, value, width = width)?;
    }
    Ok(())
}

fn write_values(
    f: &mut fmt::Formatter,
    title: &str,
    header: &str,
    rows: &[KeyedValue],
) -> fmt::Result {
    write_pairs(
        f,
        title,
        header,
        rows.iter().map(|row| (row.key.as_str(), format_float(row.value))),
    )
}

fn write_counts(
    f: &mut fmt::Formatter,
    title: &str,
    header: &str,
    rows: &[KeyedCount],
) -> fmt::Result {
    write_pairs(
        f,
        title,
        header,
        rows.iter().map(|row| (row.key.as_str(), row.count.to_string())),
    )
}
