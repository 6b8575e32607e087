//! Grouped aggregations: frequency counts and per-group means
//!
//! Aggregation runs through polars' lazy `group_by`; ordering and top-N
//! truncation happen on the collected groups so ties resolve the same way on
//! every run.

use crate::error::Result;
use polars::prelude::*;
use std::cmp::Ordering;

const MEAN_COLUMN: &str = "__mean";
const COUNT_COLUMN: &str = "__count";

/// A group key with a numeric value (mean or share); `None` when the group
/// had no usable values
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedValue {
    pub key: String,
    pub value: Option<f64>,
}

/// A group key with its row count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedCount {
    pub key: String,
    pub count: u64,
}

/// Ordering of grouped results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// By group key, numerically when keys are numbers or booleans
    KeyAscending,
    /// Largest value first, missing values last, ties by key
    ValueDescending,
}

/// Group key as rendered text plus a numeric rank when the key is numeric
#[derive(Debug, Clone)]
struct GroupKey {
    label: String,
    rank: Option<f64>,
}

impl GroupKey {
    fn from_any_value(value: &AnyValue) -> Self {
        match value {
            AnyValue::Boolean(b) => GroupKey {
                label: b.to_string(),
                rank: Some(if *b { 1.0 } else { 0.0 }),
            },
            AnyValue::String(s) => GroupKey {
                label: s.to_string(),
                rank: None,
            },
            AnyValue::StringOwned(s) => GroupKey {
                label: s.to_string(),
                rank: None,
            },
            other => GroupKey {
                label: other.to_string(),
                rank: other.extract::<f64>(),
            },
        }
    }

    fn cmp(&self, other: &Self) -> Ordering {
        match (self.rank, other.rank) {
            (Some(a), Some(b)) => a.total_cmp(&b).then_with(|| self.label.cmp(&other.label)),
            _ => self.label.cmp(&other.label),
        }
    }
}

fn group_keys(series: &Series) -> Vec<GroupKey> {
    let series = series.rechunk();
    series
        .iter()
        .map(|value| GroupKey::from_any_value(&value))
        .collect()
}

/// Mean of `value` per distinct non-null `key`.
///
/// Values are cast to `Float64`; rows with a null key are excluded.
pub fn mean_by(
    df: &DataFrame,
    key: &str,
    value: &str,
    order: GroupOrder,
    limit: Option<usize>,
) -> Result<Vec<KeyedValue>> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key)])
        .agg([col(value).cast(DataType::Float64).mean().alias(MEAN_COLUMN)])
        .collect()?;

    let keys = group_keys(grouped.column(key)?);
    let means: Vec<Option<f64>> = grouped
        .column(MEAN_COLUMN)?
        .f64()?
        .into_iter()
        .map(|mean| mean.filter(|m| !m.is_nan()))
        .collect();

    let mut rows: Vec<(GroupKey, Option<f64>)> = keys.into_iter().zip(means).collect();
    match order {
        GroupOrder::KeyAscending => rows.sort_by(|a, b| a.0.cmp(&b.0)),
        GroupOrder::ValueDescending => rows.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.0.cmp(&b.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        }),
    }
    if let Some(limit) = limit {
        rows.truncate(limit);
    }

    Ok(rows
        .into_iter()
        .map(|(key, value)| KeyedValue {
            key: key.label,
            value,
        })
        .collect())
}

/// Row count per distinct non-null `key`, most frequent first.
///
/// Equal counts keep the order in which keys first appear.
pub fn value_counts(df: &DataFrame, key: &str, limit: Option<usize>) -> Result<Vec<KeyedCount>> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key)])
        .agg([col(key).count().alias(COUNT_COLUMN)])
        .collect()?;

    let keys = group_keys(grouped.column(key)?);
    let counts = grouped.column(COUNT_COLUMN)?.cast(&DataType::UInt64)?;
    let mut rows: Vec<KeyedCount> = keys
        .into_iter()
        .zip(counts.u64()?.into_iter())
        .map(|(key, count)| KeyedCount {
            key: key.label,
            count: count.unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    Ok(rows)
}

/// Convert counts into percentages of their total
pub fn shares(counts: &[KeyedCount]) -> Vec<KeyedValue> {
    let total: u64 = counts.iter().map(|c| c.count).sum();
    counts
        .iter()
        .map(|c| KeyedValue {
            key: c.key.clone(),
            value: (total > 0).then(|| c.count as f64 / total as f64 * 100.0),
        })
        .collect()
}
