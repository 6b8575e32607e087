//! Numeric column summaries (count, mean, spread, quartiles)

use crate::error::Result;
use polars::prelude::*;
use statrs::statistics::{Data, Distribution, Max, Min};

/// Summary statistics of one numeric column.
///
/// Missing and NaN values are excluded. `std` is the sample standard
/// deviation; quartiles interpolate linearly between the closest ranks.
/// With no values every statistic except `count` is NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Row labels in display order
    pub const STATISTICS: [&'static str; 8] =
        ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn from_values(column: impl Into<String>, values: Vec<f64>) -> Self {
        let values: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        let count = values.len();
        if count == 0 {
            return Self {
                column: column.into(),
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let ranked = Float64Chunked::from_vec("", values.clone());
        let data = Data::new(values);
        Self {
            column: column.into(),
            count,
            mean: data.mean().unwrap_or(f64::NAN),
            std: data.std_dev().unwrap_or(f64::NAN),
            min: data.min(),
            q25: linear_quantile(&ranked, 0.25),
            median: linear_quantile(&ranked, 0.5),
            q75: linear_quantile(&ranked, 0.75),
            max: data.max(),
        }
    }

    pub fn from_series(series: &Series) -> Result<Self> {
        let values = series.cast(&DataType::Float64)?;
        let values: Vec<f64> = values.f64()?.into_iter().flatten().collect();
        Ok(Self::from_values(series.name(), values))
    }

    /// Statistic value by position in [`Self::STATISTICS`]
    pub fn statistic(&self, index: usize) -> f64 {
        match index {
            0 => self.count as f64,
            1 => self.mean,
            2 => self.std,
            3 => self.min,
            4 => self.q25,
            5 => self.median,
            6 => self.q75,
            _ => self.max,
        }
    }
}

fn linear_quantile(values: &Float64Chunked, quantile: f64) -> f64 {
    values
        .quantile(quantile, QuantileInterpolOptions::Linear)
        .ok()
        .flatten()
        .unwrap_or(f64::NAN)
}

/// Summaries for every numeric column of a frame, in column order
pub fn describe(df: &DataFrame) -> Result<Vec<NumericSummary>> {
    df.get_columns()
        .iter()
        .filter(|series| series.dtype().is_numeric())
        .map(NumericSummary::from_series)
        .collect()
}
