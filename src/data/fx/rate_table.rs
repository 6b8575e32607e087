//! Wide, forward-filled exchange-rate table
//!
//! Rates are stored as one row per calendar date and one column per currency.
//! Building a table always sorts by date and forward-fills each currency, so
//! a date without a fresh quote carries the most recent known rate.

use super::base::{Currency, RateLookup};
use chrono::NaiveDate;
use hashbrown::HashMap;
use std::collections::{BTreeMap, BTreeSet};

/// Date-indexed rate table
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use fraud_eda::data::fx::{Currency, RateLookup, RateTable};
///
/// let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let d2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
///
/// let table = RateTable::from_long(vec![
///     (d1, Currency::from("EUR"), Some(0.9)),
///     (d2, Currency::from("GBP"), Some(0.8)),
/// ]);
///
/// // EUR has no quote on d2, so the d1 rate carries forward
/// assert_eq!(table.rate(d2, "EUR"), Some(0.9));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    /// Column order of the wide table
    currencies: Vec<Currency>,
    /// Currency code -> column position
    index: HashMap<Currency, usize>,
    /// date -> rate per column
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

impl RateTable {
    /// Empty table with the given currency columns
    pub fn new(currencies: Vec<Currency>) -> Self {
        let index = currencies
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        Self {
            currencies,
            index,
            rows: BTreeMap::new(),
        }
    }

    /// Pivot long-form `(date, currency, rate)` records into a wide table.
    ///
    /// When a `(date, currency)` pair repeats, the last non-missing rate
    /// wins. Currencies that never carry a rate get no column, and dates
    /// where every rate is missing get no row.
    pub fn from_long<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Currency, Option<f64>)>,
    {
        let mut quotes: BTreeMap<NaiveDate, HashMap<Currency, f64>> = BTreeMap::new();
        let mut seen: BTreeSet<Currency> = BTreeSet::new();

        for (date, currency, rate) in records {
            if let Some(rate) = rate.filter(|r| !r.is_nan()) {
                seen.insert(currency.clone());
                quotes.entry(date).or_default().insert(currency, rate);
            }
        }

        let mut table = Self::new(seen.into_iter().collect());
        let width = table.currencies.len();
        for (date, day) in quotes {
            let mut row = vec![None; width];
            for (currency, rate) in day {
                if let Some(&col) = table.index.get(&currency) {
                    row[col] = Some(rate);
                }
            }
            table.rows.insert(date, row);
        }

        forward_fill(table.rows.values_mut(), width);
        table
    }

    /// Build from wide rows in file order.
    ///
    /// Rows are stable-sorted by date and forward-filled before insertion,
    /// so a repeated date keeps its last filled row.
    pub fn from_wide<I>(currencies: Vec<Currency>, rows: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Vec<Option<f64>>)>,
    {
        let mut table = Self::new(currencies);
        let width = table.currencies.len();

        let mut rows: Vec<(NaiveDate, Vec<Option<f64>>)> = rows
            .into_iter()
            .map(|(date, mut values)| {
                values.resize(width, None);
                for value in values.iter_mut() {
                    if value.is_some_and(f64::is_nan) {
                        *value = None;
                    }
                }
                (date, values)
            })
            .collect();
        rows.sort_by_key(|(date, _)| *date);

        forward_fill(rows.iter_mut().map(|(_, values)| values), width);
        table.rows.extend(rows);
        table
    }

    /// Currency columns in table order
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Dates in ascending order
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    /// `(dates, currencies)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.currencies.len())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First and last date covered by the table
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.rows.keys().next()?;
        let last = self.rows.keys().next_back()?;
        Some((*first, *last))
    }

    /// All rates for one date, in column order
    pub fn row(&self, date: NaiveDate) -> Option<&[Option<f64>]> {
        self.rows.get(&date).map(|values| values.as_slice())
    }
}

impl RateLookup for RateTable {
    fn rate(&self, date: NaiveDate, currency: &str) -> Option<f64> {
        let col = *self.index.get(currency)?;
        self.rows.get(&date)?.get(col).copied().flatten()
    }

    fn has_date(&self, date: NaiveDate) -> bool {
        self.rows.contains_key(&date)
    }

    fn has_currency(&self, currency: &str) -> bool {
        self.index.contains_key(currency)
    }
}

/// Carry the last known value of each column into later gaps
fn forward_fill<'a, I>(rows: I, width: usize)
where
    I: IntoIterator<Item = &'a mut Vec<Option<f64>>>,
{
    let mut last = vec![None; width];
    for row in rows {
        for (value, carried) in row.iter_mut().zip(last.iter_mut()) {
            match *value {
                Some(rate) => *carried = Some(rate),
                None => *value = *carried,
            }
        }
    }
}
