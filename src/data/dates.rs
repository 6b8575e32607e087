//! Calendar date coercion for date-like columns

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use polars::prelude::*;

/// Days between 0001-01-01 (CE day 1) and the Unix epoch
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Convert a date-like column to calendar dates.
///
/// `Date` values pass through, `Datetime` values are truncated to their date
/// in the column's time zone (UTC when it has none), strings are parsed and
/// integers are read as nanoseconds since the epoch.
/// Anything that cannot be interpreted becomes `None`.
pub fn to_dates(series: &Series) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let dates = match series.dtype() {
        DataType::Date => {
            let days = series.cast(&DataType::Int32)?;
            days.i32()?
                .into_iter()
                .map(|d| d.and_then(date_from_epoch_days))
                .collect()
        }
        DataType::Datetime(unit, zone) => {
            let unit = *unit;
            let zone = ColumnZone::parse(series.name(), zone.as_deref());
            let raw = series.cast(&DataType::Int64)?;
            raw.i64()?
                .into_iter()
                .map(|v| v.and_then(|v| datetime_from_timestamp(v, unit)))
                .map(|v| v.map(|utc| zone.local_date(utc)))
                .collect()
        }
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_date))
            .collect(),
        dtype if dtype.is_integer() => {
            let raw = series.cast(&DataType::Int64)?;
            raw.i64()?
                .into_iter()
                .map(|v| v.and_then(|v| datetime_from_timestamp(v, TimeUnit::Nanoseconds)))
                .map(|v| v.map(|utc| utc.date()))
                .collect()
        }
        dtype => {
            log::warn!(
                "Column '{}' has type {} which is not date-like; treating all values as missing",
                series.name(),
                dtype
            );
            vec![None; series.len()]
        }
    };
    Ok(dates)
}

/// Parse a single date or date-time string down to its calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.date());
    }

    // Offsets keep the local calendar date
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
        .map(|dt| dt.date_naive())
}

/// Build a polars `Date` series from calendar dates
pub fn date_series(name: &str, dates: &[Option<NaiveDate>]) -> PolarsResult<Series> {
    let days: Vec<Option<i32>> = dates
        .iter()
        .map(|d| d.map(|d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE))
        .collect();
    Series::new(name, days).cast(&DataType::Date)
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(EPOCH_DAYS_FROM_CE)?)
}

fn datetime_from_timestamp(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let (ticks_per_second, nanos_per_tick) = match unit {
        TimeUnit::Nanoseconds => (1_000_000_000, 1),
        TimeUnit::Microseconds => (1_000_000, 1_000),
        TimeUnit::Milliseconds => (1_000, 1_000_000),
    };
    let seconds = value.div_euclid(ticks_per_second);
    let nanos = u32::try_from(value.rem_euclid(ticks_per_second) * nanos_per_tick).ok()?;
    DateTime::<Utc>::from_timestamp(seconds, nanos).map(|dt| dt.naive_utc())
}

/// Time zone attached to a `Datetime` column
#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnZone {
    Utc,
    Named(Tz),
    Fixed(FixedOffset),
}

impl ColumnZone {
    /// Named zones (`Europe/Berlin`) and fixed offsets (`+02:00`) are
    /// understood; anything else falls back to UTC
    fn parse(column: &str, zone: Option<&str>) -> Self {
        let Some(zone) = zone else {
            return ColumnZone::Utc;
        };
        if let Ok(tz) = zone.parse::<Tz>() {
            return ColumnZone::Named(tz);
        }
        if let Ok(offset) = zone.parse::<FixedOffset>() {
            return ColumnZone::Fixed(offset);
        }
        log::warn!(
            "Column '{}' has unknown time zone '{}'; using UTC dates",
            column,
            zone
        );
        ColumnZone::Utc
    }

    fn local_date(self, utc: NaiveDateTime) -> NaiveDate {
        match self {
            ColumnZone::Utc => utc.date(),
            ColumnZone::Named(tz) => tz.from_utc_datetime(&utc).date_naive(),
            ColumnZone::Fixed(offset) => offset.from_utc_datetime(&utc).date_naive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_layouts() {
        assert_eq!(parse_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05 23:59:59"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T08:30:00.123"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date("2024-01-05T23:30:00+02:00"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_date(" 2024/01/05 "), Some(ymd(2024, 1, 5)));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn test_string_column() {
        let series = Series::new("date", &[Some("2024-01-01"), Some("bogus"), None]);
        let dates = to_dates(&series).unwrap();
        assert_eq!(dates, vec![Some(ymd(2024, 1, 1)), None, None]);
    }

    #[test]
    fn test_datetime_column() {
        // 2024-01-01 12:00:00 and 1969-12-31 23:00:00 in milliseconds
        let series = Series::new("ts", &[1_704_110_400_000i64, -3_600_000])
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
            .unwrap();
        let dates = to_dates(&series).unwrap();
        assert_eq!(dates, vec![Some(ymd(2024, 1, 1)), Some(ymd(1969, 12, 31))]);
    }

    #[test]
    fn test_zoned_datetime_column_uses_local_date() {
        // 2024-01-01 20:00:00 UTC is already January 2nd in Tokyo
        let series = Series::new("ts", &[1_704_139_200_000i64])
            .cast(&DataType::Datetime(
                TimeUnit::Milliseconds,
                Some("Asia/Tokyo".to_string()),
            ))
            .unwrap();
        assert_eq!(to_dates(&series).unwrap(), vec![Some(ymd(2024, 1, 2))]);
    }

    #[test]
    fn test_column_zone_parsing() {
        let utc = ymd(2024, 1, 1).and_hms_opt(22, 30, 0).unwrap();

        let berlin = ColumnZone::parse("ts", Some("Europe/Berlin"));
        assert_eq!(berlin, ColumnZone::Named(chrono_tz::Europe::Berlin));
        assert_eq!(berlin.local_date(utc), ymd(2024, 1, 1));

        let behind = ColumnZone::parse("ts", Some("-05:00"));
        assert!(matches!(behind, ColumnZone::Fixed(_)));
        assert_eq!(behind.local_date(utc), ymd(2024, 1, 1));

        let ahead = ColumnZone::parse("ts", Some("+02:00"));
        assert_eq!(ahead.local_date(utc), ymd(2024, 1, 2));

        assert_eq!(ColumnZone::parse("ts", Some("Mars/Olympus")), ColumnZone::Utc);
        assert_eq!(ColumnZone::parse("ts", None).local_date(utc), ymd(2024, 1, 1));
    }

    #[test]
    fn test_date_series_round_trip() {
        let dates = vec![Some(ymd(2023, 6, 30)), None];
        let series = date_series("date", &dates).unwrap();
        assert_eq!(series.dtype(), &DataType::Date);
        assert_eq!(series.null_count(), 1);
        assert_eq!(to_dates(&series).unwrap(), dates);
    }

    #[test]
    fn test_non_date_column_is_missing() {
        let series = Series::new("flag", &[true, false]);
        assert_eq!(to_dates(&series).unwrap(), vec![None, None]);
    }
}
