//! Discrete measurement periods on the time axis.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Size of one discrete period of the dataset's time index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One calendar day.
    Day,
    /// One calendar month (default).
    #[default]
    Month,
    /// One calendar year.
    Year,
}

impl Granularity {
    /// Start of the period containing `t`.
    pub fn floor(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let date = match self {
            Granularity::Day => Some(t.date_naive()),
            Granularity::Month => NaiveDate::from_ymd_opt(t.year(), t.month(), 1),
            Granularity::Year => NaiveDate::from_ymd_opt(t.year(), 1, 1),
        };

        date.and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(t)
    }

    /// Start of the period after the one containing `t`.
    pub fn next(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        let start = self.floor(t);
        let next = match self {
            Granularity::Day => start.checked_add_signed(Duration::days(1)),
            Granularity::Month => start.checked_add_months(Months::new(1)),
            Granularity::Year => start.checked_add_months(Months::new(12)),
        };
        next.unwrap_or(start)
    }

    /// Format `t` at this granularity (e.g. "2020-01" for months).
    pub fn label(&self, t: DateTime<Utc>) -> String {
        let format = match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
            Granularity::Year => "%Y",
        };
        t.format(format).to_string()
    }
}

/// Parse a period label such as "2020-01" with a chrono format string.
///
/// Formats that omit the day (or the month and day) default them to 1,
/// so "%Y-%m" parses to the first day of the month at midnight UTC.
pub fn parse_period(value: &str, format: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    NaiveDate::parse_from_str(value, format)
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), &format!("{format}-%d")))
        .or_else(|_| {
            NaiveDate::parse_from_str(&format!("{value}-01-01"), &format!("{format}-%m-%d"))
        })
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_floor_month() {
        assert_eq!(
            Granularity::Month.floor(utc(2020, 2, 17, 13)),
            utc(2020, 2, 1, 0)
        );
        assert_eq!(
            Granularity::Month.floor(utc(2020, 2, 1, 0)),
            utc(2020, 2, 1, 0)
        );
    }

    #[test]
    fn test_floor_day_and_year() {
        assert_eq!(Granularity::Day.floor(utc(2021, 7, 4, 23)), utc(2021, 7, 4, 0));
        assert_eq!(Granularity::Year.floor(utc(2021, 7, 4, 23)), utc(2021, 1, 1, 0));
    }

    #[test]
    fn test_next() {
        let jan = utc(2020, 1, 1, 0);
        assert_eq!(Granularity::Month.next(jan), utc(2020, 2, 1, 0));
        assert_eq!(Granularity::Year.next(jan), utc(2021, 1, 1, 0));
        assert_eq!(Granularity::Day.next(jan), utc(2020, 1, 2, 0));
    }

    #[test]
    fn test_label() {
        assert_eq!(Granularity::Month.label(utc(2020, 3, 9, 0)), "2020-03");
        assert_eq!(Granularity::Day.label(utc(2020, 3, 9, 0)), "2020-03-09");
        assert_eq!(Granularity::Year.label(utc(2020, 3, 9, 0)), "2020");
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("2020-01", "%Y-%m"), Some(utc(2020, 1, 1, 0)));
        assert_eq!(parse_period(" 2020-11 ", "%Y-%m"), Some(utc(2020, 11, 1, 0)));
        assert_eq!(
            parse_period("2020-01-15", "%Y-%m-%d"),
            Some(utc(2020, 1, 15, 0))
        );
        assert_eq!(parse_period("2019", "%Y"), Some(utc(2019, 1, 1, 0)));
        assert_eq!(parse_period("not a date", "%Y-%m"), None);
    }
}
