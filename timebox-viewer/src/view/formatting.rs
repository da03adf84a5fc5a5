//! Shared formatting utilities for the viewer.

use timebox_common::Granularity;
use timebox_engine::DomainBounds;

/// Format a numeric value for display with appropriate scale suffix.
///
/// - Values >= 1M display as "X.XM"
/// - Values >= 1K display as "X.XK"
/// - Integer values display without decimal places
/// - Other values display with 2 decimal places
pub fn format_value(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Describe a timebox as "2020-01..2020-03, 0-3".
///
/// The time range is shown half-open: the end period is excluded.
pub fn format_bounds(bounds: &DomainBounds, granularity: Granularity) -> String {
    format!(
        "{}..{}, {}-{}",
        granularity.label(bounds.time_start()),
        granularity.label(bounds.time_end()),
        format_value(bounds.value_min()),
        format_value(bounds.value_max()),
    )
}

/// Match summary such as "3 of 10 series match".
pub fn format_match_count(matching: usize, total: usize) -> String {
    if matching == total {
        format!("All {} series match", total)
    } else {
        format!("{} of {} series match", matching, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(42.0), "42");
        assert_eq!(format_value(3.14159), "3.14");
        assert_eq!(format_value(1500.0), "1.5K");
        assert_eq!(format_value(2500000.0), "2.5M");
        assert_eq!(format_value(-1500.0), "-1.5K");
    }

    #[test]
    fn test_format_bounds() {
        let bounds = DomainBounds::new(
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap(),
            3.0,
            0.5,
        );
        assert_eq!(
            format_bounds(&bounds, Granularity::Month),
            "2020-01..2020-03, 0.50-3"
        );
    }

    #[test]
    fn test_format_match_count() {
        assert_eq!(format_match_count(4, 4), "All 4 series match");
        assert_eq!(format_match_count(1, 4), "1 of 4 series match");
    }
}
