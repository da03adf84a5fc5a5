//! Series filtering against the committed timeboxes.
//!
//! A series matches a timebox when every value whose timestamp falls in
//! `[time_start, time_end)` lies in `[value_min, value_max]`. Missing
//! values never falsify a timebox, and a timebox covering no timestamps is
//! satisfied by every series. A series matches the filter when it matches
//! every committed timebox.

use std::ops::Range;

use timebox_common::{Dataset, Series};

use crate::timebox::DomainBounds;

/// Visual treatment of a series under the current filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Highlighted,
    Dimmed,
}

/// Per-series match flags, aligned with `Dataset::series()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterResult {
    matches: Vec<bool>,
    active_timeboxes: usize,
}

impl FilterResult {
    /// Every series matches: no timebox is committed.
    pub fn unfiltered(series_count: usize) -> Self {
        Self {
            matches: vec![true; series_count],
            active_timeboxes: 0,
        }
    }

    pub fn is_match(&self, series: usize) -> bool {
        self.matches.get(series).copied().unwrap_or(false)
    }

    pub fn style(&self, series: usize) -> SeriesStyle {
        if self.is_match(series) {
            SeriesStyle::Highlighted
        } else {
            SeriesStyle::Dimmed
        }
    }

    /// Indices of matching series.
    pub fn matching(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(i, m)| m.then_some(i))
    }

    /// Indices of non-matching series.
    pub fn dimmed(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches
            .iter()
            .enumerate()
            .filter_map(|(i, m)| (!m).then_some(i))
    }

    pub fn match_count(&self) -> usize {
        self.matches.iter().filter(|m| **m).count()
    }

    /// Number of series evaluated.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Number of committed timeboxes the result was computed from.
    pub fn active_timeboxes(&self) -> usize {
        self.active_timeboxes
    }

    /// Whether any timebox constrains the result.
    pub fn is_filtered(&self) -> bool {
        self.active_timeboxes > 0
    }

    /// Names of the matching series.
    pub fn matching_names<'a>(&self, dataset: &'a Dataset) -> Vec<&'a str> {
        self.matching()
            .filter_map(|i| dataset.series().get(i))
            .map(|s| s.name.as_str())
            .collect()
    }
}

/// Evaluate every series of `dataset` against the committed `timeboxes`.
pub fn evaluate<'a>(
    timeboxes: impl IntoIterator<Item = &'a DomainBounds>,
    dataset: &Dataset,
) -> FilterResult {
    let constraints: Vec<(Range<usize>, &DomainBounds)> = timeboxes
        .into_iter()
        .map(|b| (dataset.index_range(b.time_start(), b.time_end()), b))
        .collect();

    let matches = dataset
        .series()
        .iter()
        .map(|series| {
            constraints
                .iter()
                .all(|(range, bounds)| values_within(series, range.clone(), bounds))
        })
        .collect();

    FilterResult {
        matches,
        active_timeboxes: constraints.len(),
    }
}

/// Whether `series` satisfies a single timebox.
pub fn matches_timebox(series: &Series, dataset: &Dataset, bounds: &DomainBounds) -> bool {
    values_within(
        series,
        dataset.index_range(bounds.time_start(), bounds.time_end()),
        bounds,
    )
}

fn values_within(series: &Series, range: Range<usize>, bounds: &DomainBounds) -> bool {
    series
        .values
        .get(range)
        .unwrap_or_default()
        .iter()
        .all(|v| v.is_nan() || bounds.contains_value(*v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn month(m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, m, 1, 0, 0, 0).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset::new(
            "hours",
            vec![month(1), month(2), month(3)],
            vec![
                Series::new("A", vec![1.0, 5.0, 9.0]),
                Series::new("B", vec![2.0, 2.0, 2.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_no_timeboxes_matches_everything() {
        let data = dataset();
        let none: [&DomainBounds; 0] = [];
        let result = evaluate(none, &data);

        assert!(!result.is_filtered());
        assert_eq!(result.match_count(), 2);
        assert_eq!(result, FilterResult::unfiltered(2));
    }

    #[test]
    fn test_end_is_exclusive() {
        let data = dataset();
        // Only index 0 (2020-01) is checked: A=1 and B=2 both fit [0, 3].
        let bounds = DomainBounds::new(month(1), month(2), 0.0, 3.0);
        let result = evaluate([&bounds], &data);

        assert_eq!(result.matching_names(&data), vec!["A", "B"]);
        assert!(result.is_filtered());
    }

    #[test]
    fn test_wider_range_excludes() {
        let data = dataset();
        // Indices 0 and 1: A=5 at 2020-02 falls outside [0, 3].
        let bounds = DomainBounds::new(month(1), month(3), 0.0, 3.0);
        let result = evaluate([&bounds], &data);

        assert_eq!(result.matching_names(&data), vec!["B"]);
        assert_eq!(result.style(0), SeriesStyle::Dimmed);
        assert_eq!(result.style(1), SeriesStyle::Highlighted);
    }

    #[test]
    fn test_value_bounds_are_inclusive() {
        let data = dataset();
        let bounds = DomainBounds::new(month(2), month(3), 2.0, 5.0);
        let result = evaluate([&bounds], &data);
        assert_eq!(result.match_count(), 2);
    }

    #[test]
    fn test_empty_time_range_is_vacuous() {
        let data = dataset();
        let bounds = DomainBounds::new(month(2), month(2), 100.0, 200.0);
        let result = evaluate([&bounds], &data);
        assert_eq!(result.match_count(), 2);
    }

    #[test]
    fn test_contradictory_timeboxes_exclude_all() {
        let data = dataset();
        let low = DomainBounds::new(month(1), month(3), 0.0, 3.0);
        let high = DomainBounds::new(month(1), month(3), 4.0, 10.0);
        let result = evaluate([&low, &high], &data);

        assert_eq!(result.match_count(), 0);
        assert_eq!(result.dimmed().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(result.active_timeboxes(), 2);
    }

    #[test]
    fn test_missing_values_do_not_falsify() {
        let data = Dataset::new(
            "hours",
            vec![month(1), month(2)],
            vec![Series::new("C", vec![f64::NAN, 1.0])],
        )
        .unwrap();
        let bounds = DomainBounds::new(month(1), month(3), 0.0, 2.0);

        assert!(matches_timebox(&data.series()[0], &data, &bounds));
    }

    #[test]
    fn test_styles_partition_series() {
        let data = dataset();
        let bounds = DomainBounds::new(month(1), month(3), 0.0, 3.0);
        let result = evaluate([&bounds], &data);

        let mut all: Vec<usize> = result.matching().chain(result.dimmed()).collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1]);
        assert!(!result.is_match(5));
    }
}
