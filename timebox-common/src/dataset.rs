//! Time-series dataset shared by the loader, the engine and the viewer.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named entity with one value per dataset timestamp.
///
/// Missing measurements are stored as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Entity name (e.g., a person).
    pub name: String,
    /// Values aligned index-for-index with the dataset timestamps.
    pub values: Vec<f64>,
}

impl Series {
    /// Create a new series.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Value at timestamp index `index`, or `None` if missing.
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().filter(|v| !v.is_nan())
    }
}

/// Ordered timestamps plus the series measured at each of them.
///
/// Immutable once constructed; construction rejects misaligned input.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    label: String,
    timestamps: Vec<DateTime<Utc>>,
    series: Vec<Series>,
}

impl Dataset {
    /// Build a dataset, checking that timestamps are strictly increasing
    /// and that every series has exactly one value per timestamp.
    pub fn new(
        label: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        series: Vec<Series>,
    ) -> Result<Self> {
        if let Some(pos) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Error::Dataset(format!(
                "timestamps must be strictly increasing (index {} is {}, index {} is {})",
                pos,
                timestamps[pos],
                pos + 1,
                timestamps[pos + 1]
            )));
        }

        for s in &series {
            if s.values.len() != timestamps.len() {
                return Err(Error::Dataset(format!(
                    "series '{}' has {} values but the dataset has {} timestamps",
                    s.name,
                    s.values.len(),
                    timestamps.len()
                )));
            }
        }

        Ok(Self {
            label: label.into(),
            timestamps,
            series,
        })
    }

    /// Value axis label (e.g., "# hours of screen time").
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The shared timestamp index.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// All series in load order.
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Number of timestamps.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the dataset has no timestamps.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// First and last timestamp.
    pub fn time_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((*self.timestamps.first()?, *self.timestamps.last()?))
    }

    /// Largest value across all series, ignoring missing values.
    pub fn value_max(&self) -> Option<f64> {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
    }

    /// Indices of the timestamps `t` with `start <= t < end`.
    pub fn index_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Range<usize> {
        let lo = self.timestamps.partition_point(|t| *t < start);
        let hi = self.timestamps.partition_point(|t| *t < end);
        lo..hi.max(lo)
    }

    /// Index of the timestamp closest to `t`.
    pub fn nearest_index(&self, t: DateTime<Utc>) -> Option<usize> {
        if self.timestamps.is_empty() {
            return None;
        }

        let i = self.timestamps.partition_point(|ts| *ts < t);
        if i == 0 {
            return Some(0);
        }
        if i == self.timestamps.len() {
            return Some(i - 1);
        }

        let before = t - self.timestamps[i - 1];
        let after = self.timestamps[i] - t;
        Some(if before <= after { i - 1 } else { i })
    }
}
