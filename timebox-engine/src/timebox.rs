//! Timebox identity, bounds and lifecycle state.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session-unique timebox identifier. Never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeboxId(u64);

impl TimeboxId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimeboxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A (time range, value range) constraint in domain coordinates.
///
/// The time range is half-open, `[time_start, time_end)`. The value range
/// is closed, `[value_min, value_max]`. Both are normalized on
/// construction so the pixel direction of the drag does not matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainBounds {
    time_start: DateTime<Utc>,
    time_end: DateTime<Utc>,
    value_min: f64,
    value_max: f64,
}

impl DomainBounds {
    pub fn new(time_a: DateTime<Utc>, time_b: DateTime<Utc>, value_a: f64, value_b: f64) -> Self {
        Self {
            time_start: time_a.min(time_b),
            time_end: time_a.max(time_b),
            value_min: value_a.min(value_b),
            value_max: value_a.max(value_b),
        }
    }

    pub fn time_start(&self) -> DateTime<Utc> {
        self.time_start
    }

    pub fn time_end(&self) -> DateTime<Utc> {
        self.time_end
    }

    pub fn value_min(&self) -> f64 {
        self.value_min
    }

    pub fn value_max(&self) -> f64 {
        self.value_max
    }

    /// Whether `t` lies in `[time_start, time_end)`.
    pub fn contains_time(&self, t: DateTime<Utc>) -> bool {
        self.time_start <= t && t < self.time_end
    }

    /// Whether `v` lies in `[value_min, value_max]`.
    pub fn contains_value(&self, v: f64) -> bool {
        self.value_min <= v && v <= self.value_max
    }
}

/// Lifecycle of a timebox: created empty, committed by its first drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeboxState {
    /// No completed drag yet. Only the trailing timebox is in this state.
    Uncommitted,
    /// Bounds fixed in domain space.
    Committed(DomainBounds),
}

/// A user-drawn region over the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Timebox {
    id: TimeboxId,
    state: TimeboxState,
}

impl Timebox {
    pub(crate) fn new(id: TimeboxId) -> Self {
        Self {
            id,
            state: TimeboxState::Uncommitted,
        }
    }

    pub fn id(&self) -> TimeboxId {
        self.id
    }

    pub fn state(&self) -> &TimeboxState {
        &self.state
    }

    /// Committed bounds, if any.
    pub fn bounds(&self) -> Option<&DomainBounds> {
        match &self.state {
            TimeboxState::Uncommitted => None,
            TimeboxState::Committed(bounds) => Some(bounds),
        }
    }

    /// Whether this is the live region capturing new drags.
    pub fn is_trailing(&self) -> bool {
        matches!(self.state, TimeboxState::Uncommitted)
    }

    /// Store new bounds. Returns `true` on the first commit.
    pub(crate) fn commit(&mut self, bounds: DomainBounds) -> bool {
        let first = self.is_trailing();
        self.state = TimeboxState::Committed(bounds);
        first
    }
}
