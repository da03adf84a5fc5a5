//! JSON export and restore of the committed timebox set.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use timebox_common::Result;

use crate::timebox::{DomainBounds, TimeboxId};

/// One committed timebox in domain coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeboxRecord {
    pub id: TimeboxId,
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub value_min: f64,
    pub value_max: f64,
}

impl TimeboxRecord {
    pub fn new(id: TimeboxId, bounds: &DomainBounds) -> Self {
        Self {
            id,
            time_start: bounds.time_start(),
            time_end: bounds.time_end(),
            value_min: bounds.value_min(),
            value_max: bounds.value_max(),
        }
    }

    /// Normalized bounds of the record.
    pub fn bounds(&self) -> DomainBounds {
        DomainBounds::new(
            self.time_start,
            self.time_end,
            self.value_min,
            self.value_max,
        )
    }
}

/// The committed timeboxes of a session plus the names of the series that
/// matched them when exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub timeboxes: Vec<TimeboxRecord>,

    /// Informational; recomputed on restore.
    #[serde(default)]
    pub matching: Vec<String>,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(
            path = %path.display(),
            timeboxes = self.timeboxes.len(),
            "Exported timeboxes"
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
