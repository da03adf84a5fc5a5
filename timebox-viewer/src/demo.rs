//! Generated screen-time dataset for running the viewer without a CSV file.

use chrono::{DateTime, Months, TimeZone, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use timebox_common::{Dataset, Error, Result, Series};

const PEOPLE: &[&str] = &[
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi", "ivan", "judy",
];

/// Months of data generated per person.
const MONTHS: u32 = 24;

/// Demo dataset generator.
pub struct DemoGenerator {
    rng: SmallRng,
}

impl Default for DemoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoGenerator {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Reproducible generator.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Monthly hours of screen time per person: a personal baseline, a
    /// yearly seasonal swing and noise, with the odd missing month.
    pub fn generate(&mut self) -> Result<Dataset> {
        let start = Utc
            .with_ymd_and_hms(2019, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| Error::Dataset("invalid demo start date".to_string()))?;
        let timestamps: Vec<DateTime<Utc>> = (0..MONTHS)
            .filter_map(|m| start.checked_add_months(Months::new(m)))
            .collect();

        let series = PEOPLE
            .iter()
            .map(|name| {
                let baseline = self.rng.random_range(20.0..120.0);
                let swing = self.rng.random_range(0.0..25.0);
                let values = (0..timestamps.len())
                    .map(|m| {
                        if self.rng.random_range(0..30) == 0 {
                            return f64::NAN;
                        }
                        let season = (m as f64 / 12.0 * std::f64::consts::TAU).cos() * swing;
                        let noise = self.rng.random_range(-10.0..10.0);
                        (baseline + season + noise).max(0.0)
                    })
                    .collect();
                Series::new(*name, values)
            })
            .collect();

        Dataset::new("# hours of screen time", timestamps, series)
    }
}
