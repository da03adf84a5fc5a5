//! CSV loading: long-format rows reshaped into one series per entity.
//!
//! Input rows look like `person,year_month,screen_time_seconds`. Periods
//! become the shared timestamp index (sorted, de-duplicated) and each
//! entity becomes a [`Series`] in first-appearance order.

use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Series};
use crate::error::{Error, Result};
use crate::period::parse_period;

/// Column layout and value conversion for the CSV loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvLayout {
    /// Column holding the entity name.
    #[serde(default = "default_entity_column")]
    pub entity_column: String,

    /// Column holding the period label.
    #[serde(default = "default_period_column")]
    pub period_column: String,

    /// Column holding the measurement.
    #[serde(default = "default_value_column")]
    pub value_column: String,

    /// chrono format of the period column.
    #[serde(default = "default_period_format")]
    pub period_format: String,

    /// Factor applied to every measurement (seconds to hours by default).
    #[serde(default = "default_value_scale")]
    pub value_scale: f64,

    /// Value axis label.
    #[serde(default = "default_label")]
    pub label: String,
}

fn default_entity_column() -> String {
    "person".to_string()
}

fn default_period_column() -> String {
    "year_month".to_string()
}

fn default_value_column() -> String {
    "screen_time_seconds".to_string()
}

fn default_period_format() -> String {
    "%Y-%m".to_string()
}

fn default_value_scale() -> f64 {
    1.0 / 3600.0
}

fn default_label() -> String {
    "# hours of screen time".to_string()
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            entity_column: default_entity_column(),
            period_column: default_period_column(),
            value_column: default_value_column(),
            period_format: default_period_format(),
            value_scale: default_value_scale(),
            label: default_label(),
        }
    }
}

/// Load a dataset from a CSV file.
pub fn load_csv(path: impl AsRef<Path>, layout: &CsvLayout) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let dataset = read_csv(file, layout)?;

    tracing::info!(
        path = %path.display(),
        timestamps = dataset.len(),
        series = dataset.series().len(),
        "Loaded dataset"
    );

    Ok(dataset)
}

/// Read a dataset from any CSV source.
pub fn read_csv<R: Read>(reader: R, layout: &CsvLayout) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Dataset(format!("missing column '{}'", name)))
    };
    let entity_col = column(&layout.entity_column)?;
    let period_col = column(&layout.period_column)?;
    let value_col = column(&layout.value_column)?;

    let mut names: Vec<String> = Vec::new();
    let mut name_index: HashMap<String, usize> = HashMap::new();
    let mut periods: BTreeSet<DateTime<Utc>> = BTreeSet::new();
    let mut rows: Vec<(usize, DateTime<Utc>, f64)> = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let field = |col: usize| record.get(col).unwrap_or_default();

        let period_text = field(period_col);
        let period = parse_period(period_text, &layout.period_format).ok_or_else(|| {
            Error::Dataset(format!(
                "row {}: cannot parse period '{}' with format '{}'",
                line + 1,
                period_text,
                layout.period_format
            ))
        })?;

        let value = match field(value_col).parse::<f64>() {
            Ok(v) => v * layout.value_scale,
            Err(_) => {
                tracing::warn!(
                    row = line + 1,
                    value = field(value_col),
                    "Non-numeric measurement, treating as missing"
                );
                f64::NAN
            }
        };

        let name = field(entity_col);
        let index = match name_index.get(name) {
            Some(&i) => i,
            None => {
                names.push(name.to_string());
                name_index.insert(name.to_string(), names.len() - 1);
                names.len() - 1
            }
        };

        periods.insert(period);
        rows.push((index, period, value));
    }

    let timestamps: Vec<DateTime<Utc>> = periods.into_iter().collect();
    let mut values = vec![vec![f64::NAN; timestamps.len()]; names.len()];
    let mut seen = vec![vec![false; timestamps.len()]; names.len()];

    for (entity, period, value) in rows {
        // Every period was inserted above, so the search always succeeds.
        let Ok(slot) = timestamps.binary_search(&period) else {
            continue;
        };
        if seen[entity][slot] {
            tracing::warn!(
                entity = %names[entity],
                period = %period,
                "Duplicate measurement, keeping the last one"
            );
        }
        seen[entity][slot] = true;
        values[entity][slot] = value;
    }

    let series = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Series::new(name, values))
        .collect();

    Dataset::new(layout.label.clone(), timestamps, series)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
person,year_month,screen_time_seconds
Alice,2020-01,3600
Bob,2020-01,7200
Alice,2020-02,1800
Bob,2020-02,0
";

    #[test]
    fn test_reshape_long_format() {
        let dataset = read_csv(SAMPLE.as_bytes(), &CsvLayout::default()).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.label(), "# hours of screen time");

        let names: Vec<_> = dataset.series().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(dataset.series()[0].values, vec![1.0, 0.5]);
        assert_eq!(dataset.series()[1].values, vec![2.0, 0.0]);
    }

    #[test]
    fn test_missing_periods_are_nan() {
        let csv = "\
person,year_month,screen_time_seconds
Alice,2020-02,3600
Bob,2020-01,3600
";
        let dataset = read_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();

        assert_eq!(dataset.len(), 2);
        let alice = &dataset.series()[0];
        assert!(alice.values[0].is_nan());
        assert_eq!(alice.values[1], 1.0);
    }

    #[test]
    fn test_non_numeric_value_is_missing() {
        let csv = "\
person,year_month,screen_time_seconds
Alice,2020-01,n/a
";
        let dataset = read_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();
        assert!(dataset.series()[0].values[0].is_nan());
    }

    #[test]
    fn test_duplicate_row_keeps_last() {
        let csv = "\
person,year_month,screen_time_seconds
Alice,2020-01,3600
Alice,2020-01,7200
";
        let dataset = read_csv(csv.as_bytes(), &CsvLayout::default()).unwrap();
        assert_eq!(dataset.series()[0].values, vec![2.0]);
    }

    #[test]
    fn test_missing_column() {
        let csv = "name,month,value\nAlice,2020-01,1\n";
        let err = read_csv(csv.as_bytes(), &CsvLayout::default()).unwrap_err();
        assert!(err.to_string().contains("person"));
    }

    #[test]
    fn test_custom_layout() {
        let csv = "name,day,value\nAlice,2020-01-02,4\nAlice,2020-01-01,3\n";
        let layout = CsvLayout {
            entity_column: "name".to_string(),
            period_column: "day".to_string(),
            value_column: "value".to_string(),
            period_format: "%Y-%m-%d".to_string(),
            value_scale: 1.0,
            label: "value".to_string(),
        };

        let dataset = read_csv(csv.as_bytes(), &layout).unwrap();
        assert_eq!(dataset.series()[0].values, vec![3.0, 4.0]);
    }

    #[test]
    fn test_bad_period() {
        let csv = "person,year_month,screen_time_seconds\nAlice,January,1\n";
        let err = read_csv(csv.as_bytes(), &CsvLayout::default()).unwrap_err();
        assert!(matches!(err, Error::Dataset(_)));
    }
}
