//! Integration tests for timebox-common library.

use std::io::Write;

use chrono::{TimeZone, Utc};
use timebox_common::{CsvLayout, Granularity, load_csv, parse_config};

#[test]
fn test_load_csv_from_file() {
    let path = std::env::temp_dir().join(format!("timebox-common-{}.csv", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).expect("create temp csv");
        writeln!(file, "person,year_month,screen_time_seconds").unwrap();
        writeln!(file, "Anderson Cooper,2020-03,36000").unwrap();
        writeln!(file, "Anderson Cooper,2020-01,18000").unwrap();
        writeln!(file, "Rachel Maddow,2020-01,7200").unwrap();
    }

    let dataset = load_csv(&path, &CsvLayout::default()).expect("load failed");
    std::fs::remove_file(&path).ok();

    let jan = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let mar = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
    assert_eq!(dataset.timestamps(), &[jan, mar]);

    let cooper = &dataset.series()[0];
    assert_eq!(cooper.name, "Anderson Cooper");
    assert_eq!(cooper.values, vec![5.0, 10.0]);

    let maddow = &dataset.series()[1];
    assert_eq!(maddow.values[0], 2.0);
    assert!(maddow.values[1].is_nan());

    // Timestamps line up with month periods.
    for t in dataset.timestamps() {
        assert_eq!(Granularity::Month.floor(*t), *t);
    }
}

#[test]
fn test_load_missing_file() {
    let result = load_csv("/nonexistent/data.csv", &CsvLayout::default());
    assert!(matches!(result, Err(timebox_common::Error::Io(_))));
}

#[test]
fn test_layout_from_config() {
    let layout: CsvLayout = parse_config(
        r#"
        {
            entity_column: "host",
            value_scale: 1,
        }
        "#,
    )
    .expect("parse failed");

    assert_eq!(layout.entity_column, "host");
    assert_eq!(layout.period_column, "year_month");
    assert_eq!(layout.value_scale, 1.0);
    assert_eq!(layout.period_format, "%Y-%m");
}
