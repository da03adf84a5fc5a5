//! Nearest data point under the pointer.

use chrono::{DateTime, Utc};

use timebox_common::Dataset;

use crate::mapper::{CoordinateMapper, PixelPoint};

/// A data point close to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverHit {
    /// Index into `Dataset::series()`.
    pub series: usize,
    /// Index into `Dataset::timestamps()`.
    pub index: usize,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// Pixel position of the point.
    pub position: PixelPoint,
}

/// Find the point at the timestamp nearest `point.x` whose value lies
/// vertically closest to `point.y`, within `max_distance` pixels.
pub fn nearest_point(
    dataset: &Dataset,
    mapper: &CoordinateMapper,
    point: PixelPoint,
    max_distance: f32,
) -> Option<HoverHit> {
    if !mapper.extent().contains(point) {
        return None;
    }

    let index = dataset.nearest_index(mapper.time_scale().invert(point.x))?;
    let timestamp = dataset.timestamps()[index];
    let x = mapper.time_scale().map(timestamp);

    dataset
        .series()
        .iter()
        .enumerate()
        .filter_map(|(series, s)| {
            let value = s.value_at(index)?;
            let y = mapper.value_scale().map(value);
            Some(HoverHit {
                series,
                index,
                timestamp,
                value,
                position: PixelPoint::new(x, y),
            })
        })
        .filter(|hit| (hit.position.y - point.y).abs() <= max_distance)
        .min_by(|a, b| {
            let da = (a.position.y - point.y).abs();
            let db = (b.position.y - point.y).abs();
            da.total_cmp(&db)
        })
}
