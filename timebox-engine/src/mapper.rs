//! Pixel ↔ domain coordinate mapping.
//!
//! The time axis maps timestamps left to right; the value axis maps values
//! bottom to top. Both scales are linear and shared by every timebox.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use timebox_common::{Dataset, Granularity};

use crate::config::{ChartConfig, Margin};
use crate::timebox::DomainBounds;

/// A point in widget pixel coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned pixel rectangle with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl PixelRect {
    /// Create a rectangle from any two opposite corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether the rectangle has zero width or zero height.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn contains(&self, p: PixelPoint) -> bool {
        p.x >= self.x0 && p.x <= self.x1 && p.y >= self.y0 && p.y <= self.y1
    }

    pub fn top_left(&self) -> PixelPoint {
        PixelPoint::new(self.x0, self.y0)
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x0: self.x0 + dx,
            y0: self.y0 + dy,
            x1: self.x1 + dx,
            y1: self.y1 + dy,
        }
    }

    /// Clamp every edge into `extent`.
    pub fn clamp_to(&self, extent: &PixelRect) -> Self {
        Self::new(
            self.x0.clamp(extent.x0, extent.x1),
            self.y0.clamp(extent.y0, extent.y1),
            self.x1.clamp(extent.x0, extent.x1),
            self.y1.clamp(extent.y0, extent.y1),
        )
    }

    /// Translate so the rectangle lies inside `extent`, keeping its size
    /// where it fits.
    pub fn shift_within(&self, extent: &PixelRect) -> Self {
        let dx = if self.x0 < extent.x0 {
            extent.x0 - self.x0
        } else if self.x1 > extent.x1 {
            extent.x1 - self.x1
        } else {
            0.0
        };
        let dy = if self.y0 < extent.y0 {
            extent.y0 - self.y0
        } else if self.y1 > extent.y1 {
            extent.y1 - self.y1
        } else {
            0.0
        };
        self.translate(dx, dy).clamp_to(extent)
    }
}

/// Linear scale from a time domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    range: (f32, f32),
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f32, f32)) -> Self {
        Self {
            start: domain.0,
            end: domain.1,
            range,
        }
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    fn span_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    /// Pixel position of `t`.
    pub fn map(&self, t: DateTime<Utc>) -> f32 {
        let (r0, r1) = self.range;
        let span = self.span_ms();
        if span == 0 {
            return (r0 + r1) / 2.0;
        }
        let fraction = (t - self.start).num_milliseconds() as f64 / span as f64;
        (r0 as f64 + fraction * (r1 - r0) as f64) as f32
    }

    /// Timestamp at pixel `x`, to the nearest millisecond.
    pub fn invert(&self, x: f32) -> DateTime<Utc> {
        let (r0, r1) = self.range;
        let span = self.span_ms();
        if span == 0 || r0 == r1 {
            return self.start;
        }
        let fraction = (x - r0) as f64 / (r1 - r0) as f64;
        let offset = (fraction * span as f64).round() as i64;
        DateTime::from_timestamp_millis(self.start.timestamp_millis() + offset)
            .unwrap_or(self.start)
    }
}

/// Linear scale from a value domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    domain: (f64, f64),
    range: (f32, f32),
}

impl ValueScale {
    /// `range` is `(bottom, top)` for a conventional upward value axis.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f32, f32) {
        self.range
    }

    pub fn map(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 {
            return (r0 + r1) / 2.0;
        }
        let fraction = (v - d0) / (d1 - d0);
        (r0 as f64 + fraction * (r1 - r0) as f64) as f32
    }

    pub fn invert(&self, y: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 == d1 || r0 == r1 {
            return d0;
        }
        let fraction = (y - r0) as f64 / (r1 - r0) as f64;
        d0 + fraction * (d1 - d0)
    }
}

/// Round `max` up to a readable axis limit (1, 2 or 5 times a power of ten
/// step, aiming at about ten ticks).
pub fn nice_max(max: f64) -> f64 {
    if !max.is_finite() || max <= 0.0 {
        return 1.0;
    }

    let raw_step = max / 10.0;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let error = raw_step / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    let step = factor * magnitude;

    (max / step).ceil() * step
}

/// Distance in pixels under which an inverted time snaps to the next
/// period boundary.
const SNAP_TOLERANCE: f32 = 0.5;

/// The pair of scales shared by all timeboxes of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    time: TimeScale,
    value: ValueScale,
    granularity: Granularity,
}

impl CoordinateMapper {
    pub fn new(time: TimeScale, value: ValueScale, granularity: Granularity) -> Self {
        Self {
            time,
            value,
            granularity,
        }
    }

    /// Scales for `dataset` laid out at the configured size: time spans the
    /// first timestamp to the end of the last period, values span
    /// `[0, nice(max)]`.
    pub fn for_dataset(dataset: &Dataset, chart: &ChartConfig) -> Self {
        let epoch = DateTime::<Utc>::default();
        let time_domain = dataset
            .time_extent()
            .map(|(first, last)| (first, chart.granularity.next(last)))
            .unwrap_or((epoch, epoch));
        let value_domain = (0.0, nice_max(dataset.value_max().unwrap_or(0.0)));
        let (time_range, value_range) = plot_ranges(chart.width, chart.height, &chart.margin);

        Self::new(
            TimeScale::new(time_domain, time_range),
            ValueScale::new(value_domain, value_range),
            chart.granularity,
        )
    }

    /// Same domains laid out for a new widget size.
    pub fn with_size(&self, width: f32, height: f32, margin: &Margin) -> Self {
        let (time_range, value_range) = plot_ranges(width, height, margin);
        Self::new(
            TimeScale::new(self.time.domain(), time_range),
            ValueScale::new(self.value.domain(), value_range),
            self.granularity,
        )
    }

    pub fn time_scale(&self) -> &TimeScale {
        &self.time
    }

    pub fn value_scale(&self) -> &ValueScale {
        &self.value
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// The plot area in pixels.
    pub fn extent(&self) -> PixelRect {
        let (x0, x1) = self.time.range();
        let (y0, y1) = self.value.range();
        PixelRect::new(x0, y0, x1, y1)
    }

    /// Domain bounds covered by a pixel rectangle, with times snapped down
    /// to the start of their period.
    pub fn to_domain(&self, rect: &PixelRect) -> DomainBounds {
        let start = self.snap_time(rect.x0);
        let end = self.snap_time(rect.x1);
        let top = self.value.invert(rect.y0);
        let bottom = self.value.invert(rect.y1);
        DomainBounds::new(start, end, top, bottom)
    }

    /// Period start at pixel `x`. A period boundary less than half a pixel
    /// to the right of `x`, and nearer than the floor, wins over the floor,
    /// so a boundary projected to `f32` inverts back to itself.
    fn snap_time(&self, x: f32) -> DateTime<Utc> {
        let floor = self.granularity.floor(self.time.invert(x));
        let next = self.granularity.next(floor);
        let to_next = self.time.map(next) - x;
        if next > floor && to_next < SNAP_TOLERANCE && to_next < x - self.time.map(floor) {
            next
        } else {
            floor
        }
    }

    /// Pixel rectangle of domain bounds.
    pub fn to_pixel(&self, bounds: &DomainBounds) -> PixelRect {
        PixelRect::new(
            self.time.map(bounds.time_start()),
            self.value.map(bounds.value_max()),
            self.time.map(bounds.time_end()),
            self.value.map(bounds.value_min()),
        )
    }
}

fn plot_ranges(width: f32, height: f32, margin: &Margin) -> ((f32, f32), (f32, f32)) {
    let left = margin.left;
    let right = (width - margin.right).max(left);
    let top = margin.top;
    let bottom = (height - margin.bottom).max(top);
    ((left, right), (bottom, top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use timebox_common::Series;

    fn month(y: i32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, 1, 0, 0, 0).unwrap()
    }

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(
            TimeScale::new((month(2020, 1), month(2021, 1)), (30.0, 780.0)),
            ValueScale::new((0.0, 10.0), (570.0, 20.0)),
            Granularity::Month,
        )
    }

    #[test]
    fn test_pixel_rect_normalizes() {
        let rect = PixelRect::new(10.0, 50.0, 5.0, 20.0);
        assert_eq!(rect, PixelRect::new(5.0, 20.0, 10.0, 50.0));
        assert_eq!(rect.width(), 5.0);
        assert_eq!(rect.height(), 30.0);
        assert!(!rect.is_degenerate());
        assert!(PixelRect::new(1.0, 1.0, 1.0, 9.0).is_degenerate());
    }

    #[test]
    fn test_shift_within_keeps_size() {
        let extent = PixelRect::new(0.0, 0.0, 100.0, 100.0);
        let rect = PixelRect::new(90.0, -10.0, 110.0, 10.0).shift_within(&extent);
        assert_eq!(rect, PixelRect::new(80.0, 0.0, 100.0, 20.0));
    }

    #[test]
    fn test_time_scale_endpoints() {
        let scale = TimeScale::new((month(2020, 1), month(2021, 1)), (30.0, 780.0));
        assert_eq!(scale.map(month(2020, 1)), 30.0);
        assert_eq!(scale.map(month(2021, 1)), 780.0);
        assert_eq!(scale.invert(30.0), month(2020, 1));
        assert_eq!(scale.invert(780.0), month(2021, 1));
    }

    #[test]
    fn test_value_scale_is_inverted_vertically() {
        let scale = ValueScale::new((0.0, 10.0), (570.0, 20.0));
        assert_eq!(scale.map(0.0), 570.0);
        assert_eq!(scale.map(10.0), 20.0);
        assert!((scale.invert(295.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_domains() {
        let t = month(2020, 1);
        let time = TimeScale::new((t, t), (0.0, 100.0));
        assert_eq!(time.map(t), 50.0);
        assert_eq!(time.invert(12.0), t);

        let value = ValueScale::new((3.0, 3.0), (100.0, 0.0));
        assert_eq!(value.map(3.0), 50.0);
        assert_eq!(value.invert(10.0), 3.0);
    }

    #[test]
    fn test_to_domain_floors_time_and_normalizes_values() {
        let mapper = mapper();
        let time = mapper.time_scale();
        let value = mapper.value_scale();
        let feb_mid = time.map(Utc.with_ymd_and_hms(2020, 2, 15, 0, 0, 0).unwrap());
        let may_mid = time.map(Utc.with_ymd_and_hms(2020, 5, 15, 0, 0, 0).unwrap());

        // Drag from bottom-right to top-left.
        let rect = PixelRect::new(may_mid, value.map(2.0), feb_mid, value.map(8.0));
        let bounds = mapper.to_domain(&rect);

        assert_eq!(bounds.time_start(), month(2020, 2));
        assert_eq!(bounds.time_end(), month(2020, 5));
        assert!((bounds.value_min() - 2.0).abs() < 1e-3);
        assert!((bounds.value_max() - 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_period_boundaries_invert_to_themselves() {
        let mapper = CoordinateMapper::new(
            TimeScale::new((month(2016, 1), month(2020, 1)), (30.0, 780.0)),
            ValueScale::new((0.0, 10.0), (570.0, 20.0)),
            Granularity::Month,
        );

        for offset in 0..48 {
            let start = month(2016, 1) + chrono::Months::new(offset);
            let end = start + chrono::Months::new(4);
            let bounds = DomainBounds::new(start, end, 2.0, 8.0);
            let back = mapper.to_domain(&mapper.to_pixel(&bounds));
            assert_eq!(back.time_start(), start);
            assert_eq!(back.time_end(), end);
        }
    }

    #[test]
    fn test_to_pixel_orientation() {
        let mapper = mapper();
        let bounds = DomainBounds::new(month(2020, 1), month(2021, 1), 0.0, 10.0);
        assert_eq!(
            mapper.to_pixel(&bounds),
            PixelRect::new(30.0, 20.0, 780.0, 570.0)
        );
        assert_eq!(mapper.extent(), PixelRect::new(30.0, 20.0, 780.0, 570.0));
    }

    #[test]
    fn test_nice_max() {
        assert_eq!(nice_max(9.0), 9.0);
        assert_eq!(nice_max(9.3), 10.0);
        assert_eq!(nice_max(97.0), 100.0);
        assert_eq!(nice_max(0.0), 1.0);
        assert_eq!(nice_max(f64::NAN), 1.0);
    }

    #[test]
    fn test_for_dataset_and_resize() {
        let dataset = Dataset::new(
            "hours",
            vec![month(2020, 1), month(2020, 2), month(2020, 3)],
            vec![Series::new("A", vec![1.0, 5.0, 9.3])],
        )
        .unwrap();
        let chart = ChartConfig::default();
        let mapper = CoordinateMapper::for_dataset(&dataset, &chart);

        // The last period is covered in full.
        assert_eq!(mapper.time_scale().domain(), (month(2020, 1), month(2020, 4)));
        assert_eq!(mapper.value_scale().domain(), (0.0, 10.0));
        assert_eq!(mapper.extent(), PixelRect::new(30.0, 20.0, 780.0, 570.0));

        let resized = mapper.with_size(400.0, 300.0, &chart.margin);
        assert_eq!(resized.time_scale().domain(), mapper.time_scale().domain());
        assert_eq!(resized.extent(), PixelRect::new(30.0, 20.0, 380.0, 270.0));
    }
}
