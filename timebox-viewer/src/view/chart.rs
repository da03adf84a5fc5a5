//! Multi-series chart with timebox interaction, using Iced canvas.
//!
//! Series lines are cached and only redrawn when the filter or the widget
//! size changes. Timeboxes, the live gesture and the hover read-out are
//! drawn on a second, uncached layer every frame.

use std::ops::Range;

use iced::mouse;
use iced::widget::canvas::{self, Cache, Canvas, Frame, Geometry, LineDash, Path, Stroke, Text};
use iced::{Color, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use timebox_common::Series;
use timebox_engine::hover;
use timebox_engine::{
    ChartSession, CoordinateMapper, Handle, Input, Key, PixelPoint, PixelRect, PointerEvent,
    SeriesStyle, Surface,
};

use super::formatting::format_value;
use crate::message::Message;

const BACKGROUND: Color = Color::from_rgb(0.1, 0.1, 0.12);
const PLOT_BACKGROUND: Color = Color::from_rgb(0.08, 0.08, 0.1);
const AXIS: Color = Color::from_rgb(0.5, 0.5, 0.5);
const HIGHLIGHT: Color = Color::from_rgb(0.27, 0.51, 0.71);
const DIMMED: Color = Color::from_rgba(0.6, 0.6, 0.6, 0.25);
const TIMEBOX: Color = Color::from_rgb(0.3, 0.8, 1.0);
const SELECTED: Color = Color::from_rgb(1.0, 0.7, 0.0);

/// Maximum number of labels on the time axis.
const TIME_TICKS: usize = 8;
/// Number of intervals on the value axis.
const VALUE_TICKS: usize = 5;

/// Interaction state kept by the canvas between events.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A pointer gesture is in progress.
    dragging: bool,
    /// Pointer position relative to the canvas, while over it.
    hover: Option<Point>,
}

/// Canvas program drawing one chart session.
pub struct TimeboxChart<'a> {
    session: &'a ChartSession,
    cache: &'a Cache,
}

impl<'a> TimeboxChart<'a> {
    pub fn new(session: &'a ChartSession, cache: &'a Cache) -> Self {
        Self { session, cache }
    }

    /// Scales laid out for the actual canvas size.
    fn mapper_for(&self, size: Size) -> CoordinateMapper {
        self.session
            .mapper()
            .with_size(size.width, size.height, &self.session.config().chart.margin)
    }

    fn publish(&self, input: Input, bounds: Rectangle) -> Option<canvas::Action<Message>> {
        Some(
            canvas::Action::publish(Message::Chart {
                input,
                size: bounds.size(),
            })
            .and_capture(),
        )
    }
}

impl<'a> canvas::Program<Message> for TimeboxChart<'a> {
    type State = ChartInteraction;

    fn update(
        &self,
        interaction: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            canvas::Event::Mouse(mouse_event) => {
                self.handle_mouse(interaction, mouse_event, bounds, cursor)
            }
            canvas::Event::Keyboard(keyboard_event) => {
                self.handle_keyboard(keyboard_event, bounds)
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        interaction: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mapper = self.mapper_for(bounds.size());

        let series = self.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_background(frame, &mapper);
            self.draw_axes(frame, &mapper);
            self.draw_series(frame, &mapper);
        });

        let mut overlay = Frame::new(renderer, bounds.size());
        self.draw_timeboxes(&mut overlay, &mapper);
        if !interaction.dragging {
            if let Some(position) = interaction.hover {
                self.draw_hover(&mut overlay, &mapper, position);
            }
        }

        vec![series, overlay.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        interaction: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if interaction.dragging {
            return mouse::Interaction::Grabbing;
        }
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };

        let handle_size = self.session.config().interaction.handle_size;
        match self
            .session
            .registry()
            .surface_at(pixel(position), &self.mapper_for(bounds.size()), handle_size)
        {
            Some(Surface::Handle(_, Handle::East | Handle::West)) => {
                mouse::Interaction::ResizingHorizontally
            }
            Some(Surface::Handle(_, Handle::North | Handle::South)) => {
                mouse::Interaction::ResizingVertically
            }
            Some(Surface::Handle(..)) | Some(Surface::Overlay(_)) => mouse::Interaction::Crosshair,
            Some(Surface::Body(_)) => mouse::Interaction::Grab,
            None => mouse::Interaction::default(),
        }
    }
}

impl<'a> TimeboxChart<'a> {
    /// Handle mouse events. Once a gesture starts, moves and the release
    /// are forwarded even when the cursor leaves the canvas.
    fn handle_mouse(
        &self,
        interaction: &mut ChartInteraction,
        event: &mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        match event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let position = pixel(cursor.position_in(bounds)?);
                if !accepts_press(self.session, &self.mapper_for(bounds.size()), position) {
                    return None;
                }
                interaction.dragging = true;
                self.publish(Input::Pointer(PointerEvent::Down(position)), bounds)
            }
            mouse::Event::CursorMoved { position } => {
                let relative = Point::new(position.x - bounds.x, position.y - bounds.y);
                if interaction.dragging {
                    return self.publish(Input::Pointer(PointerEvent::Move(pixel(relative))), bounds);
                }

                let hover = cursor.position_in(bounds);
                if hover != interaction.hover {
                    interaction.hover = hover;
                    return Some(canvas::Action::request_redraw());
                }
                None
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                if !interaction.dragging {
                    return None;
                }
                interaction.dragging = false;
                let position = cursor
                    .position()
                    .map(|p| Point::new(p.x - bounds.x, p.y - bounds.y))
                    .or(interaction.hover)
                    .unwrap_or(Point::ORIGIN);
                self.publish(Input::Pointer(PointerEvent::Up(pixel(position))), bounds)
            }
            mouse::Event::CursorLeft => {
                interaction.hover.take()?;
                Some(canvas::Action::request_redraw())
            }
            _ => None,
        }
    }

    /// Handle keyboard events.
    fn handle_keyboard(
        &self,
        event: &iced::keyboard::Event,
        bounds: Rectangle,
    ) -> Option<canvas::Action<Message>> {
        if let iced::keyboard::Event::KeyPressed { key, .. } = event {
            let key = map_key(key).filter(|key| captures_key(self.session, *key))?;
            return self.publish(Input::Key(key), bounds);
        }
        None
    }

    fn draw_background(&self, frame: &mut Frame, mapper: &CoordinateMapper) {
        frame.fill(&Path::rectangle(Point::ORIGIN, frame.size()), BACKGROUND);

        let extent = mapper.extent();
        frame.fill(
            &Path::rectangle(rect_origin(&extent), rect_size(&extent)),
            PLOT_BACKGROUND,
        );
    }

    /// Draw grid lines and labels.
    fn draw_axes(&self, frame: &mut Frame, mapper: &CoordinateMapper) {
        let extent = mapper.extent();
        let grid = Stroke::default()
            .with_color(Color::from_rgb(0.2, 0.2, 0.25))
            .with_width(1.0);

        // Value axis
        let (low, high) = mapper.value_scale().domain();
        for i in 0..=VALUE_TICKS {
            let value = low + (high - low) * i as f64 / VALUE_TICKS as f64;
            let y = mapper.value_scale().map(value);
            frame.stroke(
                &Path::line(Point::new(extent.x0, y), Point::new(extent.x1, y)),
                grid,
            );
            frame.fill_text(Text {
                content: format_value(value),
                position: Point::new(2.0, y - 6.0),
                color: AXIS,
                size: 10.0.into(),
                ..Text::default()
            });
        }

        frame.fill_text(Text {
            content: self.session.dataset().label().to_string(),
            position: Point::new(extent.x0 + 4.0, 2.0),
            color: Color::WHITE,
            size: 12.0.into(),
            ..Text::default()
        });

        // Time axis
        let timestamps = self.session.dataset().timestamps();
        let granularity = mapper.granularity();
        for t in timestamps.iter().step_by(tick_step(timestamps.len(), TIME_TICKS)) {
            let x = mapper.time_scale().map(*t);
            frame.stroke(
                &Path::line(Point::new(x, extent.y0), Point::new(x, extent.y1)),
                grid,
            );
            frame.fill_text(Text {
                content: granularity.label(*t),
                position: Point::new(x - 15.0, extent.y1 + 8.0),
                color: AXIS,
                size: 10.0.into(),
                ..Text::default()
            });
        }
    }

    /// Dimmed series first so highlighted ones stay on top.
    fn draw_series(&self, frame: &mut Frame, mapper: &CoordinateMapper) {
        let dataset = self.session.dataset();
        let filter = self.session.filter();

        for style in [SeriesStyle::Dimmed, SeriesStyle::Highlighted] {
            let stroke = match style {
                SeriesStyle::Highlighted => Stroke::default().with_color(HIGHLIGHT).with_width(1.5),
                SeriesStyle::Dimmed => Stroke::default().with_color(DIMMED).with_width(1.0),
            };

            for (i, series) in dataset.series().iter().enumerate() {
                if filter.style(i) != style {
                    continue;
                }
                let path = Path::new(|builder| {
                    for run in defined_runs(series) {
                        let mut points = run.map(|index| {
                            Point::new(
                                mapper.time_scale().map(dataset.timestamps()[index]),
                                mapper.value_scale().map(series.values[index]),
                            )
                        });
                        if let Some(first) = points.next() {
                            builder.move_to(first);
                            for point in points {
                                builder.line_to(point);
                            }
                        }
                    }
                });
                frame.stroke(&path, stroke);
            }
        }
    }

    fn draw_timeboxes(&self, frame: &mut Frame, mapper: &CoordinateMapper) {
        let handle_size = self.session.config().interaction.handle_size;

        for view in self.session.timeboxes() {
            let rect = if view.is_live {
                view.rect
            } else {
                view.bounds.map(|b| mapper.to_pixel(&b))
            };
            let Some(rect) = rect else {
                continue;
            };

            let color = if view.is_selected { SELECTED } else { TIMEBOX };
            let path = Path::rectangle(rect_origin(&rect), rect_size(&rect));
            frame.fill(&path, Color { a: 0.12, ..color });

            let stroke = if view.is_live {
                Stroke {
                    line_dash: LineDash {
                        segments: &[4.0, 3.0],
                        offset: 0,
                    },
                    ..Stroke::default().with_color(color).with_width(1.0)
                }
            } else {
                Stroke::default()
                    .with_color(color)
                    .with_width(if view.is_selected { 2.0 } else { 1.0 })
            };
            frame.stroke(&path, stroke);

            if view.is_selected && !view.is_trailing {
                for corner in [
                    Point::new(rect.x0, rect.y0),
                    Point::new(rect.x1, rect.y0),
                    Point::new(rect.x0, rect.y1),
                    Point::new(rect.x1, rect.y1),
                ] {
                    let half = handle_size / 2.0;
                    frame.fill(
                        &Path::rectangle(
                            Point::new(corner.x - half, corner.y - half),
                            Size::new(handle_size, handle_size),
                        ),
                        color,
                    );
                }
            }
        }
    }

    fn draw_hover(&self, frame: &mut Frame, mapper: &CoordinateMapper, position: Point) {
        let dataset = self.session.dataset();
        let distance = self.session.config().interaction.hover_distance;
        let Some(hit) = hover::nearest_point(dataset, mapper, pixel(position), distance) else {
            return;
        };

        let point = Point::new(hit.position.x, hit.position.y);
        frame.fill(&Path::circle(point, 3.5), Color::WHITE);

        let name = &dataset.series()[hit.series].name;
        frame.fill_text(Text {
            content: format!(
                "{}  {}  {}",
                name,
                mapper.granularity().label(hit.timestamp),
                format_value(hit.value)
            ),
            position: Point::new(point.x + 6.0, point.y - 16.0),
            color: Color::WHITE,
            size: 11.0.into(),
            ..Text::default()
        });
    }
}

/// Create the chart element.
pub fn chart_view<'a>(session: &'a ChartSession, cache: &'a Cache) -> Element<'a, Message> {
    Canvas::new(TimeboxChart::new(session, cache))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Translate an Iced key into an engine key.
pub fn map_key(key: &iced::keyboard::Key) -> Option<Key> {
    use iced::keyboard::{Key as IcedKey, key::Named};

    match key {
        IcedKey::Named(Named::Delete) => Some(Key::Delete),
        IcedKey::Named(Named::Backspace) => Some(Key::Backspace),
        IcedKey::Named(Named::Escape) => Some(Key::Escape),
        IcedKey::Character(c) => c.chars().next().map(Key::Char),
        _ => None,
    }
}

/// Whether a press at `point` starts a gesture: it lands on a timebox
/// surface or inside the plot area.
pub fn accepts_press(session: &ChartSession, mapper: &CoordinateMapper, point: PixelPoint) -> bool {
    let handle_size = session.config().interaction.handle_size;
    session
        .registry()
        .surface_at(point, mapper, handle_size)
        .is_some()
        || mapper.extent().contains(point)
}

/// Keys the chart acts on. Anything else is left to other widgets.
pub fn captures_key(session: &ChartSession, key: Key) -> bool {
    key == Key::Escape || session.config().interaction.delete_keys.contains(&key)
}

/// Index ranges of consecutive defined values; missing values break the
/// line.
pub fn defined_runs(series: &Series) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, value) in series.values.iter().enumerate() {
        match (value.is_nan(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                runs.push(s..i);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..series.values.len());
    }
    runs
}

/// Stride that keeps at most `max_ticks` labels.
fn tick_step(len: usize, max_ticks: usize) -> usize {
    len.div_ceil(max_ticks.max(1)).max(1)
}

fn pixel(point: Point) -> PixelPoint {
    PixelPoint::new(point.x, point.y)
}

fn rect_origin(rect: &PixelRect) -> Point {
    Point::new(rect.x0, rect.y0)
}

fn rect_size(rect: &PixelRect) -> Size {
    Size::new(rect.width(), rect.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use iced::keyboard::{Key as IcedKey, key::Named};
    use timebox_common::Dataset;
    use timebox_engine::EngineConfig;

    fn session() -> ChartSession {
        let months = (1..=3)
            .map(|m| Utc.with_ymd_and_hms(2020, m, 1, 0, 0, 0).unwrap())
            .collect();
        let dataset =
            Dataset::new("hours", months, vec![Series::new("A", vec![1.0, 2.0, 3.0])]).unwrap();
        ChartSession::new(dataset, EngineConfig::default())
    }

    #[test]
    fn test_press_in_margin_is_not_a_gesture() {
        let session = session();
        let mapper = *session.mapper();
        let extent = mapper.extent();

        assert!(accepts_press(
            &session,
            &mapper,
            PixelPoint::new(extent.x0 + 10.0, extent.y0 + 10.0)
        ));
        assert!(!accepts_press(&session, &mapper, PixelPoint::new(2.0, 2.0)));
        assert!(!accepts_press(
            &session,
            &mapper,
            PixelPoint::new(extent.x1 + 15.0, extent.y1)
        ));
    }

    #[test]
    fn test_only_bound_keys_are_captured() {
        let session = session();
        assert!(captures_key(&session, Key::Delete));
        assert!(captures_key(&session, Key::Backspace));
        assert!(captures_key(&session, Key::Escape));
        assert!(!captures_key(&session, Key::Char('d')));
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(&IcedKey::Named(Named::Delete)), Some(Key::Delete));
        assert_eq!(
            map_key(&IcedKey::Named(Named::Backspace)),
            Some(Key::Backspace)
        );
        assert_eq!(map_key(&IcedKey::Named(Named::Escape)), Some(Key::Escape));
        assert_eq!(
            map_key(&IcedKey::Character("d".into())),
            Some(Key::Char('d'))
        );
        assert_eq!(map_key(&IcedKey::Named(Named::Tab)), None);
    }

    #[test]
    fn test_defined_runs() {
        let series = Series::new("A", vec![1.0, f64::NAN, 2.0, 3.0, f64::NAN]);
        assert_eq!(defined_runs(&series), vec![0..1, 2..4]);

        let full = Series::new("B", vec![1.0, 2.0]);
        assert_eq!(defined_runs(&full), vec![0..2]);

        let empty = Series::new("C", vec![f64::NAN]);
        assert!(defined_runs(&empty).is_empty());
    }

    #[test]
    fn test_tick_step() {
        assert_eq!(tick_step(3, 8), 1);
        assert_eq!(tick_step(24, 8), 3);
        assert_eq!(tick_step(25, 8), 4);
        assert_eq!(tick_step(0, 8), 1);
    }
}
