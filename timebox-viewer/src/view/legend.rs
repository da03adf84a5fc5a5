//! Side panel: match summary, series list and committed timeboxes.

use iced::widget::{Column, button, column, container, row, rule, scrollable, text};
use iced::{Alignment, Color, Element, Length, Theme};

use timebox_engine::{ChartSession, SeriesStyle};

use super::formatting::{format_bounds, format_match_count};
use crate::message::Message;

/// Render the legend panel for `session`. `status` is the result of the
/// last export, if any.
pub fn legend_view<'a>(session: &'a ChartSession, status: Option<&'a str>) -> Element<'a, Message> {
    let content = column![
        render_summary(session),
        rule::horizontal(1),
        render_timeboxes(session),
        rule::horizontal(1),
        render_series(session),
        rule::horizontal(1),
        render_actions(session, status),
    ]
    .spacing(12)
    .padding(12);

    container(scrollable(content))
        .width(Length::Fixed(240.0))
        .height(Length::Fill)
        .into()
}

fn render_summary(session: &ChartSession) -> Element<'_, Message> {
    let filter = session.filter();
    let summary = text(format_match_count(filter.match_count(), filter.len())).size(16);

    let detail = text(match filter.active_timeboxes() {
        0 => "Drag on the chart to add a timebox".to_string(),
        1 => "1 timebox".to_string(),
        n => format!("{} timeboxes", n),
    })
    .size(11)
    .style(muted);

    column![summary, detail].spacing(4).into()
}

fn render_timeboxes(session: &ChartSession) -> Element<'_, Message> {
    let granularity = session.mapper().granularity();
    let mut list = Column::new().spacing(4);

    for view in session.timeboxes() {
        let Some(bounds) = view.bounds else {
            continue;
        };

        let label = text(format!("{} {}", view.id, format_bounds(&bounds, granularity))).size(12);
        let select = button(label)
            .on_press(Message::SelectTimebox(view.id))
            .style(if view.is_selected {
                button::primary
            } else {
                button::secondary
            })
            .width(Length::Fill);
        let remove = button(text("x").size(12))
            .on_press(Message::RemoveTimebox(view.id))
            .style(button::danger);

        list = list.push(row![select, remove].spacing(4).align_y(Alignment::Center));
    }

    column![text("Timeboxes").size(14), list].spacing(6).into()
}

fn render_series(session: &ChartSession) -> Element<'_, Message> {
    let filter = session.filter();
    let mut list = Column::new().spacing(2);

    for (i, series) in session.dataset().series().iter().enumerate() {
        let entry = text(series.name.as_str()).size(12);
        let entry = match filter.style(i) {
            SeriesStyle::Highlighted => entry.style(|_theme: &Theme| text::Style {
                color: Some(Color::from_rgb(0.27, 0.51, 0.71)),
            }),
            SeriesStyle::Dimmed => entry.style(muted),
        };
        list = list.push(entry);
    }

    column![text("Series").size(14), list].spacing(6).into()
}

fn render_actions<'a>(session: &'a ChartSession, status: Option<&'a str>) -> Element<'a, Message> {
    let has_timeboxes = session.filter().is_filtered();

    let reset = button(text("Reset").size(14))
        .on_press_maybe(has_timeboxes.then_some(Message::Reset))
        .style(button::secondary);
    let export = button(text("Export").size(14))
        .on_press(Message::Export)
        .style(button::primary);

    let mut actions = column![row![reset, export].spacing(8)].spacing(6);
    if let Some(status) = status {
        actions = actions.push(text(status).size(11).style(muted));
    }
    actions.into()
}

fn muted(_theme: &Theme) -> text::Style {
    text::Style {
        color: Some(Color::from_rgb(0.5, 0.5, 0.5)),
    }
}
