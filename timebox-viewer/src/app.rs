//! Timebox Viewer Iced application.

use std::path::PathBuf;

use iced::widget::canvas::Cache;
use iced::widget::row;
use iced::{Element, Task, Theme};

use timebox_engine::{ChartSession, Input};

use crate::message::Message;
use crate::view::chart::chart_view;
use crate::view::legend::legend_view;

/// Everything needed to start the application.
#[derive(Debug, Clone)]
pub struct Launch {
    pub session: ChartSession,
    pub export_path: PathBuf,
}

/// The main Timebox Viewer application.
pub struct TimeboxViewer {
    /// The chart session (dataset, timeboxes, filter).
    session: ChartSession,
    /// Cached series geometry, cleared when the filter changes.
    series_cache: Cache,
    /// Target of the Export button.
    export_path: PathBuf,
    /// Result of the last export.
    status: Option<String>,
}

impl TimeboxViewer {
    pub fn new(launch: Launch) -> Self {
        Self {
            session: launch.session,
            series_cache: Cache::new(),
            export_path: launch.export_path,
            status: None,
        }
    }

    /// Boot the application (called by iced::application).
    pub fn boot(launch: Launch) -> (Self, Task<Message>) {
        (Self::new(launch), Task::none())
    }

    pub fn session(&self) -> &ChartSession {
        &self.session
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        let filter = self.session.filter();
        if filter.is_filtered() {
            format!(
                "Timebox Viewer - {} of {} series",
                filter.match_count(),
                filter.len()
            )
        } else {
            "Timebox Viewer".to_string()
        }
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Chart { input, size } => {
                self.handle_input(input, size.width, size.height);
            }

            Message::SelectTimebox(id) => {
                if let Err(err) = self.session.select(id) {
                    tracing::debug!(error = %err, "Selection ignored");
                }
            }

            Message::RemoveTimebox(id) => match self.session.remove(id) {
                Ok(()) => self.series_cache.clear(),
                Err(err) => tracing::debug!(error = %err, "Removal ignored"),
            },

            Message::Reset => {
                self.session.reset();
                self.series_cache.clear();
            }

            Message::Export => self.export(),
        }

        Task::none()
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        row![
            chart_view(&self.session, &self.series_cache),
            legend_view(&self.session, self.status()),
        ]
        .into()
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn handle_input(&mut self, input: Input, width: f32, height: f32) {
        if self.session.size() != (width, height) {
            self.session.resize(width, height);
        }

        if self.session.dispatch(input).changes_filter() {
            self.series_cache.clear();
        }
    }

    fn export(&mut self) {
        let snapshot = self.session.snapshot();
        self.status = Some(match snapshot.save(&self.export_path) {
            Ok(()) => format!(
                "Exported {} timeboxes to {}",
                snapshot.timeboxes.len(),
                self.export_path.display()
            ),
            Err(err) => {
                tracing::warn!(error = %err, "Export failed");
                format!("Export failed: {}", err)
            }
        });
    }
}
