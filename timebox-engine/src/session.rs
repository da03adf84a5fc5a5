//! One chart session: dataset, scales, timeboxes and the derived filter.

use timebox_common::Dataset;

use crate::config::EngineConfig;
use crate::dispatcher::{DispatchOutcome, Dispatcher, Input, Key, PointerEvent};
use crate::error::Result;
use crate::filter::{self, FilterResult};
use crate::hover::{self, HoverHit};
use crate::mapper::{CoordinateMapper, PixelPoint, PixelRect};
use crate::registry::{BrushRegistry, CommitOutcome};
use crate::selection::{SelectionChange, SelectionState};
use crate::snapshot::{SessionSnapshot, TimeboxRecord};
use crate::timebox::{DomainBounds, TimeboxId};

/// Render view of one timebox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeboxView {
    pub id: TimeboxId,
    pub bounds: Option<DomainBounds>,
    /// Pixel projection of `bounds`, or the live gesture rectangle.
    pub rect: Option<PixelRect>,
    /// Whether `rect` comes from the gesture in progress.
    pub is_live: bool,
    pub is_trailing: bool,
    pub is_selected: bool,
}

/// State of one chart. The filter is recomputed whenever the committed
/// set changes, before the triggering call returns.
#[derive(Debug, Clone)]
pub struct ChartSession {
    dataset: Dataset,
    config: EngineConfig,
    mapper: CoordinateMapper,
    registry: BrushRegistry,
    selection: SelectionState,
    dispatcher: Dispatcher,
    filter: FilterResult,
}

impl ChartSession {
    /// Start a session with an empty filter and one trailing timebox.
    pub fn new(dataset: Dataset, config: EngineConfig) -> Self {
        let mapper = CoordinateMapper::for_dataset(&dataset, &config.chart);
        let mut registry = BrushRegistry::new();
        registry.create_trailing();

        tracing::debug!(
            series = dataset.series().len(),
            timestamps = dataset.len(),
            "Started chart session"
        );

        Self {
            filter: FilterResult::unfiltered(dataset.series().len()),
            dispatcher: Dispatcher::new(&config.interaction),
            dataset,
            config,
            mapper,
            registry,
            selection: SelectionState::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn registry(&self) -> &BrushRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn filter(&self) -> &FilterResult {
        &self.filter
    }

    pub fn trailing(&self) -> Option<TimeboxId> {
        self.registry.trailing()
    }

    /// Current widget size in pixels.
    pub fn size(&self) -> (f32, f32) {
        let margin = &self.config.chart.margin;
        let extent = self.mapper.extent();
        (extent.x1 + margin.right, extent.y1 + margin.bottom)
    }

    /// Route one input event.
    pub fn dispatch(&mut self, input: Input) -> DispatchOutcome {
        let outcome = self.dispatcher.dispatch(
            input,
            &mut self.registry,
            &mut self.selection,
            &self.mapper,
        );

        match &outcome {
            DispatchOutcome::Committed(commit) => {
                tracing::debug!(timebox = %commit.id, first = commit.first_commit, "Committed timebox");
            }
            DispatchOutcome::Removed(id) => tracing::debug!(timebox = %id, "Removed timebox"),
            DispatchOutcome::Selected(change) => {
                tracing::debug!(timebox = ?change.current, "Selected timebox");
            }
            DispatchOutcome::Rejected(err) => tracing::debug!(error = %err, "Rejected operation"),
            _ => {}
        }

        if outcome.changes_filter() {
            self.refilter();
        }
        outcome
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> DispatchOutcome {
        self.dispatch(Input::Pointer(event))
    }

    pub fn handle_key(&mut self, key: Key) -> DispatchOutcome {
        self.dispatch(Input::Key(key))
    }

    /// Relayout for a new widget size. Committed bounds stay fixed in
    /// domain space.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.mapper = self
            .mapper
            .with_size(width, height, &self.config.chart.margin);
    }

    pub fn select(&mut self, id: TimeboxId) -> Result<SelectionChange> {
        self.selection.select(id, &self.registry)
    }

    pub fn clear_selection(&mut self) -> SelectionChange {
        self.selection.clear()
    }

    /// Remove a committed timebox.
    pub fn remove(&mut self, id: TimeboxId) -> Result<()> {
        self.registry.remove(id, &mut self.selection)?;
        tracing::debug!(timebox = %id, "Removed timebox");
        self.refilter();
        Ok(())
    }

    /// Store domain bounds on a timebox directly.
    pub fn commit_bounds(&mut self, id: TimeboxId, bounds: DomainBounds) -> Result<CommitOutcome> {
        let outcome = self.registry.commit_bounds(id, bounds)?;
        self.refilter();
        Ok(outcome)
    }

    /// Remove every committed timebox.
    pub fn reset(&mut self) -> Vec<TimeboxId> {
        let removed = self.registry.clear_committed(&mut self.selection);
        self.registry.ensure_trailing();
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "Cleared timeboxes");
        }
        self.refilter();
        removed
    }

    /// All timeboxes in creation order, projected to pixels. The dragged
    /// timebox shows its live rectangle.
    pub fn timeboxes(&self) -> Vec<TimeboxView> {
        let live = self
            .dispatcher
            .gesture()
            .map(|g| (g.target, g.rect(&self.mapper.extent())));

        self.registry
            .list()
            .iter()
            .map(|timebox| {
                let id = timebox.id();
                let bounds = timebox.bounds().copied();
                let (rect, is_live) = match live {
                    Some((target, rect)) if target == id => (Some(rect), true),
                    _ => (bounds.as_ref().map(|b| self.mapper.to_pixel(b)), false),
                };
                TimeboxView {
                    id,
                    bounds,
                    rect,
                    is_live,
                    is_trailing: timebox.is_trailing(),
                    is_selected: self.selection.is_selected(id),
                }
            })
            .collect()
    }

    /// Rectangle of the gesture in progress.
    pub fn live_rect(&self) -> Option<PixelRect> {
        self.dispatcher
            .gesture()
            .map(|g| g.rect(&self.mapper.extent()))
    }

    pub fn hover(&self, point: PixelPoint) -> Option<HoverHit> {
        hover::nearest_point(
            &self.dataset,
            &self.mapper,
            point,
            self.config.interaction.hover_distance,
        )
    }

    /// Committed timeboxes and the current matches.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            timeboxes: self
                .registry
                .committed()
                .map(|(id, bounds)| TimeboxRecord::new(id, bounds))
                .collect(),
            matching: self
                .filter
                .matching_names(&self.dataset)
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Replace the committed set with `snapshot`. Restored timeboxes get
    /// fresh ids.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Vec<TimeboxId> {
        self.registry.clear_committed(&mut self.selection);

        let mut restored = Vec::with_capacity(snapshot.timeboxes.len());
        for record in &snapshot.timeboxes {
            let id = self.registry.ensure_trailing();
            match self.registry.commit_bounds(id, record.bounds()) {
                Ok(_) => restored.push(id),
                Err(err) => tracing::warn!(error = %err, "Skipping timebox"),
            }
        }
        self.registry.ensure_trailing();

        tracing::info!(count = restored.len(), "Restored timeboxes");
        self.refilter();
        restored
    }

    fn refilter(&mut self) {
        self.filter = filter::evaluate(self.registry.committed().map(|(_, b)| b), &self.dataset);
        tracing::debug!(
            timeboxes = self.filter.active_timeboxes(),
            matching = self.filter.match_count(),
            total = self.filter.len(),
            "Recomputed filter"
        );
    }
}
