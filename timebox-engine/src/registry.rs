//! Ordered collection of timeboxes for one chart session.
//!
//! Exactly one timebox is trailing (uncommitted) once the first region has
//! been created. Only the trailing timebox owns the full-area capture
//! surface; committed timeboxes expose their body (move) and border
//! handles (resize).

use crate::error::{EngineError, Result};
use crate::mapper::{CoordinateMapper, PixelPoint, PixelRect};
use crate::selection::SelectionState;
use crate::timebox::{DomainBounds, Timebox, TimeboxId};

/// Resize handle on the border of a committed timebox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Handle {
    fn moves_left(self) -> bool {
        matches!(self, Handle::West | Handle::NorthWest | Handle::SouthWest)
    }

    fn moves_right(self) -> bool {
        matches!(self, Handle::East | Handle::NorthEast | Handle::SouthEast)
    }

    fn moves_top(self) -> bool {
        matches!(self, Handle::North | Handle::NorthEast | Handle::NorthWest)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Handle::South | Handle::SouthEast | Handle::SouthWest)
    }

    /// Drag the edges this handle controls by `(dx, dy)`.
    pub fn apply(self, rect: PixelRect, dx: f32, dy: f32) -> PixelRect {
        let x0 = if self.moves_left() { rect.x0 + dx } else { rect.x0 };
        let x1 = if self.moves_right() { rect.x1 + dx } else { rect.x1 };
        let y0 = if self.moves_top() { rect.y0 + dy } else { rect.y0 };
        let y1 = if self.moves_bottom() { rect.y1 + dy } else { rect.y1 };
        PixelRect::new(x0, y0, x1, y1)
    }

    /// Handle under `point`, if it lies within `tolerance / 2` of an edge.
    fn at(rect: &PixelRect, point: PixelPoint, tolerance: f32) -> Option<Handle> {
        let half = tolerance / 2.0;
        let inside_band = point.x >= rect.x0 - half
            && point.x <= rect.x1 + half
            && point.y >= rect.y0 - half
            && point.y <= rect.y1 + half;
        if !inside_band {
            return None;
        }

        let left = (point.x - rect.x0).abs() <= half;
        let right = (point.x - rect.x1).abs() <= half;
        let top = (point.y - rect.y0).abs() <= half;
        let bottom = (point.y - rect.y1).abs() <= half;

        match (left, right, top, bottom) {
            (true, _, true, _) => Some(Handle::NorthWest),
            (_, true, true, _) => Some(Handle::NorthEast),
            (true, _, _, true) => Some(Handle::SouthWest),
            (_, true, _, true) => Some(Handle::SouthEast),
            (true, _, _, _) => Some(Handle::West),
            (_, true, _, _) => Some(Handle::East),
            (_, _, true, _) => Some(Handle::North),
            (_, _, _, true) => Some(Handle::South),
            _ => None,
        }
    }
}

/// The capture surface hit by a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Full-area overlay of the trailing timebox: starts a new region.
    Overlay(TimeboxId),
    /// Interior of a committed timebox: moves it.
    Body(TimeboxId),
    /// Border handle of a committed timebox: resizes it.
    Handle(TimeboxId, Handle),
}

impl Surface {
    pub fn timebox(&self) -> TimeboxId {
        match self {
            Surface::Overlay(id) | Surface::Body(id) | Surface::Handle(id, _) => *id,
        }
    }
}

/// Result of storing bounds on a timebox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOutcome {
    /// The committed timebox.
    pub id: TimeboxId,
    /// Whether this was the timebox's first commit.
    pub first_commit: bool,
    /// The new trailing timebox spawned by a first commit.
    pub spawned: Option<TimeboxId>,
}

/// Owns every timebox of a chart session, in creation order.
#[derive(Debug, Clone)]
pub struct BrushRegistry {
    timeboxes: Vec<Timebox>,
    next_id: u64,
}

impl Default for BrushRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushRegistry {
    /// Create an empty registry. Ids start at 1.
    pub fn new() -> Self {
        Self {
            timeboxes: Vec::new(),
            next_id: 1,
        }
    }

    /// All timeboxes in creation order (bottom to top).
    pub fn list(&self) -> &[Timebox] {
        &self.timeboxes
    }

    pub fn len(&self) -> usize {
        self.timeboxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeboxes.is_empty()
    }

    pub fn get(&self, id: TimeboxId) -> Option<&Timebox> {
        self.timeboxes.iter().find(|t| t.id() == id)
    }

    pub fn contains(&self, id: TimeboxId) -> bool {
        self.get(id).is_some()
    }

    /// Id of the trailing timebox.
    pub fn trailing(&self) -> Option<TimeboxId> {
        self.timeboxes
            .iter()
            .rev()
            .find(|t| t.is_trailing())
            .map(Timebox::id)
    }

    /// Committed timeboxes and their bounds, in creation order.
    pub fn committed(&self) -> impl Iterator<Item = (TimeboxId, &DomainBounds)> {
        self.timeboxes
            .iter()
            .filter_map(|t| t.bounds().map(|b| (t.id(), b)))
    }

    /// Append a fresh trailing timebox.
    ///
    /// A previous trailing timebox that never received bounds is replaced,
    /// so there is never more than one uncommitted region.
    pub fn create_trailing(&mut self) -> TimeboxId {
        if let Some(stale) = self.trailing() {
            tracing::debug!(timebox = %stale, "Replacing empty trailing timebox");
            self.timeboxes.retain(|t| t.id() != stale);
        }

        let id = TimeboxId::new(self.next_id);
        self.next_id += 1;
        self.timeboxes.push(Timebox::new(id));
        tracing::debug!(timebox = %id, "Created trailing timebox");
        id
    }

    /// Trailing timebox id, creating one if there is none.
    pub fn ensure_trailing(&mut self) -> TimeboxId {
        match self.trailing() {
            Some(id) => id,
            None => self.create_trailing(),
        }
    }

    /// Convert `rect` to domain bounds and store them on `id`.
    pub fn commit(
        &mut self,
        id: TimeboxId,
        rect: &PixelRect,
        mapper: &CoordinateMapper,
    ) -> Result<CommitOutcome> {
        self.commit_bounds(id, mapper.to_domain(rect))
    }

    /// Store `bounds` on `id`. The first commit of the trailing timebox
    /// spawns its successor.
    pub fn commit_bounds(&mut self, id: TimeboxId, bounds: DomainBounds) -> Result<CommitOutcome> {
        let timebox = self
            .timeboxes
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or(EngineError::unknown(id))?;

        let first_commit = timebox.commit(bounds);
        let spawned = first_commit.then(|| self.create_trailing());

        Ok(CommitOutcome {
            id,
            first_commit,
            spawned,
        })
    }

    /// Remove a committed timebox, clearing the selection if it pointed
    /// at it. The trailing timebox cannot be removed.
    pub fn remove(&mut self, id: TimeboxId, selection: &mut SelectionState) -> Result<Timebox> {
        let position = self
            .timeboxes
            .iter()
            .position(|t| t.id() == id)
            .ok_or(EngineError::unknown(id))?;

        if self.timeboxes[position].is_trailing() {
            return Err(EngineError::trailing(id));
        }

        let removed = self.timeboxes.remove(position);
        if selection.is_selected(id) {
            selection.clear();
        }
        Ok(removed)
    }

    /// Remove every committed timebox, keeping the trailing one.
    pub fn clear_committed(&mut self, selection: &mut SelectionState) -> Vec<TimeboxId> {
        let removed: Vec<TimeboxId> = self.committed().map(|(id, _)| id).collect();
        self.timeboxes.retain(|t| t.is_trailing());

        if let Some(current) = selection.current() {
            if removed.contains(&current) {
                selection.clear();
            }
        }
        removed
    }

    /// Capture surface under `point`.
    ///
    /// Committed timeboxes are checked topmost first (latest creation
    /// first): handles, then body. Anything else inside the plot area falls
    /// through to the trailing overlay.
    pub fn surface_at(
        &self,
        point: PixelPoint,
        mapper: &CoordinateMapper,
        handle_size: f32,
    ) -> Option<Surface> {
        for timebox in self.timeboxes.iter().rev() {
            let Some(bounds) = timebox.bounds() else {
                continue;
            };
            let rect = mapper.to_pixel(bounds);

            if let Some(handle) = Handle::at(&rect, point, handle_size) {
                return Some(Surface::Handle(timebox.id(), handle));
            }
            if rect.contains(point) {
                return Some(Surface::Body(timebox.id()));
            }
        }

        if !mapper.extent().contains(point) {
            return None;
        }
        self.trailing().map(Surface::Overlay)
    }
}
