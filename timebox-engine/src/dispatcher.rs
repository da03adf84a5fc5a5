//! Routing of pointer gestures and key presses to the registry and the
//! selection.
//!
//! Each gesture runs `Idle → Dragging → Idle`. Pointer positions outside
//! the chart are still honored while dragging, so a release anywhere ends
//! the gesture instead of leaving it dangling.

use serde::{Deserialize, Serialize};

use crate::config::InteractionConfig;
use crate::error::EngineError;
use crate::mapper::{CoordinateMapper, PixelPoint, PixelRect};
use crate::registry::{BrushRegistry, CommitOutcome, Handle, Surface};
use crate::selection::{SelectionChange, SelectionState};
use crate::timebox::{DomainBounds, TimeboxId};

/// Pointer input in widget pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PixelPoint),
    Move(PixelPoint),
    Up(PixelPoint),
}

/// Toolkit-independent key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Char(char),
}

/// Any input the dispatcher handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    Pointer(PointerEvent),
    Key(Key),
}

/// What a drag does to its timebox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Draw the trailing timebox.
    Create,
    /// Translate a committed timebox.
    Move,
    /// Drag one or two edges of a committed timebox.
    Resize(Handle),
}

/// An in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub target: TimeboxId,
    pub kind: GestureKind,
    pub anchor: PixelPoint,
    pub current: PixelPoint,
    /// Pixel rectangle of the target when the gesture started.
    pub origin: PixelRect,
    /// Stored bounds of the target when the gesture started.
    pub origin_bounds: Option<DomainBounds>,
    moved: bool,
}

impl Gesture {
    fn update(&mut self, point: PixelPoint) {
        if point != self.anchor {
            self.moved = true;
        }
        self.current = point;
    }

    /// Live rectangle, kept inside `extent`.
    pub fn rect(&self, extent: &PixelRect) -> PixelRect {
        let dx = self.current.x - self.anchor.x;
        let dy = self.current.y - self.anchor.y;
        match self.kind {
            GestureKind::Create => {
                PixelRect::from_corners(self.anchor, self.current).clamp_to(extent)
            }
            GestureKind::Move => self.origin.translate(dx, dy).shift_within(extent),
            GestureKind::Resize(handle) => handle.apply(self.origin, dx, dy).clamp_to(extent),
        }
    }

    /// Domain bounds of the released rectangle. Edges that kept their
    /// pixel position keep their stored domain value, so dragging one
    /// handle never nudges the others.
    fn settle(&self, rect: &PixelRect, mapper: &CoordinateMapper) -> DomainBounds {
        let dragged = mapper.to_domain(rect);
        let Some(origin) = self.origin_bounds else {
            return dragged;
        };

        DomainBounds::new(
            pick(rect.x0 == self.origin.x0, origin.time_start(), dragged.time_start()),
            pick(rect.x1 == self.origin.x1, origin.time_end(), dragged.time_end()),
            pick(rect.y1 == self.origin.y1, origin.value_min(), dragged.value_min()),
            pick(rect.y0 == self.origin.y0, origin.value_max(), dragged.value_max()),
        )
    }

    /// A gesture that never moved, or collapsed to zero area, is a click.
    fn is_click(&self, rect: &PixelRect) -> bool {
        !self.moved || rect.is_degenerate()
    }
}

/// Per-gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(Gesture),
}

/// Result of dispatching one input.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Nothing happened.
    Ignored,
    /// A drag started on `id`.
    GestureStarted { id: TimeboxId, kind: GestureKind },
    /// The live rectangle changed; nothing is committed yet.
    Preview { id: TimeboxId, rect: PixelRect },
    /// Bounds were stored.
    Committed(CommitOutcome),
    /// A click selected a timebox.
    Selected(SelectionChange),
    /// The selection was cleared.
    SelectionCleared(TimeboxId),
    /// The selected timebox was deleted.
    Removed(TimeboxId),
    /// The operation was refused and had no effect.
    Rejected(EngineError),
}

impl DispatchOutcome {
    /// Whether the committed bounds set changed.
    pub fn changes_filter(&self) -> bool {
        matches!(self, DispatchOutcome::Committed(_) | DispatchOutcome::Removed(_))
    }
}

/// Gesture state machine plus the key bindings that act on the selection.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    state: GestureState,
    handle_size: f32,
    delete_keys: Vec<Key>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&InteractionConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            state: GestureState::Idle,
            handle_size: config.handle_size,
            delete_keys: config.delete_keys.clone(),
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// The drag in progress, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging(gesture) => Some(gesture),
        }
    }

    /// Handle one input event.
    pub fn dispatch(
        &mut self,
        input: Input,
        registry: &mut BrushRegistry,
        selection: &mut SelectionState,
        mapper: &CoordinateMapper,
    ) -> DispatchOutcome {
        match input {
            Input::Pointer(PointerEvent::Down(point)) => self.pointer_down(point, registry, mapper),
            Input::Pointer(PointerEvent::Move(point)) => self.pointer_move(point, mapper),
            Input::Pointer(PointerEvent::Up(point)) => {
                self.pointer_up(point, registry, selection, mapper)
            }
            Input::Key(key) => self.key_press(key, registry, selection),
        }
    }

    fn pointer_down(
        &mut self,
        point: PixelPoint,
        registry: &mut BrushRegistry,
        mapper: &CoordinateMapper,
    ) -> DispatchOutcome {
        if let GestureState::Dragging(stale) = self.state {
            tracing::debug!(timebox = %stale.target, "Dropping gesture without release");
        }

        let surface = match registry.surface_at(point, mapper, self.handle_size) {
            Some(surface) => surface,
            None if mapper.extent().contains(point) => Surface::Overlay(registry.ensure_trailing()),
            None => {
                self.state = GestureState::Idle;
                return DispatchOutcome::Ignored;
            }
        };

        let id = surface.timebox();
        let kind = match surface {
            Surface::Overlay(_) => GestureKind::Create,
            Surface::Body(_) => GestureKind::Move,
            Surface::Handle(_, handle) => GestureKind::Resize(handle),
        };
        let origin_bounds = match kind {
            GestureKind::Create => None,
            GestureKind::Move | GestureKind::Resize(_) => {
                registry.get(id).and_then(|t| t.bounds()).copied()
            }
        };
        let origin = origin_bounds
            .map(|b| mapper.to_pixel(&b))
            .unwrap_or_else(|| PixelRect::from_corners(point, point));

        self.state = GestureState::Dragging(Gesture {
            target: id,
            kind,
            anchor: point,
            current: point,
            origin,
            origin_bounds,
            moved: false,
        });

        DispatchOutcome::GestureStarted { id, kind }
    }

    fn pointer_move(&mut self, point: PixelPoint, mapper: &CoordinateMapper) -> DispatchOutcome {
        let GestureState::Dragging(gesture) = &mut self.state else {
            return DispatchOutcome::Ignored;
        };

        gesture.update(point);
        DispatchOutcome::Preview {
            id: gesture.target,
            rect: gesture.rect(&mapper.extent()),
        }
    }

    fn pointer_up(
        &mut self,
        point: PixelPoint,
        registry: &mut BrushRegistry,
        selection: &mut SelectionState,
        mapper: &CoordinateMapper,
    ) -> DispatchOutcome {
        let GestureState::Dragging(mut gesture) = std::mem::take(&mut self.state) else {
            return DispatchOutcome::Ignored;
        };

        gesture.update(point);
        let rect = gesture.rect(&mapper.extent());

        let result = if gesture.is_click(&rect) {
            selection
                .select(gesture.target, registry)
                .map(DispatchOutcome::Selected)
        } else {
            registry
                .commit_bounds(gesture.target, gesture.settle(&rect, mapper))
                .map(DispatchOutcome::Committed)
        };

        result.unwrap_or_else(DispatchOutcome::Rejected)
    }

    fn key_press(
        &mut self,
        key: Key,
        registry: &mut BrushRegistry,
        selection: &mut SelectionState,
    ) -> DispatchOutcome {
        if self.delete_keys.contains(&key) {
            let Some(id) = selection.current() else {
                return DispatchOutcome::Ignored;
            };
            return match registry.remove(id, selection) {
                Ok(_) => DispatchOutcome::Removed(id),
                Err(err) => DispatchOutcome::Rejected(err),
            };
        }

        match key {
            Key::Escape => match selection.clear().previous {
                Some(id) => DispatchOutcome::SelectionCleared(id),
                None => DispatchOutcome::Ignored,
            },
            _ => DispatchOutcome::Ignored,
        }
    }
}

fn pick<T>(kept: bool, old: T, new: T) -> T {
    if kept { old } else { new }
}
