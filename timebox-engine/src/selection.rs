//! The single timebox currently focused for deletion and highlighting.

use crate::error::{EngineError, Result};
use crate::registry::BrushRegistry;
use crate::timebox::{DomainBounds, TimeboxId};

/// A selection transition. Renderers unmark `previous` before marking
/// `current` so two regions are never highlighted at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub previous: Option<TimeboxId>,
    pub current: Option<TimeboxId>,
}

/// Weak reference (by id) to at most one timebox.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    current: Option<TimeboxId>,
}

impl SelectionState {
    /// Select `id`, replacing any previous selection.
    pub fn select(&mut self, id: TimeboxId, registry: &BrushRegistry) -> Result<SelectionChange> {
        if !registry.contains(id) {
            return Err(EngineError::unknown(id));
        }

        let previous = self.current.replace(id);
        Ok(SelectionChange {
            previous,
            current: Some(id),
        })
    }

    pub fn clear(&mut self) -> SelectionChange {
        SelectionChange {
            previous: self.current.take(),
            current: None,
        }
    }

    pub fn current(&self) -> Option<TimeboxId> {
        self.current
    }

    pub fn is_selected(&self, id: TimeboxId) -> bool {
        self.current == Some(id)
    }

    /// Bounds of the selected timebox, if it is committed.
    pub fn selected_bounds<'a>(&self, registry: &'a BrushRegistry) -> Option<&'a DomainBounds> {
        registry.get(self.current?)?.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_select_replaces_previous() {
        let mut registry = BrushRegistry::new();
        let a = registry.create_trailing();
        let bounds = DomainBounds::new(
            Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap(),
            1.0,
            2.0,
        );
        registry.commit_bounds(a, bounds).unwrap();
        let b = registry.trailing().unwrap();

        let mut selection = SelectionState::default();
        let change = selection.select(a, &registry).unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, Some(a));
        assert_eq!(selection.selected_bounds(&registry), Some(&bounds));

        let change = selection.select(b, &registry).unwrap();
        assert_eq!(change.previous, Some(a));
        assert!(selection.is_selected(b));
        assert!(!selection.is_selected(a));
        // The trailing timebox has no bounds yet.
        assert_eq!(selection.selected_bounds(&registry), None);
    }

    #[test]
    fn test_select_unknown_leaves_selection() {
        let mut registry = BrushRegistry::new();
        let a = registry.create_trailing();
        let mut selection = SelectionState::default();
        selection.select(a, &registry).unwrap();

        let err = selection
            .select(TimeboxId::new(99), &registry)
            .unwrap_err();
        assert_eq!(err.id(), TimeboxId::new(99));
        assert_eq!(selection.current(), Some(a));
    }

    #[test]
    fn test_clear() {
        let mut registry = BrushRegistry::new();
        let a = registry.create_trailing();
        let mut selection = SelectionState::default();
        selection.select(a, &registry).unwrap();

        let change = selection.clear();
        assert_eq!(change.previous, Some(a));
        assert_eq!(selection.current(), None);
        assert_eq!(selection.clear().previous, None);
    }
}
