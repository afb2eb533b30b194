//! Two-surface selection coordination.
//!
//! # Responsibility
//! - Keep the list selection (primary) and map selection (secondary) in sync.
//! - Report which surface drove each change.
//!
//! # Invariants
//! - After any applied event, `primary == secondary`.
//! - Re-applying the current value writes nothing and reports `Unchanged`,
//!   so hosts that re-emit events on every render cannot loop.

use crate::model::quake::QuakeId;
use log::debug;
use std::collections::HashSet;

/// Interaction surface that produced a selection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionSurface {
    /// The scrollable quake list.
    List,
    /// The spatial map view.
    Map,
}

impl SelectionSurface {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Map => "map",
        }
    }
}

/// "Selection changed" event emitted by one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    List(Option<QuakeId>),
    Map(Option<QuakeId>),
}

impl SelectionEvent {
    pub fn surface(&self) -> SelectionSurface {
        match self {
            Self::List(_) => SelectionSurface::List,
            Self::Map(_) => SelectionSurface::Map,
        }
    }

    fn into_value(self) -> Option<QuakeId> {
        match self {
            Self::List(value) | Self::Map(value) => value,
        }
    }
}

/// Primary (list) and secondary (map) selection slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub primary: Option<QuakeId>,
    pub secondary: Option<QuakeId>,
}

/// Outcome of applying one [`SelectionEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Unchanged,
    Updated {
        driver: SelectionSurface,
        state: SelectionState,
    },
}

impl SelectionChange {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

/// Applies the propagation rule between the two selection slots.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    state: SelectionState,
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn primary(&self) -> Option<&QuakeId> {
        self.state.primary.as_ref()
    }

    pub fn secondary(&self) -> Option<&QuakeId> {
        self.state.secondary.as_ref()
    }

    /// Writes the driving slot, then mirrors the value into the other slot.
    pub fn apply(&mut self, event: SelectionEvent) -> SelectionChange {
        let driver = event.surface();
        let value = event.into_value();

        if self.state.primary == value && self.state.secondary == value {
            return SelectionChange::Unchanged;
        }

        let (driving, mirrored) = match driver {
            SelectionSurface::List => (&mut self.state.primary, &mut self.state.secondary),
            SelectionSurface::Map => (&mut self.state.secondary, &mut self.state.primary),
        };
        if *driving != value {
            *driving = value.clone();
        }
        if *mirrored != value {
            *mirrored = value;
        }

        debug!(
            "event=selection_change module=selection status=ok driver={} selected={}",
            driver.as_str(),
            self.state
                .primary
                .as_ref()
                .map_or("none", |id| id.as_str())
        );

        SelectionChange::Updated {
            driver,
            state: self.state.clone(),
        }
    }

    /// Clears both slots.
    pub fn clear(&mut self) -> SelectionChange {
        self.apply(SelectionEvent::List(None))
    }

    /// Clears the selection when it points at an id outside `existing`.
    pub fn prune(&mut self, existing: &HashSet<QuakeId>) -> SelectionChange {
        let stale = [self.state.primary.as_ref(), self.state.secondary.as_ref()]
            .into_iter()
            .flatten()
            .any(|id| !existing.contains(id));
        if stale {
            self.clear()
        } else {
            SelectionChange::Unchanged
        }
    }
}
