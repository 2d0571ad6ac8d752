//! State change reporting service
//!
//! Lets each front end react to controller transitions its own way (redraw a
//! window, spin a terminal spinner, log) without the controller knowing
//! which front end drives it.

use crate::state::UiStateKind;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// A single controller transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub from: UiStateKind,
    pub to: UiStateKind,
    /// Display name of the file involved, when there is one
    pub display_name: Option<String>,
    /// Banner text when entering the error state
    pub message: Option<String>,
}

impl StateChange {
    #[must_use]
    pub fn new(from: UiStateKind, to: UiStateKind) -> Self {
        Self {
            from,
            to,
            display_name: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_display_name<S: Into<String>>(mut self, name: S) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Trait for observing controller transitions
pub trait StateObserver: Send + Sync {
    /// Called after every state transition
    fn on_state_change(&self, change: &StateChange);

    /// Called when the drag overlay flag flips
    fn on_drag_change(&self, _dragging: bool) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl StateObserver for NoOpObserver {
    fn on_state_change(&self, _change: &StateChange) {}
}

/// Observer that emits tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StateObserver for TracingObserver {
    fn on_state_change(&self, change: &StateChange) {
        info!(
            from = %change.from,
            to = %change.to,
            file = change.display_name.as_deref().unwrap_or(""),
            "state changed"
        );
    }

    fn on_drag_change(&self, dragging: bool) {
        debug!(dragging, "drag overlay changed");
    }
}

/// Observer that keeps every transition in memory
///
/// Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    changes: Arc<Mutex<Vec<StateChange>>>,
    drags: Arc<Mutex<Vec<bool>>>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn changes(&self) -> Vec<StateChange> {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Target state of each recorded transition, in order
    #[must_use]
    pub fn visited(&self) -> Vec<UiStateKind> {
        self.changes().iter().map(|change| change.to).collect()
    }

    #[must_use]
    pub fn drag_events(&self) -> Vec<bool> {
        self.drags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateObserver for RecordingObserver {
    fn on_state_change(&self, change: &StateChange) {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(change.clone());
    }

    fn on_drag_change(&self, dragging: bool) {
        self.drags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(dragging);
    }
}
