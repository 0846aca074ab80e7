//! Dashboard-side state
//!
//! Tracks which motor parts are highlighted and keeps a short history of
//! notifications. [`SyncClient`] keeps it in step with the server.

pub mod notifications;
pub mod sync;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::broadcast::FaultNotification;
use crate::models::summarize_fault;
use crate::parts::{parts_for_fault, Part};

pub use notifications::{Notification, NotificationKind, NotificationLog, DEFAULT_LOG_CAPACITY};
pub use sync::{ClientError, SyncClient};

pub const FETCH_ERROR_MESSAGE: &str = "Error fetching motor analysis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartState {
    pub faulted: bool,
    pub visible: bool,
}

impl Default for PartState {
    fn default() -> Self {
        Self {
            faulted: false,
            visible: true,
        }
    }
}

/// Per-part highlight flags over the fixed part set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightState {
    parts: BTreeMap<Part, PartState>,
}

impl Default for HighlightState {
    fn default() -> Self {
        Self {
            parts: Part::ALL.iter().map(|p| (*p, PartState::default())).collect(),
        }
    }
}

impl HighlightState {
    pub fn get(&self, part: Part) -> PartState {
        self.parts.get(&part).copied().unwrap_or_default()
    }

    /// Mark exactly `faulted` as faulted. Visibility is left alone.
    pub fn apply_faulted<I>(&mut self, faulted: I)
    where
        I: IntoIterator<Item = Part>,
    {
        for state in self.parts.values_mut() {
            state.faulted = false;
        }
        for part in faulted {
            self.parts.entry(part).or_default().faulted = true;
        }
    }

    pub fn toggle_fault(&mut self, part: Part) -> bool {
        let state = self.parts.entry(part).or_default();
        state.faulted = !state.faulted;
        state.faulted
    }

    pub fn toggle_visibility(&mut self, part: Part) -> bool {
        let state = self.parts.entry(part).or_default();
        state.visible = !state.visible;
        state.visible
    }

    pub fn faulted_parts(&self) -> Vec<Part> {
        self.parts
            .iter()
            .filter(|(_, state)| state.faulted)
            .map(|(part, _)| *part)
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub highlights: HighlightState,
    pub notifications: NotificationLog,
}

impl DashboardState {
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            highlights: HighlightState::default(),
            notifications: NotificationLog::with_capacity(capacity),
        }
    }

    /// Recompute highlights from a free-text fault description
    pub fn apply_fault_text(&mut self, text: &str) {
        self.highlights.apply_faulted(parts_for_fault(text));
        self.notifications.push(text);
    }

    /// Apply a pushed update using its structured part list
    pub fn apply_notification(&mut self, notification: &FaultNotification) {
        self.highlights
            .apply_faulted(notification.parts.iter().copied());
        self.notifications.push(summarize_fault(&notification.fault));
    }

    pub fn record_fetch_error(&mut self) {
        self.notifications
            .push_kind(FETCH_ERROR_MESSAGE, NotificationKind::Error);
    }

    pub fn reset(&mut self) {
        self.highlights.reset();
        self.notifications.clear();
    }
}
