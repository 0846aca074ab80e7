//! Dashboard notification log

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DEFAULT_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// Anything mentioning "healthy" is good news
    pub fn classify(text: &str) -> Self {
        if text.to_lowercase().contains("healthy") {
            Self::Success
        } else {
            Self::Error
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub seq: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub received_at: DateTime<Utc>,
}

/// Fixed-capacity notification buffer. Oldest entries are evicted first.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    capacity: usize,
    next_seq: u64,
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl NotificationLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_seq: 0,
        }
    }

    /// Append a message, classifying it from its text
    pub fn push(&mut self, message: impl Into<String>) -> &Notification {
        let message = message.into();
        let kind = NotificationKind::classify(&message);
        self.push_kind(message, kind)
    }

    pub fn push_kind(&mut self, message: impl Into<String>, kind: NotificationKind) -> &Notification {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }

        self.next_seq += 1;
        self.entries.push_back(Notification {
            seq: self.next_seq,
            message: message.into(),
            kind,
            received_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
