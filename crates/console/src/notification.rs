//! Transient, dismissible notifications raised by the workflows.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// How long a notification stays visible before it hides itself.
pub const AUTO_HIDE_MS: i64 = 4_000;

pub const FETCH_FAILED: &str = "Failed to fetch users";
pub const UPDATE_SUCCEEDED: &str = "User updated successfully";
pub const UPDATE_FAILED: &str = "Failed to update user";
pub const DELETE_SUCCEEDED: &str = "User deleted successfully";
pub const DELETE_FAILED: &str = "Failed to delete user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub severity: Severity,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// Single notification slot: raising replaces whatever is shown.
#[derive(Debug, Clone)]
pub struct Notifications {
    current: Option<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_ttl(Duration::milliseconds(AUTO_HIDE_MS))
    }
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { current: None, ttl }
    }

    pub fn success(&mut self, message: impl Into<String>) -> Uuid {
        self.raise(Severity::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> Uuid {
        self.raise(Severity::Error, message)
    }

    pub fn raise(&mut self, severity: Severity, message: impl Into<String>) -> Uuid {
        self.raise_at(severity, message, Utc::now())
    }

    pub fn raise_at(
        &mut self,
        severity: Severity,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::now_v7(),
            severity,
            message: message.into(),
            raised_at: now,
        };
        let id = notification.id;
        self.current = Some(notification);
        id
    }

    /// Hide the notification with `id`; stale ids are ignored.
    pub fn dismiss(&mut self, id: Uuid) {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
        }
    }

    /// Most recently raised notification, regardless of expiry.
    pub fn latest(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Notification still on screen at `now`.
    pub fn visible_at(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|n| now.signed_duration_since(n.raised_at) < self.ttl)
    }

    pub fn visible(&self) -> Option<&Notification> {
        self.visible_at(Utc::now())
    }
}
