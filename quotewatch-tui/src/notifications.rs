//! Notification system for the TUI.
//!
//! View states report outcomes through an injected [`Notifier`]; the app
//! owns a [`NotificationCenter`] and shows its newest entry in the footer.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

/// How long a notification stays visible unless dismissed.
pub const NOTIFICATION_TTL_SECS: i64 = 8;

const MAX_NOTIFICATIONS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "SUCCESS",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    fn info(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Info, message));
    }

    fn success(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Success, message));
    }

    fn warning(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Warning, message));
    }

    fn error(&self, message: &str) {
        self.notify(Notification::new(NotificationLevel::Error, message));
    }
}

/// Bounded in-memory notification queue, newest last.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    entries: Mutex<VecDeque<Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> Option<Notification> {
        self.entries().back().cloned()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.entries().iter().cloned().collect()
    }

    pub fn dismiss_latest(&self) -> Option<Notification> {
        self.entries().pop_back()
    }

    /// Drop every notification created before `now - ttl`.
    pub fn expire(&self, now: DateTime<Utc>, ttl: Duration) {
        let cutoff = now - ttl;
        self.entries().retain(|n| n.created_at >= cutoff);
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn entries(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        let mut entries = self.entries();
        if entries.len() == MAX_NOTIFICATIONS {
            entries.pop_front();
        }
        entries.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_notification_is_shown_first() {
        let center = NotificationCenter::new();
        center.info("first");
        center.error("second");
        let latest = center.latest().unwrap();
        assert_eq!(latest.message, "second");
        assert_eq!(latest.level, NotificationLevel::Error);
        center.dismiss_latest();
        assert_eq!(center.latest().unwrap().message, "first");
    }

    #[test]
    fn expired_entries_are_dropped() {
        let center = NotificationCenter::new();
        center.notify(Notification {
            level: NotificationLevel::Info,
            message: "old".into(),
            created_at: Utc::now() - Duration::seconds(60),
        });
        center.success("fresh");
        center.expire(Utc::now(), Duration::seconds(NOTIFICATION_TTL_SECS));
        let remaining: Vec<_> = center.all().into_iter().map(|n| n.message).collect();
        assert_eq!(remaining, vec!["fresh".to_string()]);
    }

    #[test]
    fn queue_is_bounded() {
        let center = NotificationCenter::new();
        for i in 0..(MAX_NOTIFICATIONS + 5) {
            center.info(&format!("n{}", i));
        }
        let all = center.all();
        assert_eq!(all.len(), MAX_NOTIFICATIONS);
        assert_eq!(all[0].message, "n5");
    }
}
