//! Transient user-facing notifications.
//!
//! Handlers only produce [`Notice`] values. Front ends decide how to show
//! them: the web widget keeps a [`ToastQueue`] of auto-dismissing corner
//! toasts, the CLI prints each notice once.

use chrono::{DateTime, Duration, Utc};

pub const DEFAULT_TOAST_TTL_MS: i64 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
    pub expires_at: DateTime<Utc>,
}

/// Oldest-first queue of toasts, each visible until `ttl` after it was pushed
/// or until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastQueue {
    ttl: Duration,
    next_id: u64,
    toasts: Vec<Toast>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_TOAST_TTL_MS))
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 1,
            toasts: Vec::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn push(&mut self, notice: Notice, now: DateTime<Utc>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        tracing::debug!(id, level = notice.level.as_str(), "toast pushed");
        self.toasts.push(Toast {
            id,
            notice,
            expires_at: now + self.ttl,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        before != self.toasts.len()
    }

    /// Drops every expired toast and returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        before - self.toasts.len()
    }

    pub fn visible(&self, now: DateTime<Utc>) -> impl Iterator<Item = &Toast> {
        self.toasts
            .iter()
            .filter(move |toast| toast.expires_at > now)
    }

    pub fn next_expiry(&self) -> Option<DateTime<Utc>> {
        self.toasts.iter().map(|toast| toast.expires_at).min()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{Level, Notice, ToastQueue};

    #[test]
    fn toasts_expire_after_ttl() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut queue = ToastQueue::default();
        queue.push(Notice::success("Task added successfully!"), now);

        assert_eq!(queue.visible(now + Duration::milliseconds(4_999)).count(), 1);
        assert_eq!(queue.visible(now + Duration::seconds(5)).count(), 0);
        assert_eq!(queue.prune(now + Duration::seconds(5)), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn oldest_toast_is_listed_first_and_can_be_dismissed() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut queue = ToastQueue::default();
        let first = queue.push(Notice::info("Task deleted."), now);
        queue.push(
            Notice::error("Please enter a task title and due date."),
            now + Duration::seconds(1),
        );

        let levels: Vec<Level> = queue.visible(now).map(|t| t.notice.level).collect();
        assert_eq!(levels, vec![Level::Info, Level::Error]);
        assert_eq!(queue.next_expiry(), Some(now + Duration::seconds(5)));

        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.len(), 1);
    }
}
