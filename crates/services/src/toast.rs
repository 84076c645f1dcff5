use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::error;

use portal_core::Clock;

use crate::error::{ApiError, AuthError, ContentError};

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";
pub const INIT_FAILED_MESSAGE: &str = "Failed to initialize application. Please refresh the page.";
pub const BACK_ONLINE_MESSAGE: &str = "You are back online!";
pub const OFFLINE_MESSAGE: &str = "You are offline. Some features may not work.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "fa-check-circle",
            ToastKind::Error => "fa-exclamation-circle",
            ToastKind::Warning => "fa-exclamation-triangle",
            ToastKind::Info => "fa-info-circle",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Warning => "warning",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: String,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
    /// Zero keeps the toast until it is dismissed.
    pub duration: Duration,
}

impl Toast {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        if self.duration.is_zero() {
            return false;
        }
        chrono::Duration::from_std(self.duration)
            .map(|duration| now >= self.created_at + duration)
            .unwrap_or(false)
    }
}

/// Queue of transient notifications, newest last.
pub struct ToastManager {
    clock: Clock,
    default_duration: Duration,
    counter: AtomicU64,
    // Serializes read-modify-write of the published list.
    write: Mutex<()>,
    state: watch::Sender<Vec<Toast>>,
}

impl ToastManager {
    #[must_use]
    pub fn new(clock: Clock, default_duration: Duration) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            clock,
            default_duration,
            counter: AtomicU64::new(0),
            write: Mutex::new(()),
            state,
        }
    }

    #[must_use]
    pub fn default_duration(&self) -> Duration {
        self.default_duration
    }

    /// Queue a toast and return its id.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) -> String {
        let id = format!("toast_{}", self.counter.fetch_add(1, Ordering::Relaxed) + 1);
        let toast = Toast {
            id: id.clone(),
            message: message.into(),
            kind,
            created_at: self.clock.now(),
            duration,
        };
        self.update(|toasts| {
            toasts.push(toast);
            true
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Success, self.default_duration)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Error, self.default_duration)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Warning, self.default_duration)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.show(message, ToastKind::Info, self.default_duration)
    }

    pub fn hide(&self, id: &str) {
        self.update(|toasts| {
            let before = toasts.len();
            toasts.retain(|toast| toast.id != id);
            toasts.len() != before
        });
    }

    pub fn hide_all(&self) {
        self.update(|toasts| {
            let had_any = !toasts.is_empty();
            toasts.clear();
            had_any
        });
    }

    /// Drop every toast whose duration has elapsed at `now`.
    pub fn prune(&self, now: DateTime<Utc>) {
        self.update(|toasts| {
            let before = toasts.len();
            toasts.retain(|toast| !toast.is_expired(now));
            toasts.len() != before
        });
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Toast> {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.state.subscribe()
    }

    /// Last-resort reporting for failures nothing else handled.
    ///
    /// Expired sessions are already handled by the auth manager and stay quiet.
    pub fn report_unexpected(&self, err: &(dyn std::error::Error + 'static)) {
        if api_error(err).is_some_and(ApiError::is_unauthorized) {
            return;
        }
        error!(error = %err, "unexpected error");
        self.error(UNEXPECTED_ERROR_MESSAGE);
    }

    pub fn connectivity_changed(&self, online: bool) {
        if online {
            self.success(BACK_ONLINE_MESSAGE);
        } else {
            self.warning(OFFLINE_MESSAGE);
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Vec<Toast>) -> bool) {
        let _guard = self.write.lock();
        self.state.send_if_modified(apply);
    }
}

fn api_error<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a ApiError> {
    if let Some(api) = err.downcast_ref::<ApiError>() {
        return Some(api);
    }
    match (err.downcast_ref::<ContentError>(), err.downcast_ref::<AuthError>()) {
        (Some(ContentError::Api(api)), _) | (_, Some(AuthError::Api(api))) => Some(api),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::time::fixed_clock;

    fn manager() -> ToastManager {
        ToastManager::new(fixed_clock(), Duration::from_millis(5000))
    }

    #[test]
    fn ids_are_unique_and_ordered() {
        let toasts = manager();
        let first = toasts.success("one");
        let second = toasts.error("two");
        assert_ne!(first, second);

        let snapshot = toasts.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].message, "one");
        assert_eq!(snapshot[1].kind.icon(), "fa-exclamation-circle");
    }

    #[test]
    fn hide_removes_only_target() {
        let toasts = manager();
        let keep = toasts.info("keep");
        let drop = toasts.warning("drop");
        toasts.hide(&drop);
        let ids: Vec<_> = toasts.snapshot().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![keep]);

        toasts.hide_all();
        assert!(toasts.snapshot().is_empty());
    }

    #[test]
    fn prune_keeps_sticky_toasts() {
        let toasts = manager();
        toasts.success("fades");
        toasts.show("sticks", ToastKind::Info, Duration::ZERO);

        let later = fixed_clock().now() + chrono::Duration::seconds(6);
        toasts.prune(later);

        let snapshot = toasts.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].message, "sticks");
    }

    #[test]
    fn unexpected_errors_skip_unauthorized() {
        let toasts = manager();
        toasts.report_unexpected(&ApiError::session_expired());
        assert!(toasts.snapshot().is_empty());

        toasts.report_unexpected(&ContentError::Api(ApiError::session_expired()));
        assert!(toasts.snapshot().is_empty());

        toasts.report_unexpected(&ApiError::new(500, "boom", None));
        assert_eq!(toasts.snapshot()[0].message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn unexpected_non_api_errors_are_toasted() {
        let toasts = manager();
        toasts.report_unexpected(&ContentError::Forbidden);
        let snapshot = toasts.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].kind, ToastKind::Error);
        assert_eq!(snapshot[0].message, UNEXPECTED_ERROR_MESSAGE);
    }

    #[test]
    fn connectivity_messages() {
        let toasts = manager();
        toasts.connectivity_changed(false);
        toasts.connectivity_changed(true);
        let snapshot = toasts.snapshot();
        assert_eq!(snapshot[0].kind, ToastKind::Warning);
        assert_eq!(snapshot[0].message, OFFLINE_MESSAGE);
        assert_eq!(snapshot[1].kind, ToastKind::Success);
    }
}
