//! User-facing failure reporting.
//!
//! The authorization boundary emits exactly one notification per failed
//! request; the embedding application decides how to render it (toast,
//! status bar, ...). The default sink logs through `tracing`.

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Default sink: surfaces notifications as `warn` events.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        tracing::warn!(message, "request failed");
    }
}
