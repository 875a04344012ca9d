//! Proactive session invalidation.
//!
//! Each role's store arms a one-shot timer at its token's expiry instant
//! so the session dies even with no user activity. The lazy check in
//! `SessionStore::access_token` remains the safety net for tokens whose
//! expiry cannot be read.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

/// One-shot expiry timer. At most one task is live at any time: arming
/// always aborts the previous task first, so no stale token can fire.
#[derive(Default)]
pub(crate) struct ExpiryScheduler {
    handle: Option<JoinHandle<()>>,
}

impl ExpiryScheduler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Arm the timer for `token`'s expiry instant.
    ///
    /// Does not arm when the expiry cannot be determined; an already
    /// expired token fires on the next scheduler tick.
    pub(crate) fn arm<F, Fut>(&mut self, token: &str, on_expire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.cancel();

        let Some(exp_ms) = jwt_claims::expires_at_ms(token) else {
            tracing::debug!("token carries no readable expiry, timer not armed");
            return;
        };

        let delay_ms = (exp_ms - Utc::now().timestamp_millis()).max(0) as u64;
        tracing::debug!(delay_ms, "arming session expiry timer");

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            on_expire().await;
        }));
    }

    /// Abort any pending timer. Safe to call when none is armed.
    pub(crate) fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ExpiryScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
