//! Per-role session state: durable credential storage, reactive
//! authentication signal and proactive expiry.
//!
//! Each role ([`Role::User`], [`Role::Admin`]) owns exactly one
//! [`SessionStore`], constructed once at process start and alive for the
//! process lifetime. The store is the only writer of its role's
//! credential; every other component reads through it.

mod expiry;
pub mod storage;

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::routing::{Navigator, ADMIN_LOGIN_ROUTE, LOGIN_ROUTE};
use expiry::ExpiryScheduler;
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

/// Credential role. Each role has an independent credential, storage key
/// and logout target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Storage key the role's raw token is persisted under.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Role::User => "user_token",
            Role::Admin => "admin_token",
        }
    }

    /// Route a forced logout navigates to.
    pub fn logout_route(&self) -> &'static str {
        match self {
            Role::User => LOGIN_ROUTE,
            Role::Admin => ADMIN_LOGIN_ROUTE,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// One role's session: credential lifecycle, expiry timer and the
/// reactive authenticated signal.
pub struct SessionStore {
    role: Role,
    storage: Arc<dyn TokenStorage>,
    navigator: Arc<dyn Navigator>,
    timer: Mutex<ExpiryScheduler>,
    authed: watch::Sender<bool>,
    logging_out: AtomicBool,
}

impl SessionStore {
    pub fn new(
        role: Role,
        storage: Arc<dyn TokenStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        let (authed, _) = watch::channel(false);
        Arc::new(Self {
            role,
            storage,
            navigator,
            timer: Mutex::new(ExpiryScheduler::new()),
            authed,
            logging_out: AtomicBool::new(false),
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Raw credential read, no expiry check.
    pub async fn token(&self) -> Option<String> {
        match self.storage.get(self.role.storage_key()).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(role = %self.role, error = %err, "credential read failed");
                None
            }
        }
    }

    /// The credential, only if still usable.
    ///
    /// An expired (or undecodable) credential triggers [`logout`] as a
    /// documented side effect and yields `None`, so a returned token is
    /// always usable regardless of whether the proactive timer has fired
    /// yet.
    ///
    /// [`logout`]: SessionStore::logout
    pub async fn access_token(self: &Arc<Self>) -> Option<String> {
        let token = self.token().await?;
        if jwt_claims::is_expired(&token) {
            tracing::debug!(role = %self.role, "credential expired on read");
            self.logout().await;
            return None;
        }
        Some(token)
    }

    /// Persist a freshly issued credential and re-arm the expiry timer.
    pub async fn set_token(self: &Arc<Self>, token: &str) {
        if let Err(err) = self.storage.set(self.role.storage_key(), token).await {
            tracing::warn!(role = %self.role, error = %err, "failed to persist credential");
        }
        self.arm_expiry(token).await;
        self.authed.send_replace(!jwt_claims::is_expired(token));
    }

    /// Revalidate the persisted credential, e.g. at startup or before an
    /// admin navigation.
    ///
    /// A still-valid token re-arms the expiry timer; a stale or corrupt
    /// one is cleared quietly, without navigating, so a guard redirect
    /// stays the single navigation for the attempt.
    pub async fn restore(self: &Arc<Self>) {
        match self.storage.get(self.role.storage_key()).await {
            Ok(Some(token)) if !jwt_claims::is_expired(&token) => {
                self.arm_expiry(&token).await;
                self.authed.send_replace(true);
            }
            Ok(Some(_)) => {
                tracing::debug!(role = %self.role, "discarding stale persisted credential");
                if let Err(err) = self.storage.remove(self.role.storage_key()).await {
                    tracing::warn!(role = %self.role, error = %err, "failed to clear credential");
                }
                self.authed.send_replace(false);
            }
            Ok(None) => {
                self.authed.send_replace(false);
            }
            Err(err) => {
                tracing::warn!(role = %self.role, error = %err, "credential read failed");
                self.authed.send_replace(false);
            }
        }
    }

    /// Terminate the session: clear the credential, cancel the timer,
    /// push `false` to subscribers and navigate to the role's logout
    /// target unless already there.
    ///
    /// Idempotent under concurrency: a logout already in progress makes
    /// further calls return immediately. The in-progress guard is
    /// released on a later scheduler tick, so a 401 burst and the expiry
    /// timer collapse into one logout while a genuinely new logout after
    /// a fresh login is not suppressed.
    pub async fn logout(self: &Arc<Self>) {
        if self.logging_out.swap(true, Ordering::SeqCst) {
            return;
        }

        tracing::info!(role = %self.role, "logging out");
        if let Err(err) = self.storage.remove(self.role.storage_key()).await {
            tracing::warn!(role = %self.role, error = %err, "failed to clear credential");
        }
        self.timer.lock().await.cancel();
        self.authed.send_replace(false);

        let target = self.role.logout_route();
        if self.navigator.current_path() != target {
            self.navigator.replace(target);
        }

        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.logging_out.store(false, Ordering::SeqCst);
        });
    }

    /// Credential present and not expired. Recomputed on every call; no
    /// side effects, safe for synchronous UI checks.
    pub async fn is_authenticated(&self) -> bool {
        match self.token().await {
            Some(token) => !jwt_claims::is_expired(&token),
            None => false,
        }
    }

    /// Reactive authentication signal: the current value is visible
    /// immediately on subscribe, then on every change and on timer
    /// firing.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authed.subscribe()
    }

    /// Cancel the expiry timer at process shutdown.
    pub async fn shutdown(&self) {
        self.timer.lock().await.cancel();
    }

    async fn arm_expiry(self: &Arc<Self>, token: &str) {
        let weak = Arc::downgrade(self);
        self.timer.lock().await.arm(token, move || async move {
            if let Some(store) = weak.upgrade() {
                tracing::info!(role = %store.role, "session reached its expiry instant");
                store.logout().await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    struct RecordingNavigator {
        current: StdMutex<String>,
        replaced: StdMutex<Vec<String>>,
    }

    impl RecordingNavigator {
        fn new(current: &str) -> Arc<Self> {
            Arc::new(Self {
                current: StdMutex::new(current.to_string()),
                replaced: StdMutex::new(Vec::new()),
            })
        }

        fn replacements(&self) -> Vec<String> {
            self.replaced.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn current_path(&self) -> String {
            self.current.lock().unwrap().clone()
        }

        fn replace(&self, path: &str) {
            *self.current.lock().unwrap() = path.to_string();
            self.replaced.lock().unwrap().push(path.to_string());
        }
    }

    /// Storage wrapper counting destructive writes.
    struct CountingStorage {
        inner: MemoryTokenStorage,
        removes: AtomicUsize,
    }

    impl CountingStorage {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: MemoryTokenStorage::new(),
                removes: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TokenStorage for CountingStorage {
        async fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<()> {
            self.removes.fetch_add(1, Ordering::SeqCst);
            self.inner.remove(key).await
        }
    }

    fn token_expiring_in(secs: i64) -> String {
        let claims = serde_json::json!({"sub": "42", "exp": Utc::now().timestamp() + secs});
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    fn store(role: Role) -> (Arc<SessionStore>, Arc<RecordingNavigator>) {
        let navigator = RecordingNavigator::new("/lms/courses");
        let store = SessionStore::new(
            role,
            Arc::new(MemoryTokenStorage::new()),
            navigator.clone(),
        );
        (store, navigator)
    }

    #[tokio::test]
    async fn test_set_then_access_returns_token() {
        let (store, _) = store(Role::User);
        let token = token_expiring_in(3600);

        store.set_token(&token).await;

        assert_eq!(store.access_token().await.as_deref(), Some(token.as_str()));
        assert!(store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_corrupt_credential_is_treated_as_absent() {
        let (store, _) = store(Role::User);
        store.set_token("not-a-jwt").await;

        assert!(!store.is_authenticated().await);
        assert_eq!(store.access_token().await, None);
        // Fail closed: the unusable credential is gone.
        assert_eq!(store.token().await, None);
    }

    #[tokio::test]
    async fn test_expired_credential_triggers_logout_on_read() {
        let (store, navigator) = store(Role::User);
        store.set_token(&token_expiring_in(-60)).await;

        assert_eq!(store.access_token().await, None);
        assert_eq!(store.token().await, None);
        assert!(!store.is_authenticated().await);
        assert_eq!(navigator.replacements(), vec![LOGIN_ROUTE.to_string()]);
    }

    #[tokio::test]
    async fn test_admin_logout_targets_admin_login() {
        let (store, navigator) = store(Role::Admin);
        store.set_token(&token_expiring_in(3600)).await;

        store.logout().await;

        assert_eq!(navigator.replacements(), vec![ADMIN_LOGIN_ROUTE.to_string()]);
    }

    #[tokio::test]
    async fn test_logout_skips_redirect_when_already_on_target() {
        let navigator = RecordingNavigator::new(LOGIN_ROUTE);
        let store = SessionStore::new(
            Role::User,
            Arc::new(MemoryTokenStorage::new()),
            navigator.clone(),
        );
        store.set_token(&token_expiring_in(3600)).await;

        store.logout().await;

        assert!(navigator.replacements().is_empty());
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_double_logout_clears_storage_once() {
        let storage = CountingStorage::new();
        let navigator = RecordingNavigator::new("/lms/courses");
        let store = SessionStore::new(Role::User, storage.clone(), navigator.clone());
        store.set_token(&token_expiring_in(3600)).await;

        store.logout().await;
        store.logout().await;
        assert_eq!(storage.removes.load(Ordering::SeqCst), 1);
        assert_eq!(navigator.replacements().len(), 1);

        // After a scheduler tick the guard is released and a fresh,
        // distinct logout proceeds.
        tokio::task::yield_now().await;
        store.set_token(&token_expiring_in(3600)).await;
        store.logout().await;
        assert_eq!(storage.removes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_subscribe_sees_current_value_immediately() {
        let (store, _) = store(Role::User);

        let rx = store.subscribe();
        assert!(!*rx.borrow());

        store.set_token(&token_expiring_in(3600)).await;
        let mut rx = store.subscribe();
        assert!(*rx.borrow());

        store.logout().await;
        rx.changed().await.unwrap();
        assert!(!*rx.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_forces_logout_with_no_activity() {
        let (store, navigator) = store(Role::User);
        store.set_token(&token_expiring_in(5)).await;
        assert!(store.is_authenticated().await);

        // No requests, no reads: the proactive timer alone must kill the
        // session once the expiry instant passes.
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(store.token().await, None);
        assert!(!store.is_authenticated().await);
        assert_eq!(navigator.replacements(), vec![LOGIN_ROUTE.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_token_twice_leaves_one_live_timer() {
        let (store, navigator) = store(Role::User);
        store.set_token(&token_expiring_in(5)).await;
        store.set_token(&token_expiring_in(120)).await;

        // Past the replaced token's expiry: nothing may fire.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(store.token().await.is_some());
        assert!(navigator.replacements().is_empty());

        // The second token's timer is the one that fires.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(store.token().await, None);
        assert_eq!(navigator.replacements().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_rearms_timer_for_valid_credential() {
        let storage: Arc<dyn TokenStorage> = Arc::new(MemoryTokenStorage::new());
        storage
            .set("user_token", &token_expiring_in(5))
            .await
            .unwrap();

        let navigator = RecordingNavigator::new("/lms/courses");
        let store = SessionStore::new(Role::User, storage, navigator.clone());
        store.restore().await;
        assert!(store.is_authenticated().await);
        assert!(*store.subscribe().borrow());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(!store.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_restore_clears_stale_credential_without_navigating() {
        let storage: Arc<dyn TokenStorage> = Arc::new(MemoryTokenStorage::new());
        storage
            .set("admin_token", &token_expiring_in(-60))
            .await
            .unwrap();

        let navigator = RecordingNavigator::new("/admin/dashboard");
        let store = SessionStore::new(Role::Admin, storage.clone(), navigator.clone());
        store.restore().await;

        assert_eq!(storage.get("admin_token").await.unwrap(), None);
        assert!(!store.is_authenticated().await);
        assert!(navigator.replacements().is_empty());
    }
}
