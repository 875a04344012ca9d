//! Route guards.
//!
//! A guard evaluates one navigation attempt and produces exactly one
//! terminal outcome: the navigation proceeds, or it is replaced by a
//! redirect to the matching entry point.

use std::fmt;
use std::sync::Arc;

use crate::session::SessionStore;

use super::{ADMIN_LOGIN_ROUTE, LOGIN_ROUTE, SIGN_ROUTE};

/// One navigation attempt against a protected route.
#[derive(Debug, Clone)]
pub struct RouteAccessRequest {
    /// Originally requested path, carried as `returnUrl` on redirect.
    pub path: String,
    /// Prefer the registration page over the login page as the
    /// unauthenticated redirect target.
    pub redirect_to_sign: bool,
}

impl RouteAccessRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirect_to_sign: false,
        }
    }

    pub fn with_sign_redirect(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            redirect_to_sign: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Authorized,
    Redirect(RedirectTarget),
}

/// Replacement navigation produced by a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: String,
    pub return_url: Option<String>,
}

impl RedirectTarget {
    fn to(path: &str, return_url: Option<String>) -> Self {
        Self {
            path: path.to_string(),
            return_url,
        }
    }

    /// Full location, `returnUrl` included.
    pub fn location(&self) -> String {
        match &self.return_url {
            Some(return_url) => format!("{}?returnUrl={}", self.path, return_url),
            None => self.path.clone(),
        }
    }
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

/// Guard for user-protected routes.
///
/// Synchronous session check; an unauthenticated attempt is redirected to
/// the login page, or to the registration page when the route asks for
/// it, with the requested path as `returnUrl` so the destination can come
/// back after success.
pub struct UserRouteGuard {
    session: Arc<SessionStore>,
}

impl UserRouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub async fn check(&self, request: &RouteAccessRequest) -> GuardOutcome {
        if self.session.is_authenticated().await {
            return GuardOutcome::Authorized;
        }

        let target = if request.redirect_to_sign {
            SIGN_ROUTE
        } else {
            LOGIN_ROUTE
        };
        tracing::debug!(path = %request.path, target, "unauthenticated, redirecting");
        GuardOutcome::Redirect(RedirectTarget::to(target, Some(request.path.clone())))
    }
}

/// Guard for the admin back-office.
///
/// Revalidates the persisted admin session first, then checks it; an
/// unauthenticated attempt is redirected to the admin login page.
pub struct AdminRouteGuard {
    session: Arc<SessionStore>,
}

impl AdminRouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub async fn check(&self, request: &RouteAccessRequest) -> GuardOutcome {
        self.session.restore().await;

        if self.session.is_authenticated().await {
            return GuardOutcome::Authorized;
        }

        tracing::debug!(path = %request.path, "admin session missing, redirecting");
        GuardOutcome::Redirect(RedirectTarget::to(ADMIN_LOGIN_ROUTE, None))
    }
}
