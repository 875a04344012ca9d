//! Request authorization interceptor.
//!
//! Every request goes through [`attach_bearer`] before it is sent and, on
//! failure, through exactly one of the classifiers. Classification is a
//! side effect at this boundary: the resulting [`ApiError`] is reported
//! once and then handed back to the caller unchanged, so page-level code
//! keeps its own recovery options.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};

use crate::error::ApiError;
use crate::models::ErrorBody;
use crate::security::{is_admin_scoped, select_token};
use crate::session::SessionStore;

/// Resolve a credential for `path` from the live session stores and
/// attach it as `Authorization: Bearer <token>`.
///
/// Reads go through `access_token`, so the lazy-expiry check (and its
/// logout side effect) applies before any request leaves the client. A
/// request with no usable credential is sent unmodified.
pub async fn attach_bearer(
    builder: RequestBuilder,
    path: &str,
    user_session: &Arc<SessionStore>,
    admin_session: &Arc<SessionStore>,
) -> RequestBuilder {
    let user_token = user_session.access_token().await;
    let admin_token = admin_session.access_token().await;

    match select_token(path, user_token.as_deref(), admin_token.as_deref()) {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Classify a request that never produced a response.
pub fn classify_transport(err: reqwest::Error) -> ApiError {
    tracing::debug!(error = %err, "request transport failure");
    ApiError::Network(err)
}

/// Classify a non-success response, consuming its body.
///
/// A 401 does not force logout by itself; only the lazy-expiry check and
/// the proactive timer clear credentials. A 401 from a revoked but
/// unexpired token is the calling flow's to handle.
pub async fn classify_response(path: &str, response: Response) -> ApiError {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        let admin = is_admin_scoped(path);
        let message = if admin {
            "Your admin session is not authorized, please log in again".to_string()
        } else {
            "Your session is not authorized, please log in again".to_string()
        };
        return ApiError::Unauthorized { admin, message };
    }

    if status.is_server_error() {
        return ApiError::Server {
            status: status.as_u16(),
        };
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| "The request was rejected by the server".to_string());

    ApiError::Validation {
        status: status.as_u16(),
        message,
    }
}
