//! HTTP client shared by the service layer.
//!
//! Every request funnels through [`ApiClient::execute`]: the middleware
//! attaches a bearer credential from the live session stores, and any
//! failure is classified once, reported once and returned to the caller.

use std::sync::Arc;

use reqwest::{Method, Response};
use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::middleware::{attach_bearer, classify_response, classify_transport};
use crate::notify::Notifier;
use crate::session::SessionStore;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    user_session: Arc<SessionStore>,
    admin_session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(
        config: &Config,
        user_session: Arc<SessionStore>,
        admin_session: Arc<SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            user_session,
            admin_session,
            notifier,
        }
    }

    pub fn user_session(&self) -> &Arc<SessionStore> {
        &self.user_session
    }

    pub fn admin_session(&self) -> &Arc<SessionStore> {
        &self.admin_session
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.execute(Method::GET, path, None::<&()>).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.execute(Method::DELETE, path, None::<&()>).await
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path, "sending request");

        let mut builder = self.http.request(method, &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = attach_bearer(builder, path, &self.user_session, &self.admin_session).await;

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let err = classify_transport(err);
                self.notifier.notify(&err.to_string());
                return Err(err);
            }
        };

        if response.status().is_success() {
            return Ok(response);
        }

        let err = classify_response(path, response).await;
        self.notifier.notify(&err.to_string());
        Err(err)
    }
}
