//! Login and account flows for both roles.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{AdminLoginRequest, AdminLoginResponse, LoginRequest, LoginResponse};

pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Authenticate an end user and persist the issued credential in the
    /// user session store.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .client
            .post(
                "/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let body: LoginResponse = response.json().await?;
        self.client.user_session().set_token(&body.token).await;
        tracing::info!("user logged in");
        Ok(body)
    }

    /// Authenticate a back-office admin and persist the issued credential
    /// in the admin session store.
    pub async fn admin_login(&self, username: &str, password: &str) -> Result<AdminLoginResponse> {
        let response = self
            .client
            .post(
                "/admin/login",
                &AdminLoginRequest {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        let body: AdminLoginResponse = response.json().await?;
        self.client.admin_session().set_token(&body.token).await;
        tracing::info!(role = %body.role, "admin logged in");
        Ok(body)
    }

    pub async fn logout(&self) {
        self.client.user_session().logout().await;
    }

    pub async fn admin_logout(&self) {
        self.client.admin_session().logout().await;
    }

    /// Delete the signed-in user's account, then terminate the session.
    pub async fn delete_account(&self) -> Result<()> {
        self.client.delete("/api/users/me").await?;
        self.client.user_session().logout().await;
        Ok(())
    }
}
