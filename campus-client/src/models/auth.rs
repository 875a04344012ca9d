use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` response: the credential plus the user fields the
/// server chooses to include.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /admin/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// Error payload the API optionally attaches to failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
