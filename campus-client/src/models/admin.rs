use serde::Deserialize;
use uuid::Uuid;

/// A platform account as listed in the admin back-office.
#[derive(Debug, Clone, Deserialize)]
pub struct ManagedUser {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
