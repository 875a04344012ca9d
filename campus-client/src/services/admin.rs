//! Back-office reads.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::ManagedUser;

pub struct AdminService {
    client: Arc<ApiClient>,
}

impl AdminService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn users(&self) -> Result<Vec<ManagedUser>> {
        let response = self.client.get("/api/admin/users").await?;
        Ok(response.json().await?)
    }
}
