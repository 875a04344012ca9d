//! Storefront and library reads.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{Book, Course};

pub struct CatalogService {
    client: Arc<ApiClient>,
}

impl CatalogService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn courses(&self) -> Result<Vec<Course>> {
        let response = self.client.get("/api/lms/courses").await?;
        Ok(response.json().await?)
    }

    pub async fn books(&self) -> Result<Vec<Book>> {
        let response = self.client.get("/api/lms/books").await?;
        Ok(response.json().await?)
    }

    /// Books owned by the signed-in user.
    pub async fn my_books(&self) -> Result<Vec<Book>> {
        let response = self.client.get("/api/lms/my-books").await?;
        Ok(response.json().await?)
    }
}
