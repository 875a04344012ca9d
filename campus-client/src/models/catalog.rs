use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
}
