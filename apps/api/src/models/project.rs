use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}
