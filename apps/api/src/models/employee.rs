use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Row shape of the `employees` table. `skills` and `notes` are JSON arrays.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub email: String,
    pub skills: Json<Vec<String>>,
    pub notes: Json<Vec<String>>,
    pub development_plan: Option<String>,
    /// Free-text tier ("P1".."P4"); anything else is treated as unset.
    pub potential: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
