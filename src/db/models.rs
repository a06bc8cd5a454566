use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Temperature {
    pub id: i64,
    pub room_id: i64,
    /// Degrees Celsius
    pub temperature: f64,
    pub date: DateTime<Utc>,
}
