//! Persistence access layer. All SQL lives here; handlers only see typed
//! results and the injected pool.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::models::{Room, Temperature};

/// Insert a room and return its assigned id.
pub async fn insert_room(pool: &SqlitePool, name: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("INSERT INTO rooms (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
}

/// Insert one reading. Referential integrity is left to the schema's
/// foreign key; the caller maps a violation to a client error.
pub async fn insert_temperature(
    pool: &SqlitePool,
    room_id: i64,
    temperature: f64,
    date: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO temperatures (room_id, temperature, date) VALUES (?, ?, ?)")
        .bind(room_id)
        .bind(temperature)
        .bind(date)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_room(pool: &SqlitePool, room_id: i64) -> Result<Option<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>("SELECT id, name FROM rooms WHERE id = ?")
        .bind(room_id)
        .fetch_optional(pool)
        .await
}

/// Mean temperature over all readings (`None` when there are none) and the
/// count of distinct calendar dates among them.
pub async fn global_stats(pool: &SqlitePool) -> Result<(Option<f64>, i64), sqlx::Error> {
    sqlx::query_as::<_, (Option<f64>, i64)>(
        "SELECT AVG(temperature), COUNT(DISTINCT date(date)) FROM temperatures",
    )
    .fetch_one(pool)
    .await
}

/// Same aggregates restricted to one room.
pub async fn room_stats(
    pool: &SqlitePool,
    room_id: i64,
) -> Result<(Option<f64>, i64), sqlx::Error> {
    sqlx::query_as::<_, (Option<f64>, i64)>(
        "SELECT AVG(temperature), COUNT(DISTINCT date(date)) \
         FROM temperatures WHERE room_id = ?",
    )
    .bind(room_id)
    .fetch_one(pool)
    .await
}

/// Readings for a room at or after `cutoff`, oldest first.
pub async fn room_readings_since(
    pool: &SqlitePool,
    room_id: i64,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Temperature>, sqlx::Error> {
    sqlx::query_as::<_, Temperature>(
        "SELECT id, room_id, temperature, date \
         FROM temperatures \
         WHERE room_id = ? AND date >= ? \
         ORDER BY date ASC",
    )
    .bind(room_id)
    .bind(cutoff)
    .fetch_all(pool)
    .await
}
