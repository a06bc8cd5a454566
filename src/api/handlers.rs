use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, SubsecRound, Utc};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::OpenApi;

use super::dto::{
    parse_reading_date, round2, CreateRoomRequest, GlobalAverage, MessageResponse,
    NewReadingRequest, RoomCreated, RoomDetail, RoomReadings, RoomStats, Term,
};
use super::errors::ApiError;
use crate::db::queries;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RoomDetailParams {
    /// `"week"` or `"month"`; anything else is a client error.
    pub term: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Create a room. Duplicate names are allowed.
#[utoipa::path(
    post,
    path = "/api/room",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = RoomCreated),
        (status = 400, description = "Missing or malformed body"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "rooms"
)]
pub async fn create_room(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateRoomRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RoomCreated>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let id = queries::insert_room(&pool, &req.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(RoomCreated {
            id,
            message: format!("Room {} created.", req.name),
        }),
    ))
}

/// Record one temperature reading. The timestamp defaults to the current
/// UTC time (whole seconds) when absent.
#[utoipa::path(
    post,
    path = "/api/temperature",
    request_body = NewReadingRequest,
    responses(
        (status = 201, description = "Reading stored", body = MessageResponse),
        (status = 400, description = "Missing field, malformed date, or unknown room"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "temperatures"
)]
pub async fn add_temperature(
    State(pool): State<SqlitePool>,
    payload: Result<Json<NewReadingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let date = match req.date.as_deref() {
        Some(raw) => parse_reading_date(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => Utc::now().trunc_subsecs(0),
    };

    queries::insert_temperature(&pool, req.room, req.temperature, date).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Temperature added.".to_owned(),
        }),
    ))
}

/// Mean temperature across all rooms plus the number of distinct calendar
/// dates with at least one reading.
#[utoipa::path(
    get,
    path = "/api/average",
    responses(
        (status = 200, description = "Global statistics", body = GlobalAverage),
        (status = 500, description = "Internal server error"),
    ),
    tag = "temperatures"
)]
pub async fn get_global_average(
    State(pool): State<SqlitePool>,
) -> Result<Json<GlobalAverage>, ApiError> {
    let (average, days) = queries::global_stats(&pool).await?;

    Ok(Json(GlobalAverage {
        average: round2(average.unwrap_or(0.0)),
        days,
    }))
}

/// Room detail. Without `term`: all-time average and distinct-day count.
/// With `term=week|month`: readings newer than the cutoff as
/// `(YYYY-MM-DD, temperature)` pairs plus their average.
#[utoipa::path(
    get,
    path = "/api/room/{room_id}",
    params(
        ("room_id" = i64, Path, description = "Room id"),
        ("term" = Option<String>, Query, description = "Relative window: week or month"),
    ),
    responses(
        (status = 200, description = "Room statistics or filtered readings", body = RoomDetail),
        (status = 400, description = "Unrecognised term"),
        (status = 404, description = "Room not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "rooms"
)]
pub async fn get_room(
    State(pool): State<SqlitePool>,
    Path(room_id): Path<i64>,
    Query(params): Query<RoomDetailParams>,
) -> Result<Json<RoomDetail>, ApiError> {
    // Parse the term before touching the database so a bad term on a
    // missing room still reads as a client error.
    let term = params
        .term
        .as_deref()
        .map(|raw| raw.parse::<Term>())
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    // Single lookup shared by both branches.
    let room = queries::find_room(&pool, room_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("room {room_id} not found")))?;

    match term {
        None => {
            let (average, days) = queries::room_stats(&pool, room_id).await?;
            Ok(Json(RoomDetail::Stats(RoomStats {
                name: room.name,
                average: round2(average.unwrap_or(0.0)),
                days,
            })))
        }
        Some(term) => {
            let cutoff = Utc::now() - Duration::days(term.days());
            let readings = queries::room_readings_since(&pool, room_id, cutoff).await?;

            let average = if readings.is_empty() {
                0.0
            } else {
                readings.iter().map(|r| r.temperature).sum::<f64>() / readings.len() as f64
            };
            let temperatures = readings
                .iter()
                .map(|r| (r.date.format("%Y-%m-%d").to_string(), r.temperature))
                .collect();

            Ok(Json(RoomDetail::Readings(RoomReadings {
                name: room.name,
                temperatures,
                average: round2(average),
            })))
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Returns `200 OK` with `{"status":"ok"}` when the server is running.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "system"
)]
pub async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// OpenAPI spec
// ---------------------------------------------------------------------------

#[derive(OpenApi)]
#[openapi(
    paths(create_room, add_temperature, get_global_average, get_room, health),
    components(schemas(
        CreateRoomRequest,
        NewReadingRequest,
        RoomCreated,
        MessageResponse,
        GlobalAverage,
        RoomStats,
        RoomReadings,
        RoomDetail,
    )),
    tags(
        (name = "rooms", description = "Room endpoints"),
        (name = "temperatures", description = "Temperature reading endpoints"),
        (name = "system", description = "System endpoints"),
    ),
    info(
        title = "Room Temperature API",
        version = "0.1.0",
        description = "REST API for per-room temperature tracking"
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
