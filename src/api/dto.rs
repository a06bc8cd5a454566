use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Timestamp format accepted on ingestion, e.g. `08-29-2026 14:30:00`.
pub const READING_DATE_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// Relative time window used to filter a room's readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term {
    Week,
    Month,
}

impl Term {
    pub fn days(self) -> i64 {
        match self {
            Term::Week => 7,
            Term::Month => 30,
        }
    }
}

impl FromStr for Term {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(anyhow::anyhow!(
                "unknown term: {other:?} (expected \"week\" or \"month\")"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Request body for `POST /api/room`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub name: String,
}

/// Request body for `POST /api/temperature`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewReadingRequest {
    /// Id of the room the reading belongs to.
    pub room: i64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Timestamp in `MM-DD-YYYY HH:MM:SS`. Defaults to current UTC time.
    pub date: Option<String>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomCreated {
    pub id: i64,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for `GET /api/average`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GlobalAverage {
    /// Mean over all readings, rounded to 2 decimals. 0 when there are none.
    pub average: f64,
    /// Number of distinct calendar dates (UTC) among readings.
    pub days: i64,
}

/// Response for `GET /api/room/{room_id}` without a term.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomStats {
    pub name: String,
    pub average: f64,
    pub days: i64,
}

/// Response for `GET /api/room/{room_id}?term=...`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomReadings {
    pub name: String,
    /// `(YYYY-MM-DD, temperature)` pairs within the term, oldest first.
    #[schema(value_type = Vec<Object>)]
    pub temperatures: Vec<(String, f64)>,
    pub average: f64,
}

/// The room-detail endpoint answers with one of two shapes depending on
/// whether a `term` query parameter was supplied.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum RoomDetail {
    Stats(RoomStats),
    Readings(RoomReadings),
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_reading_date(raw: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, READING_DATE_FORMAT)
        .with_context(|| format!("date must match MM-DD-YYYY HH:MM:SS, got: {raw:?}"))?;
    Ok(naive.and_utc())
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn term_from_str_known_values() {
        assert_eq!("week".parse::<Term>().unwrap(), Term::Week);
        assert_eq!("month".parse::<Term>().unwrap(), Term::Month);
        assert_eq!(Term::Week.days(), 7);
        assert_eq!(Term::Month.days(), 30);
    }

    #[test]
    fn term_unknown_errors() {
        let err = "year".parse::<Term>().unwrap_err();
        assert!(err.to_string().contains("unknown term"));
    }

    #[test]
    fn parse_reading_date_accepts_ingestion_format() {
        let dt = parse_reading_date("01-02-2024 10:30:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 1, 2));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (10, 30, 0));
    }

    #[test]
    fn parse_reading_date_rejects_other_formats() {
        assert!(parse_reading_date("2024-01-02 10:30:00").is_err());
        assert!(parse_reading_date("01-02-2024").is_err());
        assert!(parse_reading_date("not a date").is_err());
    }

    #[test]
    fn round2_rounds_to_two_decimals() {
        assert_eq!(round2(21.256), 21.26);
        assert_eq!(round2(21.254), 21.25);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(21.0), 21.0);
    }
}
