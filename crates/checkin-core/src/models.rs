//! Data models for checkinlog.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CHECK-IN TYPES
// =============================================================================

/// Provenance of a check-in record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinSource {
    /// Created interactively through the web layer.
    Web,
    /// Created by the CSV bulk-import pipeline.
    Csv,
}

impl CheckinSource {
    /// String form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinSource::Web => "web",
            CheckinSource::Csv => "csv",
        }
    }
}

impl std::str::FromStr for CheckinSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "web" => Ok(CheckinSource::Web),
            "csv" => Ok(CheckinSource::Csv),
            other => Err(format!("unknown check-in source: {}", other)),
        }
    }
}

/// A single recorded check-in event.
///
/// `checked_in_at` is a wall-clock timestamp as the user entered it; it is
/// deliberately naive (no timezone) because the source data carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckinEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub checked_in_at: NaiveDateTime,
    pub note: String,
    pub link: String,
    pub source: CheckinSource,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
    /// Associated tag names, ordered (computed from the join table).
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for creating a check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckinRequest {
    pub user_id: Uuid,
    pub checked_in_at: NaiveDateTime,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub link: String,
    pub source: CheckinSource,
    /// Tags to associate at creation time.
    pub tags: Option<Vec<String>>,
}

/// Request for listing a user's check-ins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCheckinsRequest {
    pub user_id: Uuid,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated check-in listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListCheckinsResponse {
    pub checkins: Vec<CheckinEvent>,
    pub total: i64,
}

// =============================================================================
// TAG TYPES
// =============================================================================

/// A named label shared across check-ins, created on first use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub created_at_utc: DateTime<Utc>,
    /// Number of check-ins with this tag (computed)
    #[serde(default)]
    pub checkin_count: i64,
}
