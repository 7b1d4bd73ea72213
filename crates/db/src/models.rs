//! Row structs that map 1-to-1 onto database tables.
//!
//! These are *persistence* models — they carry no domain behaviour.
//! Domain types (entity kinds, sync reports) live in the `engine` crate.
//!
//! Every content table shares the same skeleton: a local UUID primary key,
//! an optional `external_id` carrying the source record ID (unique when
//! present — the idempotency key for sync upserts), a `published` visibility
//! flag, and `created_at`/`updated_at` timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// artists
// ---------------------------------------------------------------------------

/// A persisted artist row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArtistRow {
    pub id: Uuid,
    /// Source record ID; `None` for rows created locally via the admin API.
    pub external_id: Option<String>,
    pub name: String,
    pub bio: Option<String>,
    pub discipline: Option<String>,
    pub photo_url: Option<String>,
    pub website: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for inserting or upserting an artist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtist {
    pub external_id: Option<String>,
    pub name: String,
    pub bio: Option<String>,
    pub discipline: Option<String>,
    pub photo_url: Option<String>,
    pub website: Option<String>,
    pub published: bool,
}

// ---------------------------------------------------------------------------
// artworks
// ---------------------------------------------------------------------------

/// A persisted artwork row.
///
/// The source stores a plain artist display name per artwork (no foreign
/// key), so the linkage stays a text column here as well.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArtworkRow {
    pub id: Uuid,
    pub external_id: Option<String>,
    pub title: String,
    pub artist_name: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    pub for_sale: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for inserting or upserting an artwork.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArtwork {
    pub external_id: Option<String>,
    pub title: String,
    pub artist_name: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    pub for_sale: bool,
    pub published: bool,
}

// ---------------------------------------------------------------------------
// exhibitions
// ---------------------------------------------------------------------------

/// A persisted exhibition row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExhibitionRow {
    pub id: Uuid,
    pub external_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for inserting or upserting an exhibition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExhibition {
    pub external_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub published: bool,
}

// ---------------------------------------------------------------------------
// events
// ---------------------------------------------------------------------------

/// A persisted event row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub external_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for inserting or upserting an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub external_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub published: bool,
}

// ---------------------------------------------------------------------------
// notices
// ---------------------------------------------------------------------------

/// A persisted notice row (news / announcements).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NoticeRow {
    pub id: Uuid,
    pub external_id: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub posted_on: Option<NaiveDate>,
    pub pinned: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values for inserting or upserting a notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotice {
    pub external_id: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub posted_on: Option<NaiveDate>,
    pub pinned: bool,
    pub published: bool,
}

// ---------------------------------------------------------------------------
// sync_runs
// ---------------------------------------------------------------------------

/// Possible statuses for a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncRunStatus {
    Running,
    Succeeded,
    Failed,
}

impl std::fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for SyncRunStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown sync run status: {other}")),
        }
    }
}

/// A persisted sync run row.
///
/// Invariant: once `finished_at` is set, `fetched = upserted + failed`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SyncRunRow {
    pub id: Uuid,
    /// Entity table that was synced, e.g. `"artists"`.
    pub entity: String,
    pub status: String,
    pub fetched: i32,
    pub upserted: i32,
    pub failed: i32,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn sync_run_status_round_trips_through_its_column_form() {
        for status in [
            SyncRunStatus::Running,
            SyncRunStatus::Succeeded,
            SyncRunStatus::Failed,
        ] {
            let parsed = SyncRunStatus::from_str(&status.to_string()).expect("round trip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_sync_run_status_is_rejected() {
        assert!(SyncRunStatus::from_str("paused").is_err());
    }
}
