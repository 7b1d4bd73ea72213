//! Core domain models for the sync engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The five content entities mirrored from the external record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Artist,
    Artwork,
    Exhibition,
    Event,
    Notice,
}

impl EntityKind {
    /// All entities in sync order.
    pub const ALL: [Self; 5] = [
        Self::Artist,
        Self::Artwork,
        Self::Exhibition,
        Self::Event,
        Self::Notice,
    ];

    /// Name of the table in the external record store.
    pub fn source_table(&self) -> &'static str {
        match self {
            Self::Artist => "Artists",
            Self::Artwork => "Artworks",
            Self::Exhibition => "Exhibitions",
            Self::Event => "Events",
            Self::Notice => "Notices",
        }
    }

    /// Name of the destination table, also used as the `sync_runs.entity` tag.
    pub fn dest_table(&self) -> &'static str {
        match self {
            Self::Artist => "artists",
            Self::Artwork => "artworks",
            Self::Exhibition => "exhibitions",
            Self::Event => "events",
            Self::Notice => "notices",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dest_table())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" | "artists" => Ok(Self::Artist),
            "artwork" | "artworks" => Ok(Self::Artwork),
            "exhibition" | "exhibitions" => Ok(Self::Exhibition),
            "event" | "events" => Ok(Self::Event),
            "notice" | "notices" => Ok(Self::Notice),
            other => Err(format!("unknown entity: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// The result of syncing one entity: the contract counts.
///
/// Invariant: `fetched = upserted + failed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub entity: EntityKind,
    /// Records read from the source.
    pub fetched: u32,
    /// Records successfully written to the destination.
    pub upserted: u32,
    /// Records dropped by mapping or per-record write failures.
    pub failed: u32,
}

/// Per-entity outcome inside a full sync: either a report or an error
/// message when the entity's run aborted before producing counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub entity: EntityKind,
    pub report: Option<SyncReport>,
    pub error: Option<String>,
}

/// The result of one `sync_all` pass over every entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSummary {
    pub completed_at: DateTime<Utc>,
    pub outcomes: Vec<SyncOutcome>,
}

impl SyncSummary {
    pub fn new(outcomes: Vec<SyncOutcome>) -> Self {
        Self {
            completed_at: Utc::now(),
            outcomes,
        }
    }
}
