//! Field mapping — pure translation from raw source records to typed rows.
//!
//! Mapping failures are per-record: the sync counts them and moves on, so a
//! single malformed row in the source never blocks the rest of the table.

use chrono::{DateTime, NaiveDate, Utc};
use connectors::RawRecord;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use db::models::{NewArtist, NewArtwork, NewEvent, NewExhibition, NewNotice};

use crate::EntityKind;

/// A typed destination row, ready to upsert.
#[derive(Debug, Clone)]
pub enum MappedRecord {
    Artist(NewArtist),
    Artwork(NewArtwork),
    Exhibition(NewExhibition),
    Event(NewEvent),
    Notice(NewNotice),
}

/// Why one record could not be mapped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("record fields are not a JSON object")]
    NotAnObject,

    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{name}' is not a valid {expected}")]
    InvalidField {
        name: &'static str,
        expected: &'static str,
    },
}

/// Map one raw record into a typed row for the given entity.
pub fn map_record(kind: EntityKind, raw: &RawRecord) -> Result<MappedRecord, MapError> {
    let fields = raw.fields.as_object().ok_or(MapError::NotAnObject)?;
    let external_id = Some(raw.id.clone());

    let mapped = match kind {
        EntityKind::Artist => MappedRecord::Artist(NewArtist {
            external_id,
            name: req_str(fields, "Name")?,
            bio: opt_str(fields, "Bio"),
            discipline: opt_str(fields, "Discipline"),
            photo_url: opt_str(fields, "Photo URL"),
            website: opt_str(fields, "Website"),
            published: opt_bool(fields, "Published", true)?,
        }),
        EntityKind::Artwork => MappedRecord::Artwork(NewArtwork {
            external_id,
            title: req_str(fields, "Title")?,
            artist_name: opt_str(fields, "Artist"),
            medium: opt_str(fields, "Medium"),
            dimensions: opt_str(fields, "Dimensions"),
            year: opt_i32(fields, "Year")?,
            image_url: opt_str(fields, "Image URL"),
            for_sale: opt_bool(fields, "For Sale", false)?,
            published: opt_bool(fields, "Published", true)?,
        }),
        EntityKind::Exhibition => MappedRecord::Exhibition(NewExhibition {
            external_id,
            title: req_str(fields, "Title")?,
            description: opt_str(fields, "Description"),
            venue: opt_str(fields, "Venue"),
            starts_on: opt_date(fields, "Start Date")?,
            ends_on: opt_date(fields, "End Date")?,
            image_url: opt_str(fields, "Image URL"),
            published: opt_bool(fields, "Published", true)?,
        }),
        EntityKind::Event => MappedRecord::Event(NewEvent {
            external_id,
            title: req_str(fields, "Title")?,
            description: opt_str(fields, "Description"),
            location: opt_str(fields, "Location"),
            starts_at: opt_datetime(fields, "Starts At")?,
            ends_at: opt_datetime(fields, "Ends At")?,
            published: opt_bool(fields, "Published", true)?,
        }),
        EntityKind::Notice => MappedRecord::Notice(NewNotice {
            external_id,
            title: req_str(fields, "Title")?,
            body: opt_str(fields, "Body"),
            posted_on: opt_date(fields, "Posted On")?,
            pinned: opt_bool(fields, "Pinned", false)?,
            published: opt_bool(fields, "Published", true)?,
        }),
    };

    Ok(mapped)
}

/// Map a whole batch, counting failures instead of propagating them.
///
/// Returns the successfully mapped rows and the number of records dropped,
/// so `mapped.len() + dropped == records.len()`.
pub fn plan_upserts(kind: EntityKind, records: &[RawRecord]) -> (Vec<MappedRecord>, u32) {
    let mut mapped = Vec::with_capacity(records.len());
    let mut dropped = 0u32;

    for record in records {
        match map_record(kind, record) {
            Ok(row) => mapped.push(row),
            Err(e) => {
                warn!(entity = %kind, record_id = %record.id, "dropping unmappable record: {e}");
                dropped += 1;
            }
        }
    }

    (mapped, dropped)
}

// ---------------------------------------------------------------------------
// Field accessors
// ---------------------------------------------------------------------------

fn req_str(fields: &Map<String, Value>, name: &'static str) -> Result<String, MapError> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(_) => Err(MapError::InvalidField { name, expected: "string" }),
        None => Err(MapError::MissingField(name)),
    }
}

fn opt_str(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn opt_bool(
    fields: &Map<String, Value>,
    name: &'static str,
    default: bool,
) -> Result<bool, MapError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(MapError::InvalidField { name, expected: "boolean" }),
    }
}

fn opt_i32(fields: &Map<String, Value>, name: &'static str) -> Result<Option<i32>, MapError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or(MapError::InvalidField { name, expected: "integer" }),
    }
}

fn opt_date(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<NaiveDate>, MapError> {
    match fields.get(name).and_then(Value::as_str) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| MapError::InvalidField { name, expected: "date (YYYY-MM-DD)" }),
    }
}

fn opt_datetime(
    fields: &Map<String, Value>,
    name: &'static str,
) -> Result<Option<DateTime<Utc>>, MapError> {
    match fields.get(name).and_then(Value::as_str) {
        None => Ok(None),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| MapError::InvalidField { name, expected: "RFC 3339 timestamp" }),
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use connectors::mock::record;
    use serde_json::json;

    #[test]
    fn artist_maps_with_defaults() {
        let raw = record("rec1", json!({ "Name": "Ada Moreau", "Bio": "Sculptor" }));
        let mapped = map_record(EntityKind::Artist, &raw).expect("should map");

        match mapped {
            MappedRecord::Artist(a) => {
                assert_eq!(a.external_id.as_deref(), Some("rec1"));
                assert_eq!(a.name, "Ada Moreau");
                assert_eq!(a.bio.as_deref(), Some("Sculptor"));
                assert!(a.published, "published defaults to true");
            }
            other => panic!("expected artist, got {other:?}"),
        }
    }

    #[test]
    fn missing_required_name_is_rejected() {
        let raw = record("rec1", json!({ "Bio": "no name" }));
        assert!(matches!(
            map_record(EntityKind::Artist, &raw),
            Err(MapError::MissingField("Name"))
        ));
    }

    #[test]
    fn non_object_fields_are_rejected() {
        let raw = record("rec1", json!("not an object"));
        assert!(matches!(
            map_record(EntityKind::Artist, &raw),
            Err(MapError::NotAnObject)
        ));
    }

    #[test]
    fn artwork_year_must_be_integral() {
        let raw = record("rec2", json!({ "Title": "Dusk", "Year": 1999.5 }));
        assert!(matches!(
            map_record(EntityKind::Artwork, &raw),
            Err(MapError::InvalidField { name: "Year", expected: "integer" })
        ));
    }

    #[test]
    fn exhibition_dates_parse() {
        let raw = record(
            "rec3",
            json!({ "Title": "Winter Salon", "Start Date": "2026-01-10", "End Date": "2026-02-01" }),
        );
        match map_record(EntityKind::Exhibition, &raw).expect("should map") {
            MappedRecord::Exhibition(e) => {
                assert_eq!(e.starts_on, NaiveDate::from_ymd_opt(2026, 1, 10));
                assert_eq!(e.ends_on, NaiveDate::from_ymd_opt(2026, 2, 1));
            }
            other => panic!("expected exhibition, got {other:?}"),
        }
    }

    #[test]
    fn event_timestamp_parses_to_utc() {
        let raw = record(
            "rec4",
            json!({ "Title": "Vernissage", "Starts At": "2026-03-05T18:00:00+01:00" }),
        );
        match map_record(EntityKind::Event, &raw).expect("should map") {
            MappedRecord::Event(e) => {
                let starts = e.starts_at.expect("has start");
                assert_eq!(starts.to_rfc3339(), "2026-03-05T17:00:00+00:00");
            }
            other => panic!("expected event, got {other:?}"),
        }
    }

    #[test]
    fn malformed_date_is_rejected() {
        let raw = record("rec5", json!({ "Title": "Notice", "Posted On": "05/03/2026" }));
        assert!(matches!(
            map_record(EntityKind::Notice, &raw),
            Err(MapError::InvalidField { name: "Posted On", .. })
        ));
    }

    #[test]
    fn plan_upserts_counts_dropped_records() {
        let records = vec![
            record("ok1", json!({ "Name": "Ada" })),
            record("bad", json!({ "Bio": "missing name" })),
            record("ok2", json!({ "Name": "Bea" })),
        ];

        let (mapped, dropped) = plan_upserts(EntityKind::Artist, &records);
        assert_eq!(mapped.len(), 2);
        assert_eq!(dropped, 1);
        assert_eq!(mapped.len() as u32 + dropped, records.len() as u32);
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let raw = record("rec6", json!({ "Name": "Ada", "Website": "  " }));
        match map_record(EntityKind::Artist, &raw).expect("should map") {
            MappedRecord::Artist(a) => assert!(a.website.is_none()),
            other => panic!("expected artist, got {other:?}"),
        }
    }
}
