//! Data models for team placements and CTFtime event metadata.
//!
//! This module defines the structures that flow through the pipeline:
//! - [`PlacementRecord`]: One row of a team's yearly rating table
//! - [`YearGroup`]: All placements listed under one year tab
//! - [`EventMetadata`]: The subset of `/api/v1/events/{id}/` we consume
//! - [`JoinedPlacement`] / [`JoinedYear`]: Placements with their event start attached
//! - [`FlatRow`]: The unit consumed by renderers

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// A team's result in a single competition, as listed on its profile page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    /// Final rank in the competition (1 = winner).
    pub place: u32,
    /// Site-relative event link, e.g. `/event/123`.
    pub url: String,
    /// Display name of the event.
    pub name: String,
    /// Rating points awarded for this placement.
    pub rating_points: f64,
}

/// Placements listed under one year tab, in page order until joined.
///
/// The year label is usually numeric but is kept as a string since tabs such
/// as `archive` exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearGroup {
    pub year: String,
    pub placements: Vec<PlacementRecord>,
}

/// Event metadata returned by the CTFtime events API.
///
/// Only `id` and `start` are required; the optional fields are captured when
/// the API provides them and everything else in the body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Event identifier. The API sends a number; it is stored as a string so it
    /// can be compared with identifiers taken from page links.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub start: DateTime<FixedOffset>,
    #[serde(default)]
    pub finish: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub ctftime_url: Option<String>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// A placement with the start time of its event attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedPlacement {
    pub event_id: String,
    pub start: DateTime<FixedOffset>,
    pub placement: PlacementRecord,
}

/// A year's placements, sorted by event start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedYear {
    pub year: String,
    pub placements: Vec<JoinedPlacement>,
}

/// One plotted point: which year tab it came from, when, and the place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub year: String,
    pub start: DateTime<FixedOffset>,
    pub place: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_metadata_numeric_id() {
        let json = r#"{
            "id": 123,
            "title": "Example CTF 2023",
            "start": "2023-03-04T10:00:00+00:00",
            "finish": "2023-03-05T10:00:00+00:00",
            "format": "Jeopardy",
            "weight": 24.5,
            "participants": 512,
            "organizers": [{"id": 1, "name": "org"}]
        }"#;

        let event: EventMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "123");
        assert_eq!(event.title.as_deref(), Some("Example CTF 2023"));
        assert_eq!(event.start.to_rfc3339(), "2023-03-04T10:00:00+00:00");
        assert_eq!(event.weight, Some(24.5));
    }

    #[test]
    fn test_event_metadata_minimal() {
        let json = r#"{"id": "456", "start": "2022-06-15T18:30:00-04:00"}"#;

        let event: EventMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, "456");
        assert!(event.finish.is_none());
        assert!(event.title.is_none());
        assert_eq!(event.start.offset().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_event_metadata_requires_start() {
        let json = r#"{"id": 789, "title": "No start"}"#;
        assert!(serde_json::from_str::<EventMetadata>(json).is_err());
    }

    #[test]
    fn test_flat_row_serialization() {
        let row = FlatRow {
            year: "2023".to_string(),
            start: DateTime::parse_from_rfc3339("2023-03-04T10:00:00+00:00").unwrap(),
            place: 7,
        };

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"year\":\"2023\""));
        assert!(json.contains("\"place\":7"));
        assert!(json.contains("2023-03-04T10:00:00"));
    }
}
