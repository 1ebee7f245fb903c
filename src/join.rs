//! Join scraped placements with fetched event metadata.

use crate::error::{Error, Result};
use crate::models::{EventMetadata, JoinedPlacement, JoinedYear, YearGroup};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Event identifier of a placement link: its last non-empty path segment.
///
/// `/event/123` and `/event/123/` both yield `"123"`.
pub fn event_id_from_url(url: &str) -> Result<String> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidEventUrl(url.to_string()))
}

/// Every distinct event identifier referenced by `history`.
pub fn event_ids(history: &[YearGroup]) -> Result<BTreeSet<String>> {
    history
        .iter()
        .flat_map(|year| year.placements.iter())
        .map(|placement| event_id_from_url(&placement.url))
        .collect()
}

/// Attach each placement's event start time and sort every year by it.
///
/// # Errors
///
/// [`Error::MissingEvent`] if a placement refers to an event absent from
/// `events`; the metadata map must cover [`event_ids`] of `history`.
#[instrument(level = "info", skip_all, fields(years = history.len(), events = events.len()))]
pub fn join_events(
    history: Vec<YearGroup>,
    events: &HashMap<String, EventMetadata>,
) -> Result<Vec<JoinedYear>> {
    history
        .into_iter()
        .map(|group| {
            let mut placements = group
                .placements
                .into_iter()
                .map(|placement| {
                    let event_id = event_id_from_url(&placement.url)?;
                    let event = events
                        .get(&event_id)
                        .ok_or_else(|| Error::MissingEvent(event_id.clone()))?;
                    Ok(JoinedPlacement {
                        start: event.start,
                        event_id,
                        placement,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            placements.sort_by_key(|p| p.start);
            debug!(year = %group.year, count = placements.len(), "Joined year");
            Ok(JoinedYear {
                year: group.year,
                placements,
            })
        })
        .collect()
}
