//! CTFtime events API client with all-or-nothing batch semantics.
//!
//! Event metadata lives at `/api/v1/events/{id}/`. [`fetch_events`] scatters
//! one request per distinct identifier over the shared client and gathers the
//! answers into a map. The batch either returns metadata for every
//! identifier or fails: the first error encountered ends the batch and any
//! requests still in flight are dropped with it.

use crate::client::CtfTimeClient;
use crate::error::{Error, Result};
use crate::models::EventMetadata;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// Fetch metadata for a single event.
///
/// The response's own `id` must match `event_id`; a mismatch is reported as
/// [`Error::EventIdMismatch`] so the result can be keyed by either safely.
#[instrument(level = "debug", skip(client))]
pub async fn fetch_event(client: &CtfTimeClient, event_id: &str) -> Result<EventMetadata> {
    let url = client.event_api_url(event_id)?;
    let event: EventMetadata = client.get_json(url).await?;

    if event.id != event_id {
        return Err(Error::EventIdMismatch {
            requested: event_id.to_string(),
            returned: event.id,
        });
    }
    debug!(start = %event.start, title = ?event.title, "Fetched event metadata");
    Ok(event)
}

/// Fetch metadata for every identifier in `event_ids`.
///
/// Duplicates are collapsed before any request is made. With
/// `concurrency = None` every request is in flight at once; `Some(n)` caps
/// the number of simultaneous requests at `n`.
///
/// # Returns
///
/// A map from identifier to metadata whose key set equals the distinct
/// input identifiers.
///
/// # Errors
///
/// The first failing request (transport error, non-2xx status, body that is
/// not event JSON, or mismatched `id`) fails the whole batch.
#[instrument(level = "info", skip_all)]
pub async fn fetch_events<I>(
    client: &CtfTimeClient,
    event_ids: I,
    concurrency: Option<usize>,
) -> Result<HashMap<String, EventMetadata>>
where
    I: IntoIterator<Item = String>,
{
    let unique: BTreeSet<String> = event_ids.into_iter().collect();
    let total = unique.len();
    let limit = concurrency.unwrap_or(total).max(1);
    let t0 = Instant::now();

    info!(events = total, concurrency = limit, "Fetching event metadata");

    let result = fetch_all(unique, limit, |event_id| async move {
        fetch_event(client, &event_id).await
    })
    .await;

    let elapsed_ms = t0.elapsed().as_millis();
    match &result {
        Ok(events) => info!(count = events.len(), elapsed_ms, "Fetched all event metadata"),
        Err(e) => error!(error = %e, elapsed_ms, "Event metadata batch failed"),
    }
    result
}

/// Run `fetch` for every identifier with at most `limit` in flight, keyed by
/// identifier. The first error drops the remaining futures.
async fn fetch_all<F, Fut>(
    event_ids: BTreeSet<String>,
    limit: usize,
    fetch: F,
) -> Result<HashMap<String, EventMetadata>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<EventMetadata>>,
{
    stream::iter(event_ids)
        .map(|event_id| {
            let pending = fetch(event_id.clone());
            async move { Ok::<_, Error>((event_id, pending.await?)) }
        })
        .buffer_unordered(limit.max(1))
        .try_collect()
        .await
}
