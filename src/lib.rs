//! # ctftime_team_graphs
//!
//! Builds a team's placement history from CTFtime and renders it as a chart
//! of place over time.
//!
//! CTFtime has no API listing the events a team played, so the history is
//! scraped from the team profile page and each event's start date is then
//! looked up through the public events API.
//!
//! ## Architecture
//!
//! 1. **Scraping**: Parse the yearly rating tables on `/team/{id}` ([`scrapers::team`])
//! 2. **Fetching**: Look up every referenced event concurrently, all-or-nothing ([`api`])
//! 3. **Joining**: Attach start times and sort each year chronologically ([`join`])
//! 4. **Rendering**: Flatten to rows ([`dataset`]) and hand them to renderers ([`outputs`])

pub mod api;
pub mod client;
pub mod dataset;
pub mod error;
pub mod join;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod utils;

pub use error::{Error, Result};

use client::CtfTimeClient;
use models::{FlatRow, JoinedYear};
use tracing::{info, instrument};

/// Scrape, fetch and join a team's history.
///
/// `concurrency` caps simultaneous event lookups; `None` issues them all at
/// once.
#[instrument(level = "info", skip(client))]
pub async fn team_history(
    client: &CtfTimeClient,
    team_id: &str,
    concurrency: Option<usize>,
) -> Result<Vec<JoinedYear>> {
    let history = scrapers::team::fetch_team_history(client, team_id).await?;
    let ids = join::event_ids(&history)?;
    let events = api::fetch_events(client, ids, concurrency).await?;
    let joined = join::join_events(history, &events)?;

    info!(years = joined.len(), events = events.len(), "Team history assembled");
    Ok(joined)
}

/// [`team_history`] flattened into plot rows.
pub async fn team_dataset(
    client: &CtfTimeClient,
    team_id: &str,
    concurrency: Option<usize>,
) -> Result<Vec<FlatRow>> {
    let joined = team_history(client, team_id, concurrency).await?;
    Ok(dataset::flatten(&joined))
}
