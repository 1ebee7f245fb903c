//! # ctftime_team_graphs
//!
//! Scrapes a team's CTFtime profile, looks up every event it played, and
//! charts its placements over time.
//!
//! ## Usage
//!
//! ```sh
//! ctftime_team_graphs --team-id 27763 --chart team.svg
//! ```
//!
//! Exits non-zero on any network, parse, or consistency failure; nothing is
//! retried.

use clap::Parser;
use ctftime_team_graphs::client::CtfTimeClient;
use ctftime_team_graphs::outputs::Render;
use ctftime_team_graphs::outputs::chart::SvgChart;
use ctftime_team_graphs::outputs::json::JsonDataset;
use ctftime_team_graphs::utils::ensure_writable_parent;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let chart_path = args.chart_path();

    // Fail on unwritable outputs before making any requests.
    ensure_writable_parent(&chart_path).await?;
    if let Some(ref json_path) = args.json {
        ensure_writable_parent(json_path).await?;
    }

    let client = CtfTimeClient::new(&args.client_config())?;
    info!(team_id = %args.team_id, "Building team history");

    let rows = match ctftime_team_graphs::team_dataset(&client, &args.team_id, args.concurrency).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(team_id = %args.team_id, error = %e, "Failed to build team history");
            return Err(e.into());
        }
    };
    info!(rows = rows.len(), "Dataset ready");

    if let Some(json_path) = args.json {
        JsonDataset::new(json_path).render(&rows).await?;
    }

    let title = format!("CTFtime team {} placements", args.team_id);
    SvgChart::new(&chart_path, title).render(&rows).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        chart = %chart_path.display(),
        "Execution complete"
    );
    Ok(())
}
