//! Command-line interface definitions.
//!
//! Every option can also be supplied through an environment variable.

use clap::Parser;
use ctftime_team_graphs::client::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use std::path::PathBuf;
use std::time::Duration;

/// Chart a CTFtime team's placements over time.
///
/// # Examples
///
/// ```sh
/// # Default team, chart written to ./team_27763.svg
/// ctftime_team_graphs
///
/// # Another team, also dumping the plotted rows
/// ctftime_team_graphs --team-id 1234 --chart out/1234.svg --json out/1234.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// CTFtime team identifier
    #[arg(short, long, env = "CTFTIME_TEAM_ID", default_value = "27763")]
    pub team_id: String,

    /// Path of the SVG chart [default: team_<TEAM_ID>.svg]
    #[arg(short, long)]
    pub chart: Option<PathBuf>,

    /// Also write the plotted rows as JSON to this path
    #[arg(short, long)]
    pub json: Option<PathBuf>,

    /// Base URL of the CTFtime site
    #[arg(long, env = "CTFTIME_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// User-Agent sent with every request
    #[arg(long, env = "CTFTIME_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Maximum simultaneous event lookups (all at once when omitted)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn chart_path(&self) -> PathBuf {
        self.chart
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("team_{}.svg", self.team_id)))
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout_secs.map(Duration::from_secs),
        }
    }
}
