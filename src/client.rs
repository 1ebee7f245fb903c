//! Shared HTTP client for ctftime.org.
//!
//! One [`CtfTimeClient`] is built per run and reused by the page scraper and
//! by every concurrent event lookup, so all requests share a connection pool
//! and carry the same identifying `User-Agent`.

use crate::error::{Error, Result};
use crate::utils::truncate_for_log;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://ctftime.org";
pub const DEFAULT_USER_AGENT: &str = "https://github.com/reteps/ctftime-team-graphs";

/// Connection settings for [`CtfTimeClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CtfTimeClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CtfTimeClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        // `Url::join` replaces the last path segment unless the base ends in '/'.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            http: builder.build()?,
            base_url: Url::parse(&base)?,
        })
    }

    pub fn team_url(&self, team_id: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("team/{team_id}"))?)
    }

    pub fn event_api_url(&self, event_id: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("api/v1/events/{event_id}/"))?)
    }

    /// GET a page and return its body, failing on any non-2xx status.
    #[instrument(level = "debug", skip_all, fields(%url))]
    pub async fn get_text(&self, url: Url) -> Result<String> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched body");
        Ok(body)
    }

    /// GET a JSON document. A body that does not decode as `T` is an error
    /// carrying a preview of what the server actually sent.
    #[instrument(level = "debug", skip_all, fields(%url))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let body = self.get_text(url.clone()).await?;
        serde_json::from_str(&body).map_err(|source| Error::Json {
            url: url.to_string(),
            body_preview: truncate_for_log(&body, 200),
            source,
        })
    }
}
