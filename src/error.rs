//! Error type shared by every stage of the pipeline.
//!
//! Nothing in this crate retries or degrades gracefully: a failure at any
//! stage propagates to the caller as one of these variants.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Connection failure, timeout, or non-2xx status.
    #[error("HTTP error: {0}")]
    Http(Box<reqwest::Error>),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected team page structure: {0}")]
    PageStructure(String),

    #[error("Malformed row {row} in year {year}: {reason}")]
    MalformedRow {
        year: String,
        row: usize,
        reason: String,
    },

    #[error("Invalid JSON from {url}: {source} (body: {body_preview})")]
    Json {
        url: String,
        body_preview: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot derive an event identifier from link {0:?}")]
    InvalidEventUrl(String),

    #[error("Event {requested} answered with metadata for event {returned}")]
    EventIdMismatch { requested: String, returned: String },

    #[error("No metadata fetched for event {0}")]
    MissingEvent(String),

    #[error("Nothing to render: dataset is empty")]
    EmptyDataset,

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::Http(Box::new(error))
    }
}
