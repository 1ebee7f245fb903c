//! Scrapers for ctftime.org HTML pages.
//!
//! CTFtime does not expose an API listing the events a team took part in, so
//! the team profile page is scraped instead. Each scraper module exports:
//! - an async `fetch_*` function that downloads a page through the shared
//!   [`CtfTimeClient`](crate::client::CtfTimeClient) and parses it
//! - a pure `parse_*` function over the HTML text, used directly by tests
//!
//! # Supported Pages
//!
//! | Page | Module | Output |
//! |------|--------|--------|
//! | `/team/{id}` | [`team`] | Placements grouped by year tab |

pub mod team;
