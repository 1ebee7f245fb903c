//! CTFtime team profile scraper.
//!
//! A team page (`https://ctftime.org/team/{id}`) shows one tab per year under
//! `div.tab-content`. Each tab is a `div.tab-pane` with `id="rating_{year}"`
//! holding a single table:
//!
//! ```text
//! | (icon) | Place | Event                       | CTF points | Rating points |
//! |        | 2     | <a href="/event/123">X</a>  | 1234.5     | 45.0          |
//! ```
//!
//! The first row is the header. Any data row that does not have exactly five
//! cells fails the whole page; no partial-row recovery is attempted.

use crate::client::CtfTimeClient;
use crate::error::{Error, Result};
use crate::models::{PlacementRecord, YearGroup};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

const COLUMNS: usize = 5;
const YEAR_ID_PREFIX: &str = "rating_";

static TAB_CONTENT: Lazy<Selector> = Lazy::new(|| selector("div.tab-content"));
static TAB_PANE: Lazy<Selector> = Lazy::new(|| selector("div.tab-pane"));
static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static ROW: Lazy<Selector> = Lazy::new(|| selector("tr"));
static CELL: Lazy<Selector> = Lazy::new(|| selector("td"));
static LINK: Lazy<Selector> = Lazy::new(|| selector("a"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// Download a team's profile page and parse its yearly rating tables.
///
/// # Errors
///
/// Transport and non-2xx errors from the request, or any parse error from
/// [`parse_team_page`].
#[instrument(level = "info", skip(client))]
pub async fn fetch_team_history(client: &CtfTimeClient, team_id: &str) -> Result<Vec<YearGroup>> {
    let url = client.team_url(team_id)?;
    let html = client.get_text(url.clone()).await?;
    let years = parse_team_page(&html)?;

    info!(
        %url,
        years = years.len(),
        placements = years.iter().map(|y| y.placements.len()).sum::<usize>(),
        "Scraped team history"
    );
    Ok(years)
}

/// Parse every year tab of a team page, in page order.
///
/// Only the first `div.tab-content` holds the rating tabs; later tab blocks
/// on the page are ignored.
pub fn parse_team_page(html: &str) -> Result<Vec<YearGroup>> {
    let document = Html::parse_document(html);

    let tabs = document
        .select(&TAB_CONTENT)
        .next()
        .ok_or_else(|| Error::PageStructure("no div.tab-content on team page".to_string()))?;

    tabs.select(&TAB_PANE)
        .map(|pane| {
            let id = pane
                .value()
                .attr("id")
                .ok_or_else(|| Error::PageStructure("tab-pane without id".to_string()))?;
            let year = id.strip_prefix(YEAR_ID_PREFIX).unwrap_or(id).to_string();
            let placements = parse_pane(&year, pane)?;
            debug!(%year, count = placements.len(), "Parsed year tab");
            Ok(YearGroup { year, placements })
        })
        .collect()
}

fn parse_pane(year: &str, pane: ElementRef<'_>) -> Result<Vec<PlacementRecord>> {
    let table = pane
        .select(&TABLE)
        .next()
        .ok_or_else(|| Error::PageStructure(format!("tab {year} has no table")))?;

    table
        .select(&ROW)
        .enumerate()
        .skip(1)
        .map(|(row, tr)| parse_row(tr).map_err(|reason| Error::MalformedRow {
            year: year.to_string(),
            row,
            reason,
        }))
        .collect()
}

fn parse_row(tr: ElementRef<'_>) -> std::result::Result<PlacementRecord, String> {
    let cells: Vec<ElementRef<'_>> = tr.select(&CELL).collect();
    let [_, place, event, _, rating_points] = cells.as_slice() else {
        return Err(format!("expected {COLUMNS} cells, found {}", cells.len()));
    };

    let place_text = text_of(*place);
    let place = match place_text.parse::<u32>() {
        Ok(p) if p >= 1 => p,
        _ => return Err(format!("place {place_text:?} is not a positive integer")),
    };

    let link = event
        .select(&LINK)
        .next()
        .ok_or_else(|| "event cell has no link".to_string())?;
    let url = link
        .value()
        .attr("href")
        .ok_or_else(|| "event link has no href".to_string())?
        .to_string();
    let name = text_of(link);

    let rating_text = text_of(*rating_points);
    let rating_points = rating_text.parse::<f64>().unwrap_or_else(|_| {
        debug!(%name, rating = %rating_text, "Non-numeric rating points; using 0.0");
        0.0
    });

    Ok(PlacementRecord {
        place,
        url,
        name,
        rating_points,
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "<tr><th></th><th>Place</th><th>Event</th><th>CTF points</th><th>Rating points</th></tr>";

    fn page(panes: &[(&str, &str)]) -> String {
        let body: String = panes
            .iter()
            .map(|(id, rows)| {
                format!(
                    r#"<div class="tab-pane" id="{id}"><p>Overall rating place</p><table class="table">{HEADER}{rows}</table></div>"#
                )
            })
            .collect();
        format!(r#"<html><body><div class="tab-content">{body}</div></body></html>"#)
    }

    fn row(place: &str, href: &str, name: &str, rating: &str) -> String {
        format!(
            r#"<tr><td class="place_ico"></td><td class="place">{place}</td><td><a href="{href}">{name}</a></td><td>1234.5</td><td>{rating}</td></tr>"#
        )
    }

    #[test]
    fn test_parse_single_row() {
        let html = page(&[("rating_2023", row("2", "/event/123", "TeamX", "45.0").as_str())]);

        let years = parse_team_page(&html).unwrap();
        assert_eq!(years.len(), 1);
        assert_eq!(years[0].year, "2023");
        assert_eq!(
            years[0].placements,
            vec![PlacementRecord {
                place: 2,
                url: "/event/123".to_string(),
                name: "TeamX".to_string(),
                rating_points: 45.0,
            }]
        );
    }

    #[test]
    fn test_year_labels_match_tabs() {
        let html = page(&[
            ("rating_2024", row("10", "/event/3", "C", "1.5").as_str()),
            ("rating_2023", row("4", "/event/2", "B", "12.25").as_str()),
            ("rating_archive", row("99", "/event/1", "A", "0.1").as_str()),
        ]);

        let years: Vec<String> = parse_team_page(&html)
            .unwrap()
            .into_iter()
            .map(|y| y.year)
            .collect();
        assert_eq!(years, vec!["2024", "2023", "archive"]);
    }

    #[test]
    fn test_rows_keep_table_order() {
        let rows = [
            row("30", "/event/9", "Late", "2.0"),
            row("5", "/event/4", "Early", "20.0"),
        ]
        .concat();
        let html = page(&[("rating_2022", rows.as_str())]);

        let years = parse_team_page(&html).unwrap();
        let names: Vec<&str> = years[0].placements.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Late", "Early"]);
    }

    #[test]
    fn test_non_numeric_rating_defaults_to_zero() {
        let html = page(&[("rating_2023", row("17", "/event/55", "Dash CTF", "-").as_str())]);

        let years = parse_team_page(&html).unwrap();
        assert_eq!(years[0].placements[0].rating_points, 0.0);
        assert_eq!(years[0].placements[0].place, 17);
    }

    #[test]
    fn test_wrong_column_count_fails_table() {
        let rows = [
            row("1", "/event/1", "Fine", "3.0"),
            r#"<tr><td>1</td><td>2</td><td><a href="/event/2">Short</a></td></tr>"#.to_string(),
        ]
        .concat();
        let html = page(&[("rating_2023", rows.as_str())]);

        match parse_team_page(&html) {
            Err(Error::MalformedRow { year, row, reason }) => {
                assert_eq!(year, "2023");
                assert_eq!(row, 2);
                assert!(reason.contains("found 3"));
            }
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn test_non_integer_place_fails() {
        let html = page(&[("rating_2023", row("n/a", "/event/1", "X", "3.0").as_str())]);
        assert!(matches!(
            parse_team_page(&html),
            Err(Error::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_missing_link_fails() {
        let rows = "<tr><td></td><td>3</td><td>Unlinked</td><td>1</td><td>2.0</td></tr>";
        let html = page(&[("rating_2023", rows)]);
        assert!(matches!(
            parse_team_page(&html),
            Err(Error::MalformedRow { .. })
        ));
    }

    #[test]
    fn test_link_without_href_fails() {
        let rows = "<tr><td></td><td>3</td><td><a>Dead link</a></td><td>1</td><td>2.0</td></tr>";
        let html = page(&[("rating_2023", rows)]);
        match parse_team_page(&html) {
            Err(Error::MalformedRow { reason, .. }) => assert!(reason.contains("href")),
            other => panic!("expected malformed row, got {other:?}"),
        }
    }

    #[test]
    fn test_only_first_tab_block_is_read() {
        let html = format!(
            r#"{}<div class="tab-content"><div class="tab-pane" id="members"><p>Members</p></div></div>"#,
            page(&[("rating_2023", row("2", "/event/123", "TeamX", "45.0").as_str())])
        );

        let years: Vec<String> = parse_team_page(&html)
            .unwrap()
            .into_iter()
            .map(|y| y.year)
            .collect();
        assert_eq!(years, vec!["2023"]);
    }

    #[test]
    fn test_pane_without_id_fails() {
        let html = format!(
            r#"<div class="tab-content"><div class="tab-pane"><table>{HEADER}{}</table></div></div>"#,
            row("1", "/event/1", "A", "1.0")
        );
        match parse_team_page(&html) {
            Err(Error::PageStructure(msg)) => assert!(msg.contains("without id")),
            other => panic!("expected page structure error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_tab_content_fails() {
        let html = "<html><body><h2>Team not found</h2></body></html>";
        assert!(matches!(
            parse_team_page(html),
            Err(Error::PageStructure(_))
        ));
    }

    #[test]
    fn test_pane_without_table_fails() {
        let html = r#"<div class="tab-content"><div class="tab-pane" id="rating_2021"><p>No results</p></div></div>"#;
        assert!(matches!(
            parse_team_page(html),
            Err(Error::PageStructure(_))
        ));
    }

    #[test]
    fn test_empty_tab_content() {
        let html = r#"<div class="tab-content"></div>"#;
        assert!(parse_team_page(html).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_team_history() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/team/27763")
            .with_status(200)
            .with_body(page(&[("rating_2023", row("2", "/event/123", "TeamX", "45.0").as_str())]))
            .create_async()
            .await;

        let config = crate::client::ClientConfig {
            base_url: server.url(),
            ..Default::default()
        };
        let client = CtfTimeClient::new(&config).unwrap();
        let years = fetch_team_history(&client, "27763").await.unwrap();

        assert_eq!(years[0].placements[0].url, "/event/123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_team_history_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/team/1")
            .with_status(503)
            .create_async()
            .await;

        let config = crate::client::ClientConfig {
            base_url: server.url(),
            ..Default::default()
        };
        let client = CtfTimeClient::new(&config).unwrap();
        assert!(matches!(
            fetch_team_history(&client, "1").await,
            Err(Error::Http(_))
        ));
    }
}
