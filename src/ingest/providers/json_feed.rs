use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use std::path::Path;

use crate::ingest::types::{ListingProvider, RawListing};

/// Listing source over a JSON array of raw records, the shape the
/// scrape exporter writes. Fixture and file modes are always available;
/// the HTTP mode sits behind the `source-http` feature.
pub struct JsonFeedProvider {
    mode: Mode,
}

enum Mode {
    // Owns a copy of the payload so tests don't need 'static fixtures.
    Fixture(String),
    #[cfg(feature = "source-http")]
    Http {
        url: String,
        client: reqwest::Client,
    },
}

impl JsonFeedProvider {
    pub fn from_fixture_str(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading listing feed from {}", path.display()))?;
        Ok(Self {
            mode: Mode::Fixture(content),
        })
    }

    #[cfg(feature = "source-http")]
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::Http {
                url: url.into(),
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_records_from_str(s: &str) -> Result<Vec<RawListing>> {
        let t0 = std::time::Instant::now();
        let records: Vec<RawListing> =
            serde_json::from_str(s).context("parsing listing feed json")?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("listing_feed_parse_ms").record(ms);
        counter!("listings_fetched_total").increment(records.len() as u64);
        Ok(records)
    }
}

#[async_trait]
impl ListingProvider for JsonFeedProvider {
    async fn fetch_listings(&self) -> Result<Vec<RawListing>> {
        match &self.mode {
            Mode::Fixture(s) => Self::parse_records_from_str(s),

            #[cfg(feature = "source-http")]
            Mode::Http { url, client } => {
                let body = match client.get(url).send().await {
                    Ok(resp) => resp.text().await.context("listing feed .text()")?,
                    Err(e) => {
                        tracing::warn!(error = ?e, provider = "json-feed", "provider http error");
                        counter!("listing_source_errors_total").increment(1);
                        return Err(e).context("listing feed get()");
                    }
                };
                Self::parse_records_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "json-feed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_records_and_ignores_the_page_column() {
        let feed = r#"[
            {"title": "T3 Alvalade", "price": "269,000 €", "location": "Alvalade, Lisboa, Lisboa", "rooms": "T3", "date_scraped": "2024-02-01", "page": 4},
            {"title": "T2 Porto", "price": "180,000€", "location": "Porto, Porto", "rooms": "T2", "date_scraped": "2024-02-01"}
        ]"#;
        let provider = JsonFeedProvider::from_fixture_str(feed);
        let records = provider.fetch_listings().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "T3 Alvalade");
        assert_eq!(records[0].location.as_deref(), Some("Alvalade, Lisboa, Lisboa"));
    }

    #[tokio::test]
    async fn missing_fields_default_to_empty() {
        let provider = JsonFeedProvider::from_fixture_str(r#"[{"title": "bare"}]"#);
        let records = provider.fetch_listings().await.unwrap();
        assert_eq!(records[0].price, "");
        assert_eq!(records[0].location, None);
    }

    #[tokio::test]
    async fn malformed_feed_is_an_error() {
        let provider = JsonFeedProvider::from_fixture_str("{\"not\": \"an array\"}");
        assert!(provider.fetch_listings().await.is_err());
    }
}
