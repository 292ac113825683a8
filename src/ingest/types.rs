// src/ingest/types.rs
use anyhow::Result;

/// One listing snapshot exactly as scraped, fields still text. The
/// upstream feed also carries a `page` column; it is dropped on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RawListing {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub rooms: String,
    #[serde(default)]
    pub date_scraped: String,
}

#[async_trait::async_trait]
pub trait ListingProvider {
    async fn fetch_listings(&self) -> Result<Vec<RawListing>>;
    fn name(&self) -> &'static str;
}
