// src/ingest/mod.rs
pub mod providers;
pub mod types;

use metrics::counter;

use crate::ingest::types::{ListingProvider, RawListing};

/// Fetch from every provider, tolerating individual failures: a failed
/// source contributes an empty set plus a diagnostic message, never a
/// crash. Returns the combined raw records and the per-source errors.
pub async fn fetch_all(providers: &[Box<dyn ListingProvider>]) -> (Vec<RawListing>, Vec<String>) {
    let mut raw = Vec::new();
    let mut errors = Vec::new();

    for p in providers {
        match p.fetch_listings().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("listing_source_errors_total").increment(1);
                errors.push(format!("{}: {e:#}", p.name()));
            }
        }
    }

    (raw, errors)
}
