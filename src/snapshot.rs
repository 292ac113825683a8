//! # Snapshot Selector
//! Restricts a normalized record set to the single most recent scrape
//! timestamp present. Records without a parseable date never enter the
//! maximum computation, so they can never be selected.
//!
//! Selection compares exact timestamp equality. Callers that want all
//! scrapes of the same logical day treated as one snapshot must
//! pre-truncate `date_scraped` granularity before calling in here.

use chrono::NaiveDateTime;

use crate::normalize::NormalizedListing;

/// Returns the records sharing the maximum defined `date_scraped`, plus
/// that date. Empty input, or input where every date is absent, yields
/// `(vec![], None)`: "no data", not an error.
pub fn latest_snapshot(records: &[NormalizedListing]) -> (Vec<NormalizedListing>, Option<NaiveDateTime>) {
    let latest = records.iter().filter_map(|r| r.date_scraped).max();
    let Some(latest) = latest else {
        return (Vec::new(), None);
    };

    let snapshot = records
        .iter()
        .filter(|r| r.date_scraped == Some(latest))
        .cloned()
        .collect();

    (snapshot, Some(latest))
}
