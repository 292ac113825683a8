// tests/snapshot_latest.rs
use listing_price_atlas::ingest::types::RawListing;
use listing_price_atlas::{normalize, snapshot, NormalizeRules};

fn raw(price: &str, date: &str) -> RawListing {
    RawListing {
        title: "t".to_string(),
        price: price.to_string(),
        location: Some("Alvalade, Lisboa, Lisboa".to_string()),
        rooms: "T2".to_string(),
        date_scraped: date.to_string(),
    }
}

#[test]
fn only_the_most_recent_scrape_survives() {
    let rules = NormalizeRules::default();
    let (records, _) = normalize::normalize_batch(
        &[
            raw("100", "2024-01-01"),
            raw("200", "2024-02-01"),
            raw("300", "never"),
            raw("400", "2024-02-01"),
        ],
        &rules,
    );

    let (snap, date) = snapshot::latest_snapshot(&records);
    assert_eq!(date.unwrap().format("%Y-%m-%d").to_string(), "2024-02-01");
    let mut prices: Vec<f64> = snap.iter().map(|r| r.price).collect();
    prices.sort_by(f64::total_cmp);
    assert_eq!(prices, vec![200.0, 400.0]);
}

#[test]
fn undated_records_cannot_win_even_alone() {
    let rules = NormalizeRules::default();
    let (records, stats) = normalize::normalize_batch(&[raw("100", ""), raw("200", "soon")], &rules);
    assert_eq!(stats.undated, 2);

    let (snap, date) = snapshot::latest_snapshot(&records);
    assert!(snap.is_empty());
    assert_eq!(date, None);
}

#[test]
fn timestamps_differing_within_a_day_are_distinct_snapshots() {
    // Same-day grouping is the caller's job (pre-truncate granularity);
    // the selector compares exact timestamps.
    let rules = NormalizeRules::default();
    let (records, _) = normalize::normalize_batch(
        &[
            raw("100", "2024-02-01 08:00:00"),
            raw("200", "2024-02-01 09:30:00"),
        ],
        &rules,
    );
    let (snap, _) = snapshot::latest_snapshot(&records);
    assert_eq!(snap.len(), 1);
    assert_eq!(snap[0].price, 200.0);
}
