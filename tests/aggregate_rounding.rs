// tests/aggregate_rounding.rs
use listing_price_atlas::aggregate::{mean_price_by_region, round2, HierarchyLevel};
use listing_price_atlas::normalize::NormalizedListing;

fn listing(state: &str, price: f64) -> NormalizedListing {
    NormalizedListing {
        title: String::new(),
        price,
        rooms: None,
        state: state.to_string(),
        city: String::new(),
        neighborhood: String::new(),
        date_scraped: None,
    }
}

// Cent ties pinned on values exact in binary (x.125, x.375), so the
// half-away-from-zero convention is observable without representation
// noise.
#[test]
fn cent_ties_round_away_from_zero() {
    let snap = vec![listing("Faro", 100.125), listing("Faro", 100.125)];
    let (rows, _) = mean_price_by_region(&snap, HierarchyLevel::State);
    assert_eq!(rows[0].avg_price, 100.13);

    assert_eq!(round2(0.375), 0.38);
    assert_eq!(round2(250_000.625), 250_000.63);
}

#[test]
fn means_are_arithmetic_over_group_members_only() {
    let snap = vec![
        listing("Lisboa", 100_000.0),
        listing("Lisboa", 200_000.0),
        listing("Lisboa", 250_000.0),
        listing("Porto", 300_000.0),
    ];
    let (rows, unattributed) = mean_price_by_region(&snap, HierarchyLevel::State);
    assert_eq!(unattributed, 0);
    let lisboa = rows.iter().find(|r| r.region == "Lisboa").unwrap();
    assert_eq!(lisboa.avg_price, round2((100_000.0 + 200_000.0 + 250_000.0) / 3.0));
    let porto = rows.iter().find(|r| r.region == "Porto").unwrap();
    assert_eq!(porto.avg_price, 300_000.0);
}

#[test]
fn averages_are_never_negative() {
    // The normalizer rejects negative prices, so any snapshot that
    // reaches the aggregator is non-negative and so are the means.
    let snap = vec![
        listing("Lisboa", 0.0),
        listing("Lisboa", 50.0),
        listing("Porto", 0.0),
    ];
    let (rows, _) = mean_price_by_region(&snap, HierarchyLevel::State);
    assert!(rows.iter().all(|r| r.avg_price >= 0.0));
}

#[test]
fn empty_snapshot_aggregates_to_nothing() {
    let (rows, unattributed) = mean_price_by_region(&[], HierarchyLevel::City);
    assert!(rows.is_empty());
    assert_eq!(unattributed, 0);
}
