//! # Pricing Pipeline
//! Orchestrates fetch → normalize → snapshot → aggregate → reconcile.
//! Always yields a well-formed table: source failures degrade the
//! output, they never abort the run. Whenever the canonical region
//! source succeeds the table is complete and zero-filled even if every
//! listing provider failed.
//!
//! Runs share no mutable state; two concurrent runs at different levels
//! are independent.

use chrono::NaiveDateTime;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::aggregate::{self, HierarchyLevel, RegionAggregate};
use crate::config::NormalizeRules;
use crate::ingest::{self, types::ListingProvider};
use crate::normalize;
use crate::reconcile;
use crate::regions::CanonicalRegionSource;
use crate::snapshot;

/// One-time metrics registration (so series show up on the recorder).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("listings_fetched_total", "Raw records parsed from listing feeds.");
        describe_counter!(
            "listing_source_errors_total",
            "Listing provider fetch/parse errors."
        );
        describe_counter!(
            "normalize_excluded_total",
            "Records excluded on the price-on-request sentinel."
        );
        describe_counter!(
            "normalize_malformed_total",
            "Records dropped for unparseable or negative prices."
        );
        describe_counter!(
            "normalize_undated_total",
            "Records whose scrape date failed to parse."
        );
        describe_counter!(
            "aggregate_unattributed_total",
            "Snapshot records without a grouping key at the requested level."
        );
        describe_counter!(
            "reconcile_unknown_region_total",
            "Aggregate regions absent from the canonical table."
        );
        describe_histogram!("listing_feed_parse_ms", "Listing feed parse time in milliseconds.");
        describe_histogram!("normalize_batch_ms", "Batch normalization time in milliseconds.");
        describe_gauge!("pipeline_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

/// Per-run diagnostic counters, also mirrored to the metrics recorder.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Raw records received across all providers.
    pub fetched: usize,
    /// One message per failed listing provider.
    pub source_errors: Vec<String>,
    pub excluded_on_request: usize,
    pub malformed_price: usize,
    pub undated: usize,
    /// Snapshot records with an empty grouping key at the chosen level.
    pub unattributed: usize,
    /// Aggregate regions dropped for not matching the canonical table.
    pub unknown_regions: usize,
    /// Set when the canonical region source failed (degraded output).
    pub region_source_error: Option<String>,
}

/// The final per-region table plus the labels the presentation layer
/// needs: the level actually used and the snapshot's representative
/// date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    pub level: HierarchyLevel,
    /// `None` when no record carried a parseable date.
    pub snapshot_date: Option<NaiveDateTime>,
    /// Ordered rows; canonical insertion order when reconciled.
    pub rows: Vec<RegionAggregate>,
    /// True when the canonical source failed and `rows` are the
    /// unreconciled aggregate.
    pub degraded: bool,
    pub diagnostics: Diagnostics,
}

/// Run the pipeline once at `level`. Never fails: every failure mode is
/// folded into the table's `degraded` flag and diagnostics.
pub async fn run(
    providers: &[Box<dyn ListingProvider>],
    regions: &dyn CanonicalRegionSource,
    level: HierarchyLevel,
    rules: &NormalizeRules,
) -> PriceTable {
    ensure_metrics_described();

    // 1) Fetch, tolerating per-provider failures
    let (raw, source_errors) = ingest::fetch_all(providers).await;

    // 2) Normalize fields and decompose locations
    let t0 = std::time::Instant::now();
    let (records, stats) = normalize::normalize_batch(&raw, rules);
    histogram!("normalize_batch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    counter!("normalize_excluded_total").increment(stats.excluded_on_request as u64);
    counter!("normalize_malformed_total").increment(stats.malformed_price as u64);
    counter!("normalize_undated_total").increment(stats.undated as u64);

    // 3) Most recent scrape only
    let (snap, snapshot_date) = snapshot::latest_snapshot(&records);

    // 4) Mean price per region at the requested level
    let (aggregate_rows, unattributed) = aggregate::mean_price_by_region(&snap, level);
    counter!("aggregate_unattributed_total").increment(unattributed as u64);

    // 5) Reconcile against the canonical region table
    let (reconciliation, region_source_error) = match regions.region_names(level).await {
        Ok(canonical) => (reconcile::reconcile(&canonical, aggregate_rows), None),
        Err(e) => {
            tracing::warn!(
                error = ?e,
                source = regions.name(),
                level = %level,
                "canonical region source failed; degraded output"
            );
            (
                reconcile::degraded(aggregate_rows),
                Some(format!("{}: {e:#}", regions.name())),
            )
        }
    };
    let unknown_regions = reconciliation.unknown_regions();
    counter!("reconcile_unknown_region_total").increment(unknown_regions as u64);

    let now = chrono::Utc::now().timestamp().max(0) as u64;
    gauge!("pipeline_last_run_ts").set(now as f64);

    let degraded = reconciliation.is_degraded();
    let table = PriceTable {
        level,
        snapshot_date,
        rows: reconciliation.into_rows(),
        degraded,
        diagnostics: Diagnostics {
            fetched: raw.len(),
            source_errors,
            excluded_on_request: stats.excluded_on_request,
            malformed_price: stats.malformed_price,
            undated: stats.undated,
            unattributed,
            unknown_regions,
            region_source_error,
        },
    };

    tracing::info!(
        level = %table.level,
        rows = table.rows.len(),
        degraded = table.degraded,
        fetched = table.diagnostics.fetched,
        "pipeline run complete"
    );

    table
}
