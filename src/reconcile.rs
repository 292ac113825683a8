//! # Region Reconciler
//! Left-outer join of the canonical region table with the aggregate.
//! The canonical table is authoritative for which regions exist: every
//! canonical region appears exactly once in the output, zero-filled when
//! no listing reached it, and aggregate regions unknown to the canonical
//! table are dropped (counted, never raised).

use std::collections::{HashMap, HashSet};

use strsim::normalized_levenshtein;
use tracing::warn;

use crate::aggregate::RegionAggregate;

/// Fill value for canonical regions with no listings.
pub const MISSING_REGION_FILL: f64 = 0.0;

/// Similarity at which a dropped aggregate region is reported as a
/// probable naming mismatch (accents, abbreviations) with its canonical
/// counterpart. Diagnostics only; the join itself stays byte-exact.
const NEAR_MISS_SIMILARITY: f64 = 0.85;

/// Reconciler output, tagged so callers can tell a complete table from
/// a degraded pass-through.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// One row per deduplicated canonical region, in canonical order.
    Reconciled {
        rows: Vec<RegionAggregate>,
        /// Aggregate regions dropped for not appearing in the canonical
        /// table.
        unknown_regions: usize,
    },
    /// The canonical source was unavailable; rows are the aggregate
    /// as-is, with no completeness guarantee.
    Degraded { rows: Vec<RegionAggregate> },
}

impl Reconciliation {
    pub fn rows(&self) -> &[RegionAggregate] {
        match self {
            Reconciliation::Reconciled { rows, .. } => rows,
            Reconciliation::Degraded { rows } => rows,
        }
    }

    pub fn into_rows(self) -> Vec<RegionAggregate> {
        match self {
            Reconciliation::Reconciled { rows, .. } => rows,
            Reconciliation::Degraded { rows } => rows,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Reconciliation::Degraded { .. })
    }

    pub fn unknown_regions(&self) -> usize {
        match self {
            Reconciliation::Reconciled { unknown_regions, .. } => *unknown_regions,
            Reconciliation::Degraded { .. } => 0,
        }
    }
}

/// Join `aggregate` onto `canonical`.
///
/// The canonical list is deduplicated first (first occurrence wins,
/// insertion order kept), so `rows.len()` equals the deduplicated
/// canonical cardinality exactly, regardless of data sparsity.
pub fn reconcile(canonical: &[String], aggregate: Vec<RegionAggregate>) -> Reconciliation {
    let mut by_region: HashMap<String, f64> = aggregate
        .into_iter()
        .map(|row| (row.region, row.avg_price))
        .collect();

    let mut seen: HashSet<&str> = HashSet::with_capacity(canonical.len());
    let mut rows = Vec::with_capacity(canonical.len());

    for name in canonical {
        if !seen.insert(name.as_str()) {
            continue;
        }
        let avg_price = by_region
            .remove(name.as_str())
            .unwrap_or(MISSING_REGION_FILL);
        rows.push(RegionAggregate {
            region: name.clone(),
            avg_price,
        });
    }

    // Whatever is left never matched a canonical region.
    let unknown_regions = by_region.len();
    for region in by_region.keys() {
        match closest_canonical(region, canonical) {
            Some((candidate, score)) if score >= NEAR_MISS_SIMILARITY => {
                warn!(
                    region = %region,
                    candidate = %candidate,
                    score,
                    "aggregate region missing from canonical table; probable naming mismatch"
                );
            }
            _ => {
                warn!(region = %region, "aggregate region missing from canonical table; dropped");
            }
        }
    }

    Reconciliation::Reconciled {
        rows,
        unknown_regions,
    }
}

/// Fallback when the canonical source is unavailable: pass the aggregate
/// through unreconciled so callers still get data.
pub fn degraded(aggregate: Vec<RegionAggregate>) -> Reconciliation {
    Reconciliation::Degraded { rows: aggregate }
}

fn closest_canonical<'a>(region: &str, canonical: &'a [String]) -> Option<(&'a str, f64)> {
    canonical
        .iter()
        .map(|c| (c.as_str(), normalized_levenshtein(region, c)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
}
