//! # Hierarchical Aggregator
//! Groups a snapshot by one administrative level and computes the mean
//! price per region. The level is always an explicit parameter; there is
//! no ambient "current level" state anywhere in the crate.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedListing;

/// Administrative granularity at which prices are aggregated. For the
/// GADM Portugal dataset the three levels are districts, municipalities
/// and parishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyLevel {
    State,
    City,
    Neighborhood,
}

impl HierarchyLevel {
    pub const ALL: [HierarchyLevel; 3] = [
        HierarchyLevel::State,
        HierarchyLevel::City,
        HierarchyLevel::Neighborhood,
    ];

    /// The grouping-key field of a normalized record at this level.
    pub fn grouping_key<'a>(&self, record: &'a NormalizedListing) -> &'a str {
        match self {
            HierarchyLevel::State => &record.state,
            HierarchyLevel::City => &record.city,
            HierarchyLevel::Neighborhood => &record.neighborhood,
        }
    }

    /// GeoJSON feature property holding region names at this level.
    pub fn feature_property(&self) -> &'static str {
        match self {
            HierarchyLevel::State => "NAME_1",
            HierarchyLevel::City => "NAME_2",
            HierarchyLevel::Neighborhood => "NAME_3",
        }
    }

    /// Numeric depth used in conventional geography filenames (1..=3).
    pub fn depth(&self) -> u8 {
        match self {
            HierarchyLevel::State => 1,
            HierarchyLevel::City => 2,
            HierarchyLevel::Neighborhood => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HierarchyLevel::State => "state",
            HierarchyLevel::City => "city",
            HierarchyLevel::Neighborhood => "neighborhood",
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HierarchyLevel {
    type Err = anyhow::Error;

    /// Accepts the level names and the upstream `1`/`2`/`3` query values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "state" | "district" => Ok(HierarchyLevel::State),
            "2" | "city" | "municipality" => Ok(HierarchyLevel::City),
            "3" | "neighborhood" | "parish" => Ok(HierarchyLevel::Neighborhood),
            other => Err(anyhow!("unknown hierarchy level {other:?}")),
        }
    }
}

/// One row of the aggregate: a region and its mean listing price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAggregate {
    pub region: String,
    pub avg_price: f64,
}

/// Mean price per region at `level`, rounded via [`round2`].
///
/// Records whose grouping key is empty cannot be attributed to a region
/// and are skipped; their count is returned alongside the rows. Rows
/// come out sorted by region name, but ordering carries no meaning.
pub fn mean_price_by_region(
    snapshot: &[NormalizedListing],
    level: HierarchyLevel,
) -> (Vec<RegionAggregate>, usize) {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    let mut unattributed = 0usize;

    for record in snapshot {
        let key = level.grouping_key(record);
        if key.is_empty() {
            unattributed += 1;
            continue;
        }
        let slot = groups.entry(key).or_insert((0.0, 0));
        slot.0 += record.price;
        slot.1 += 1;
    }

    let rows = groups
        .into_iter()
        .map(|(region, (sum, count))| RegionAggregate {
            region: region.to_string(),
            avg_price: round2(sum / count as f64),
        })
        .collect();

    (rows, unattributed)
}

/// Round to two decimals, half away from zero on the cent value.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
