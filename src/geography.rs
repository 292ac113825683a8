//! # Reference Geography
//! Reads a GeoJSON feature collection (GADM-style) and extracts the
//! per-level region names from the `NAME_1`/`NAME_2`/`NAME_3`
//! properties. These names are the shared vocabulary between the
//! reconciled table and the map layer, so the file doubles as a
//! canonical region source.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::aggregate::HierarchyLevel;
use crate::regions::CanonicalRegionSource;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

// Geometry is irrelevant here and deliberately not deserialized.
#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
}

/// A parsed reference-geography file.
#[derive(Debug)]
pub struct GeographyFile {
    collection: FeatureCollection,
}

impl GeographyFile {
    pub fn parse(s: &str) -> Result<Self> {
        let collection = serde_json::from_str(s).context("parsing geojson feature collection")?;
        Ok(Self { collection })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading geojson from {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Distinct region names at `level`, in feature order. Features
    /// without the level's property contribute nothing.
    pub fn level_names(&self, level: HierarchyLevel) -> Vec<String> {
        let property = level.feature_property();
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for feature in &self.collection.features {
            if let Some(name) = feature.properties.get(property).and_then(Value::as_str) {
                if seen.insert(name.to_string()) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    pub fn feature_count(&self) -> usize {
        self.collection.features.len()
    }
}

#[async_trait::async_trait]
impl CanonicalRegionSource for GeographyFile {
    async fn region_names(&self, level: HierarchyLevel) -> Result<Vec<String>> {
        Ok(self.level_names(level))
    }

    fn name(&self) -> &'static str {
        "geojson"
    }
}

/// Conventional GADM filename, e.g. `gadm41_PRT_1.json`.
pub fn conventional_filename(country: &str, level: HierarchyLevel) -> String {
    format!("gadm41_{}_{}.json", country, level.depth())
}

/// Conventional GADM path under `dir`.
pub fn conventional_path(dir: &Path, country: &str, level: HierarchyLevel) -> PathBuf {
    dir.join(conventional_filename(country, level))
}
