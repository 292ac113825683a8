// src/regions.rs
use anyhow::Result;

use crate::aggregate::HierarchyLevel;

/// Authoritative per-level region name lists, independent of whether any
/// listing references them. Each level is retrievable on its own.
#[async_trait::async_trait]
pub trait CanonicalRegionSource {
    async fn region_names(&self, level: HierarchyLevel) -> Result<Vec<String>>;
    fn name(&self) -> &'static str;
}

/// In-memory canonical source for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct StaticRegions {
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub neighborhoods: Vec<String>,
}

impl StaticRegions {
    pub fn new<S: Into<String>>(
        states: Vec<S>,
        cities: Vec<S>,
        neighborhoods: Vec<S>,
    ) -> Self {
        Self {
            states: states.into_iter().map(Into::into).collect(),
            cities: cities.into_iter().map(Into::into).collect(),
            neighborhoods: neighborhoods.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait::async_trait]
impl CanonicalRegionSource for StaticRegions {
    async fn region_names(&self, level: HierarchyLevel) -> Result<Vec<String>> {
        let names = match level {
            HierarchyLevel::State => &self.states,
            HierarchyLevel::City => &self.cities,
            HierarchyLevel::Neighborhood => &self.neighborhoods,
        };
        Ok(names.clone())
    }

    fn name(&self) -> &'static str {
        "static"
    }
}
