//! Validated property collection and its persisted form
//!
//! The collection is built once at startup, either from the merged JSON
//! written by an earlier run or by merging the CSV sources, and is
//! read-only afterwards.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use propchat_config::DataConfig;
use propchat_core::Property;
use serde::{Deserialize, Serialize};

use crate::loader::SourceTables;
use crate::merger::{merge, MergeReport};
use crate::validator::{validate, ValidationReport};
use crate::DatasetError;

/// Where the collection came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Previously written merge output
    Cache,
    /// Fresh merge of the CSV sources
    Merge,
    /// Handed in directly
    Memory,
}

/// Count of entries per city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// The validated, immutable property collection
#[derive(Debug, Clone)]
pub struct PropertyStore {
    properties: Vec<Property>,
    source: DataSource,
    merge_report: Option<MergeReport>,
    validation: ValidationReport,
    missing_sources: Vec<String>,
}

impl PropertyStore {
    /// Load from the cache when allowed, otherwise merge the sources
    pub fn load(config: &DataConfig) -> Result<Self, DatasetError> {
        let merged_path = config.merged_path();

        if !config.rebuild && merged_path.exists() {
            match read_merged(&merged_path) {
                Ok(cached) => {
                    let (properties, validation) = validate(cached);
                    tracing::info!(
                        path = %merged_path.display(),
                        properties = properties.len(),
                        "Loaded merged properties"
                    );
                    return Ok(Self {
                        properties,
                        source: DataSource::Cache,
                        merge_report: None,
                        validation,
                        missing_sources: Vec::new(),
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Merged output unreadable, rebuilding from sources");
                }
            }
        }

        let tables = SourceTables::load(config)?;
        let outcome = merge(&tables);
        let (properties, validation) = validate(outcome.properties);

        // An incomplete or empty merge must not become the cache for later startups
        if !tables.missing.is_empty() || properties.is_empty() {
            tracing::warn!(
                missing = tables.missing.len(),
                properties = properties.len(),
                "Merged output not written"
            );
        } else if let Err(e) = write_merged(&merged_path, &properties) {
            tracing::warn!(error = %e, "Failed to write merged output");
        }

        tracing::info!(
            properties = properties.len(),
            dropped = validation.dropped(),
            "Built property collection from sources"
        );

        Ok(Self {
            properties,
            source: DataSource::Merge,
            merge_report: Some(outcome.report),
            validation,
            missing_sources: tables
                .missing
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
        })
    }

    /// Wrap an in-memory collection, dropping entries that fail validation
    pub fn from_properties(properties: Vec<Property>) -> Self {
        let (properties, validation) = validate(properties);
        Self {
            properties,
            source: DataSource::Memory,
            merge_report: None,
            validation,
            missing_sources: Vec::new(),
        }
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn merge_report(&self) -> Option<&MergeReport> {
        self.merge_report.as_ref()
    }

    pub fn validation(&self) -> &ValidationReport {
        &self.validation
    }

    pub fn missing_sources(&self) -> &[String] {
        &self.missing_sources
    }

    /// Entries per city, in first-seen order
    pub fn city_counts(&self) -> Vec<CityCount> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<CityCount> = Vec::new();

        for property in &self.properties {
            match index.get(property.city.as_str()) {
                Some(&slot) => counts[slot].count += 1,
                None => {
                    index.insert(&property.city, counts.len());
                    counts.push(CityCount {
                        city: property.city.clone(),
                        count: 1,
                    });
                }
            }
        }

        counts
    }
}

/// Read a merged JSON array
pub fn read_merged(path: &Path) -> Result<Vec<Property>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| DatasetError::Cache {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write the collection as a pretty-printed JSON array
pub fn write_merged(path: &Path, properties: &[Property]) -> Result<(), DatasetError> {
    let io_err = |source| DatasetError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    serde_json::to_writer_pretty(BufWriter::new(file), properties)?;

    tracing::debug!(path = %path.display(), properties = properties.len(), "Merged output written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merger::fixtures;

    const PROJECTS: &str = "id,projectName,slug,projectType,status,reraId\n\
        p1,Kolte Patil Life Republic,life-republic,Residential,Ready to move,\"[\"\"P52100012345\"\"]\"\n\
        p2,Lodha Amara,amara,Residential,Under Construction,\n";
    const ADDRESSES: &str = "projectId,fullAddress,pincode\n\
        p1,\"Near Hinjewadi Phase 1, Marunji, Pune\",411057\n\
        p2,\"Kolshet Road, Thane West, Mumbai\",400607\n";
    const CONFIGURATIONS: &str = "id,projectId,type\nc1,p1,2 BHK\nc2,p2,3 BHK\n";
    const VARIANTS: &str = "id,configurationId,price,carpetArea,aboutProperty,propertyImages,floorPlanImage\n\
        v1,c1,80,750,Gym and garden,,\n\
        v2,c2,24000000,1400,Clubhouse,\"[\"\"https://img.example/v2.jpg\"\"]\",https://img.example/v2-plan.png\n\
        v3,c2,24000000,90,,,\n";

    fn write_sources(dir: &Path) {
        fs::write(dir.join("project.csv"), PROJECTS).unwrap();
        fs::write(dir.join("ProjectAddress.csv"), ADDRESSES).unwrap();
        fs::write(dir.join("ProjectConfiguration.csv"), CONFIGURATIONS).unwrap();
        fs::write(dir.join("ProjectConfigurationVariant.csv"), VARIANTS).unwrap();
    }

    #[test]
    fn test_load_merges_and_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path());
        let config = DataConfig::in_dir(dir.path());

        let store = PropertyStore::load(&config).unwrap();
        assert_eq!(store.source(), DataSource::Merge);
        // v3 has an implausible carpet area
        assert_eq!(store.len(), 2);
        assert!(config.merged_path().exists());

        let report = store.merge_report().unwrap();
        assert_eq!(report.drafts, 3);
        assert_eq!(report.incomplete, 1);

        let v2 = &store.properties()[1];
        assert_eq!(v2.floor_plan_images, vec!["https://img.example/v2-plan.png"]);
        assert!(v2.amenities.contains(&"Swimming Pool".to_string()));
    }

    #[test]
    fn test_second_load_reads_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path());
        let config = DataConfig::in_dir(dir.path());

        let merged = PropertyStore::load(&config).unwrap();
        let cached = PropertyStore::load(&config).unwrap();

        assert_eq!(cached.source(), DataSource::Cache);
        assert_eq!(cached.properties(), merged.properties());
        assert!(cached.merge_report().is_none());
    }

    #[test]
    fn test_rebuild_ignores_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path());
        let mut config = DataConfig::in_dir(dir.path());

        PropertyStore::load(&config).unwrap();
        config.rebuild = true;
        let store = PropertyStore::load(&config).unwrap();
        assert_eq!(store.source(), DataSource::Merge);
    }

    #[test]
    fn test_corrupt_cache_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path());
        let config = DataConfig::in_dir(dir.path());
        fs::write(config.merged_path(), "[{\"id\": ").unwrap();

        let store = PropertyStore::load(&config).unwrap();
        assert_eq!(store.source(), DataSource::Merge);
        assert_eq!(store.len(), 2);
        assert!(read_merged(&config.merged_path()).is_ok());
    }

    #[test]
    fn test_cached_entries_are_revalidated() {
        let dir = tempfile::tempdir().unwrap();
        let config = DataConfig::in_dir(dir.path());

        let mut properties = merge(&fixtures::tables()).properties;
        properties[0].price = 10.0;
        write_merged(&config.merged_path(), &properties).unwrap();

        let store = PropertyStore::load(&config).unwrap();
        assert_eq!(store.source(), DataSource::Cache);
        assert_eq!(store.len(), properties.len() - 1);
        assert_eq!(store.validation().dropped_price, 1);
    }

    #[test]
    fn test_missing_sources_yield_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = PropertyStore::load(&DataConfig::in_dir(dir.path())).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.missing_sources().len(), 4);
    }

    #[test]
    fn test_sources_added_after_empty_load_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        let config = DataConfig::in_dir(dir.path());

        let empty = PropertyStore::load(&config).unwrap();
        assert!(empty.is_empty());
        assert!(!config.merged_path().exists());

        write_sources(dir.path());
        let store = PropertyStore::load(&config).unwrap();
        assert_eq!(store.source(), DataSource::Merge);
        assert_eq!(store.len(), 2);
        assert!(config.merged_path().exists());
    }

    #[test]
    fn test_partial_sources_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path());
        fs::remove_file(dir.path().join("ProjectAddress.csv")).unwrap();
        let config = DataConfig::in_dir(dir.path());

        let store = PropertyStore::load(&config).unwrap();
        assert_eq!(store.missing_sources().len(), 1);
        assert!(!config.merged_path().exists());
    }

    #[test]
    fn test_city_counts() {
        let store = PropertyStore::from_properties(merge(&fixtures::tables()).properties);
        let counts = store.city_counts();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].city, "Pune");
        assert_eq!(counts[0].count, 2);
    }
}
