//! Chat over the bundled sample dataset

use std::path::PathBuf;
use std::sync::Arc;

use propchat_agent::ChatService;
use propchat_config::{ChatConfig, DataConfig};
use propchat_dataset::{DataSource, PropertyStore};

fn load_sample(cache_dir: &tempfile::TempDir) -> PropertyStore {
    let mut config = DataConfig::in_dir(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data"));
    config.merged_path = Some(cache_dir.path().join("properties.json"));
    config.rebuild = true;
    PropertyStore::load(&config).unwrap()
}

#[tokio::test]
async fn test_chat_results_satisfy_filters() {
    let cache_dir = tempfile::tempdir().unwrap();
    let store = load_sample(&cache_dir);
    assert_eq!(store.source(), DataSource::Merge);
    assert!(!store.is_empty());
    assert!(store.missing_sources().is_empty());

    let service = ChatService::offline(Arc::new(store), ChatConfig::default());
    let reply = service.chat("2 BHK in Pune").await.unwrap();

    assert!(reply.total_matches > 0);
    for property in &reply.properties {
        assert_eq!(property.bhk, 2);
        assert!(property.city.eq_ignore_ascii_case("pune"));
    }
}

#[tokio::test]
async fn test_cache_is_reused() {
    let cache_dir = tempfile::tempdir().unwrap();
    let merged = load_sample(&cache_dir);

    let mut config = DataConfig::in_dir(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data"));
    config.merged_path = Some(cache_dir.path().join("properties.json"));
    let cached = PropertyStore::load(&config).unwrap();

    assert_eq!(cached.source(), DataSource::Cache);
    assert_eq!(cached.properties(), merged.properties());
}
