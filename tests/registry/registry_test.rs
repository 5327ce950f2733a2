//! Tests for drug resolution under concurrency and store races

use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures::future::join_all;

use crate::utils::{RacingStore, test_config};
use medifact::registry::{DrugRegistry, PopulationSampler};
use medifact::{InMemoryReportStore, MedifactError, ReportStore};

#[tokio::test]
async fn test_concurrent_resolution_agrees_on_one_drug() {
    let store = Arc::new(InMemoryReportStore::new());
    let registry = DrugRegistry::from_config(store.clone(), &test_config());

    let drugs = join_all((0..16).map(|_| registry.resolve("Drug New"))).await;
    let drugs: Vec<_> = drugs.into_iter().collect::<Result<_, _>>().unwrap();

    assert!(drugs.windows(2).all(|pair| pair[0] == pair[1]));
    let names = vec!["Drug New".to_string()];
    assert_eq!(store.find_drugs(&names).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_conflict_is_retried_and_winner_returned() {
    let store = Arc::new(RacingStore::new(1, 0.0123));
    let registry = DrugRegistry::new(
        store.clone(),
        PopulationSampler::new(0.001..=0.05, Some(1)),
        3,
    );

    let drug = registry.resolve("Drug R").await.unwrap();

    assert_eq!(drug.population(), 0.0123);
    assert_eq!(store.upserts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_persistent_conflict_is_surfaced() {
    let store = Arc::new(RacingStore::new(1, 0.0123));
    // With a single attempt there is no retry to absorb the conflict.
    let registry = DrugRegistry::new(
        store.clone(),
        PopulationSampler::new(0.001..=0.05, Some(1)),
        1,
    );

    let result = registry.resolve("Drug R").await;
    assert!(matches!(result, Err(MedifactError::DuplicateNameConflict(_))));
}
