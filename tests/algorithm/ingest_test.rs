//! Tests for report ingestion

use crate::utils::{engine_with_drugs, everyone, test_config};
use medifact::{DemographicCondition, MedifactError, ReportRequest, SignalConfig, SignalEngine};

#[tokio::test]
async fn test_single_name_is_invalid() {
    let engine = SignalEngine::in_memory(test_config()).unwrap();
    let result = engine.ingest(&ReportRequest::new(["X"], 0)).await;
    assert!(matches!(result, Err(MedifactError::InvalidCombination(_))));
}

#[tokio::test]
async fn test_duplicate_names_are_invalid() {
    let engine = SignalEngine::in_memory(test_config()).unwrap();
    let result = engine.ingest(&ReportRequest::new(["X", "X"], 0)).await;
    assert!(matches!(result, Err(MedifactError::InvalidCombination(_))));
    assert_eq!(engine.rows(&everyone()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_four_names_are_invalid() {
    let engine = SignalEngine::in_memory(test_config()).unwrap();
    let request = ReportRequest::new(["W", "X", "Y", "Z"], 0);
    assert!(matches!(
        engine.ingest(&request).await,
        Err(MedifactError::InvalidCombination(_))
    ));
}

#[tokio::test]
async fn test_unknown_gender_is_invalid() {
    let engine = SignalEngine::in_memory(test_config()).unwrap();
    let request = ReportRequest::new(["X", "Y"], 0).with_gender(7);
    assert!(matches!(
        engine.ingest(&request).await,
        Err(MedifactError::InvalidCombination(_))
    ));
}

#[tokio::test]
async fn test_race_optional_deployment() {
    let mut config = test_config();
    config.vocabularies.races.clear();
    let engine = SignalEngine::in_memory(config).unwrap();

    assert!(engine.ingest(&ReportRequest::new(["X", "Y"], 0)).await.is_ok());
    assert!(matches!(
        engine.ingest(&ReportRequest::new(["X", "Y"], 0).with_race(0)).await,
        Err(MedifactError::InvalidCombination(_))
    ));
}

#[tokio::test]
async fn test_order_is_canonicalized() {
    let engine = engine_with_drugs(&[("Drug A", 0.01), ("Drug B", 0.02)], test_config());
    let forward = engine.ingest(&ReportRequest::new(["Drug A", "Drug B"], 0)).await.unwrap();
    let backward = engine.ingest(&ReportRequest::new(["Drug B", "Drug A"], 0)).await.unwrap();

    assert_eq!(forward.drugs, backward.drugs);
    assert_eq!(backward.drugs.names(), ["Drug A", "Drug B"]);

    let result = engine.lookup(&["Drug A", "Drug B"], &everyone()).await.unwrap();
    assert_eq!(result.raw_count, 2);
}

#[tokio::test]
async fn test_existing_population_is_kept() {
    let engine = engine_with_drugs(&[("Drug A", 0.01)], test_config());
    engine.ingest(&ReportRequest::new(["Drug A", "Drug Z"], 0)).await.unwrap();
    ingest_three(&engine).await;

    let result = engine.lookup(&["Drug A", "Drug Z"], &everyone()).await.unwrap();
    assert_eq!(result.drugs[0].population(), 0.01);
    let stub = result.drugs[1].population();
    assert!(stub >= 0.001 && stub <= 0.05);
}

#[tokio::test]
async fn test_age_is_stored_as_bucket() {
    let engine = SignalEngine::in_memory(SignalConfig::default()).unwrap();
    let report = engine
        .ingest(&ReportRequest::new(["X", "Y"], 0).with_age(39))
        .await
        .unwrap();
    assert_eq!(report.age, 3);

    let thirties = DemographicCondition::any().with_age(3);
    assert_eq!(engine.rows(&thirties).await.unwrap(), 1);
}

async fn ingest_three(engine: &SignalEngine) {
    for _ in 0..3 {
        engine
            .ingest(&ReportRequest::new(["Drug Z", "Drug A"], 1))
            .await
            .unwrap();
    }
}
