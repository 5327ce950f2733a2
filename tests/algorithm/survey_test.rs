//! Tests for the corpus-wide threshold survey

use std::sync::Arc;

use crate::utils::{EPSILON, engine_with_drugs, everyone, ingest_times, test_config};
use medifact::{
    Combination, CombinationReport, DemographicCondition, Drug, InMemoryReportStore,
    MedifactError, ReportRequest, ReportStore, SignalConfig, SignalEngine,
};

const DRUGS: [(&str, f64); 6] = [
    ("Drug A", 0.01),
    ("Drug B", 0.02),
    ("Drug C", 0.05),
    ("Drug D", 0.05),
    ("Drug E", 0.04),
    ("Drug F", 0.05),
];

fn threshold_100() -> SignalConfig {
    SignalConfig {
        threshold: 100.0,
        ..test_config()
    }
}

#[tokio::test]
async fn test_empty_corpus_returns_nothing() {
    let engine = engine_with_drugs(&DRUGS, test_config());
    assert!(engine.survey(&everyone()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_flags_and_orders_by_percentage() {
    let engine = engine_with_drugs(&DRUGS, threshold_100());
    // 2000, 40 and 250 respectively over 10 rows
    ingest_times(&engine, &ReportRequest::new(["Drug A", "Drug B"], 0), 4).await;
    ingest_times(&engine, &ReportRequest::new(["Drug C", "Drug D"], 0), 1).await;
    ingest_times(&engine, &ReportRequest::new(["Drug F", "Drug E"], 0), 5).await;

    let entries = engine.survey(&everyone()).await.unwrap();

    let labels: Vec<&str> = entries.iter().map(|e| e.combination_label.as_str()).collect();
    assert_eq!(labels, vec!["Drug E + Drug F", "Drug A + Drug B"]);
    assert!((entries[0].percentage - 250.0).abs() < EPSILON);
    assert!((entries[1].percentage - 2000.0).abs() < EPSILON);
    assert_eq!(entries[1].count, 4);
    assert_eq!(entries[1].drugs, vec!["Drug A", "Drug B"]);
}

#[tokio::test]
async fn test_percentage_is_rounded_to_two_decimals() {
    let engine = engine_with_drugs(&DRUGS, SignalConfig {
        threshold: 300.0,
        ..test_config()
    });
    // Drug A + Drug B: 1 / 0.0002 / 3 = 1666.666..., i.e. 555.555...% of 300
    ingest_times(&engine, &ReportRequest::new(["Drug A", "Drug B"], 0), 1).await;
    ingest_times(&engine, &ReportRequest::new(["Drug C", "Drug D"], 0), 2).await;

    let entries = engine.survey(&everyone()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].percentage, 555.56);
}

#[tokio::test]
async fn test_survey_scores_without_minimum_rows() {
    // A single report is enough for a survey entry, while lookup reports -1.
    let engine = engine_with_drugs(&DRUGS, test_config());
    ingest_times(&engine, &ReportRequest::new(["Drug A", "Drug B"], 0), 1).await;

    let entries = engine.survey(&everyone()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!((entries[0].score - 5000.0).abs() < EPSILON);

    let lookup = engine.lookup(&["Drug A", "Drug B"], &everyone()).await.unwrap();
    assert_eq!(lookup.score, -1.0);
}

#[tokio::test]
async fn test_reordered_reports_form_one_group() {
    let engine = engine_with_drugs(&DRUGS, threshold_100());
    ingest_times(&engine, &ReportRequest::new(["Drug A", "Drug B"], 0), 2).await;
    ingest_times(&engine, &ReportRequest::new(["Drug B", "Drug A"], 1), 2).await;

    let entries = engine.survey(&everyone()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].count, 4);
}

#[tokio::test]
async fn test_condition_scopes_the_survey() {
    let engine = engine_with_drugs(&DRUGS, threshold_100());
    ingest_times(&engine, &ReportRequest::new(["Drug A", "Drug B"], 0).with_gender(0), 4).await;
    ingest_times(&engine, &ReportRequest::new(["Drug E", "Drug F"], 0).with_gender(1), 4).await;

    let women = DemographicCondition::any().with_gender(1);
    let entries = engine.survey(&women).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].combination_label, "Drug E + Drug F");

    let nobody = DemographicCondition::any().with_race(0);
    assert!(engine.survey(&nobody).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_nothing_at_or_below_threshold() {
    let engine = engine_with_drugs(&DRUGS, SignalConfig {
        threshold: 250.0,
        ..test_config()
    });
    // 2000, 200 and 50 respectively over 10 rows
    ingest_times(&engine, &ReportRequest::new(["Drug A", "Drug B"], 0), 4).await;
    ingest_times(&engine, &ReportRequest::new(["Drug C", "Drug D"], 0), 5).await;
    ingest_times(&engine, &ReportRequest::new(["Drug E", "Drug F"], 0), 1).await;

    let entries = engine.survey(&everyone()).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries.iter().all(|e| e.score > 250.0 && e.percentage > 100.0));
}

#[tokio::test]
async fn test_triple_is_scored_with_overlap_correction() {
    let engine = engine_with_drugs(&DRUGS, test_config());
    ingest_times(&engine, &ReportRequest::new(["Drug C", "Drug B", "Drug A"], 0), 3).await;

    let entries = engine.survey(&everyone()).await.unwrap();

    // Pairs: 1 / (p_a p_b) + 1 / (p_b p_c) + 1 / (p_c p_a) with count == rows
    let pairs = 1.0 / (0.01 * 0.02) + 1.0 / (0.02 * 0.05) + 1.0 / (0.05 * 0.01);
    let overlap = 0.01 * 0.02 + 0.02 * 0.05 + 0.05 * 0.01 - 0.01 * 0.02 * 0.05;
    let expected = pairs - 1.0 / overlap;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].combination_label, "Drug A + Drug B + Drug C");
    assert_eq!(entries[0].drugs, vec!["Drug A", "Drug B", "Drug C"]);
    assert_eq!(entries[0].count, 3);
    assert!((entries[0].score - expected).abs() < EPSILON * expected);
}

async fn engine_with_drug_z_report(drugs: Vec<Drug>) -> SignalEngine {
    let store = Arc::new(InMemoryReportStore::with_drugs(drugs));
    store
        .insert(CombinationReport {
            drugs: Combination::new(["Drug A", "Drug Z"]).unwrap(),
            symptom: 0,
            age: 3,
            gender: 0,
            race: None,
        })
        .await
        .unwrap();
    SignalEngine::builder()
        .with_config(test_config())
        .with_store(store)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_group_with_unregistered_drug_is_reported() {
    let engine = engine_with_drug_z_report(vec![Drug::new("Drug A", 0.01)]).await;

    let err = engine.survey(&everyone()).await.unwrap_err();
    match err {
        MedifactError::UnknownDrug(names) => assert_eq!(names, vec!["Drug Z"]),
        other => panic!("expected UnknownDrug, got {other:?}"),
    }
}

#[tokio::test]
async fn test_degenerate_population_fails_the_survey() {
    let engine = engine_with_drug_z_report(vec![
        Drug::new("Drug A", 0.01),
        Drug::new("Drug Z", f64::NAN),
    ])
    .await;

    let err = engine.survey(&everyone()).await.unwrap_err();
    assert!(matches!(err, MedifactError::InvalidPopulation { ref name, .. } if name == "Drug Z"));
}
