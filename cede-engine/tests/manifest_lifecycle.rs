//! Edit manifest store integration tests against an in-memory SQLite
//! database.

use std::sync::Arc;

use cede_common::{Error, StoreParams};
use cede_engine::db::{init_memory_pool, SqliteManifestRepository};
use cede_engine::models::{
    AnomalySeverity, ClipAnalysis, Confidence, EditStatus, SourceClip, TrimRecommendation,
};
use cede_engine::services::EditManifestStore;

async fn store() -> EditManifestStore {
    let pool = init_memory_pool().await.unwrap();
    EditManifestStore::new(
        Arc::new(SqliteManifestRepository::new(pool)),
        StoreParams::default(),
    )
}

fn clip(duration: f64) -> SourceClip {
    SourceClip::new("/renders/job/shot_042.mp4", duration)
}

fn sample_analysis(duration: f64) -> ClipAnalysis {
    ClipAnalysis {
        clip_duration: duration,
        speech_segments: vec![],
        silences: vec![],
        visual_events: vec![],
        anomalies: vec![],
        confidence: Confidence::Low,
        trim: TrimRecommendation {
            trim_start: 0.0,
            trim_end: None,
            usable_duration: duration,
        },
    }
}

#[tokio::test]
async fn test_full_lifecycle() {
    let store = store().await;

    let manifest = store.start("job-1", clip(8.0), None).await.unwrap();
    assert_eq!(manifest.status, EditStatus::Pending);
    assert!(manifest.variations.is_empty());
    assert!(manifest.selected.is_none());

    let v1 = store
        .create_trim_variation("job-1", 0.5, Some(7.5), None, false)
        .await
        .unwrap();
    assert_eq!(v1.id, "v001");
    assert!((v1.duration_seconds - 7.0).abs() < 1e-9);

    let manifest = store.get("job-1").await.unwrap();
    assert_eq!(manifest.status, EditStatus::InProgress);

    let manifest = store.submit_for_review("job-1").await.unwrap();
    assert_eq!(manifest.status, EditStatus::Review);

    let manifest = store.select("job-1", "v001").await.unwrap();
    assert_eq!(manifest.status, EditStatus::Approved);
    assert_eq!(manifest.selected.as_deref(), Some("v001"));

    let manifest = store.archive("job-1").await.unwrap();
    assert_eq!(manifest.status, EditStatus::Archived);
    assert!(manifest.selected.is_none(), "archival clears the selection");
    assert_eq!(manifest.variations.len(), 1, "history is retained");
}

#[tokio::test]
async fn test_variation_ids_monotonic() {
    let store = store().await;
    store.start("job-2", clip(10.0), None).await.unwrap();

    let v1 = store
        .create_trim_variation("job-2", 0.0, Some(9.0), None, false)
        .await
        .unwrap();
    let v2 = store
        .create_trim_variation("job-2", 1.0, None, None, true)
        .await
        .unwrap();
    let v3 = store
        .create_speed_variation("job-2", 2.0, None, None)
        .await
        .unwrap();

    assert_eq!(v1.id, "v001");
    assert_eq!(v2.id, "v002");
    assert_eq!(v3.id, "v003");
    assert_eq!(v1.filename, "shot_042_v001.mp4");
    assert_eq!(v3.filename, "shot_042_v003.mp4");
}

#[tokio::test]
async fn test_variation_ids_survive_select_and_archive() {
    let store = store().await;
    store.start("job-int", clip(10.0), None).await.unwrap();

    let v1 = store
        .create_trim_variation("job-int", 0.5, Some(9.0), None, false)
        .await
        .unwrap();
    assert_eq!(v1.id, "v001");

    store.select("job-int", "v001").await.unwrap();
    let v2 = store
        .create_trim_variation("job-int", 1.0, Some(8.0), None, true)
        .await
        .unwrap();
    assert_eq!(v2.id, "v002", "selection does not disturb id allocation");

    store.archive("job-int").await.unwrap();
    let v3 = store
        .create_speed_variation("job-int", 1.5, None, None)
        .await
        .unwrap();
    assert_eq!(v3.id, "v003", "archival never frees earlier ids");

    let manifest = store.get("job-int").await.unwrap();
    let ids: Vec<&str> = manifest.variations.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["v001", "v002", "v003"]);
}

#[tokio::test]
async fn test_duplicate_start_rejected() {
    let store = store().await;
    store.start("job-3", clip(5.0), None).await.unwrap();

    let err = store.start("job-3", clip(5.0), None).await.unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)), "got {err:?}");
}

#[tokio::test]
async fn test_start_rejects_non_positive_duration() {
    let store = store().await;
    let err = store.start("job-4", clip(0.0), None).await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[tokio::test]
async fn test_trim_validation() {
    let store = store().await;
    store.start("job-5", clip(8.0), None).await.unwrap();

    let err = store
        .create_trim_variation("job-5", -0.1, None, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));

    let err = store
        .create_trim_variation("job-5", 3.0, Some(3.0), None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));

    let err = store
        .create_trim_variation("job-5", 0.0, Some(8.5), None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));

    // No variations were created by the rejected calls.
    let manifest = store.get("job-5").await.unwrap();
    assert!(manifest.variations.is_empty());
    assert_eq!(manifest.status, EditStatus::Pending);
}

#[tokio::test]
async fn test_trim_without_end_runs_to_source_end() {
    let store = store().await;
    store.start("job-6", clip(8.0), None).await.unwrap();

    let v = store
        .create_trim_variation("job-6", 0.5, None, None, false)
        .await
        .unwrap();
    assert_eq!(v.edits.trim_start, Some(0.5));
    assert_eq!(v.edits.trim_end, None);
    assert!((v.duration_seconds - 7.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_speed_stacks_on_trim() {
    let store = store().await;
    store.start("job-7", clip(8.0), None).await.unwrap();

    let v1 = store
        .create_trim_variation("job-7", 0.5, Some(7.91), None, true)
        .await
        .unwrap();
    assert!((v1.duration_seconds - 7.41).abs() < 1e-9);

    let v2 = store
        .create_speed_variation("job-7", 1.1, Some("v001"), None)
        .await
        .unwrap();
    assert_eq!(v2.id, "v002");
    assert_eq!(v2.edits.trim_start, Some(0.5), "base trim carries forward");
    assert_eq!(v2.edits.trim_end, Some(7.91));
    assert_eq!(v2.edits.speed, Some(1.1));
    assert!((v2.duration_seconds - 7.41 / 1.1).abs() < 1e-9);
    assert!(v2.precise, "speed changes always re-encode");
}

#[tokio::test]
async fn test_speed_validation() {
    let store = store().await;
    store.start("job-8", clip(8.0), None).await.unwrap();

    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = store
            .create_speed_variation("job-8", bad, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)), "speed {bad}");
    }

    let err = store
        .create_speed_variation("job-8", 2.0, Some("v099"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_select_unknown_variation_leaves_manifest_unchanged() {
    let store = store().await;
    store.start("job-9", clip(8.0), None).await.unwrap();
    store
        .create_trim_variation("job-9", 0.0, Some(7.0), None, false)
        .await
        .unwrap();

    let err = store.select("job-9", "v999").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let manifest = store.get("job-9").await.unwrap();
    assert_eq!(manifest.status, EditStatus::InProgress);
    assert!(manifest.selected.is_none());
}

#[tokio::test]
async fn test_submit_for_review_requires_in_progress() {
    let store = store().await;
    store.start("job-10", clip(8.0), None).await.unwrap();

    let err = store.submit_for_review("job-10").await.unwrap_err();
    assert!(matches!(err, Error::InvalidParameter(_)));
}

#[tokio::test]
async fn test_store_analysis_does_not_change_status() {
    let store = store().await;
    store.start("job-11", clip(8.0), None).await.unwrap();

    let manifest = store
        .store_analysis("job-11", sample_analysis(8.0))
        .await
        .unwrap();
    assert_eq!(manifest.status, EditStatus::Pending);
    let analysis = manifest.analysis.unwrap();
    assert_eq!(analysis.clip_duration, 8.0);
    assert_eq!(analysis.count_severity(AnomalySeverity::Warning), 0);
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let store = store().await;
    for result in [
        store.get("nope").await.err(),
        store.submit_for_review("nope").await.err(),
        store.archive("nope").await.err(),
        store
            .create_trim_variation("nope", 0.0, None, None, false)
            .await
            .err(),
    ] {
        assert!(matches!(result, Some(Error::NotFound(_))));
    }
}

#[tokio::test]
async fn test_list_returns_all_job_ids() {
    let store = store().await;
    store.start("job-a", clip(4.0), None).await.unwrap();
    store.start("job-b", clip(5.0), None).await.unwrap();

    let mut ids = store.list().await.unwrap();
    ids.sort();
    assert_eq!(ids, vec!["job-a".to_string(), "job-b".to_string()]);
}

#[tokio::test]
async fn test_keyframe_tolerance_exposed() {
    let store = store().await;
    assert_eq!(store.keyframe_tolerance(), 0.5);
}
