//! Integration tests for the achievement sync pipeline.
//!
//! The upload is decoded from the raw multipart body the server received,
//! so these tests pin the wire format end to end.

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{active_credential, multipart_parts, rotated_credential, with_rotation, Harness};
use killstreaks::adapters::{InMemoryAchievements, TokioExecutor};
use killstreaks::error::{SyncError, SyncStage};
use killstreaks::sync::payload;
use killstreaks::sync::{
    AchievementRecord, DispatchOutcome, MedalDisplay, SyncDispatcher, SyncPipeline, WireAchievement,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
}

fn records() -> Vec<AchievementRecord> {
    vec![
        AchievementRecord::new(1, "double_kill", 10, at(1)).with_medal(MedalDisplay {
            name: "Double Kill".to_string(),
            image: "double_kill.png".to_string(),
        }),
        AchievementRecord::new(2, "triple_kill", 10, at(3)),
        AchievementRecord::new(3, "killing_spree", 11, at(5)),
    ]
}

fn pipeline(harness: &Harness) -> Arc<SyncPipeline> {
    Arc::new(SyncPipeline::new(
        harness.session.clone(),
        Arc::new(InMemoryAchievements::with_records(records())),
    ))
}

/// Decode the upload request the server received.
async fn received_upload(harness: &Harness) -> (String, Vec<WireAchievement>) {
    let requests = harness.server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("no upload received");
    let content_type = upload
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();

    let parts = multipart_parts(&content_type, &upload.body);
    let (_, uuid) = parts
        .iter()
        .find(|(headers, _)| headers.contains("name=\"client_uuid\""))
        .expect("no client_uuid part");
    let (file_headers, file) = parts
        .iter()
        .find(|(headers, _)| headers.contains("name=\"achievements_file\""))
        .expect("no achievements_file part");
    assert!(file_headers.contains("filename=\"achievements.json.zlib\""));
    assert!(file_headers.contains("application/zlib"));

    (
        String::from_utf8(uuid.clone()).unwrap(),
        payload::decode(file).unwrap(),
    )
}

async fn mount_checkpoint(harness: &Harness, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&harness.server)
        .await;
}

#[tokio::test]
async fn test_first_sync_uploads_everything() {
    let harness = Harness::start(Some(active_credential())).await;
    mount_checkpoint(&harness, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/syncs"))
        .and(header("access-token", "tok-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .expect(1)
        .mount(&harness.server)
        .await;

    let report = pipeline(&harness).sync().await.unwrap();

    assert_eq!(report.since, DateTime::<Utc>::MIN_UTC);
    assert_eq!(report.uploaded, 3);
    assert_eq!(report.status, 201);

    let (uuid, uploaded) = received_upload(&harness).await;
    assert_eq!(uuid, killstreaks::config::DEFAULT_CLIENT_UUID);
    let expected: Vec<WireAchievement> = records().iter().map(AchievementRecord::to_wire).collect();
    assert_eq!(uploaded, expected);
}

#[tokio::test]
async fn test_sync_resumes_from_latest_checkpoint() {
    let harness = Harness::start(Some(active_credential())).await;
    mount_checkpoint(
        &harness,
        json!([
            { "id": 1, "created_at": "2024-06-01T12:00:00.000Z" },
            { "id": 2, "created_at": "2024-06-03T12:00:00.000Z" },
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&harness.server)
        .await;

    let report = pipeline(&harness).sync().await.unwrap();

    assert_eq!(report.since, at(3));
    let (_, uploaded) = received_upload(&harness).await;
    let ids: Vec<i64> = uploaded.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn test_nothing_new_still_uploads_empty_array() {
    let harness = Harness::start(Some(active_credential())).await;
    mount_checkpoint(&harness, json!([{ "created_at": "2024-07-01T00:00:00Z" }])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&harness.server)
        .await;

    let report = pipeline(&harness).sync().await.unwrap();

    assert_eq!(report.uploaded, 0);
    let (_, uploaded) = received_upload(&harness).await;
    assert!(uploaded.is_empty());
}

#[tokio::test]
async fn test_upload_failure_keeps_credential() {
    let harness = Harness::start(Some(active_credential())).await;
    mount_checkpoint(&harness, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&harness.server)
        .await;

    let err = pipeline(&harness).sync().await.unwrap_err();

    assert!(matches!(
        err,
        SyncError::Status {
            stage: SyncStage::Upload,
            status: 500,
            ..
        }
    ));
    assert_eq!(harness.credential_on_disk(), active_credential());
}

#[tokio::test]
async fn test_checkpoint_rotation_is_used_for_upload() {
    let harness = Harness::start(Some(active_credential())).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/syncs"))
        .and(header("access-token", "tok-1"))
        .respond_with(with_rotation(
            ResponseTemplate::new(200).set_body_json(json!([])),
            &rotated_credential(),
        ))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/syncs"))
        .and(header("access-token", "tok-2"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&harness.server)
        .await;

    pipeline(&harness).sync().await.unwrap();

    assert_eq!(harness.credential_on_disk(), rotated_credential());
}

#[tokio::test]
async fn test_checkpoint_unauthorized_does_not_upload() {
    let harness = Harness::start(Some(active_credential())).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&harness.server)
        .await;

    let err = pipeline(&harness).sync().await.unwrap_err();

    assert!(matches!(
        err,
        SyncError::Status {
            stage: SyncStage::Checkpoint,
            status: 401,
            ..
        }
    ));
    assert_eq!(harness.credential_on_disk(), active_credential());
}

#[tokio::test]
async fn test_review_activity_while_logged_out_makes_no_requests() {
    let harness = Harness::start(None).await;
    let executor = TokioExecutor::current().unwrap();
    let dispatcher = SyncDispatcher::new(pipeline(&harness), Arc::new(executor));

    assert_eq!(dispatcher.on_review_activity().await, DispatchOutcome::Skipped);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(harness.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_review_activity_runs_sync_in_background() {
    let harness = Harness::start(Some(active_credential())).await;
    mount_checkpoint(&harness, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/syncs"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&harness.server)
        .await;

    let executor = TokioExecutor::current().unwrap();
    let dispatcher = SyncDispatcher::new(pipeline(&harness), Arc::new(executor));

    assert_eq!(dispatcher.on_review_activity().await, DispatchOutcome::Submitted);

    let mut uploads = 0;
    for _ in 0..100 {
        let requests = harness.server.received_requests().await.unwrap();
        uploads = requests.iter().filter(|r| r.method.as_str() == "POST").count();
        if uploads > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(uploads, 1);
}
