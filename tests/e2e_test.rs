//! End-to-end tests: scan payloads through the full pipeline against a
//! mocked recording service and a real queue file.

use std::{sync::Arc, time::Duration};

use checkpost_core::{RealClock, Record, Severity, TestClock};
use checkpost_submit::{
    record_from_scan, CheckInEngine, ClientConfig, DebounceWindow, EngineConfig, JsonFileStore,
    PendingQueue, RecordingClient, DEFAULT_DEBOUNCE_WINDOW,
};
use checkpost_testing::{soft_warning_reply, success_reply, CapturingNotifier};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn engine_for(
    server_url: String,
    store: Arc<JsonFileStore>,
    notifier: Arc<CapturingNotifier>,
) -> CheckInEngine {
    let client = Arc::new(
        RecordingClient::new(ClientConfig { service_url: server_url, ..ClientConfig::default() })
            .expect("client builds"),
    );
    CheckInEngine::new(
        client,
        PendingQueue::new(store),
        notifier,
        Arc::new(RealClock),
        EngineConfig { submit_timeout: Duration::from_secs(5) },
    )
}

fn persisted_records(store: &JsonFileStore) -> Vec<Record> {
    let bytes = std::fs::read(store.path()).expect("queue file exists");
    serde_json::from_slice(&bytes).expect("queue file decodes")
}

#[tokio::test]
async fn scanned_payload_travels_the_whole_pipeline() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_reply("ada checked in")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path().join("pending.json")));
    let notifier = Arc::new(CapturingNotifier::new());
    let mut engine = engine_for(server.uri(), store.clone(), notifier.clone());

    let record = record_from_scan("https://door.example/checkin?name=ada&id=badge-7")
        .expect("payload parses");
    assert_eq!(record.name, "ada");

    let retained = engine.check_in_and_save(record).await.expect("pass runs");
    assert_eq!(retained, 0);
    assert!(persisted_records(&store).is_empty());

    let notices = notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
    assert_eq!(notices[0].message, "ada checked in");
}

#[tokio::test]
async fn backlog_is_processed_sequentially_in_order() {
    let server = MockServer::start().await;

    // Per-name replies so each record's outcome is distinguishable
    Mock::given(matchers::method("POST"))
        .and(matchers::body_string_contains("ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_reply("ada checked in")))
        .mount(&server)
        .await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_string_contains("grace"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(soft_warning_reply("grace already here")),
        )
        .mount(&server)
        .await;
    Mock::given(matchers::method("POST"))
        .and(matchers::body_string_contains("edsger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_reply("edsger checked in")))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path().join("pending.json")));
    let backlog = vec![Record::new("ada"), Record::new("grace"), Record::new("edsger")];
    std::fs::write(store.path(), serde_json::to_vec(&backlog).expect("encodes"))
        .expect("seed queue file");

    let notifier = Arc::new(CapturingNotifier::new());
    let mut engine = engine_for(server.uri(), store.clone(), notifier.clone());

    let retained = engine.run_pass().await.expect("pass runs");
    assert_eq!(retained, 0);
    assert!(persisted_records(&store).is_empty());

    // One notice per record, in backlog order: the fold is sequential
    let messages: Vec<_> = notifier.take().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["ada checked in", "grace already here", "edsger checked in"]);
}

#[tokio::test]
async fn duplicate_scans_are_suppressed_before_submission() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_reply("ada checked in")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path().join("pending.json")));
    let notifier = Arc::new(CapturingNotifier::new());
    let mut engine = engine_for(server.uri(), store, notifier.clone());

    let clock = Arc::new(TestClock::new());
    let mut debounce = DebounceWindow::new(clock.clone(), DEFAULT_DEBOUNCE_WINDOW);

    // The same badge decoded twice in quick succession
    for _ in 0..2 {
        let record = record_from_scan("name=ada").expect("payload parses");
        if debounce.should_submit(&record.name) {
            engine.check_in_and_save(record).await.expect("pass runs");
        }
        clock.advance(Duration::from_secs(1));
    }

    assert_eq!(notifier.take().len(), 1);
}

#[tokio::test]
async fn known_names_round_trip() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["ada", "grace"])))
        .mount(&server)
        .await;

    let client = RecordingClient::new(ClientConfig {
        service_url: server.uri(),
        ..ClientConfig::default()
    })
    .expect("client builds");

    let names = client.known_names().await.expect("names fetch");
    assert_eq!(names, vec!["ada".to_string(), "grace".to_string()]);
}

#[tokio::test]
async fn malformed_payloads_produce_no_submission() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path().join("pending.json")));
    let notifier = Arc::new(CapturingNotifier::new());
    let mut engine = engine_for(server.uri(), store, notifier.clone());

    assert!(record_from_scan("just some text").is_none());

    // Nothing parsed, so nothing was submitted and nothing was queued
    assert!(engine.pending().await.expect("loads").is_empty());
    assert!(notifier.take().is_empty());
}
