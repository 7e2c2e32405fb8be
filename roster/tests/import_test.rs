//! Import batches against a mock user store.

use std::time::Duration;

use roster::import::{import_file, import_pasted, import_pasted_with_progress, ImportPhase};
use roster::{RosterConfig, RosterError, RosterHttpClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EXAMPLE: &str = "Name,Email,Password,Roles\nJohn Doe,john@example.com,john123,\"admin,user\"\nJane Smith,jane@example.com,jane123,user";

fn client_for(server: &MockServer) -> RosterHttpClient {
    RosterHttpClient::new(&RosterConfig::with_api_url(server.uri())).unwrap()
}

async fn posted_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_pasted_example_creates_both_users() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "new"})))
        .expect(2)
        .mount(&server)
        .await;

    let result = import_pasted(&client_for(&server), EXAMPLE).await.unwrap();
    assert_eq!(result.success_count, 2);
    assert_eq!(result.error_count, 0);

    let bodies = posted_bodies(&server).await;
    assert_eq!(bodies[0]["name"], "John Doe");
    assert_eq!(bodies[0]["roles"], json!(["admin", "user"]));
    assert_eq!(bodies[1]["email"], "jane@example.com");
    assert_eq!(bodies[1]["roles"], json!(["user"]));
    assert!(bodies[1]["createdAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_bad_header_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let text = "Email,Name,Password,Roles\nJane Smith,jane@example.com,jane123,user";
    let mut phases = Vec::new();
    let err = import_pasted_with_progress(&client_for(&server), text, |p| phases.push(p.clone()))
        .await
        .unwrap_err();

    assert!(matches!(err, RosterError::Format(_)));
    assert_eq!(phases.len(), 3);
    assert_eq!(phases[0], ImportPhase::ValidatingHeader);
    assert!(matches!(phases[1], ImportPhase::Aborted(_)));
    assert_eq!(phases[2], ImportPhase::Idle);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_record_does_not_stop_batch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_partial_json(json!({"email": "bad@example.com"})))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let text = "Name,Email,Password,Roles\n\
                A,a@example.com,secret1,user\n\
                B,bad@example.com,secret1,user\n\
                C,c@example.com,secret1,user\n\
                D,d@example.com,secret1,user";
    let result = import_pasted(&client_for(&server), text).await.unwrap();

    assert_eq!(result.success_count + result.error_count, 4);
    assert_eq!(result.error_count, 1);

    let emails: Vec<_> = posted_bodies(&server)
        .await
        .iter()
        .map(|b| b["email"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        emails,
        vec!["a@example.com", "bad@example.com", "c@example.com", "d@example.com"]
    );
}

#[tokio::test]
async fn test_only_200_and_201_count_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"email": "a@example.com"})))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"email": "b@example.com"})))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"email": "c@example.com"})))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let text = "Name,Email,Password,Roles\n\
                A,a@example.com,secret1,user\n\
                B,b@example.com,secret1,user\n\
                C,c@example.com,secret1,user";
    let result = import_pasted(&client_for(&server), text).await.unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(result.error_count, 2);
}

#[tokio::test]
async fn test_timeout_counts_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let config = RosterConfig {
        timeout: Duration::from_millis(50),
        ..RosterConfig::with_api_url(server.uri())
    };
    let client = RosterHttpClient::new(&config).unwrap();
    let result = import_pasted(&client, "Name,Email,Password,Roles\nA,a@example.com,secret1,user")
        .await
        .unwrap();
    assert_eq!(result.success_count, 0);
    assert_eq!(result.error_count, 1);
}

#[tokio::test]
async fn test_no_valid_rows_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let text = "Name,Email,Password,Roles\nonly,three,fields";
    let err = import_pasted(&client_for(&server), text).await.unwrap_err();
    assert!(matches!(err, RosterError::NoRecords));
}

#[tokio::test]
async fn test_progress_walks_through_every_phase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let mut phases = Vec::new();
    import_pasted_with_progress(&client_for(&server), EXAMPLE, |p| phases.push(p.clone()))
        .await
        .unwrap();

    assert_eq!(
        phases,
        vec![
            ImportPhase::ValidatingHeader,
            ImportPhase::ParsingRows,
            ImportPhase::Importing { done: 0, total: 2 },
            ImportPhase::Importing { done: 1, total: 2 },
            ImportPhase::Importing { done: 2, total: 2 },
            ImportPhase::Summarizing,
            ImportPhase::Idle,
        ]
    );
}

#[tokio::test]
async fn test_file_import_without_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("users.csv");
    std::fs::write(
        &file,
        "Mike Johnson,mike@example.com,mike123,admin\r\nshort,row\r\nSarah Williams,sarah@example.com,sarah123,\"admin,user\"\r\n",
    )
    .unwrap();

    let uri = format!("file://{}", file.display());
    let result = import_file(&client_for(&server), uri).await.unwrap();
    assert_eq!(result.success_count, 2);
    assert_eq!(result.error_count, 0);
    assert_eq!(result.skipped_rows, 1);

    let bodies = posted_bodies(&server).await;
    assert_eq!(bodies[1]["roles"], json!(["admin", "user"]));
}

#[tokio::test]
async fn test_file_with_invalid_utf8_falls_back_to_lossy_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("latin1.csv");
    std::fs::write(&file, b"Jos\xe9,jose@example.com,jose123,user\n").unwrap();

    let result = import_file(&client_for(&server), &file).await.unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(posted_bodies(&server).await[0]["name"], "Jos\u{FFFD}");
}

#[tokio::test]
async fn test_empty_or_missing_file_is_rejected() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.csv");
    std::fs::write(&empty, "  \n").unwrap();
    assert!(matches!(
        import_file(&client, &empty).await,
        Err(RosterError::Validation(_))
    ));

    let missing = dir.path().join("missing.csv");
    assert!(matches!(
        import_file(&client, &missing).await,
        Err(RosterError::Io(_))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
