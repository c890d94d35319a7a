use base64::{Engine, engine::general_purpose::URL_SAFE};
use jobscout::{
    config::ApplicantProfile,
    drafts::{DraftError, DraftMessage, DraftRunner, DraftService, GmailDraftClient},
    entities::NewJobPosting,
    repositories::{InMemoryJobRepository, JobRepositoryTrait},
};
use serde_json::Value;
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{header, method, path},
};

const DRAFTS_PATH: &str = "/gmail/v1/users/me/drafts";

fn message() -> DraftMessage {
    DraftMessage {
        to: "hr@vendor.com".to_string(),
        cc: Some("me@example.com".to_string()),
        subject: "Application – Java Developer".to_string(),
        html_body: "<p>Hello,</p>".to_string(),
    }
}

fn decoded_mime(request: &Request) -> String {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    let raw = body["message"]["raw"].as_str().unwrap();
    String::from_utf8(URL_SAFE.decode(raw).unwrap()).unwrap()
}

#[tokio::test]
async fn test_create_draft_posts_raw_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DRAFTS_PATH))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "r-42",
            "message": { "id": "m-1", "threadId": "t-1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GmailDraftClient::new(format!("{}/", server.uri()), "test-token").unwrap();
    let draft_id = client.create_draft(&message()).await.unwrap();
    assert_eq!(draft_id, "r-42");

    let requests = server.received_requests().await.unwrap();
    let mime = decoded_mime(&requests[0]);
    assert!(mime.starts_with("To: hr@vendor.com\r\nCc: me@example.com\r\n"));
    assert!(mime.contains("Subject: =?UTF-8?B?"));
    assert!(mime.contains("Content-Type: text/html; charset=utf-8"));
}

#[tokio::test]
async fn test_error_status_surfaces_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DRAFTS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let client = GmailDraftClient::new(server.uri(), "expired").unwrap();
    match client.create_draft(&message()).await {
        Err(DraftError::Http { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid credentials");
        }
        other => panic!("Expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_response_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DRAFTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = GmailDraftClient::new(server.uri(), "token").unwrap();
    assert!(matches!(
        client.create_draft(&message()).await,
        Err(DraftError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_runner_drafts_and_marks_stored_postings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DRAFTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "r-1" })))
        .expect(2)
        .mount(&server)
        .await;

    let repo = Arc::new(InMemoryJobRepository::new());
    for (title, email) in [
        ("Java Developer", Some("a@vendor.com")),
        ("Spring Boot Engineer", None),
        ("Full Stack Java", Some("b@vendor.com")),
    ] {
        let posting = NewJobPosting::new(
            title,
            "Remote",
            "Unknown",
            email.map(str::to_string),
            format!("{title} role. Email: {}", email.unwrap_or("none")),
            format!("https://nvoids.com/job_details.jsp?t={title}"),
        );
        repo.upsert_posting(&posting).await.unwrap();
    }

    let gmail = Arc::new(GmailDraftClient::new(server.uri(), "token").unwrap());
    let runner = DraftRunner::new(
        repo.clone(),
        gmail,
        ApplicantProfile::default(),
        Some("me@example.com".to_string()),
    );

    let summary = runner.run(10).await.unwrap();
    assert_eq!(summary.candidates, 3);
    assert_eq!(summary.drafted, 2);
    assert_eq!(summary.skipped_no_email, 1);
    assert_eq!(summary.failed, 0);

    // the posting without an email stays pending
    let pending = repo.list_undrafted(10).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].title, "Spring Boot Engineer");

    // descriptions are scrubbed of addresses before they go out
    let requests = server.received_requests().await.unwrap();
    let mime = decoded_mime(&requests[0]);
    let (_, body) = mime.split_once("\r\n\r\n").unwrap();
    let html = base64::engine::general_purpose::STANDARD
        .decode(body.split("\r\n").collect::<String>())
        .unwrap();
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("Java Developer role."));
    assert!(!html.contains("a@vendor.com"));
}
