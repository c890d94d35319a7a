use crate::drafts::{DraftError, DraftMessage, DraftService};
use async_trait::async_trait;
use base64::{
    Engine,
    engine::general_purpose::{STANDARD, URL_SAFE},
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{info, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MIME_LINE_LEN: usize = 76;

/// Gmail drafts endpoint. The access token is taken as given; obtaining and
/// refreshing it happens elsewhere.
pub struct GmailDraftClient {
    http: Client,
    base_url: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedDraft {
    id: String,
}

impl GmailDraftClient {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, DraftError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn drafts_url(&self) -> String {
        format!("{}/gmail/v1/users/me/drafts", self.base_url)
    }
}

#[async_trait]
impl DraftService for GmailDraftClient {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn create_draft(&self, message: &DraftMessage) -> Result<String, DraftError> {
        if message.to.trim().is_empty() {
            return Err(DraftError::MissingRecipient);
        }

        let raw = URL_SAFE.encode(build_mime(message));
        let response = self
            .http
            .post(self.drafts_url())
            .bearer_auth(&self.access_token)
            .json(&json!({ "message": { "raw": raw } }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DraftError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedDraft = response
            .json()
            .await
            .map_err(|e| DraftError::InvalidResponse(e.to_string()))?;

        info!(draft_id = %created.id, "Draft created");
        Ok(created.id)
    }
}

/// RFC 5322 message with a single base64 `text/html` part.
pub fn build_mime(message: &DraftMessage) -> String {
    let mut mime = String::new();
    mime.push_str(&format!("To: {}\r\n", message.to));
    if let Some(cc) = message.cc.as_deref().filter(|cc| !cc.trim().is_empty()) {
        mime.push_str(&format!("Cc: {}\r\n", cc));
    }
    mime.push_str(&format!("Subject: {}\r\n", encode_header(&message.subject)));
    mime.push_str("MIME-Version: 1.0\r\n");
    mime.push_str("Content-Type: text/html; charset=utf-8\r\n");
    mime.push_str("Content-Transfer-Encoding: base64\r\n\r\n");

    let body = STANDARD.encode(message.html_body.as_bytes());
    for chunk in body.as_bytes().chunks(MIME_LINE_LEN) {
        // base64 output is ASCII
        mime.push_str(&String::from_utf8_lossy(chunk));
        mime.push_str("\r\n");
    }
    mime
}

/// RFC 2047 encoded-word for non-ASCII header values.
fn encode_header(value: &str) -> String {
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(cc: Option<&str>) -> DraftMessage {
        DraftMessage {
            to: "hr@vendor.com".to_string(),
            cc: cc.map(str::to_string),
            subject: "Application – Java Developer".to_string(),
            html_body: "<p>Hello</p>".repeat(20),
        }
    }

    #[test]
    fn test_ascii_header_untouched() {
        assert_eq!(encode_header("Hello"), "Hello");
    }

    #[test]
    fn test_non_ascii_subject_encoded() {
        let encoded = encode_header("Application – Java");
        assert!(encoded.starts_with("=?UTF-8?B?"));
        assert!(encoded.ends_with("?="));
        let inner = &encoded["=?UTF-8?B?".len()..encoded.len() - 2];
        assert_eq!(STANDARD.decode(inner).unwrap(), "Application – Java".as_bytes());
    }

    #[test]
    fn test_mime_headers_and_body() {
        let mime = build_mime(&message(Some("me@example.com")));
        let (headers, body) = mime.split_once("\r\n\r\n").unwrap();

        assert!(headers.starts_with("To: hr@vendor.com\r\nCc: me@example.com\r\n"));
        assert!(headers.contains("Content-Type: text/html; charset=utf-8"));
        assert!(headers.contains("Subject: =?UTF-8?B?"));

        assert!(body.lines().all(|line| line.len() <= MIME_LINE_LEN));
        let joined: String = body.split("\r\n").collect();
        assert_eq!(
            STANDARD.decode(joined).unwrap(),
            "<p>Hello</p>".repeat(20).as_bytes()
        );
    }

    #[test]
    fn test_mime_without_cc() {
        let mime = build_mime(&message(None));
        assert!(!mime.contains("Cc:"));
        let mime = build_mime(&message(Some(" ")));
        assert!(!mime.contains("Cc:"));
    }

    #[tokio::test]
    async fn test_missing_recipient_rejected_before_request() {
        let client = GmailDraftClient::new("http://127.0.0.1:9", "token").unwrap();
        let mut msg = message(None);
        msg.to = " ".to_string();
        assert!(matches!(
            client.create_draft(&msg).await,
            Err(DraftError::MissingRecipient)
        ));
    }
}
