use crate::fetcher::{
    backoff::{MAX_BACKOFF, backoff_delay, parse_retry_after},
    decode::decode_page,
    errors::FetchError,
    types::PageResponse,
};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const MAX_BODY_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Per-request timeout for the search listing.
pub const LISTING_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-request timeout for a job detail page.
pub const DETAIL_TIMEOUT: Duration = Duration::from_secs(40);

/// How failed requests are retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Seconds; the wait before retry `n` is `backoff_factor * 2^n`.
    pub backoff_factor: f64,
    /// Extra random seconds added to each wait.
    pub jitter: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 2.0,
            jitter: 0.0,
            max_backoff: MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// Retries immediately; used by tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_factor: 0.0,
            jitter: 0.0,
            max_backoff: Duration::ZERO,
        }
    }
}

/// HTTP client for the job board with bounded automatic retry.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    retry: RetryPolicy,
}

impl FetchClient {
    pub fn new(retry: RetryPolicy) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("text/html"),
                );
                headers
            })
            .build()
            .map_err(|e| FetchError::Unknown(e.to_string()))?;

        Ok(Self { client, retry })
    }

    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<PageResponse, FetchError> {
        let parsed_url = Url::parse(url)?;
        self.execute(|| self.client.get(parsed_url.clone()).timeout(timeout))
            .await
    }

    /// POST an urlencoded form, as the board's search box does.
    #[instrument(skip(self, fields), fields(url = %url))]
    pub async fn post_form(
        &self,
        url: &str,
        fields: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<PageResponse, FetchError> {
        let parsed_url = Url::parse(url)?;
        self.execute(|| {
            self.client
                .post(parsed_url.clone())
                .form(fields)
                .timeout(timeout)
        })
        .await
    }

    async fn execute<F>(&self, build: F) -> Result<PageResponse, FetchError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retry = 0;
        loop {
            let (error, retry_after) = match build().send().await {
                Ok(response) if response.status().is_success() => {
                    return read_page(response).await;
                }
                Ok(response) => {
                    let status = response.status();
                    let retry_after = retry_after_header(&response, status, self.retry.max_backoff);
                    (FetchError::http(status), retry_after)
                }
                Err(e) => (FetchError::from_reqwest_error(e), None),
            };

            if !error.should_retry() || retry >= self.retry.max_retries {
                if retry > 0 {
                    warn!(attempts = retry + 1, error = %error, "Giving up after retries");
                }
                return Err(error);
            }

            let delay = retry_after.unwrap_or_else(|| {
                backoff_delay(
                    retry,
                    self.retry.backoff_factor,
                    self.retry.jitter,
                    self.retry.max_backoff,
                )
            });
            debug!(
                retry = retry + 1,
                max_retries = self.retry.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying request"
            );
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }
}

fn retry_after_header(response: &Response, status: StatusCode, cap: Duration) -> Option<Duration> {
    if status != StatusCode::TOO_MANY_REQUESTS && status != StatusCode::SERVICE_UNAVAILABLE {
        return None;
    }
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_retry_after(v, cap))
}

async fn read_page(response: Response) -> Result<PageResponse, FetchError> {
    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    // Boards often omit the header; treat that as HTML
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if is_binary_content_type(&content_type) {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    // Check body size after download (in case Content-Length was missing)
    if body_bytes.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    Ok(decode_page(final_url, status, &body_bytes, &content_type))
}

/// Boards mislabel pages as `text/plain` and the like; only media and
/// archive types are refused.
fn is_binary_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ["image/", "audio/", "video/", "font/"]
        .iter()
        .any(|prefix| mime.starts_with(prefix))
        || matches!(
            mime.as_str(),
            "application/pdf" | "application/zip" | "application/octet-stream"
        )
}
