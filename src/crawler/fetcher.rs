//! HTTP fetcher
//!
//! This module performs the single GET per URL and classifies the response
//! for the coordinator:
//! - 2xx: the body is returned for link extraction
//! - 3xx: never followed by the transport; the resolved Location is handed
//!   back so the coordinator can decide whether to rewrite the sitemap
//! - 4xx: permanent failure
//! - 5xx: retried with exponential backoff, then permanent failure

use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Per-request timeout; covers connection and body read
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Classification of one fetch, after any retries
#[derive(Debug)]
pub enum FetchResult {
    /// 2xx response with its body
    Success { body: String },

    /// 3xx response; `location` is the redirect target resolved against the
    /// requested URL, or `None` when the header is missing or unparsable
    Redirect { status: u16, location: Option<String> },

    /// 4xx, a status outside the handled ranges, or a 5xx that kept failing
    /// after the backoff budget was spent
    HttpError { status: u16 },

    /// Connection, DNS, timeout, or body-read failure
    NetworkError { error: String },
}

/// Backoff schedule for retrying 5xx responses
///
/// The first retry waits `initial_delay`; each further retry doubles the
/// wait. Once the next delay would exceed `max_delay` the fetch gives up
/// and the last 5xx becomes a permanent [`FetchResult::HttpError`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(16),
        }
    }
}

/// Builds the HTTP client shared by all workers
///
/// Redirect following is disabled; the coordinator handles each redirect
/// itself because a redirect may leave the crawled domain.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("sitemapper/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .redirect(Policy::none())
        .build()
}

/// Fetches `url` with the default retry policy
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    fetch_url_with_policy(client, url, &RetryPolicy::default()).await
}

/// Fetches `url`, retrying 5xx responses per `policy`
///
/// # Arguments
///
/// * `client` - The shared HTTP client
/// * `url` - The URL to fetch
/// * `policy` - Backoff schedule for 5xx responses
///
/// # Returns
///
/// The final classification once the fetch succeeds, fails permanently, or
/// exhausts its retry budget
pub async fn fetch_url_with_policy(
    client: &Client,
    url: &str,
    policy: &RetryPolicy,
) -> FetchResult {
    let mut delay = policy.initial_delay;

    loop {
        let result = fetch_once(client, url).await;

        match result {
            FetchResult::HttpError { status }
                if (500..600).contains(&status) && delay <= policy.max_delay =>
            {
                tracing::warn!(
                    "Fetch of {} failed with HTTP {}, retrying in {:?}",
                    url,
                    status,
                    delay
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            other => return other,
        }
    }
}

/// Performs a single GET and classifies the response
async fn fetch_once(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(err) => return classify_transport_error(&err),
    };

    let status = response.status();

    if status.is_redirection() {
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|location| resolve_location(url, location));
        return FetchResult::Redirect {
            status: status.as_u16(),
            location,
        };
    }

    if status.is_success() {
        return match response.text().await {
            Ok(body) => FetchResult::Success { body },
            Err(err) => FetchResult::NetworkError {
                error: err.to_string(),
            },
        };
    }

    FetchResult::HttpError {
        status: status.as_u16(),
    }
}

/// Resolves a Location header value, which may be relative, against the
/// requested URL
fn resolve_location(base: &str, location: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(location).map(|url| url.to_string()).ok()
}

fn classify_transport_error(err: &reqwest::Error) -> FetchResult {
    let error = if err.is_timeout() {
        "request timeout".to_string()
    } else if err.is_connect() {
        "connection failed".to_string()
    } else {
        err.to_string()
    };
    FetchResult::NetworkError { error }
}
