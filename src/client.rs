//! Rate-limited HTTP fetcher for the platform API.
//!
//! Wraps every outbound GET with a per-attempt timeout and retries
//! transient failures (HTTP 429, network errors, timeouts) with linearly
//! increasing backoff. Non-transient failures surface immediately as typed
//! errors so callers can skip the affected page or item and continue.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{HttpConfig, RateLimitConfig};
use crate::deadline::Deadline;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("rate limited by upstream after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("network failure: {0}")]
    Network(String),

    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed response body: {0}")]
    Malformed(String),

    #[error("run deadline reached before the request could complete")]
    DeadlineExceeded,
}

impl FetchError {
    /// Detail calls may require a permission scope the token lacks; a 403
    /// is a skippable enrichment failure, not a run failure.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, FetchError::Status { status: 403 })
    }
}

/// Bearer-authenticated client for the platform's search and detail
/// endpoints. All requests are GETs; nothing here is retried that could
/// write upstream state.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    retry: RateLimitConfig,
}

impl ApiClient {
    pub fn new(http: &HttpConfig, retry: &RateLimitConfig, token: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(http.request_timeout_secs))
            .user_agent(http.user_agent.clone())
            .build()?;

        Ok(Self {
            http: client,
            base_url: http.base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            retry: retry.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a JSON document, retrying transient failures with linear backoff.
    ///
    /// Never starts an attempt or a backoff sleep past the deadline; when the
    /// deadline cuts retries short, the last transient error (or
    /// `DeadlineExceeded` if no attempt was made) is returned.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        deadline: Deadline,
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let max_attempts = self.retry.max_retries + 1;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if deadline.expired() {
                return Err(FetchError::DeadlineExceeded);
            }

            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .query(params)
                .send()
                .await;

            let transient: FetchError = match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status == StatusCode::TOO_MANY_REQUESTS {
                        FetchError::RateLimited { attempts: attempt }
                    } else if !status.is_success() {
                        return Err(FetchError::Status {
                            status: status.as_u16(),
                        });
                    } else {
                        return resp
                            .json::<T>()
                            .await
                            .map_err(|e| FetchError::Malformed(e.to_string()));
                    }
                }
                // reqwest reports per-attempt timeouts as errors too
                Err(e) => FetchError::Network(e.to_string()),
            };

            if attempt >= max_attempts {
                warn!("giving up on {} after {} attempts: {}", url, attempt, transient);
                return Err(transient);
            }

            let delay = self.retry.backoff_delay(attempt);
            debug!(
                "attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt, max_attempts, url, transient, delay
            );
            if deadline.remaining() <= delay {
                return Err(transient);
            }
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_detection() {
        assert!(FetchError::Status { status: 403 }.is_forbidden());
        assert!(!FetchError::Status { status: 404 }.is_forbidden());
        assert!(!FetchError::RateLimited { attempts: 3 }.is_forbidden());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let http = HttpConfig {
            base_url: "https://api.example.com/".to_string(),
            user_agent: "test/1.0".to_string(),
            request_timeout_secs: 15,
        };
        let retry = RateLimitConfig {
            max_retries: 2,
            backoff_increment_ms: 1000,
        };
        let client = ApiClient::new(&http, &retry, "token").unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }
}
