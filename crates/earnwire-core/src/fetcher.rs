//! Resilient JSON fetch over the transport seam.
//!
//! One GET with bounded retry and jittered exponential backoff, plus a
//! uniform post-parse check for application-level error envelopes that
//! arrive with an HTTP success status.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::retry::RetryPolicy;

/// Keys scanned for an application-level error envelope on 2xx bodies.
const ERROR_ENVELOPE_KEYS: [&str; 2] = ["Error Message", "error"];

/// Query parameters whose values are replaced before a URL reaches an
/// error or a log line.
const SECRET_PARAMS: [&str; 4] = ["apikey", "api_key", "token", "access_token"];

const REDACTED: &str = "REDACTED";

/// Retrying JSON GET client shared by every upstream fetch.
#[derive(Clone)]
pub struct JsonFetcher {
    http_client: Arc<dyn HttpClient>,
    retry: RetryPolicy,
    timeout_ms: u64,
}

impl JsonFetcher {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            retry: RetryPolicy::default(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Execute the request and parse the body as JSON.
    ///
    /// Retries transport failures and 429/503 statuses up to the policy's
    /// attempt budget. Every other non-success status, a non-JSON body,
    /// and an error envelope fail immediately.
    pub async fn fetch_json(&self, request: HttpRequest) -> Result<Value, FetchError> {
        let request = request.with_timeout_ms(self.timeout_ms);
        let url = redact_credentials(&request.url);

        let mut attempt = 1u32;
        let response = loop {
            match self.http_client.execute(request.clone()).await {
                Ok(response) if response.is_success() => break response,
                Ok(response) if RetryPolicy::should_retry_status(response.status) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(FetchError::RetriesExhausted {
                            url,
                            attempts: attempt,
                            message: format!(
                                "upstream kept returning status {}",
                                response.status
                            ),
                        });
                    }
                    // An upstream wait hint takes precedence over the
                    // computed backoff.
                    let delay = retry_after(&response)
                        .unwrap_or_else(|| self.retry.delay_for(attempt - 1));
                    debug!(
                        url = %url,
                        status = response.status,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "throttled upstream status; backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(response) => {
                    return Err(FetchError::Status {
                        url,
                        status: response.status,
                    });
                }
                Err(error) if !error.retryable() => {
                    return Err(FetchError::Transport {
                        url,
                        message: error.message().to_owned(),
                    });
                }
                Err(error) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(FetchError::RetriesExhausted {
                            url,
                            attempts: attempt,
                            message: error.message().to_owned(),
                        });
                    }
                    let delay = self.retry.delay_for(attempt - 1);
                    debug!(
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "transport failure; backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
            attempt += 1;
        };

        let payload: Value = serde_json::from_str(&response.body)
            .map_err(|_| FetchError::NonJson { url: url.clone() })?;

        if let Some(message) = error_envelope(&payload) {
            return Err(FetchError::ErrorEnvelope { url, message });
        }

        Ok(payload)
    }
}

/// Replace credential query-parameter values with a fixed placeholder.
pub fn redact_credentials(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_owned();
    };

    let redacted = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if SECRET_PARAMS.contains(&key.to_ascii_lowercase().as_str()) => {
                format!("{key}={REDACTED}")
            }
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{base}?{redacted}")
}

fn retry_after(response: &HttpResponse) -> Option<Duration> {
    response
        .header("retry-after")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Detect an error envelope in a parsed 2xx body. Only non-array objects
/// qualify; list payloads are never envelopes.
fn error_envelope(payload: &Value) -> Option<String> {
    let object = payload.as_object()?;
    ERROR_ENVELOPE_KEYS.iter().find_map(|key| {
        object
            .get(*key)
            .filter(|value| !value.is_null())
            .map(|value| match value.as_str() {
                Some(message) => message.to_owned(),
                None => value.to_string(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpError;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::time::Instant;

    struct ScriptedHttpClient {
        responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .len()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response script should not be poisoned")
                .pop_front()
                .expect("script ran out of responses");
            Box::pin(async move { response })
        }
    }

    fn fast_fetcher(client: Arc<ScriptedHttpClient>) -> JsonFetcher {
        JsonFetcher::new(client).with_retry(RetryPolicy {
            base_delay: Duration::from_millis(1),
            ..RetryPolicy::default()
        })
    }

    #[tokio::test]
    async fn succeeds_on_third_attempt_after_two_transient_statuses() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::new(503, "")),
            Ok(HttpResponse::new(503, "")),
            Ok(HttpResponse::ok_json("[1, 2]")),
        ]));
        let fetcher = fast_fetcher(client.clone());

        let payload = fetcher
            .fetch_json(HttpRequest::get("https://example.test/calendar"))
            .await
            .expect("third attempt should succeed");

        assert_eq!(payload, serde_json::json!([1, 2]));
        assert_eq!(client.request_count(), 3);
    }

    #[tokio::test]
    async fn server_error_fails_without_retry() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::new(
            500, "boom",
        ))]));
        let fetcher = fast_fetcher(client.clone());

        let error = fetcher
            .fetch_json(HttpRequest::get("https://example.test/calendar"))
            .await
            .expect_err("500 must fail immediately");

        assert!(matches!(error, FetchError::Status { status: 500, .. }));
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn exhausted_retries_report_attempts_and_redact_the_key() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(429, "")),
            Ok(HttpResponse::new(429, "")),
        ]));
        let fetcher = fast_fetcher(client.clone());

        let error = fetcher
            .fetch_json(HttpRequest::get(
                "https://example.test/calendar?from=2026-01-01&apikey=hunter2",
            ))
            .await
            .expect_err("retries must exhaust");

        let rendered = error.to_string();
        assert!(matches!(
            error,
            FetchError::RetriesExhausted { attempts: 3, .. }
        ));
        assert!(rendered.contains("3 attempts"), "rendered={rendered}");
        assert!(rendered.contains("apikey=REDACTED"), "rendered={rendered}");
        assert!(!rendered.contains("hunter2"), "rendered={rendered}");
        assert_eq!(client.request_count(), 3);
    }

    #[tokio::test]
    async fn retry_after_hint_overrides_computed_backoff() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            Ok(HttpResponse::new(429, "").with_header("Retry-After", "1")),
            Ok(HttpResponse::ok_json("[]")),
        ]));
        let fetcher = fast_fetcher(client.clone());

        let started = Instant::now();
        fetcher
            .fetch_json(HttpRequest::get("https://example.test/calendar"))
            .await
            .expect("second attempt should succeed");

        // The policy backoff is 1ms here, so a ~1s wait proves the
        // header hint was honored.
        assert!(started.elapsed() >= Duration::from_millis(900));
        assert_eq!(client.request_count(), 2);
    }

    #[tokio::test]
    async fn non_json_body_fails_without_retry() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            "<html>rate limited</html>",
        ))]));
        let fetcher = fast_fetcher(client.clone());

        let error = fetcher
            .fetch_json(HttpRequest::get("https://example.test/calendar"))
            .await
            .expect_err("non-JSON must fail");

        assert!(matches!(error, FetchError::NonJson { .. }));
        assert_eq!(client.request_count(), 1);
    }

    #[tokio::test]
    async fn error_envelope_on_success_status_is_a_failure() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            r#"{"Error Message": "Invalid API key"}"#,
        ))]));
        let fetcher = fast_fetcher(client);

        let error = fetcher
            .fetch_json(HttpRequest::get("https://example.test/calendar"))
            .await
            .expect_err("envelope must fail");

        match error {
            FetchError::ErrorEnvelope { message, .. } => {
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected envelope error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_payloads_are_never_treated_as_envelopes() {
        let client = Arc::new(ScriptedHttpClient::new(vec![Ok(HttpResponse::ok_json(
            r#"[{"error": "this is data, not an envelope"}]"#,
        ))]));
        let fetcher = fast_fetcher(client);

        let payload = fetcher
            .fetch_json(HttpRequest::get("https://example.test/calendar"))
            .await
            .expect("list payload should pass through");

        assert!(payload.is_array());
    }

    #[test]
    fn redaction_touches_only_credential_parameters() {
        let url = "https://example.test/v3/earning_calendar?from=2026-01-01&to=2026-01-08&apikey=hunter2";

        let redacted = redact_credentials(url);

        assert_eq!(
            redacted,
            "https://example.test/v3/earning_calendar?from=2026-01-01&to=2026-01-08&apikey=REDACTED"
        );
    }

    #[test]
    fn redaction_leaves_urls_without_queries_alone() {
        assert_eq!(
            redact_credentials("https://example.test/v3/stock/list"),
            "https://example.test/v3/stock/list"
        );
    }
}
