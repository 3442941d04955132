//! Behavior-driven tests for upstream resilience at the client seams.
//!
//! These tests verify HOW a misbehaving upstream surfaces through the
//! calendar and snapshot clients: retries stay bounded and failures
//! stay classified, with no credentials leaking into error text.

use serde_json::json;
use tempfile::tempdir;

use earnwire_core::{
    CalendarClient, CalendarError, DateWindow, ExchangeCache, ExchangeMapBuilder, ExchangeMapError,
    FetchError,
};
use earnwire_tests::{date, fast_fetcher, ok_json, status, ScriptedHttpClient};

fn window() -> DateWindow {
    DateWindow::new(date(2026, 2, 1), date(2026, 2, 7)).expect("valid window")
}

// =============================================================================
// Throttling recovery
// =============================================================================

#[tokio::test]
async fn when_the_calendar_is_throttled_then_served_the_window_completes() {
    // Given: An upstream that sheds load once before answering
    let client = ScriptedHttpClient::new(vec![
        status(503),
        ok_json(json!([{"symbol": "ACME", "date": "2026-02-03"}])),
    ]);
    let calendar =
        CalendarClient::new(fast_fetcher(client.clone()), "k-test").expect("valid calendar");

    // When: The window is fetched
    let events = calendar
        .fetch(&window())
        .await
        .expect("second attempt should succeed");

    // Then: The caller sees only the final parsed result
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].symbol.as_str(), "ACME");
    assert_eq!(client.request_count(), 2);
}

#[tokio::test]
async fn when_throttling_persists_the_failure_reports_the_attempt_budget() {
    // Given: An upstream that never stops throttling
    let client = ScriptedHttpClient::new(vec![status(429), status(429), status(429)]);
    let calendar =
        CalendarClient::new(fast_fetcher(client.clone()), "sk-live-12345").expect("valid calendar");

    // When: The window is fetched
    let error = calendar
        .fetch(&window())
        .await
        .expect_err("persistent throttling must exhaust retries");

    // Then: The error counts attempts and redacts the credential
    let rendered = error.to_string();
    assert!(matches!(
        error,
        CalendarError::Fetch(FetchError::RetriesExhausted { attempts: 3, .. })
    ));
    assert!(rendered.contains("apikey=REDACTED"), "rendered={rendered}");
    assert!(!rendered.contains("sk-live-12345"), "rendered={rendered}");
    assert_eq!(client.request_count(), 3);
}

// =============================================================================
// Immediate failures
// =============================================================================

#[tokio::test]
async fn when_the_upstream_serves_html_the_failure_is_classified_not_a_panic() {
    // Given: A proxy page instead of JSON
    let client = ScriptedHttpClient::new(vec![Ok(earnwire_core::HttpResponse::ok_json(
        "<html>maintenance window</html>",
    ))]);
    let dir = tempdir().expect("tempdir");
    let builder = ExchangeMapBuilder::new(
        fast_fetcher(client.clone()),
        ExchangeCache::new(dir.path().join("map.json")),
        "k-test",
    )
    .expect("valid builder");

    // When: A rebuild runs against it
    let error = builder
        .rebuild()
        .await
        .expect_err("non-JSON body must fail");

    // Then: The body is rejected after a single attempt
    assert!(matches!(
        error,
        ExchangeMapError::Fetch(FetchError::NonJson { .. })
    ));
    assert_eq!(client.request_count(), 1);
}

#[tokio::test]
async fn when_the_transport_fails_without_retry_no_second_request_is_sent() {
    // Given: A transport-level failure marked non-retryable
    let client = ScriptedHttpClient::new(vec![Err(
        earnwire_core::HttpError::non_retryable("dns resolution failed"),
    )]);
    let calendar =
        CalendarClient::new(fast_fetcher(client.clone()), "k-test").expect("valid calendar");

    // When: The window is fetched
    let error = calendar
        .fetch(&window())
        .await
        .expect_err("transport failure must surface");

    // Then: The failure is terminal on the first attempt
    assert!(matches!(
        error,
        CalendarError::Fetch(FetchError::Transport { .. })
    ));
    assert_eq!(client.request_count(), 1);
}
