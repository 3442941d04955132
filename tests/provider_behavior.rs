//! Behavior-driven tests for the transcript providers.
//!
//! These tests verify HOW each provider shapes requests and classifies
//! responses: fiscal-period derivation, credential placement, payload
//! normalization, and the not-found contract.

use serde_json::json;

use earnwire_core::{
    FetchError, FmpTranscriptSource, NinjasTranscriptSource, ProviderId, Symbol, TranscriptError,
    TranscriptSource,
};
use earnwire_tests::{date, fast_fetcher, ok_json, status, ScriptedHttpClient};

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

// =============================================================================
// Not-found contract
// =============================================================================

#[tokio::test]
async fn when_the_provider_returns_404_the_result_is_not_found_with_the_derived_period() {
    // Given: An upstream with no document for the symbol
    let client = ScriptedHttpClient::new(vec![status(404)]);
    let source = NinjasTranscriptSource::new(fast_fetcher(client), "k-test")
        .expect("valid source");

    // When: A February 2026 call is requested
    let error = source
        .fetch_transcript(&symbol("AAPL"), date(2026, 2, 25))
        .await
        .expect_err("404 must map to not found");

    // Then: The outcome is a typed not-found carrying the fiscal period
    match error {
        TranscriptError::NotFound {
            provider,
            symbol,
            period,
        } => {
            assert_eq!(provider, ProviderId::Ninjas);
            assert_eq!(symbol.as_str(), "AAPL");
            assert_eq!(period.to_string(), "2025Q4");
        }
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn when_the_document_has_no_usable_text_the_result_is_not_found() {
    // Given: A 200 whose transcript field is only whitespace
    let client = ScriptedHttpClient::new(vec![ok_json(json!({"transcript": "   "}))]);
    let source = NinjasTranscriptSource::new(fast_fetcher(client), "k-test")
        .expect("valid source");

    // When: The transcript is requested
    let error = source
        .fetch_transcript(&symbol("AAPL"), date(2026, 2, 25))
        .await
        .expect_err("blank text must map to not found");

    // Then: Blank content is indistinguishable from a missing document
    assert!(matches!(error, TranscriptError::NotFound { .. }));
}

// =============================================================================
// Request shaping
// =============================================================================

#[tokio::test]
async fn when_ninjas_is_queried_the_credential_travels_in_a_header_not_the_url() {
    // Given: A provider with a header-borne credential
    let client = ScriptedHttpClient::new(vec![status(404)]);
    let source = NinjasTranscriptSource::new(fast_fetcher(client.clone()), "k-secret")
        .expect("valid source");

    // When: A request is issued
    let _ = source
        .fetch_transcript(&symbol("MSFT"), date(2026, 1, 29))
        .await;

    // Then: The URL carries only query terms; the key rides the header
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.contains("ticker=MSFT"));
    assert!(requests[0].url.contains("year=2025"));
    assert!(requests[0].url.contains("quarter=4"));
    assert!(!requests[0].url.contains("k-secret"));
    assert_eq!(
        requests[0].headers.get("x-api-key").map(String::as_str),
        Some("k-secret")
    );
}

// =============================================================================
// Payload normalization
// =============================================================================

#[tokio::test]
async fn when_ninjas_returns_speaker_turns_they_join_into_readable_text() {
    // Given: A structured transcript with two speaker turns
    let payload = json!({
        "transcript": "flat fallback",
        "transcript_split": [
            {"speaker": "Operator", "text": "Welcome."},
            {"speaker": "CEO", "text": "Thanks."},
        ],
    });
    let client = ScriptedHttpClient::new(vec![ok_json(payload)]);
    let source = NinjasTranscriptSource::new(fast_fetcher(client), "k-test")
        .expect("valid source");

    // When: The transcript is fetched
    let transcript = source
        .fetch_transcript(&symbol("ACME"), date(2026, 2, 3))
        .await
        .expect("structured payload should parse");

    // Then: Turns join as "speaker: text" paragraphs, preferred over the flat field
    assert_eq!(transcript.text, "Operator: Welcome.\n\nCEO: Thanks.");
    assert_eq!(transcript.period.to_string(), "2025Q4");
}

#[tokio::test]
async fn when_fmp_wraps_the_transcript_in_a_list_the_first_content_wins() {
    // Given: An FMP-style response listing the newest document first
    let payload = json!([
        {"symbol": "ACME", "quarter": 4, "year": 2025, "content": "Prepared remarks follow."},
        {"symbol": "ACME", "quarter": 3, "year": 2025, "content": "older"},
    ]);
    let client = ScriptedHttpClient::new(vec![ok_json(payload)]);
    let source =
        FmpTranscriptSource::new(fast_fetcher(client.clone()), "k-test").expect("valid source");

    // When: The transcript is fetched
    let transcript = source
        .fetch_transcript(&symbol("ACME"), date(2026, 2, 3))
        .await
        .expect("list payload should parse");

    // Then: The first element's content becomes the text, raw kept verbatim
    assert_eq!(transcript.text, "Prepared remarks follow.");
    assert_eq!(transcript.raw["quarter"], json!(4));

    let requests = client.requests();
    assert!(requests[0].url.contains("/ACME?year=2025&quarter=4"));
}

// =============================================================================
// Credential redaction on failures
// =============================================================================

#[tokio::test]
async fn when_fmp_serves_an_error_envelope_the_credential_never_leaks() {
    // Given: An HTTP 200 carrying an application-level rejection
    let client = ScriptedHttpClient::new(vec![ok_json(json!({
        "Error Message": "Invalid API key"
    }))]);
    let source = FmpTranscriptSource::new(fast_fetcher(client), "sk-live-12345")
        .expect("valid source");

    // When: The fetch fails
    let error = source
        .fetch_transcript(&symbol("ACME"), date(2026, 2, 3))
        .await
        .expect_err("error envelope must fail the fetch");

    // Then: The classified error renders with the key redacted
    let rendered = error.to_string();
    assert!(matches!(
        error,
        TranscriptError::Fetch(FetchError::ErrorEnvelope { .. })
    ));
    assert!(rendered.contains("Invalid API key"), "rendered={rendered}");
    assert!(rendered.contains("apikey=REDACTED"), "rendered={rendered}");
    assert!(!rendered.contains("sk-live-12345"), "rendered={rendered}");
}
