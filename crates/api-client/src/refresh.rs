//! Access token refresh
//!
//! The refresh endpoint authenticates with a cookie, not a bearer token, so
//! the call is a plain `GET` on the shared cookie-enabled client with no
//! `Authorization` header. A body of `{"status":"ok","result":{"accessToken":..}}`
//! renews the session; anything else rejects it.
//!
//! [`RefreshGate`] makes the refresh single-flight. Callers record the gate's
//! generation when they read their token. A caller that waits on the gate and
//! finds the generation advanced reuses the finished outcome instead of
//! refreshing again.

use std::sync::atomic::{AtomicU64, Ordering};

use common::Secret;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{Error, Result};

/// Result of one refresh attempt.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The server issued a new access token.
    Renewed(Secret<String>),
    /// The server refused; the session is over.
    Rejected,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResult {
    access_token: String,
}

/// Call the refresh endpoint once.
///
/// Transport failures are returned as [`Error::Http`]; they say nothing about
/// the session, so they do not count as a rejection.
pub async fn request_access_token(
    client: &reqwest::Client,
    refresh_url: &str,
) -> Result<RefreshOutcome> {
    let response = client
        .get(refresh_url)
        .send()
        .await
        .map_err(|e| Error::Http(format!("token refresh request failed: {e}")))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| Error::Http(format!("reading token refresh response: {e}")))?;

    Ok(parse_refresh_body(status.as_u16(), &body))
}

fn parse_refresh_body(http_status: u16, body: &[u8]) -> RefreshOutcome {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
    if value.get("status").and_then(Value::as_str) != Some("ok") {
        debug!(http_status, "refresh endpoint did not return status ok");
        return RefreshOutcome::Rejected;
    }
    match value
        .get("result")
        .cloned()
        .map(serde_json::from_value::<RefreshResult>)
    {
        Some(Ok(result)) if !result.access_token.is_empty() => {
            RefreshOutcome::Renewed(Secret::new(result.access_token))
        }
        _ => {
            debug!(http_status, "refresh response missing result.accessToken");
            RefreshOutcome::Rejected
        }
    }
}

/// Serializes refreshes and remembers the last outcome.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
    generation: AtomicU64,
    last: Mutex<Option<RefreshOutcome>>,
}

/// Held while a caller decides whether to refresh or reuse.
pub(crate) struct RefreshTurn<'a> {
    gate: &'a RefreshGate,
    last: MutexGuard<'a, Option<RefreshOutcome>>,
    observed: u64,
}

impl RefreshGate {
    /// Generation to record alongside a token read.
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Wait for exclusive access to the refresh slot.
    pub(crate) async fn enter(&self, observed: u64) -> RefreshTurn<'_> {
        RefreshTurn {
            gate: self,
            last: self.last.lock().await,
            observed,
        }
    }
}

impl RefreshTurn<'_> {
    /// Outcome of a refresh that completed after this caller read its token.
    pub(crate) fn completed(&self) -> Option<RefreshOutcome> {
        if self.gate.generation() != self.observed {
            self.last.clone()
        } else {
            None
        }
    }

    /// Record a refresh this caller performed and release waiters.
    pub(crate) fn finish(mut self, outcome: RefreshOutcome) {
        *self.last = Some(outcome);
        self.gate.generation.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body(v: Value) -> Vec<u8> {
        serde_json::to_vec(&v).unwrap()
    }

    #[test]
    fn ok_body_renews() {
        let outcome = parse_refresh_body(
            200,
            &body(json!({"status": "ok", "result": {"accessToken": "new456"}})),
        );
        match outcome {
            RefreshOutcome::Renewed(token) => assert_eq!(token.expose(), "new456"),
            RefreshOutcome::Rejected => panic!("expected renewal"),
        }
    }

    #[test]
    fn error_body_rejects() {
        let outcome = parse_refresh_body(
            401,
            &body(json!({"status": "error", "message": "refresh token expired"})),
        );
        assert!(matches!(outcome, RefreshOutcome::Rejected));
    }

    #[test]
    fn ok_without_token_rejects() {
        let outcome = parse_refresh_body(200, &body(json!({"status": "ok", "result": {}})));
        assert!(matches!(outcome, RefreshOutcome::Rejected));
        let outcome = parse_refresh_body(
            200,
            &body(json!({"status": "ok", "result": {"accessToken": ""}})),
        );
        assert!(matches!(outcome, RefreshOutcome::Rejected));
    }

    #[test]
    fn non_json_rejects() {
        assert!(matches!(
            parse_refresh_body(502, b"Bad Gateway"),
            RefreshOutcome::Rejected
        ));
    }

    #[tokio::test]
    async fn refresh_call_sends_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "ok", "result": {"accessToken": "t2"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let outcome = request_access_token(&client, &format!("{}/auth/refresh", server.uri()))
            .await
            .unwrap();
        assert!(matches!(outcome, RefreshOutcome::Renewed(_)));

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(received[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let client = reqwest::Client::new();
        let result = request_access_token(&client, "http://127.0.0.1:1/auth/refresh").await;
        assert!(matches!(result, Err(Error::Http(_))));
    }

    #[tokio::test]
    async fn gate_shares_completed_outcome() {
        let gate = RefreshGate::default();
        let observed = gate.generation();

        let turn = gate.enter(observed).await;
        assert!(turn.completed().is_none(), "nothing finished yet");
        turn.finish(RefreshOutcome::Rejected);

        let late = gate.enter(observed).await;
        assert!(matches!(late.completed(), Some(RefreshOutcome::Rejected)));
        drop(late);

        let fresh = gate.enter(gate.generation()).await;
        assert!(fresh.completed().is_none(), "current generation must refresh");
    }
}
