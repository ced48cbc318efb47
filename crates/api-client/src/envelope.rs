//! Response envelope and inbound classification
//!
//! Every endpoint is expected to answer `{ "status": "ok" | "error", "result": ... }`.
//! A body without a recognisable `status` is not a success or an application
//! error; it is either an authorization failure (the refresh trigger) or an
//! unrecognised response.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Value of the envelope `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Ok,
    Error,
}

/// A successful response body.
///
/// Fields other than `status` and `result` are kept in `extra` so the body
/// reaches the caller unmodified. A missing `result` reads as `Null` and is
/// left out again on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub result: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Deserialize the `result` payload into `T`.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.result)
            .map_err(|e| Error::Decode(format!("unexpected result shape: {e}")))
    }
}

/// Outcome of inspecting one response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Inbound {
    /// `status: "ok"`
    Ok(Envelope),
    /// `status: "error"`, carrying the full body
    Error(Value),
    /// No envelope and the failure reads as HTTP 401
    Unauthorized,
    /// No envelope, not an authorization failure
    Unrecognized,
}

/// Classify a response by its parsed body, falling back to the HTTP status.
///
/// The 401 inference accepts either the transport status or a `statusCode`
/// field in the body, since some backends wrap auth failures in a 200.
pub(crate) fn classify(http_status: StatusCode, body: &[u8]) -> Inbound {
    let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);

    match value.get("status").and_then(Value::as_str) {
        Some("ok") => match serde_json::from_value::<Envelope>(value) {
            Ok(envelope) => Inbound::Ok(envelope),
            Err(_) => Inbound::Unrecognized,
        },
        Some("error") => Inbound::Error(value),
        _ => {
            let body_code = value.get("statusCode").and_then(Value::as_u64);
            if http_status == StatusCode::UNAUTHORIZED || body_code == Some(401) {
                Inbound::Unauthorized
            } else {
                Inbound::Unrecognized
            }
        }
    }
}
