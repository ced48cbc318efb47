//! Outgoing request description and its retry state

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Per-request retry state.
///
/// Transitions only forward: `Fresh → Retried` on the first inferred 401.
/// A `Retried` request that hits another 401 is rejected, never refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Fresh,
    Retried,
}

impl RequestState {
    /// Advance to `Retried`. Returns false if the request already retried.
    pub fn mark_retried(&mut self) -> bool {
        match self {
            RequestState::Fresh => {
                *self = RequestState::Retried;
                true
            }
            RequestState::Retried => false,
        }
    }
}

/// A request relative to the client's base URL.
///
/// The `Authorization` header is not stored here; it is attached from the
/// session store each time the request is dispatched.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub state: RequestState,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            state: RequestState::Fresh,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| Error::Encode(format!("serializing request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }
}
