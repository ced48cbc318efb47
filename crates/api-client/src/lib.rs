//! Authenticated client for the storefront REST API
//!
//! Every application request flows through [`ApiClient`], which:
//! 1. reads the access token from the injected [`SessionStore`] and sends it
//!    as `Authorization: Bearer <token>`
//! 2. classifies the response envelope (`status: "ok" | "error"`)
//! 3. on an inferred 401 performs one refresh against the refresh endpoint,
//!    persists the new token, and re-issues the request once
//! 4. when the refresh is rejected, purges the token and asks the injected
//!    [`LoginNavigator`] to send the user to the login route
//!
//! Concurrent 401s share a single in-flight refresh.
//!
//! [`SessionStore`]: session_store::SessionStore

pub mod client;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod navigator;
pub mod refresh;
pub mod request;

pub use client::{ApiClient, ApiClientBuilder};
pub use constants::*;
pub use envelope::{Envelope, EnvelopeStatus};
pub use error::{Error, Result};
pub use navigator::{LoginNavigator, TracingNavigator};
pub use request::{ApiRequest, RequestState};
