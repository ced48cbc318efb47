//! The authenticated API client
//!
//! Outbound: every dispatch reads the access token from the session store and
//! sets `Authorization: Bearer <token>` (empty when signed out; the server
//! decides).
//!
//! Inbound, in order:
//! 1. `status: "ok"` returns the envelope unchanged
//! 2. `status: "error"` returns [`Error::Application`] with the body
//! 3. inferred 401 on a `Fresh` request: refresh once, persist the new token,
//!    re-issue the request carrying the refreshed token; a rejected refresh purges the token, navigates to
//!    login and returns [`Error::SessionExpired`]
//! 4. anything else returns [`Error::Rejected`]

use std::sync::Arc;
use std::time::Duration;

use common::{Secret, ensure_http_url, join_url};
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde::de::DeserializeOwned;
use session_store::{KEY_ACCESS_TOKEN, SessionStore};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_LOGIN_ROUTE, DEFAULT_REFRESH_URL, DEFAULT_USER_AGENT};
use crate::envelope::{Envelope, Inbound, classify};
use crate::error::{Error, Result};
use crate::navigator::LoginNavigator;
use crate::refresh::{RefreshGate, RefreshOutcome, request_access_token};
use crate::request::ApiRequest;

/// Client through which all storefront API traffic flows.
///
/// Cheap to clone; clones share the HTTP connection pool, the cookie jar,
/// the session store and the refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    refresh_url: String,
    login_route: String,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn LoginNavigator>,
    refresh: RefreshGate,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn refresh_url(&self) -> &str {
        &self.inner.refresh_url
    }

    pub fn login_route(&self) -> &str {
        &self.inner.login_route
    }

    /// Current access token, if signed in.
    pub async fn access_token(&self) -> Option<Secret<String>> {
        self.inner.store.get(KEY_ACCESS_TOKEN).await.map(Secret::new)
    }

    /// Persist a token obtained from a login call.
    pub async fn store_login_token(&self, token: Secret<String>) -> Result<()> {
        self.inner
            .store
            .set(KEY_ACCESS_TOKEN, token.expose().clone())
            .await?;
        info!("access token stored");
        Ok(())
    }

    /// Forget the access token. Returns whether one was stored.
    pub async fn logout(&self) -> Result<bool> {
        let removed = self.inner.store.remove(KEY_ACCESS_TOKEN).await?;
        info!(had_token = removed.is_some(), "signed out");
        Ok(removed.is_some())
    }

    pub async fn get(&self, path: &str) -> Result<Envelope> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Envelope> {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Envelope> {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<Envelope> {
        self.execute(ApiRequest::delete(path)).await
    }

    /// `GET` and decode the `result` payload.
    pub async fn get_result<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.into_result()
    }

    /// Execute any request and decode the `result` payload.
    pub async fn send_result<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.execute(request).await?.into_result()
    }

    /// Run a request through the interceptor chain.
    pub async fn execute(&self, request: ApiRequest) -> Result<Envelope> {
        let request_id = format!("req_{}", uuid::Uuid::new_v4().as_simple());
        let span = info_span!(
            "api_call",
            request_id = %request_id,
            method = %request.method,
            path = %request.path,
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, mut request: ApiRequest) -> Result<Envelope> {
        // Token handed back by a refresh; the retry carries it even when
        // persisting it to the store failed.
        let mut renewed: Option<Secret<String>> = None;
        loop {
            // Generation first: a refresh finishing between these two reads
            // shows up as a newer generation, never as a stale token.
            let generation = self.inner.refresh.generation();
            let token = match renewed.take() {
                Some(token) => token,
                None => self
                    .access_token()
                    .await
                    .unwrap_or_else(|| Secret::new(String::new())),
            };

            let (status, body) = self.dispatch(&request, &token).await?;

            match classify(status, &body) {
                Inbound::Ok(envelope) => return Ok(envelope),
                Inbound::Error(payload) => {
                    debug!(http_status = status.as_u16(), "application error");
                    return Err(Error::Application(payload));
                }
                Inbound::Unauthorized if request.state.mark_retried() => {
                    debug!("inferred 401, refreshing access token");
                    match self.refresh(generation).await? {
                        RefreshOutcome::Renewed(token) => {
                            debug!("re-issuing request with refreshed token");
                            renewed = Some(token);
                            continue;
                        }
                        RefreshOutcome::Rejected => return Err(Error::SessionExpired),
                    }
                }
                Inbound::Unauthorized | Inbound::Unrecognized => {
                    debug!(
                        http_status = status.as_u16(),
                        state = ?request.state,
                        "response has no envelope, rejecting"
                    );
                    return Err(Error::Rejected {
                        status: status.as_u16(),
                    });
                }
            }
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: &Secret<String>,
    ) -> Result<(StatusCode, Vec<u8>)> {
        let url = join_url(&self.inner.base_url, &request.path);
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), &url)
            .header(AUTHORIZATION, token.bearer());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Http(format!("request to {url} failed: {e}")))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("reading response from {url}: {e}")))?;
        Ok((status, body.to_vec()))
    }

    /// Single-flight refresh.
    ///
    /// Only the caller that performs a rejected refresh purges the token and
    /// navigates; callers joining a finished refresh reuse its outcome.
    async fn refresh(&self, observed: u64) -> Result<RefreshOutcome> {
        let turn = self.inner.refresh.enter(observed).await;
        if let Some(outcome) = turn.completed() {
            debug!("joined a refresh that already completed");
            return Ok(outcome);
        }

        let outcome = request_access_token(&self.inner.http, &self.inner.refresh_url).await?;
        match &outcome {
            RefreshOutcome::Renewed(token) => {
                if let Err(e) = self
                    .inner
                    .store
                    .set(KEY_ACCESS_TOKEN, token.expose().clone())
                    .await
                {
                    warn!(error = %e, "failed to persist refreshed token");
                }
                info!("access token refreshed");
            }
            RefreshOutcome::Rejected => {
                if let Err(e) = self.inner.store.remove(KEY_ACCESS_TOKEN).await {
                    warn!(error = %e, "failed to purge rejected token");
                }
                warn!(route = %self.inner.login_route, "refresh rejected, redirecting to login");
                self.inner.navigator.redirect_to_login(&self.inner.login_route);
            }
        }
        turn.finish(outcome.clone());
        Ok(outcome)
    }
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    base_url: Option<String>,
    refresh_url: Option<String>,
    login_route: Option<String>,
    with_credentials: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    store: Option<Arc<dyn SessionStore>>,
    navigator: Option<Arc<dyn LoginNavigator>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            refresh_url: None,
            login_route: None,
            with_credentials: true,
            timeout: None,
            user_agent: None,
            store: None,
            navigator: None,
        }
    }
}

impl ApiClientBuilder {
    /// Base URL for relative request paths. Defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Refresh endpoint. Defaults to [`DEFAULT_REFRESH_URL`].
    pub fn refresh_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_url = Some(url.into());
        self
    }

    /// Route handed to the navigator. Defaults to [`DEFAULT_LOGIN_ROUTE`].
    pub fn login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = Some(route.into());
        self
    }

    /// Keep and send cookies on every call, refresh included. On by default.
    pub fn with_credentials(mut self, enabled: bool) -> Self {
        self.with_credentials = enabled;
        self
    }

    /// Per-request timeout. None by default: a hung call waits indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn LoginNavigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let base_url = self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        ensure_http_url("base_url", &base_url)?;
        let refresh_url = self
            .refresh_url
            .unwrap_or_else(|| DEFAULT_REFRESH_URL.to_string());
        ensure_http_url("refresh_url", &refresh_url)?;

        let store = self
            .store
            .ok_or_else(|| common::Error::Config("session store is required".into()))?;
        let navigator = self
            .navigator
            .ok_or_else(|| common::Error::Config("login navigator is required".into()))?;

        let mut http = reqwest::Client::builder()
            .cookie_store(self.with_credentials)
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            );
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| Error::Http(format!("building HTTP client: {e}")))?;

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base_url,
                refresh_url,
                login_route: self
                    .login_route
                    .unwrap_or_else(|| DEFAULT_LOGIN_ROUTE.to_string()),
                store,
                navigator,
                refresh: RefreshGate::default(),
            }),
        })
    }
}
