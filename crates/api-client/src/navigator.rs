//! Login navigation seam
//!
//! In a browser the client forces a full-page replace navigation to the login
//! route when the session cannot be refreshed. Here that side effect is an
//! injected capability so each front end decides what "go to login" means.

use tracing::warn;

/// Receives the forced navigation to the login route.
pub trait LoginNavigator: Send + Sync {
    /// Called once per rejected refresh, after the token has been purged.
    fn redirect_to_login(&self, route: &str);
}

/// Navigator that only records the redirect in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl LoginNavigator for TracingNavigator {
    fn redirect_to_login(&self, route: &str) {
        warn!(route, "session expired, login required");
    }
}
