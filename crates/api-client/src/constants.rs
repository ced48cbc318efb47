//! Default endpoints for a locally running storefront backend

/// Base URL used when neither config nor environment supplies one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000/api/v1/";

/// Refresh endpoint. Called with cookies only, never with a bearer token.
pub const DEFAULT_REFRESH_URL: &str = "http://localhost:4000/api/v1/auth/refresh";

/// Route the user is sent to when the session cannot be recovered.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Environment variable overriding the base URL.
pub const SERVER_URL_ENV: &str = "STOREFRONT_SERVER_URL";

/// `User-Agent` sent when the caller does not configure one.
pub const DEFAULT_USER_AGENT: &str = concat!("storefront-client/", env!("CARGO_PKG_VERSION"));
