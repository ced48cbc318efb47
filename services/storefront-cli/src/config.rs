//! Configuration types and loading
//!
//! Config precedence: env vars > config file > defaults. The file itself is
//! found via `--config`, then `CONFIG_PATH`, then `storefront.toml` in the
//! working directory. Only the default file may be absent.

use api_client::{DEFAULT_BASE_URL, DEFAULT_LOGIN_ROUTE, DEFAULT_REFRESH_URL, SERVER_URL_ENV};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "storefront.toml";

/// Overrides `session.token_file`.
pub const TOKEN_FILE_ENV: &str = "STOREFRONT_TOKEN_FILE";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
}

/// Backend endpoints and HTTP behaviour
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub refresh_url: String,
    pub login_route: String,
    pub with_credentials: bool,
    /// Unset means no client-side timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_url: DEFAULT_REFRESH_URL.to_string(),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            with_credentials: true,
            timeout_secs: None,
        }
    }
}

/// Where the access token lives between runs
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub token_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: PathBuf::from(".storefront/session.json"),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file, then overlay environment variables.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.finish()
    }

    /// Load from the resolved path. A missing default file yields the
    /// built-in defaults; a missing explicit file is an error.
    pub fn discover(cli_path: Option<&str>) -> common::Result<(Self, Option<PathBuf>)> {
        let path = Self::resolve_path(cli_path);
        if path == Path::new(DEFAULT_CONFIG_FILE) && !path.exists() {
            return Ok((Config::default().finish()?, None));
        }
        Ok((Self::load(&path)?, Some(path)))
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    fn finish(mut self) -> common::Result<Self> {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            self.api.base_url = url;
        }
        if let Ok(file) = std::env::var(TOKEN_FILE_ENV) {
            self.session.token_file = PathBuf::from(file);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> common::Result<()> {
        common::ensure_http_url("base_url", &self.api.base_url)?;
        common::ensure_http_url("refresh_url", &self.api.refresh_url)?;

        if self.api.timeout_secs == Some(0) {
            return Err(common::Error::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.login_route.trim().is_empty() {
            return Err(common::Error::Config("login_route must not be empty".into()));
        }

        if self.session.token_file.as_os_str().is_empty() {
            return Err(common::Error::Config("token_file must not be empty".into()));
        }

        Ok(())
    }
}
