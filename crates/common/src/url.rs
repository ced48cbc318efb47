//! URL helpers for the base and refresh endpoints

use crate::error::{Error, Result};

/// Reject anything that is not an absolute `http://` or `https://` URL.
///
/// `field` names the setting in the error message so a bad config file points
/// at the offending key.
pub fn ensure_http_url(field: &str, value: &str) -> Result<()> {
    let rest = value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .ok_or_else(|| {
            Error::Config(format!(
                "{field} must start with http:// or https://, got: {value}"
            ))
        })?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(Error::Config(format!("{field} has no host: {value}")));
    }
    Ok(())
}

/// Join a base URL and a relative path with exactly one `/` between them.
///
/// Absolute URLs in `path` are returned unchanged, matching how a browser
/// HTTP client resolves a full URL against its base.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(ensure_http_url("base_url", "http://localhost:4000/api/v1/").is_ok());
        assert!(ensure_http_url("base_url", "https://shop.example.com").is_ok());
    }

    #[test]
    fn rejects_missing_scheme() {
        let err = ensure_http_url("base_url", "localhost:4000").unwrap_err();
        assert!(
            err.to_string().contains("base_url must start with http"),
            "got: {err}"
        );
    }

    #[test]
    fn rejects_empty_host() {
        assert!(ensure_http_url("refresh_url", "https://").is_err());
        assert!(ensure_http_url("refresh_url", "http:///auth/refresh").is_err());
    }

    #[test]
    fn join_handles_slashes() {
        assert_eq!(
            join_url("http://localhost:4000/api/v1/", "/item"),
            "http://localhost:4000/api/v1/item"
        );
        assert_eq!(
            join_url("http://localhost:4000/api/v1", "item/7"),
            "http://localhost:4000/api/v1/item/7"
        );
        assert_eq!(
            join_url("http://localhost:4000/api/v1/", ""),
            "http://localhost:4000/api/v1"
        );
    }

    #[test]
    fn join_keeps_absolute_paths() {
        assert_eq!(
            join_url("http://localhost:4000/api/v1", "http://other:8089/api/companies"),
            "http://other:8089/api/companies"
        );
    }
}
