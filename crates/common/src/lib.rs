//! Types shared by the storefront client crates

mod error;
mod secret;
mod url;

pub use error::{Error, Result};
pub use secret::Secret;
pub use url::{ensure_http_url, join_url};
