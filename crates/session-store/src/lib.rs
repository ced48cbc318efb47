//! Persistent key/value storage for the storefront session
//!
//! The API client keeps exactly one credential, the access token, under
//! [`KEY_ACCESS_TOKEN`]. The store is injected into the client as a
//! [`SessionStore`] capability so tests can use [`MemorySessionStore`] while
//! the CLI persists to disk with [`FileSessionStore`].

pub mod error;
pub mod file;
pub mod memory;

pub use error::{Error, Result};
pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use std::future::Future;
use std::pin::Pin;

/// Key under which the bearer access token is stored.
pub const KEY_ACCESS_TOKEN: &str = "access_token";

/// Boxed future returned by [`SessionStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Key/value capability backing the session.
///
/// Reads are infallible: a store that cannot produce a value reports `None`
/// and the request goes out with an empty bearer token. Writes may fail on
/// persistence and return the error to the caller.
///
/// Uses boxed futures so the client can hold an `Arc<dyn SessionStore>`.
pub trait SessionStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set<'a>(&'a self, key: &'a str, value: String) -> StoreFuture<'a, Result<()>>;

    /// Delete `key`, returning the previous value if there was one.
    fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Result<Option<String>>>;
}
