//! "Go to login" for a terminal session

use std::io::Write;

use api_client::LoginNavigator;
use tracing::warn;

/// Tells the operator to sign in again. Output goes to any writer so stdout
/// stays clean for command results.
pub struct TerminalNavigator<W> {
    out: std::sync::Mutex<W>,
}

impl<W: Write + Send> TerminalNavigator<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: std::sync::Mutex::new(out),
        }
    }
}

impl TerminalNavigator<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> LoginNavigator for TerminalNavigator<W> {
    fn redirect_to_login(&self, route: &str) {
        warn!(route, "session expired, login required");
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(
                out,
                "session expired: sign in at {route} and run `storefront token set <TOKEN>`"
            );
        }
    }
}
