// Error mapping shared by the commands, and the text a user finally sees

use anyhow::{Result, anyhow};
use drive::DriveError;
use navcache::NavError;

/// Extension trait for Results to provide standardized error mapping
pub trait ErrorContext<T> {
    /// Map error with a context message for common "Failed to..." patterns
    fn with_context_msg(self, msg: &str) -> Result<T>;

    /// Common error mapping for local file operations
    fn file_context(self, operation: &str, path: &str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context_msg(self, msg: &str) -> Result<T> {
        self.map_err(|e| anyhow!("{}: {}", msg, e))
    }

    fn file_context(self, operation: &str, path: &str) -> Result<T> {
        self.with_context_msg(&format!("Failed to {} {}", operation, path))
    }
}

const RESET_HINT: &str = "run `cloudnav reset` to start over";

/// Render a command failure for the terminal.
///
/// Store problems get a hint to reset; everything else is the error's own text.
#[must_use]
pub fn user_message(err: &anyhow::Error) -> String {
    let nav = err
        .downcast_ref::<NavError>()
        .or_else(|| match err.downcast_ref::<DriveError>() {
            Some(DriveError::Nav(nav)) => Some(nav),
            _ => None,
        });
    match nav {
        Some(nav) if nav.needs_reset() => format!("{nav}; {RESET_HINT}"),
        Some(nav @ NavError::NotYetNavigated) => format!("{nav}; try `cloudnav ls` first"),
        _ => format!("{err}"),
    }
}
