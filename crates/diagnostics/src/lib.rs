//! Logging setup shared by every cloudnav crate.
//!
//! Levels come from the `CLOUDNAV_LOG` environment variable:
//! - `off` (default) - nothing is emitted
//! - `error`, `warn`, `info`, `debug` - minimum level written to stderr
//!
//! The CLI may override the environment with [`init_with_level`].

use std::sync::Once;

// Re-export emit so the macros resolve in downstream crates
pub use emit;

/// Environment variable consulted by [`init_diagnostics`]
pub const LOG_ENV: &str = "CLOUDNAV_LOG";

static INIT: Once = Once::new();

/// Parsed logging level. `None` means logging is off.
fn parse_level(level: &str) -> Result<Option<emit::Level>, String> {
    match level.to_ascii_lowercase().as_str() {
        "off" | "" => Ok(None),
        "error" => Ok(Some(emit::Level::Error)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "info" => Ok(Some(emit::Level::Info)),
        "debug" => Ok(Some(emit::Level::Debug)),
        other => Err(other.to_string()),
    }
}

/// Initialize diagnostics from `CLOUDNAV_LOG`.
///
/// Safe to call multiple times; only the first call (of this or
/// [`init_with_level`]) takes effect.
pub fn init_diagnostics() {
    let level = std::env::var(LOG_ENV).unwrap_or_else(|_| "off".to_string());
    init_with_level(&level);
}

/// Initialize diagnostics at an explicit level, ignoring the environment.
pub fn init_with_level(level: &str) {
    INIT.call_once(|| {
        let (min, unknown) = match parse_level(level) {
            Ok(None) => return,
            Ok(Some(min)) => (min, None),
            Err(unknown) => (emit::Level::Info, Some(unknown)),
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        if let Some(unknown) = unknown {
            emit::warn!("unknown log level {unknown}, using info", unknown: unknown.as_str());
        }

        // The runtime lives for the whole process; the CLI exits right after one command.
        std::mem::forget(rt);
    });
}

/// Log normal operations a user may want to see (remote calls, resets).
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log internal detail: stack mutations, store reads and writes.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable problems, e.g. state that could not be persisted.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log conditions that stop navigation, e.g. a corrupt store.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
