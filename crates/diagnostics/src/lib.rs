// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the buildfs crates.
//!
//! Levels are chosen with the `BUILDFS_LOG` environment variable:
//! - `BUILDFS_LOG=off` (default): nothing
//! - `BUILDFS_LOG=error` / `warn` / `info`: progressively more
//! - `BUILDFS_LOG=debug`: per-operation detail (symlink expansion,
//!   digest fallbacks, mount table probes)
//!
//! Events go to stderr through `emit_term`. Library code logs with the
//! macros below using emit's named-property templates:
//! `debug!("resolving {path}", path: path.as_str())`.

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable read by [`init_diagnostics`].
pub const LOG_ENV: &str = "BUILDFS_LOG";

static INIT: Once = Once::new();

/// Minimum level for a `BUILDFS_LOG` value. `Ok(None)` means logging is
/// off; unrecognized values are returned as the error.
pub fn parse_level(value: &str) -> Result<Option<emit::Level>, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => Ok(None),
        "error" => Ok(Some(emit::Level::Error)),
        "warn" => Ok(Some(emit::Level::Warn)),
        "info" => Ok(Some(emit::Level::Info)),
        "debug" => Ok(Some(emit::Level::Debug)),
        _ => Err(value.to_string()),
    }
}

/// Initialize diagnostics from `BUILDFS_LOG`.
///
/// Call once at program startup; later calls do nothing.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let value = std::env::var(LOG_ENV).unwrap_or_default();
        let (level, unknown) = match parse_level(&value) {
            Ok(None) => return,
            Ok(Some(level)) => (level, None),
            Err(unknown) => (emit::Level::Info, Some(unknown)),
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        if let Some(unknown) = unknown {
            emit::warn!("unknown {env} value {value}, using info", env: LOG_ENV, value: unknown);
        }

        // The runtime lives for the rest of the process.
        std::mem::forget(rt);
    });
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

/// Operations a user might want to see in normal use.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Detailed diagnostics for debugging.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Recoverable problems and fallbacks.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Failures that stop an operation.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}
