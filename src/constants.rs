//! Crate-wide constants for the feed runtime bridge.
//!
//! These constants are the single source of truth for library discovery
//! and marshalling bounds throughout the codebase.

use std::time::Duration;

// =============================================================================
// Runtime Library Discovery
// =============================================================================

/// Environment variable naming the feed runtime shared library to load.
///
/// When set, its value is passed verbatim to the dynamic loader. When unset,
/// [`DEFAULT_LIBRARY_NAME`] is used and resolved through the platform's
/// normal library search path.
pub const LIBRARY_ENV_VAR: &str = "GRAALFEED_LIBRARY";

/// Default feed runtime library name on Linux and other unix systems.
#[cfg(all(target_family = "unix", not(target_os = "macos")))]
pub const DEFAULT_LIBRARY_NAME: &str = "libgfeed.so";

/// Default feed runtime library name on macOS.
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY_NAME: &str = "libgfeed.dylib";

/// Default feed runtime library name on Windows.
#[cfg(target_family = "windows")]
pub const DEFAULT_LIBRARY_NAME: &str = "gfeed.dll";

// =============================================================================
// Marshalling Bounds
// =============================================================================

/// Maximum element count of a native event list.
///
/// The native list discriminator (`size`) is a signed 32-bit integer;
/// requested sizes are clamped to this bound rather than rejected.
pub const MAX_LIST_LEN: usize = i32::MAX as usize;

// =============================================================================
// Promise Polling
// =============================================================================

/// Interval between completion checks while blocking on a promise.
///
/// The bridge has no suspension mechanism; promise results are obtained by
/// polling the runtime until done or timed out.
pub const PROMISE_POLL_INTERVAL: Duration = Duration::from_millis(1);
