//! Resolution of the feed runtime ABI from a shared library.
//!
//! The runtime is a pre-compiled native image distributed as a shared
//! library. The library is located through [`LIBRARY_ENV_VAR`], falling
//! back to [`DEFAULT_LIBRARY_NAME`] on the platform search path. Loading
//! happens once, during isolate bootstrap; a missing library or symbol
//! leaves the isolate permanently unusable.

use std::env;
use std::ffi::OsString;

use tracing::info;

use super::{Backend, NativeApi};
use crate::constants::{DEFAULT_LIBRARY_NAME, LIBRARY_ENV_VAR};

macro_rules! resolve {
    ($lib:expr, $name:literal) => {
        *$lib.get(concat!($name, "\0").as_bytes())?
    };
}

/// Loads the runtime library named by the environment, or the platform
/// default.
pub fn load_default() -> Result<Backend, libloading::Error> {
    let path = env::var_os(LIBRARY_ENV_VAR).unwrap_or_else(|| OsString::from(DEFAULT_LIBRARY_NAME));
    load(&path)
}

/// Loads the runtime library at `path` and resolves every entry point.
pub fn load(path: &std::ffi::OsStr) -> Result<Backend, libloading::Error> {
    // SAFETY: the feed runtime library's initialization is limited to its
    // own image; it runs no arbitrary static constructors of ours.
    let lib = unsafe { libloading::Library::new(path)? };

    // SAFETY: each symbol is declared with the exact signature the runtime
    // image exports for it.
    let api = unsafe {
        NativeApi {
            create_isolate: resolve!(lib, "gfeed_create_isolate"),
            attach_thread: resolve!(lib, "gfeed_attach_thread"),
            detach_thread: resolve!(lib, "gfeed_detach_thread"),
            detach_all_threads_and_tear_down_isolate: resolve!(
                lib,
                "gfeed_detach_all_threads_and_tear_down_isolate"
            ),
            object_release: resolve!(lib, "gfeed_object_release"),
            object_list_release: resolve!(lib, "gfeed_object_list_release"),
            get_and_clear_thread_exception: resolve!(lib, "gfeed_get_and_clear_thread_exception"),
            exception_release: resolve!(lib, "gfeed_exception_release"),
            system_set_property: resolve!(lib, "gfeed_system_set_property"),
            system_get_property: resolve!(lib, "gfeed_system_get_property"),
            string_release: resolve!(lib, "gfeed_string_release"),
            endpoint_create: resolve!(lib, "gfeed_endpoint_create"),
            endpoint_connect: resolve!(lib, "gfeed_endpoint_connect"),
            endpoint_disconnect: resolve!(lib, "gfeed_endpoint_disconnect"),
            endpoint_close: resolve!(lib, "gfeed_endpoint_close"),
            endpoint_get_feed: resolve!(lib, "gfeed_endpoint_get_feed"),
            endpoint_get_publisher: resolve!(lib, "gfeed_endpoint_get_publisher"),
            feed_create_subscription: resolve!(lib, "gfeed_feed_create_subscription"),
            subscription_add_symbol: resolve!(lib, "gfeed_subscription_add_symbol"),
            subscription_remove_symbol: resolve!(lib, "gfeed_subscription_remove_symbol"),
            subscription_close: resolve!(lib, "gfeed_subscription_close"),
            feed_get_last_event_promise: resolve!(lib, "gfeed_feed_get_last_event_promise"),
            promise_is_done: resolve!(lib, "gfeed_promise_is_done"),
            promise_get_result: resolve!(lib, "gfeed_promise_get_result"),
            publisher_publish_events: resolve!(lib, "gfeed_publisher_publish_events"),
            event_release: resolve!(lib, "gfeed_event_release"),
        }
    };

    info!(library = %path.to_string_lossy(), "feed runtime library loaded");

    Ok(Backend::new(api, Some(lib)))
}
