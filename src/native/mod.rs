//! The feed runtime's native ABI and the backends that provide it.
//!
//! Every entry point takes an isolate thread handle first, typed arguments
//! next, and returns a value, an opaque pointer, or a status code. The
//! whole ABI lives in one function-pointer table ([`NativeApi`]) so the
//! rest of the crate is indifferent to where the entry points come from:
//!
//! - [`loader`] resolves them from the pre-compiled runtime shared library;
//! - [`loopback`] implements them in-process for offline development and
//!   for the test suite.

pub mod abi;
pub mod loader;
pub mod loopback;

use std::ffi::c_char;

use abi::{IsolatePtr, IsolateThreadPtr, NativeException, ObjectListPtr, ObjectPtr};

use crate::events::native::{NativeEvent, NativeEventList};

/// The complete entry-point table of the feed runtime.
///
/// Status-returning entry points use the isolate entry-point codes for
/// lifecycle calls (see [`abi::EntryPointStatus`]) and `0` / negative for
/// domain calls. Pointer-returning entry points signal failure with null
/// plus, usually, a pending thread exception.
#[derive(Clone, Copy)]
pub struct NativeApi {
    // -- isolate lifecycle ----------------------------------------------------
    pub create_isolate:
        unsafe extern "C" fn(*mut std::ffi::c_void, *mut IsolatePtr, *mut IsolateThreadPtr) -> i32,
    pub attach_thread: unsafe extern "C" fn(IsolatePtr, *mut IsolateThreadPtr) -> i32,
    pub detach_thread: unsafe extern "C" fn(IsolateThreadPtr) -> i32,
    pub detach_all_threads_and_tear_down_isolate: unsafe extern "C" fn(IsolateThreadPtr) -> i32,

    // -- handle release -------------------------------------------------------
    pub object_release: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> i32,
    pub object_list_release: unsafe extern "C" fn(IsolateThreadPtr, ObjectListPtr) -> i32,

    // -- exception bridge -----------------------------------------------------
    pub get_and_clear_thread_exception:
        unsafe extern "C" fn(IsolateThreadPtr) -> *mut NativeException,
    pub exception_release: unsafe extern "C" fn(IsolateThreadPtr, *mut NativeException),

    // -- system property store ------------------------------------------------
    pub system_set_property:
        unsafe extern "C" fn(IsolateThreadPtr, *const c_char, *const c_char) -> i32,
    pub system_get_property: unsafe extern "C" fn(IsolateThreadPtr, *const c_char) -> *mut c_char,
    pub string_release: unsafe extern "C" fn(IsolateThreadPtr, *mut c_char) -> i32,

    // -- endpoint -------------------------------------------------------------
    pub endpoint_create: unsafe extern "C" fn(IsolateThreadPtr) -> ObjectPtr,
    pub endpoint_connect: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr, *const c_char) -> i32,
    pub endpoint_disconnect: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> i32,
    pub endpoint_close: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> i32,
    pub endpoint_get_feed: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> ObjectPtr,
    pub endpoint_get_publisher: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> ObjectPtr,

    // -- feed / subscription --------------------------------------------------
    pub feed_create_subscription: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr, i32) -> ObjectPtr,
    pub subscription_add_symbol:
        unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr, *const c_char) -> i32,
    pub subscription_remove_symbol:
        unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr, *const c_char) -> i32,
    pub subscription_close: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> i32,

    // -- promises -------------------------------------------------------------
    pub feed_get_last_event_promise:
        unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr, i32, *const c_char) -> ObjectPtr,
    pub promise_is_done: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> i32,
    pub promise_get_result: unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr) -> *mut NativeEvent,

    // -- publishing / runtime-owned records -----------------------------------
    pub publisher_publish_events:
        unsafe extern "C" fn(IsolateThreadPtr, ObjectPtr, *const NativeEventList) -> i32,
    pub event_release: unsafe extern "C" fn(IsolateThreadPtr, *mut NativeEvent) -> i32,
}

/// A resolved ABI plus whatever owns the code behind it.
///
/// When the entry points come from a shared library, the library handle
/// must outlive every call through the table; it is kept here.
pub struct Backend {
    pub api: NativeApi,
    _library: Option<libloading::Library>,
}

impl Backend {
    pub(crate) fn new(api: NativeApi, library: Option<libloading::Library>) -> Self {
        Backend {
            api,
            _library: library,
        }
    }
}
