//! In-process loopback backend.
//!
//! Implements the complete feed runtime ABI in pure Rust, with no foreign
//! image involved. It exists for offline development and for the test
//! suite: the real runtime library cannot be redistributed with this
//! crate, but every bridge code path (attach caching, handle release,
//! exception draining, marshalling round-trips) is exercisable against
//! this backend unchanged.
//!
//! ## Behavior
//!
//! - Lifecycle entry points succeed and hand out heap tokens in place of
//!   isolate/thread/object handles.
//! - The thread exception slot is a real thread-local; [`raise`] plants an
//!   exception exactly as runtime code would.
//! - The property store is a process-wide string map.
//! - A last-event promise for the `Quote` discriminator completes
//!   immediately with a default quote for the requested symbol; promises
//!   for other discriminators never complete (useful for timeout paths).
//!
//! ## Instrumentation
//!
//! Attach, detach, release and publish traffic is counted process-wide so
//! tests can assert "exactly one foreign attach happened" and similar
//! properties.

use std::cell::Cell;
use std::collections::HashMap;
use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use super::abi::{IsolatePtr, IsolateThreadPtr, NativeException, ObjectListPtr, ObjectPtr};
use super::{Backend, NativeApi};
use crate::events::marshal;
use crate::events::native::{NativeEvent, NativeEventList};
use crate::events::{Event, EventKind, Quote};

// =============================================================================
// Backend State
// =============================================================================

static ATTACH_CALLS: AtomicUsize = AtomicUsize::new(0);
static DETACH_CALLS: AtomicUsize = AtomicUsize::new(0);
static RELEASE_CALLS: AtomicUsize = AtomicUsize::new(0);
static LIST_RELEASE_CALLS: AtomicUsize = AtomicUsize::new(0);
static PUBLISHED_EVENTS: AtomicUsize = AtomicUsize::new(0);

static PROPERTIES: Lazy<Mutex<HashMap<String, String>>> = Lazy::new(|| Mutex::new(HashMap::new()));

thread_local! {
    static PENDING_EXCEPTION: Cell<*mut NativeException> = const { Cell::new(ptr::null_mut()) };
}

static NEXT_TOKEN_SERIAL: AtomicUsize = AtomicUsize::new(1);

// Tokens carry a serial so every boxed token has a distinct heap address
// and an identity for debugging; handle comparisons rely on that.
struct IsolateToken {
    _serial: usize,
}

struct ThreadToken {
    _serial: usize,
}

fn next_serial() -> usize {
    NEXT_TOKEN_SERIAL.fetch_add(1, Ordering::Relaxed)
}

enum ObjectToken {
    Endpoint,
    Feed,
    Publisher,
    Subscription {
        symbols: Mutex<Vec<String>>,
    },
    Promise {
        result: AtomicPtr<NativeEvent>,
    },
    List,
}

fn to_c(s: &str) -> *mut c_char {
    CString::new(s).unwrap_or_default().into_raw()
}

unsafe fn read_str(raw: *const c_char) -> Option<String> {
    if raw.is_null() {
        return None;
    }
    Some(CStr::from_ptr(raw).to_string_lossy().into_owned())
}

unsafe fn free_exception(ex: *mut NativeException) {
    let ex = Box::from_raw(ex);
    for s in [ex.class_name, ex.message, ex.stack_trace] {
        if !s.is_null() {
            drop(CString::from_raw(s));
        }
    }
}

// =============================================================================
// Isolate Lifecycle
// =============================================================================

unsafe extern "C" fn lb_create_isolate(
    _params: *mut c_void,
    isolate_out: *mut IsolatePtr,
    thread_out: *mut IsolateThreadPtr,
) -> i32 {
    if isolate_out.is_null() || thread_out.is_null() {
        return 2; // null argument
    }
    *isolate_out = Box::into_raw(Box::new(IsolateToken {
        _serial: next_serial(),
    })) as IsolatePtr;
    *thread_out = Box::into_raw(Box::new(ThreadToken {
        _serial: next_serial(),
    })) as IsolateThreadPtr;
    ATTACH_CALLS.fetch_add(1, Ordering::Relaxed);
    0
}

unsafe extern "C" fn lb_attach_thread(
    _isolate: IsolatePtr,
    thread_out: *mut IsolateThreadPtr,
) -> i32 {
    if thread_out.is_null() {
        return 2;
    }
    *thread_out = Box::into_raw(Box::new(ThreadToken {
        _serial: next_serial(),
    })) as IsolateThreadPtr;
    ATTACH_CALLS.fetch_add(1, Ordering::Relaxed);
    0
}

unsafe extern "C" fn lb_detach_thread(thread: IsolateThreadPtr) -> i32 {
    if thread.is_null() {
        return 4; // unattached thread
    }
    drop(Box::from_raw(thread as *mut ThreadToken));
    DETACH_CALLS.fetch_add(1, Ordering::Relaxed);
    0
}

unsafe extern "C" fn lb_detach_all_threads_and_tear_down_isolate(thread: IsolateThreadPtr) -> i32 {
    if thread.is_null() {
        return 4;
    }
    drop(Box::from_raw(thread as *mut ThreadToken));
    DETACH_CALLS.fetch_add(1, Ordering::Relaxed);
    0
}

// =============================================================================
// Handle Release
// =============================================================================

unsafe extern "C" fn lb_object_release(_thread: IsolateThreadPtr, object: ObjectPtr) -> i32 {
    if object.is_null() {
        return -1;
    }
    RELEASE_CALLS.fetch_add(1, Ordering::Relaxed);
    let token = Box::from_raw(object as *mut ObjectToken);
    if let ObjectToken::Promise { result } = &*token {
        let unclaimed = result.swap(ptr::null_mut(), Ordering::AcqRel);
        marshal::free_native(unclaimed);
    }
    0
}

unsafe extern "C" fn lb_object_list_release(_thread: IsolateThreadPtr, list: ObjectListPtr) -> i32 {
    if list.is_null() {
        return -1;
    }
    LIST_RELEASE_CALLS.fetch_add(1, Ordering::Relaxed);
    drop(Box::from_raw(list as *mut ObjectToken));
    0
}

// =============================================================================
// Exception Bridge
// =============================================================================

unsafe extern "C" fn lb_get_and_clear_thread_exception(
    _thread: IsolateThreadPtr,
) -> *mut NativeException {
    PENDING_EXCEPTION.with(|slot| slot.replace(ptr::null_mut()))
}

unsafe extern "C" fn lb_exception_release(_thread: IsolateThreadPtr, ex: *mut NativeException) {
    if !ex.is_null() {
        free_exception(ex);
    }
}

// =============================================================================
// System Property Store
// =============================================================================

unsafe extern "C" fn lb_system_set_property(
    _thread: IsolateThreadPtr,
    key: *const c_char,
    value: *const c_char,
) -> i32 {
    let (Some(key), Some(value)) = (read_str(key), read_str(value)) else {
        return -1;
    };
    PROPERTIES.lock().insert(key, value);
    0
}

unsafe extern "C" fn lb_system_get_property(
    _thread: IsolateThreadPtr,
    key: *const c_char,
) -> *mut c_char {
    let Some(key) = read_str(key) else {
        return ptr::null_mut();
    };
    match PROPERTIES.lock().get(&key) {
        Some(value) => to_c(value),
        None => ptr::null_mut(),
    }
}

unsafe extern "C" fn lb_string_release(_thread: IsolateThreadPtr, s: *mut c_char) -> i32 {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
    0
}

// =============================================================================
// Endpoint / Feed / Subscription
// =============================================================================

unsafe extern "C" fn lb_endpoint_create(_thread: IsolateThreadPtr) -> ObjectPtr {
    Box::into_raw(Box::new(ObjectToken::Endpoint)) as ObjectPtr
}

unsafe extern "C" fn lb_endpoint_connect(
    _thread: IsolateThreadPtr,
    endpoint: ObjectPtr,
    address: *const c_char,
) -> i32 {
    if endpoint.is_null() || address.is_null() {
        return -1;
    }
    0
}

unsafe extern "C" fn lb_endpoint_disconnect(_thread: IsolateThreadPtr, endpoint: ObjectPtr) -> i32 {
    if endpoint.is_null() {
        return -1;
    }
    0
}

unsafe extern "C" fn lb_endpoint_close(_thread: IsolateThreadPtr, endpoint: ObjectPtr) -> i32 {
    if endpoint.is_null() {
        return -1;
    }
    0
}

unsafe extern "C" fn lb_endpoint_get_feed(
    _thread: IsolateThreadPtr,
    endpoint: ObjectPtr,
) -> ObjectPtr {
    if endpoint.is_null() {
        return ptr::null_mut();
    }
    Box::into_raw(Box::new(ObjectToken::Feed)) as ObjectPtr
}

unsafe extern "C" fn lb_endpoint_get_publisher(
    _thread: IsolateThreadPtr,
    endpoint: ObjectPtr,
) -> ObjectPtr {
    if endpoint.is_null() {
        return ptr::null_mut();
    }
    Box::into_raw(Box::new(ObjectToken::Publisher)) as ObjectPtr
}

unsafe extern "C" fn lb_feed_create_subscription(
    _thread: IsolateThreadPtr,
    feed: ObjectPtr,
    _clazz: i32,
) -> ObjectPtr {
    if feed.is_null() {
        return ptr::null_mut();
    }
    Box::into_raw(Box::new(ObjectToken::Subscription {
        symbols: Mutex::new(Vec::new()),
    })) as ObjectPtr
}

unsafe extern "C" fn lb_subscription_add_symbol(
    _thread: IsolateThreadPtr,
    subscription: ObjectPtr,
    symbol: *const c_char,
) -> i32 {
    if subscription.is_null() {
        return -1;
    }
    let Some(symbol) = read_str(symbol) else {
        return -1;
    };
    match &*(subscription as *const ObjectToken) {
        ObjectToken::Subscription { symbols, .. } => {
            symbols.lock().push(symbol);
            0
        }
        _ => -1,
    }
}

unsafe extern "C" fn lb_subscription_remove_symbol(
    _thread: IsolateThreadPtr,
    subscription: ObjectPtr,
    symbol: *const c_char,
) -> i32 {
    if subscription.is_null() {
        return -1;
    }
    let Some(symbol) = read_str(symbol) else {
        return -1;
    };
    match &*(subscription as *const ObjectToken) {
        ObjectToken::Subscription { symbols, .. } => {
            symbols.lock().retain(|s| *s != symbol);
            0
        }
        _ => -1,
    }
}

unsafe extern "C" fn lb_subscription_close(
    _thread: IsolateThreadPtr,
    subscription: ObjectPtr,
) -> i32 {
    if subscription.is_null() {
        return -1;
    }
    0
}

// =============================================================================
// Promises / Publishing
// =============================================================================

unsafe extern "C" fn lb_feed_get_last_event_promise(
    _thread: IsolateThreadPtr,
    feed: ObjectPtr,
    clazz: i32,
    symbol: *const c_char,
) -> ObjectPtr {
    if feed.is_null() {
        return ptr::null_mut();
    }
    let Some(symbol) = read_str(symbol) else {
        return ptr::null_mut();
    };

    // Only the quote discriminator has canned data; other promises stay
    // pending so timeout paths are reachable.
    let result = if clazz == EventKind::Quote.clazz() {
        marshal::to_native(&Event::Quote(Quote {
            symbol,
            ..Quote::default()
        }))
    } else {
        ptr::null_mut()
    };

    Box::into_raw(Box::new(ObjectToken::Promise {
        result: AtomicPtr::new(result),
    })) as ObjectPtr
}

unsafe extern "C" fn lb_promise_is_done(_thread: IsolateThreadPtr, promise: ObjectPtr) -> i32 {
    if promise.is_null() {
        return 0;
    }
    match &*(promise as *const ObjectToken) {
        ObjectToken::Promise { result } => (!result.load(Ordering::Acquire).is_null()) as i32,
        _ => 0,
    }
}

unsafe extern "C" fn lb_promise_get_result(
    _thread: IsolateThreadPtr,
    promise: ObjectPtr,
) -> *mut NativeEvent {
    if promise.is_null() {
        return ptr::null_mut();
    }
    match &*(promise as *const ObjectToken) {
        ObjectToken::Promise { result } => result.swap(ptr::null_mut(), Ordering::AcqRel),
        _ => ptr::null_mut(),
    }
}

unsafe extern "C" fn lb_publisher_publish_events(
    _thread: IsolateThreadPtr,
    publisher: ObjectPtr,
    list: *const NativeEventList,
) -> i32 {
    if publisher.is_null() || list.is_null() {
        return -1;
    }
    let size = (*list).size.max(0) as usize;
    if (*list).elements.is_null() {
        return 0;
    }
    let mut published = 0;
    for i in 0..size {
        if !(*(*list).elements.add(i)).is_null() {
            published += 1;
        }
    }
    PUBLISHED_EVENTS.fetch_add(published, Ordering::Relaxed);
    0
}

unsafe extern "C" fn lb_event_release(_thread: IsolateThreadPtr, event: *mut NativeEvent) -> i32 {
    marshal::free_native(event);
    0
}

// =============================================================================
// Public Surface
// =============================================================================

/// The loopback entry-point table.
pub const API: NativeApi = NativeApi {
    create_isolate: lb_create_isolate,
    attach_thread: lb_attach_thread,
    detach_thread: lb_detach_thread,
    detach_all_threads_and_tear_down_isolate: lb_detach_all_threads_and_tear_down_isolate,
    object_release: lb_object_release,
    object_list_release: lb_object_list_release,
    get_and_clear_thread_exception: lb_get_and_clear_thread_exception,
    exception_release: lb_exception_release,
    system_set_property: lb_system_set_property,
    system_get_property: lb_system_get_property,
    string_release: lb_string_release,
    endpoint_create: lb_endpoint_create,
    endpoint_connect: lb_endpoint_connect,
    endpoint_disconnect: lb_endpoint_disconnect,
    endpoint_close: lb_endpoint_close,
    endpoint_get_feed: lb_endpoint_get_feed,
    endpoint_get_publisher: lb_endpoint_get_publisher,
    feed_create_subscription: lb_feed_create_subscription,
    subscription_add_symbol: lb_subscription_add_symbol,
    subscription_remove_symbol: lb_subscription_remove_symbol,
    subscription_close: lb_subscription_close,
    feed_get_last_event_promise: lb_feed_get_last_event_promise,
    promise_is_done: lb_promise_is_done,
    promise_get_result: lb_promise_get_result,
    publisher_publish_events: lb_publisher_publish_events,
    event_release: lb_event_release,
};

/// A loopback [`Backend`] value.
pub fn backend() -> Backend {
    Backend::new(API, None)
}

/// Installs the loopback backend for the process-wide isolate.
///
/// Must run before the first [`crate::Isolate::instance`] call; once the
/// isolate exists its backend cannot change.
pub fn install() {
    crate::isolate::install_backend(backend());
}

/// Plants a pending exception in the calling thread's slot, as runtime
/// code would on failure.
pub fn raise(class_name: &str, message: &str, stack_trace: &str) {
    let ex = Box::into_raw(Box::new(NativeException {
        class_name: to_c(class_name),
        message: to_c(message),
        stack_trace: to_c(stack_trace),
    }));
    PENDING_EXCEPTION.with(|slot| {
        let prev = slot.replace(ex);
        if !prev.is_null() {
            // SAFETY: a non-null slot value is always a planted exception
            // that has not been handed out yet.
            unsafe { free_exception(prev) };
        }
    });
}

/// Allocates an opaque object token releasable through the single-object
/// release entry point, as if the runtime had handed it out.
pub fn new_object() -> ObjectPtr {
    Box::into_raw(Box::new(ObjectToken::Endpoint)) as ObjectPtr
}

/// Allocates an opaque list token releasable only through the batch list
/// release entry point.
pub fn new_object_list() -> ObjectListPtr {
    Box::into_raw(Box::new(ObjectToken::List)) as ObjectListPtr
}

/// Total foreign-side attach calls (isolate creation included).
pub fn attach_calls() -> usize {
    ATTACH_CALLS.load(Ordering::Relaxed)
}

/// Total foreign-side detach calls.
pub fn detach_calls() -> usize {
    DETACH_CALLS.load(Ordering::Relaxed)
}

/// Total single-object release calls.
pub fn release_calls() -> usize {
    RELEASE_CALLS.load(Ordering::Relaxed)
}

/// Total batch list release calls.
pub fn list_release_calls() -> usize {
    LIST_RELEASE_CALLS.load(Ordering::Relaxed)
}

/// Total events accepted by the publish entry point.
pub fn published_events() -> usize {
    PUBLISHED_EVENTS.load(Ordering::Relaxed)
}
