//! The per-thread exception bridge.
//!
//! The runtime reports failures of pointer-returning entry points through
//! a per-thread pending-exception slot rather than through return values.
//! The protocol is get-and-clear: reading the slot empties it, the
//! diagnostic strings are copied into owned storage, and the native
//! exception record goes straight back to the runtime. A checked slot is
//! therefore always left clear, and the record is never kept alive on the
//! local side.

use tracing::debug;

use crate::error::{Error, Result};
use crate::events::marshal::read_c_string;
use crate::isolate::AttachedThread;
use crate::native::abi::EntryPointStatus;
use crate::native::NativeApi;

/// Drains the calling thread's pending-exception slot.
///
/// Returns `Ok(())` when the slot is empty, otherwise
/// [`Error::ForeignException`] carrying owned copies of the message, class
/// name, and stack trace.
pub(crate) fn check_pending(api: &NativeApi, thread: AttachedThread) -> Result<()> {
    // SAFETY: the thread handle is this thread's live attachment.
    let raw = unsafe { (api.get_and_clear_thread_exception)(thread.as_ptr()) };
    if raw.is_null() {
        return Ok(());
    }

    // SAFETY: a non-null record is a live exception owned by the runtime;
    // its string fields are valid until the release below.
    let err = unsafe {
        Error::ForeignException {
            message: read_c_string((*raw).message),
            class_name: read_c_string((*raw).class_name),
            stack_trace: read_c_string((*raw).stack_trace),
        }
    };

    // SAFETY: the record came from get_and_clear on this attachment and is
    // released exactly once.
    unsafe { (api.exception_release)(thread.as_ptr(), raw) };

    debug!(error = %err, "foreign exception drained");
    Err(err)
}

/// Interprets a pointer-returning entry point's result: null means failure,
/// explained by the pending exception when one exists, otherwise reported
/// as [`Error::UnspecifiedFailure`] naming the entry point.
pub(crate) fn expect_non_null<T>(
    api: &NativeApi,
    thread: AttachedThread,
    ptr: *mut T,
    entry_point: &'static str,
) -> Result<*mut T> {
    if !ptr.is_null() {
        return Ok(ptr);
    }
    check_pending(api, thread)?;
    Err(Error::UnspecifiedFailure { entry_point })
}

/// Interprets a status-returning entry point's result the same way: a
/// negative status is explained by the pending exception when one exists.
pub(crate) fn expect_success(
    api: &NativeApi,
    thread: AttachedThread,
    status: i32,
    entry_point: &'static str,
) -> Result<()> {
    if status >= 0 {
        return Ok(());
    }
    check_pending(api, thread)?;
    debug!(status = %EntryPointStatus(status), entry_point, "entry point failed");
    Err(Error::UnspecifiedFailure { entry_point })
}
