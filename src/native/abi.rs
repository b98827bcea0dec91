//! Raw C ABI types shared by every feed runtime entry point.
//!
//! The feed runtime is a GraalVM native image. Its entry points take an
//! isolate thread handle as the first argument and report failure either
//! through an entry-point status code, a null result pointer, or a pending
//! thread exception (see [`crate::exception`]).

use std::ffi::c_char;
use std::fmt;
use std::os::raw::c_void;

/// Opaque pointer to the isolate (the embedded runtime instance).
pub type IsolatePtr = *mut c_void;

/// Opaque pointer to a per-thread isolate attachment.
pub type IsolateThreadPtr = *mut c_void;

/// Opaque pointer to an object living on the isolate heap.
pub type ObjectPtr = *mut c_void;

/// Opaque pointer to an isolate-owned array-of-handles value.
pub type ObjectListPtr = *mut c_void;

/// Exception record handed out by the runtime's get-and-clear entry point.
///
/// All three strings are owned by the runtime; the record must be given
/// back through the exception release entry point after its fields have
/// been copied out.
#[repr(C)]
pub struct NativeException {
    pub class_name: *mut c_char,
    pub message: *mut c_char,
    pub stack_trace: *mut c_char,
}

/// Status code returned by isolate lifecycle entry points.
///
/// The code set is closed and fixed by the runtime image; codes outside the
/// known set are kept verbatim and described as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPointStatus(pub i32);

impl EntryPointStatus {
    pub const NO_ERROR: EntryPointStatus = EntryPointStatus(0);
    pub const UNSPECIFIED: EntryPointStatus = EntryPointStatus(1);
    pub const NULL_ARGUMENT: EntryPointStatus = EntryPointStatus(2);
    pub const UNATTACHED_THREAD: EntryPointStatus = EntryPointStatus(4);
    pub const UNINITIALIZED_ISOLATE: EntryPointStatus = EntryPointStatus(5);
    pub const LOCATE_IMAGE_FAILED: EntryPointStatus = EntryPointStatus(6);
    pub const OPEN_IMAGE_FAILED: EntryPointStatus = EntryPointStatus(7);
    pub const MAP_HEAP_FAILED: EntryPointStatus = EntryPointStatus(8);
    pub const PROTECT_HEAP_FAILED: EntryPointStatus = EntryPointStatus(9);
    pub const UNSUPPORTED_ISOLATE_PARAMETERS_VERSION: EntryPointStatus = EntryPointStatus(10);
    pub const THREADING_INITIALIZATION_FAILED: EntryPointStatus = EntryPointStatus(11);
    pub const UNCAUGHT_EXCEPTION: EntryPointStatus = EntryPointStatus(12);
    pub const ISOLATE_INITIALIZATION_FAILED: EntryPointStatus = EntryPointStatus(13);
    pub const RESERVE_ADDRESS_SPACE_FAILED: EntryPointStatus = EntryPointStatus(801);
    pub const INSUFFICIENT_ADDRESS_SPACE: EntryPointStatus = EntryPointStatus(802);

    /// Whether the entry point reported success.
    pub fn is_ok(self) -> bool {
        self == Self::NO_ERROR
    }

    /// Human-readable description of the status code.
    pub fn description(self) -> &'static str {
        match self.0 {
            0 => "no error occurred",
            1 => "an unspecified error occurred",
            2 => "an argument was null",
            4 => "the specified thread is not attached to the isolate",
            5 => "the specified isolate is unknown",
            6 => "locating the image file failed",
            7 => "opening the located image file failed",
            8 => "mapping the heap from the image file into memory failed",
            9 => "setting the protection of the heap memory failed",
            10 => "the version of the specified isolate parameters is unsupported",
            11 => "initialization of threading in the isolate failed",
            12 => "some exception is not caught",
            13 => "initialization of the isolate failed",
            801 => "reserving address space for the new isolate failed",
            802 => "the image heap does not fit in the available address space",
            _ => "unknown entry point status",
        }
    }
}

impl fmt::Display for EntryPointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description(), self.0)
    }
}
