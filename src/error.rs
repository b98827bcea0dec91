//! Error types for the feed runtime bridge.

use crate::native::abi::EntryPointStatus;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while calling into the feed runtime.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // =========================================================================
    // Isolate Lifecycle Errors
    // =========================================================================
    /// The process-wide isolate could not be created, or has been torn down.
    ///
    /// Fatal for the process: no bridge operation can succeed afterwards.
    /// Creation is never retried automatically.
    #[error("feed runtime isolate is not available")]
    RuntimeUnavailable,

    /// The calling thread could not be attached to the isolate.
    ///
    /// Local to the thread and the call; a fresh call may retry.
    #[error("failed to attach thread to isolate: {status}")]
    AttachFailed { status: EntryPointStatus },

    // =========================================================================
    // Handle Errors
    // =========================================================================
    /// An operation was attempted on an absent (null or moved-out) handle.
    ///
    /// Raised before any native call, so the runtime never sees the null.
    #[error("invalid handle passed to '{operation}'")]
    InvalidHandle { operation: &'static str },

    // =========================================================================
    // Foreign Call Errors
    // =========================================================================
    /// A native call raised an exception inside the feed runtime.
    ///
    /// Carries the exception message, the originating class name and the
    /// formatted stack trace read out of the runtime before the foreign
    /// exception object was released.
    #[error("runtime exception of type '{class_name}' was thrown: {message}")]
    ForeignException {
        message: String,
        class_name: String,
        stack_trace: String,
    },

    /// A native call failed (null result or negative status) without
    /// populating the thread exception slot.
    #[error("native call '{entry_point}' failed without a pending exception")]
    UnspecifiedFailure { entry_point: &'static str },
}
