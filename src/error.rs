use thiserror::Error;

/// Result type used throughout the bridge.
pub type Result<T> = std::result::Result<T, Error>;

/// Wire code returned across the C ABI when a handle does not resolve.
pub const ERR_INVALID_HANDLE: i32 = -1;
/// Wire code for rejected input (shape mismatch, index out of range, inverted bounds).
pub const ERR_INVALID_ARGUMENT: i32 = -2;
/// Wire code for a failure reported by the native solver.
pub const ERR_NATIVE_FAILURE: i32 = -3;
/// Wire code for a model or solution file that could not be read or written.
pub const ERR_IO: i32 = -4;
/// Wire code for an allocation failure while building a result.
pub const ERR_RESOURCE_EXHAUSTION: i32 = -5;
/// Wire code for a native instance that could not be constructed.
pub const ERR_INITIALIZATION: i32 = -6;
/// Wire code for a panic caught at the C ABI.
pub const ERR_INTERNAL_PANIC: i32 = -100;

/// Failures detected by the bridge or reported by the native solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The handle is the null sentinel, unknown, or refers to a destroyed instance.
    #[error("invalid solver handle {0:#x}")]
    InvalidHandle(u64),

    /// The input was rejected before reaching native code.
    #[error("{context}: {message}")]
    InvalidArgument {
        context: &'static str,
        message: String,
    },

    /// The native solver failed while executing `operation`.
    #[error("{operation} failed: {message}")]
    NativeFailure {
        operation: &'static str,
        message: String,
    },

    /// A model or solution file could not be read or written.
    #[error("{operation} failed for `{path}`")]
    Io {
        operation: &'static str,
        path: String,
    },

    /// Allocating a result buffer failed.
    #[error("out of memory: {0}")]
    ResourceExhaustion(String),

    /// The native instance could not be created or configured.
    #[error("failed to initialize solver instance: {0}")]
    Initialization(String),
}

impl Error {
    pub(crate) fn invalid_argument(context: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            context,
            message: message.into(),
        }
    }

    pub(crate) fn native(operation: &'static str, message: impl Into<String>) -> Self {
        Error::NativeFailure {
            operation,
            message: message.into(),
        }
    }

    /// Returns the negative code used for this error at the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidHandle(_) => ERR_INVALID_HANDLE,
            Error::InvalidArgument { .. } => ERR_INVALID_ARGUMENT,
            Error::NativeFailure { .. } => ERR_NATIVE_FAILURE,
            Error::Io { .. } => ERR_IO,
            Error::ResourceExhaustion(_) => ERR_RESOURCE_EXHAUSTION,
            Error::Initialization(_) => ERR_INITIALIZATION,
        }
    }
}
