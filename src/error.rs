//! Errors

use core::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
///Fault reported by codec handle.
pub struct CodecError {
    ///Raw error number of the codec
    pub errno: i32,
    ///Symbolic name of the error (e.g. `Z_DATA_ERROR`)
    pub code: &'static str,
    ///Human readable description
    pub message: &'static str,
}

impl fmt::Display for CodecError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{} ({}: {})", self.message, self.code, self.errno)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
///Stream error
pub enum Error {
    #[error("{0}")]
    ///Codec detected fault while processing data
    Codec(CodecError),
    #[error("Initialization failed: {0}")]
    ///Codec handle could not be initialized
    InitializationFailed(CodecError),
    #[error("Cannot create a buffer larger than {max} bytes")]
    ///Accumulated output exceeded configured maximum
    OutputTooLarge {
        ///Configured limit
        max: usize,
    },
    #[error("Codec handle is closed")]
    ///Handle has been released already
    Closed,
    #[error("Stream has been destroyed")]
    ///Stream was torn down before operation could complete
    Destroyed,
    #[error("Write after end")]
    ///Data submitted after stream end was requested
    WriteAfterEnd,
    #[error("Codec does not support parameter updates")]
    ///Codec cannot change parameters mid-stream
    ParamsUnsupported,
    #[error("Failed to reset codec")]
    ///Codec refused to reset its state
    ResetFailed,
}

impl From<CodecError> for Error {
    #[inline(always)]
    fn from(error: CodecError) -> Self {
        Error::Codec(error)
    }
}
