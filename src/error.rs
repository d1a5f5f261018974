//! Our error types for the E3600 series PSUs.

use thiserror::Error;

use crate::types::{ErrorMessage, IdString};

pub type Result<T, I> = core::result::Result<T, Error<I>>;

/// Custom error type for Agilent E3600 series PSU communications.
#[derive(Error, Debug)]
pub enum Error<I: embedded_io::Error> {
    #[error("Serial communication error")]
    SerialError(I),
    #[error("Communication timeout")]
    Timeout,
    #[error("Command or response did not fit in buffer")]
    BufferError,
    #[error("Invalid response received")]
    InvalidResponse,
    #[error("Value out of range")]
    OutOfRange,
    #[error("Value not supported")]
    ValueNotSupported,
    #[error("Instrument ID mismatch, expecting {expected}, got {actual}")]
    IdMismatch { expected: IdString, actual: IdString },
    #[error("Instrument error {code}: {message}")]
    Instrument { code: i16, message: ErrorMessage },
}

impl<I: embedded_io::Error> From<core::fmt::Error> for Error<I> {
    fn from(_: core::fmt::Error) -> Self {
        // Only raised when formatting a command into a full buffer.
        Error::BufferError
    }
}
