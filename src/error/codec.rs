use std::io;

use thiserror::Error;

use super::markup::ParseError;

pub type CodecResult<T> = Result<T, CodecError>;

/// Failure of a single serialize/deserialize call.
///
/// No variant is ever retried: every failure is fatal to the current call and
/// propagates to the caller as is.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Destination/source unreachable or unwritable.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Decode-time structural mismatch against the expected type.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// Tagged-markup decode met a type tag that is not registered.
    #[error("Unknown type tag: {0}")]
    UnknownType(String),

    /// Required element or key absent during decode.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            CodecError::Io(err.into())
        } else {
            CodecError::Malformed(err.to_string())
        }
    }
}

impl From<ParseError> for CodecError {
    fn from(err: ParseError) -> Self {
        CodecError::Malformed(err.to_string())
    }
}
