use crate::core::io::writer::WriterError;
use thiserror::Error;

/// Fatal errors of a save pass. Output written before the error is truncated
/// and must be discarded.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Writer failed: {source}")]
    Writer {
        #[from]
        source: WriterError,
    },
}

/// Fatal errors of a load pass: the document is not a readable KET document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Invalid JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Missing required field '{field}' at {location}")]
    MissingField {
        location: String,
        field: &'static str,
    },

    #[error("Invalid value at {location}: {message}")]
    InvalidValue { location: String, message: String },

    #[error("Node reference '{0}' does not resolve to a document entry")]
    UnknownRef(String),
}
