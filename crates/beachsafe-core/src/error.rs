//! Error types for BeachSafe

use crate::types::Column;

/// Result type alias using BeachSafe's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for BeachSafe operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A class code outside the trained vocabulary of a column
    #[error("cannot decode code {code} for column {column}: outside the trained range")]
    Decode { column: Column, code: u32 },

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Missing, unreadable, or inconsistent model artifacts
    #[error("artifact error: {0}")]
    Artifact(String),

    /// Training dataset errors
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Prediction history log errors
    #[error("history error: {0}")]
    History(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new decode error
    pub fn decode(column: Column, code: u32) -> Self {
        Self::Decode { column, code }
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a new history error
    pub fn history(msg: impl Into<String>) -> Self {
        Self::History(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_message() {
        let err = Error::decode(Column::Safety, 7);
        assert_eq!(
            err.to_string(),
            "cannot decode code 7 for column Safety: outside the trained range"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
