//! Data source error types.

use thiserror::Error;

/// Errors that can occur when calling a data source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    /// The transport failed before a response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP {status} from {endpoint}: {message}")]
    Http {
        status: u16,
        endpoint: String,
        message: String,
    },

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to decode the response body.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A record violated the offer invariants.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl From<serde_json::Error> for DataSourceError {
    fn from(e: serde_json::Error) -> Self {
        DataSourceError::Decode(e.to_string())
    }
}

impl From<korting_commerce::CommerceError> for DataSourceError {
    fn from(e: korting_commerce::CommerceError) -> Self {
        DataSourceError::InvalidRecord(e.to_string())
    }
}
