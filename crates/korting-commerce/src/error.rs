//! Commerce error types.

use thiserror::Error;

/// Errors raised while turning source records into offers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// A price below zero.
    #[error("Negative {field} for offer {offer_id}: {value}")]
    NegativePrice {
        offer_id: String,
        field: &'static str,
        value: f64,
    },

    /// Discount price higher than the original price.
    #[error("Discount price {discount} exceeds original price {original} for offer {offer_id}")]
    DiscountAboveOriginal {
        offer_id: String,
        discount: String,
        original: String,
    },

    /// Discount percentage outside 0-100.
    #[error("Discount percentage {value} out of range for offer {offer_id}")]
    PercentageOutOfRange { offer_id: String, value: f64 },

    /// No percentage on the record and no original price to derive it from.
    #[error("Offer {0} has no discount percentage and no original price")]
    MissingPercentage(String),

    /// Date that is neither an ISO date nor an ISO date-time.
    #[error("Invalid {field} for offer {offer_id}: {value}")]
    InvalidDate {
        offer_id: String,
        field: &'static str,
        value: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

/// Rejected filter input.
///
/// Never shown to the user: the edit is dropped and the previous criteria
/// stay in effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field name outside the known filter fields.
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    /// Minimum discount that is not a whole number.
    #[error("Minimum discount is not a whole number: {0:?}")]
    NotANumber(String),

    /// Minimum discount outside 0-100.
    #[error("Minimum discount out of range: {0}")]
    OutOfRange(i64),

    /// Value not present in the loaded facet.
    #[error("Unknown {field} value: {value}")]
    UnknownFacetValue { field: &'static str, value: String },
}
