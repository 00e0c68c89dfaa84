//! Offer lists and facets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::offer::DiscountOffer;

/// Offers returned for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OfferList {
    /// Matching offers, in the order the source returned them.
    pub offers: Vec<DiscountOffer>,
    /// Number of matching offers at the source, which may exceed
    /// `offers.len()` when the source caps the result size.
    pub total: u64,
}

impl OfferList {
    /// Create an offer list whose total equals the number of offers.
    pub fn new(offers: Vec<DiscountOffer>) -> Self {
        let total = offers.len() as u64;
        Self { offers, total }
    }

    /// Override the reported total.
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Check whether the source held back some matches.
    pub fn is_truncated(&self) -> bool {
        self.total > self.offers.len() as u64
    }
}

/// A filterable field with an enumerable set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    Supermarket,
    Category,
}

impl FacetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacetKind::Supermarket => "supermarket",
            FacetKind::Category => "category",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
