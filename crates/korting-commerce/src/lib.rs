//! Discount offer domain types for Korting.
//!
//! This crate provides the pure, I/O-free half of the discount dashboard:
//!
//! - **Offers**: `DiscountOffer` snapshots and their wire records
//! - **Search**: filter criteria, canonical query parameters, offer lists
//! - **Stats**: aggregate statistics and the offer-list fallback
//!
//! # Example
//!
//! ```rust
//! use korting_commerce::prelude::*;
//!
//! let criteria = FilterCriteria::default()
//!     .apply_edit(FilterField::Search, "  melk ")
//!     .apply_edit(FilterField::MinDiscount, "25");
//!
//! let params = criteria.to_params();
//! assert_eq!(params.to_query_string(), "min_discount=25&search=melk");
//!
//! let stats = Stats::from_offers(&[]);
//! assert_eq!(stats.total_discounts, 0);
//! assert!(stats.average_discount_percentage.is_none());
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod offer;

pub mod search;
pub mod stats;

pub use error::{CommerceError, ValidationError};
pub use ids::OfferId;
pub use money::Money;
pub use offer::{DiscountOffer, OfferRecord};
pub use stats::Stats;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, ValidationError};
    pub use crate::ids::OfferId;
    pub use crate::money::Money;
    pub use crate::offer::{DiscountOffer, OfferRecord};

    // Search
    pub use crate::search::{
        FacetKind, FilterChange, FilterCriteria, FilterField, OfferList, ParamSet,
    };

    // Stats
    pub use crate::stats::Stats;
}
