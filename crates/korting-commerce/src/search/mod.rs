//! Search module.
//!
//! Contains the filter criteria model, its canonical query parameters and
//! the offer list returned for a query.

mod filter;
mod query;
mod results;

pub use filter::{FilterChange, FilterCriteria, FilterField, MAX_MIN_DISCOUNT};
pub use query::ParamSet;
pub use results::{FacetKind, OfferList};
