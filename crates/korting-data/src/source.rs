//! The data source boundary.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use korting_commerce::search::{OfferList, ParamSet};
use korting_commerce::{DiscountOffer, OfferId, Stats};

use crate::error::DataSourceError;

/// Asynchronous access to the discount collection.
///
/// Every call is independent and may fail on its own. Implementations do
/// not retry.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Offers matching `params`. Absent parameters match everything.
    async fn fetch_offers(&self, params: &ParamSet) -> Result<OfferList, DataSourceError>;

    /// A single offer.
    async fn fetch_offer(&self, id: OfferId) -> Result<DiscountOffer, DataSourceError>;

    /// All supermarket names, regardless of the current filters.
    async fn fetch_supermarkets(&self) -> Result<BTreeSet<String>, DataSourceError>;

    /// All category names, regardless of the current filters.
    async fn fetch_categories(&self) -> Result<BTreeSet<String>, DataSourceError>;

    /// Statistics over the full, unfiltered collection.
    async fn fetch_stats(&self) -> Result<Stats, DataSourceError>;
}

#[async_trait]
impl<S: DataSource + ?Sized> DataSource for Arc<S> {
    async fn fetch_offers(&self, params: &ParamSet) -> Result<OfferList, DataSourceError> {
        (**self).fetch_offers(params).await
    }

    async fn fetch_offer(&self, id: OfferId) -> Result<DiscountOffer, DataSourceError> {
        (**self).fetch_offer(id).await
    }

    async fn fetch_supermarkets(&self) -> Result<BTreeSet<String>, DataSourceError> {
        (**self).fetch_supermarkets().await
    }

    async fn fetch_categories(&self) -> Result<BTreeSet<String>, DataSourceError> {
        (**self).fetch_categories().await
    }

    async fn fetch_stats(&self) -> Result<Stats, DataSourceError> {
        (**self).fetch_stats().await
    }
}

#[async_trait]
impl<S: DataSource + ?Sized> DataSource for Box<S> {
    async fn fetch_offers(&self, params: &ParamSet) -> Result<OfferList, DataSourceError> {
        (**self).fetch_offers(params).await
    }

    async fn fetch_offer(&self, id: OfferId) -> Result<DiscountOffer, DataSourceError> {
        (**self).fetch_offer(id).await
    }

    async fn fetch_supermarkets(&self) -> Result<BTreeSet<String>, DataSourceError> {
        (**self).fetch_supermarkets().await
    }

    async fn fetch_categories(&self) -> Result<BTreeSet<String>, DataSourceError> {
        (**self).fetch_categories().await
    }

    async fn fetch_stats(&self) -> Result<Stats, DataSourceError> {
        (**self).fetch_stats().await
    }
}
