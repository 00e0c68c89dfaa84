//! In-memory data source.

use std::collections::BTreeSet;
use std::path::Path;

use async_trait::async_trait;
use korting_commerce::search::{FilterField, OfferList, ParamSet};
use korting_commerce::{DiscountOffer, OfferId, OfferRecord, Stats};
use serde::Deserialize;

use crate::error::DataSourceError;
use crate::source::DataSource;

/// Default cap on the number of offers returned per query.
pub const DEFAULT_LIMIT: usize = 100;

#[derive(Debug, Clone)]
struct Entry {
    offer: DiscountOffer,
    active: bool,
}

/// A data source answering from an in-memory catalog.
///
/// Applies the same query semantics as the discount API: only active offers,
/// exact supermarket and category matches, a lower bound on the discount,
/// a case-insensitive substring search on the product name, and results
/// ordered by discount percentage, highest first.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<Entry>,
    limit: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { discounts: Vec<OfferRecord> },
    Bare(Vec<OfferRecord>),
}

impl MemorySource {
    /// Create a source from already validated offers. All are active.
    pub fn from_offers(offers: impl IntoIterator<Item = DiscountOffer>) -> Self {
        Self {
            entries: offers
                .into_iter()
                .map(|offer| Entry {
                    offer,
                    active: true,
                })
                .collect(),
            limit: Some(DEFAULT_LIMIT),
        }
    }

    /// Create a source from wire records, skipping invalid ones.
    pub fn from_records(records: impl IntoIterator<Item = OfferRecord>) -> Self {
        let mut entries = Vec::new();
        for record in records {
            let id = record.id;
            let active = record.is_active;
            match DiscountOffer::try_from(record) {
                Ok(offer) => entries.push(Entry { offer, active }),
                Err(e) => tracing::warn!(offer_id = id, error = %e, "skipping invalid catalog record"),
            }
        }
        Self {
            entries,
            limit: Some(DEFAULT_LIMIT),
        }
    }

    /// Parse a catalog, either `{"discounts": [...]}` or a bare array.
    pub fn from_json_str(json: &str) -> Result<Self, DataSourceError> {
        let records = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::Wrapped { discounts } => discounts,
            CatalogFile::Bare(records) => records,
        };
        Ok(Self::from_records(records))
    }

    /// Load a catalog from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataSourceError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            DataSourceError::Transport(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Set the per-query cap. `None` returns every match.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Number of offers in the catalog, active or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn active(&self) -> impl Iterator<Item = &DiscountOffer> {
        self.entries.iter().filter(|e| e.active).map(|e| &e.offer)
    }

    /// Run a query against the catalog.
    pub fn query(&self, params: &ParamSet) -> OfferList {
        let supermarket = params.get(FilterField::Supermarket);
        let category = params.get(FilterField::Category);
        let search = params.get(FilterField::Search);
        let min_discount = params.min_discount();

        let mut matches: Vec<DiscountOffer> = self
            .active()
            .filter(|o| supermarket.map_or(true, |s| o.supermarket == s))
            .filter(|o| category.map_or(true, |c| o.category.as_deref() == Some(c)))
            .filter(|o| min_discount.map_or(true, |min| o.discount_percentage >= min))
            .filter(|o| search.map_or(true, |needle| o.matches_text(needle)))
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.discount_percentage.total_cmp(&a.discount_percentage));

        let total = matches.len() as u64;
        if let Some(limit) = self.limit {
            matches.truncate(limit);
        }
        OfferList::new(matches).with_total(total)
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch_offers(&self, params: &ParamSet) -> Result<OfferList, DataSourceError> {
        Ok(self.query(params))
    }

    async fn fetch_offer(&self, id: OfferId) -> Result<DiscountOffer, DataSourceError> {
        self.entries
            .iter()
            .find(|e| e.offer.id == id)
            .map(|e| e.offer.clone())
            .ok_or_else(|| DataSourceError::NotFound(format!("offer {}", id)))
    }

    async fn fetch_supermarkets(&self) -> Result<BTreeSet<String>, DataSourceError> {
        Ok(self.active().map(|o| o.supermarket.clone()).collect())
    }

    async fn fetch_categories(&self) -> Result<BTreeSet<String>, DataSourceError> {
        Ok(self.active().filter_map(|o| o.category.clone()).collect())
    }

    async fn fetch_stats(&self) -> Result<Stats, DataSourceError> {
        let offers: Vec<DiscountOffer> = self.active().cloned().collect();
        Ok(Stats::from_offers(&offers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{"discounts": [
        {"id": 1, "supermarket": "Albert Heijn", "product_name": "Halfvolle melk",
         "category": "Zuivel", "original_price": 1.20, "discount_price": 0.90, "discount_percentage": 25.0},
        {"id": 2, "supermarket": "Jumbo", "product_name": "Volle Melk",
         "category": "Zuivel", "original_price": 1.40, "discount_price": 0.70, "discount_percentage": 50.0},
        {"id": 3, "supermarket": "Albert Heijn", "product_name": "Volkorenbrood",
         "category": "Brood", "original_price": 2.50, "discount_price": 2.25, "discount_percentage": 10.0},
        {"id": 4, "supermarket": "Lidl", "product_name": "Karnemelk",
         "category": null, "original_price": 1.00, "discount_price": 0.70, "discount_percentage": 30.0},
        {"id": 5, "supermarket": "Aldi", "product_name": "Melkchocolade",
         "category": "Snoep", "original_price": 2.00, "discount_price": 1.00,
         "discount_percentage": 50.0, "is_active": false}
    ]}"#;

    fn source() -> MemorySource {
        MemorySource::from_json_str(CATALOG).unwrap()
    }

    fn ids(list: &OfferList) -> Vec<u64> {
        list.offers.iter().map(|o| o.id.get()).collect()
    }

    #[tokio::test]
    async fn test_empty_query_returns_active_by_discount() {
        let list = source().fetch_offers(&ParamSet::new()).await.unwrap();
        assert_eq!(ids(&list), vec![2, 4, 1, 3]);
        assert_eq!(list.total, 4);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let params = ParamSet::new().with(FilterField::Search, "MELK");
        let list = source().fetch_offers(&params).await.unwrap();
        assert_eq!(ids(&list), vec![2, 4, 1]);
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let params = ParamSet::new()
            .with(FilterField::Search, "melk")
            .with(FilterField::Supermarket, "Albert Heijn");
        let list = source().fetch_offers(&params).await.unwrap();
        assert_eq!(ids(&list), vec![1]);

        let params = ParamSet::new()
            .with(FilterField::Category, "Zuivel")
            .with(FilterField::MinDiscount, "25");
        let list = source().fetch_offers(&params).await.unwrap();
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[tokio::test]
    async fn test_limit_keeps_total() {
        let source = source().with_limit(Some(2));
        let list = source.fetch_offers(&ParamSet::new()).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.total, 4);
        assert!(list.is_truncated());
    }

    #[tokio::test]
    async fn test_facets_ignore_inactive_and_missing() {
        let source = source();
        let supermarkets = source.fetch_supermarkets().await.unwrap();
        assert_eq!(
            supermarkets.into_iter().collect::<Vec<_>>(),
            vec!["Albert Heijn", "Jumbo", "Lidl"]
        );
        let categories = source.fetch_categories().await.unwrap();
        assert_eq!(categories.into_iter().collect::<Vec<_>>(), vec!["Brood", "Zuivel"]);
    }

    #[tokio::test]
    async fn test_stats_are_global() {
        let stats = source().fetch_stats().await.unwrap();
        assert_eq!(stats.total_discounts, 4);
        assert_eq!(stats.average_discount_percentage, Some(28.75));
        assert_eq!(stats.supermarket_counts.get("Albert Heijn"), Some(&2));
    }

    #[tokio::test]
    async fn test_fetch_offer() {
        let source = source();
        let offer = source.fetch_offer(OfferId::new(3)).await.unwrap();
        assert_eq!(offer.product_name, "Volkorenbrood");

        let err = source.fetch_offer(OfferId::new(99)).await.unwrap_err();
        assert!(matches!(err, DataSourceError::NotFound(_)));
    }

    #[test]
    fn test_bare_array_and_invalid_records() {
        let json = r#"[
            {"id": 1, "supermarket": "Jumbo", "product_name": "Kaas", "discount_price": 3.0,
             "discount_percentage": 15.0},
            {"id": 2, "supermarket": "Jumbo", "product_name": "Kapot", "discount_price": -3.0,
             "discount_percentage": 15.0}
        ]"#;
        let source = MemorySource::from_json_str(json).unwrap();
        assert_eq!(source.len(), 1);

        assert!(MemorySource::from_json_str("{\"nope\": 1}").is_err());
    }
}
