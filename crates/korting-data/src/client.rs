//! HTTP data source over a pluggable transport.

use std::collections::BTreeSet;

use async_trait::async_trait;
use korting_commerce::search::{OfferList, ParamSet};
use korting_commerce::{DiscountOffer, OfferId, OfferRecord, Stats};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::endpoint::Endpoint;
use crate::error::DataSourceError;
use crate::request::ApiRequest;
use crate::response::Response;
use crate::source::DataSource;

/// Sends API requests.
///
/// Kept separate from `HttpSource` so the HTTP stack stays outside this
/// crate and tests can answer with canned bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request to `url` and return the raw response.
    async fn send(&self, url: &str, request: &ApiRequest) -> Result<Response, DataSourceError>;
}

/// Body of `GET /discounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersResponse {
    pub discounts: Vec<OfferRecord>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// Body of `GET /supermarkets`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupermarketsResponse {
    pub supermarkets: Vec<String>,
}

/// Body of `GET /categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<Option<String>>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Data source backed by the discount REST API.
pub struct HttpSource<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> HttpSource<T> {
    /// Create a new source for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the API health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, DataSourceError> {
        self.get(ApiRequest::new(Endpoint::Health)).await
    }

    async fn get<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, DataSourceError> {
        let request = request.accept("application/json");
        let url = request.url(&self.base_url);
        tracing::debug!(endpoint = %request.endpoint, url = %url, "fetching");

        let response = self.transport.send(&url, &request).await.map_err(|e| {
            tracing::warn!(endpoint = %request.endpoint, error = %e, "request failed");
            e
        })?;

        response.error_for_status(request.endpoint)?.json()
    }
}

#[async_trait]
impl<T: Transport> DataSource for HttpSource<T> {
    async fn fetch_offers(&self, params: &ParamSet) -> Result<OfferList, DataSourceError> {
        let body: OffersResponse = self
            .get(ApiRequest::new(Endpoint::Offers).with_params(params.clone()))
            .await?;

        let received = body.discounts.len();
        let mut offers = Vec::with_capacity(received);
        for record in body.discounts {
            let id = record.id;
            match DiscountOffer::try_from(record) {
                Ok(offer) => offers.push(offer),
                Err(e) => tracing::warn!(offer_id = id, error = %e, "dropping invalid offer"),
            }
        }

        // Dropped records no longer count toward the total.
        let dropped = (received - offers.len()) as u64;
        let total = body
            .total
            .unwrap_or(received as u64)
            .saturating_sub(dropped);

        tracing::debug!(query = %params, count = offers.len(), total, "offers received");
        Ok(OfferList::new(offers).with_total(total))
    }

    async fn fetch_offer(&self, id: OfferId) -> Result<DiscountOffer, DataSourceError> {
        let record: OfferRecord = self.get(ApiRequest::new(Endpoint::Offer(id))).await?;
        Ok(DiscountOffer::try_from(record)?)
    }

    async fn fetch_supermarkets(&self) -> Result<BTreeSet<String>, DataSourceError> {
        let body: SupermarketsResponse = self.get(ApiRequest::new(Endpoint::Supermarkets)).await?;
        Ok(body
            .supermarkets
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect())
    }

    async fn fetch_categories(&self) -> Result<BTreeSet<String>, DataSourceError> {
        let body: CategoriesResponse = self.get(ApiRequest::new(Endpoint::Categories)).await?;
        Ok(body
            .categories
            .into_iter()
            .flatten()
            .filter(|c| !c.trim().is_empty())
            .collect())
    }

    async fn fetch_stats(&self) -> Result<Stats, DataSourceError> {
        let stats: Stats = self.get(ApiRequest::new(Endpoint::Stats)).await?;
        Ok(stats.normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use korting_commerce::search::FilterField;

    /// Answers from a path -> (status, body) table and records every URL.
    #[derive(Default)]
    struct CannedTransport {
        routes: HashMap<String, (u16, String)>,
        seen: Mutex<Vec<String>>,
    }

    impl CannedTransport {
        fn route(mut self, path: &str, status: u16, body: &str) -> Self {
            self.routes
                .insert(path.to_string(), (status, body.to_string()));
            self
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, url: &str, request: &ApiRequest) -> Result<Response, DataSourceError> {
            self.seen.lock().unwrap().push(url.to_string());
            match self.routes.get(&request.endpoint.path()) {
                Some((status, body)) => Ok(Response::new(
                    *status,
                    HashMap::new(),
                    body.as_bytes().to_vec(),
                )),
                None => Err(DataSourceError::Transport("connection refused".to_string())),
            }
        }
    }

    const BASE: &str = "http://localhost:5000/api";

    #[tokio::test]
    async fn test_fetch_offers_sends_canonical_query() {
        let transport = CannedTransport::default().route(
            "/discounts",
            200,
            r#"{"discounts": [
                {"id": 1, "supermarket": "Albert Heijn", "product_name": "Halfvolle melk",
                 "category": "Zuivel", "original_price": 1.20, "discount_price": 0.90,
                 "discount_percentage": 25.0}
            ], "total": 1, "limit": 100, "offset": 0}"#,
        );
        let source = HttpSource::new(BASE, transport);
        let params = ParamSet::new()
            .with(FilterField::Search, "melk")
            .with(FilterField::Supermarket, "Albert Heijn");

        let list = source.fetch_offers(&params).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list.total, 1);
        assert_eq!(list.offers[0].product_name, "Halfvolle melk");

        let seen = source.transport.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            "http://localhost:5000/api/discounts?search=melk&supermarket=Albert+Heijn"
        );
    }

    #[tokio::test]
    async fn test_fetch_offers_drops_invalid_records() {
        let transport = CannedTransport::default().route(
            "/discounts",
            200,
            r#"{"discounts": [
                {"id": 1, "supermarket": "Jumbo", "product_name": "Kaas",
                 "original_price": 5.00, "discount_price": 4.00, "discount_percentage": 20.0},
                {"id": 2, "supermarket": "Jumbo", "product_name": "Broken",
                 "original_price": 1.00, "discount_price": 2.00, "discount_percentage": 10.0},
                {"id": 3, "supermarket": "Lidl", "product_name": "Brood",
                 "original_price": 2.00, "discount_price": 1.50}
            ], "total": 3}"#,
        );
        let source = HttpSource::new(BASE, transport);

        let list = source.fetch_offers(&ParamSet::new()).await.unwrap();
        let ids: Vec<u64> = list.offers.iter().map(|o| o.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(list.total, 2);
        // Percentage derived from the prices.
        assert_eq!(list.offers[1].discount_percentage, 25.0);
    }

    #[tokio::test]
    async fn test_fetch_offer_not_found() {
        let transport = CannedTransport::default().route(
            "/discounts/42",
            404,
            r#"{"error": "Discount not found"}"#,
        );
        let source = HttpSource::new(BASE, transport);

        let err = source.fetch_offer(OfferId::new(42)).await.unwrap_err();
        assert!(matches!(err, DataSourceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_fetch_offer_invalid_record() {
        let transport = CannedTransport::default().route(
            "/discounts/7",
            200,
            r#"{"id": 7, "supermarket": "Aldi", "product_name": "Koffie", "discount_price": -1.0}"#,
        );
        let source = HttpSource::new(BASE, transport);

        let err = source.fetch_offer(OfferId::new(7)).await.unwrap_err();
        assert!(matches!(err, DataSourceError::InvalidRecord(_)));
    }

    #[tokio::test]
    async fn test_fetch_facets() {
        let transport = CannedTransport::default()
            .route(
                "/supermarkets",
                200,
                r#"{"supermarkets": ["Jumbo", "Albert Heijn", "Jumbo"]}"#,
            )
            .route(
                "/categories",
                200,
                r#"{"categories": ["Zuivel", null, "", "Brood"]}"#,
            );
        let source = HttpSource::new(BASE, transport);

        let supermarkets = source.fetch_supermarkets().await.unwrap();
        assert_eq!(
            supermarkets.into_iter().collect::<Vec<_>>(),
            vec!["Albert Heijn", "Jumbo"]
        );

        let categories = source.fetch_categories().await.unwrap();
        assert_eq!(categories.into_iter().collect::<Vec<_>>(), vec!["Brood", "Zuivel"]);
    }

    #[tokio::test]
    async fn test_fetch_stats_normalizes_empty_average() {
        let transport = CannedTransport::default().route(
            "/stats",
            200,
            r#"{"total_discounts": 0, "supermarket_counts": {}, "average_discount_percentage": 0}"#,
        );
        let source = HttpSource::new(BASE, transport);

        let stats = source.fetch_stats().await.unwrap();
        assert_eq!(stats.total_discounts, 0);
        assert_eq!(stats.average_discount_percentage, None);
    }

    #[tokio::test]
    async fn test_server_error_and_transport_error() {
        let transport = CannedTransport::default().route(
            "/stats",
            500,
            r#"{"error": "database is locked"}"#,
        );
        let source = HttpSource::new(BASE, transport);

        match source.fetch_stats().await {
            Err(DataSourceError::Http { status, message, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "database is locked");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let err = source.fetch_supermarkets().await.unwrap_err();
        assert!(matches!(err, DataSourceError::Transport(_)));
    }

    #[tokio::test]
    async fn test_health() {
        let transport = CannedTransport::default().route(
            "/health",
            200,
            r#"{"status": "healthy", "timestamp": "2024-03-01T10:00:00"}"#,
        );
        let source = HttpSource::new(BASE, transport);

        let health = source.health().await.unwrap();
        assert!(health.is_healthy());
    }
}
