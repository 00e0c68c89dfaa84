//! API request description.

use std::collections::HashMap;

use korting_commerce::search::ParamSet;

use crate::endpoint::Endpoint;

/// A read request against the discount API.
///
/// Describes what to fetch; sending it is the transport's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub endpoint: Endpoint,
    pub params: ParamSet,
    pub headers: HashMap<String, String>,
}

impl ApiRequest {
    /// Create a request for an endpoint, without parameters.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: ParamSet::new(),
            headers: HashMap::new(),
        }
    }

    /// Set the query parameters.
    pub fn with_params(mut self, params: ParamSet) -> Self {
        self.params = params;
        self
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// Path plus canonical query string.
    pub fn path_and_query(&self) -> String {
        let path = self.endpoint.path();
        if self.params.is_empty() {
            path
        } else {
            format!("{}?{}", path, self.params.to_query_string())
        }
    }

    /// Absolute URL under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path_and_query())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use korting_commerce::search::FilterField;

    #[test]
    fn test_url_without_params() {
        let req = ApiRequest::new(Endpoint::Supermarkets);
        assert_eq!(
            req.url("http://localhost:5000/api/"),
            "http://localhost:5000/api/supermarkets"
        );
    }

    #[test]
    fn test_url_with_params() {
        let params = ParamSet::new()
            .with(FilterField::Search, "melk")
            .with(FilterField::Supermarket, "Albert Heijn");
        let req = ApiRequest::new(Endpoint::Offers).with_params(params);
        assert_eq!(
            req.url("http://localhost:5000/api"),
            "http://localhost:5000/api/discounts?search=melk&supermarket=Albert+Heijn"
        );
    }

    #[test]
    fn test_headers() {
        let req = ApiRequest::new(Endpoint::Stats).accept("application/json");
        assert_eq!(req.headers.get("Accept").map(String::as_str), Some("application/json"));
    }
}
