//! Canonical query parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::search::FilterField;

/// The parameters sent to the data source for an offer query.
///
/// Only set fields are present. Keys are kept sorted, so equal criteria
/// always render the same query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<String, String>);

impl ParamSet {
    /// Create an empty parameter set (matches every offer).
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set a parameter.
    pub fn insert(&mut self, field: FilterField, value: impl Into<String>) {
        self.0.insert(field.as_str().to_string(), value.into());
    }

    /// Builder form of [`ParamSet::insert`].
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.0.get(field.as_str()).map(String::as_str)
    }

    /// Minimum discount parsed back to a number.
    pub fn min_discount(&self) -> Option<f64> {
        self.get(FilterField::MinDiscount)
            .and_then(|v| v.parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate parameters in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as a percent-encoded query string, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}={}", urlencoding_encode(k), urlencoding_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Stable key for caching results of this query.
    pub fn cache_key(&self) -> String {
        if self.is_empty() {
            return "offers:all".to_string();
        }
        format!("offers:{}", self.to_query_string())
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}

fn urlencoding_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::FilterCriteria;

    #[test]
    fn test_empty_criteria_empty_params() {
        let params = FilterCriteria::default().to_params();
        assert!(params.is_empty());
        assert_eq!(params.to_query_string(), "");
        assert_eq!(params.cache_key(), "offers:all");
    }

    #[test]
    fn test_cleared_fields_are_omitted() {
        let criteria = FilterCriteria::default()
            .apply_edit(FilterField::Supermarket, "Jumbo")
            .apply_edit(FilterField::Supermarket, "");
        assert_eq!(criteria.to_params(), ParamSet::new());
    }

    #[test]
    fn test_empty_string_and_unset_translate_identically() {
        let with_empty: FilterCriteria =
            serde_json::from_str(r#"{"search":"melk","supermarket":"","category":"  "}"#).unwrap();
        let unset: FilterCriteria = serde_json::from_str(r#"{"search":"melk"}"#).unwrap();

        assert_eq!(with_empty.to_params(), unset.to_params());
        assert_eq!(
            with_empty.to_params().to_query_string(),
            unset.to_params().to_query_string()
        );
    }

    #[test]
    fn test_query_string_is_sorted_and_encoded() {
        let criteria = FilterCriteria::default()
            .apply_edit(FilterField::Supermarket, "Albert Heijn")
            .apply_edit(FilterField::Search, "crème fraîche")
            .apply_edit(FilterField::MinDiscount, "25");

        assert_eq!(
            criteria.to_params().to_query_string(),
            "min_discount=25&search=cr%C3%A8me+fra%C3%AEche&supermarket=Albert+Heijn"
        );
    }

    #[test]
    fn test_edit_order_does_not_matter() {
        let a = FilterCriteria::default()
            .apply_edit(FilterField::Category, "Zuivel")
            .apply_edit(FilterField::Search, "yoghurt");
        let b = FilterCriteria::default()
            .apply_edit(FilterField::Search, "yoghurt")
            .apply_edit(FilterField::Category, "Zuivel");
        assert_eq!(a.to_params(), b.to_params());
        assert_eq!(a.to_params().to_query_string(), "category=Zuivel&search=yoghurt");
    }

    #[test]
    fn test_min_discount_round_trip() {
        let params = ParamSet::new().with(FilterField::MinDiscount, "40");
        assert_eq!(params.min_discount(), Some(40.0));
        assert_eq!(params.get(FilterField::Search), None);
    }
}
