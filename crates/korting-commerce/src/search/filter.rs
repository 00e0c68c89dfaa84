//! Filter criteria and user edits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::search::{FacetKind, ParamSet};

/// Highest accepted minimum discount threshold.
pub const MAX_MIN_DISCOUNT: u8 = 100;

/// A filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    /// Free-text search in the product name.
    Search,
    /// Exact supermarket name.
    Supermarket,
    /// Exact category name.
    Category,
    /// Minimum discount percentage.
    MinDiscount,
}

impl FilterField {
    /// All fields, in display order.
    pub const ALL: [FilterField; 4] = [
        FilterField::Search,
        FilterField::Supermarket,
        FilterField::Category,
        FilterField::MinDiscount,
    ];

    /// Name used for both the edit entry point and the query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Search => "search",
            FilterField::Supermarket => "supermarket",
            FilterField::Category => "category",
            FilterField::MinDiscount => "min_discount",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterField::Search => "Zoeken",
            FilterField::Supermarket => "Supermarkt",
            FilterField::Category => "Categorie",
            FilterField::MinDiscount => "Min. korting %",
        }
    }

    /// The facet whose values constrain this field, if any.
    pub fn facet(&self) -> Option<FacetKind> {
        match self {
            FilterField::Supermarket => Some(FacetKind::Supermarket),
            FilterField::Category => Some(FacetKind::Category),
            FilterField::Search | FilterField::MinDiscount => None,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "search" => Ok(FilterField::Search),
            "supermarket" => Ok(FilterField::Supermarket),
            "category" => Ok(FilterField::Category),
            "min_discount" => Ok(FilterField::MinDiscount),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

/// The user's current filter intent.
///
/// Every field is optional and `None` means "no constraint". Values built
/// through the edit methods never hold an empty string; a deserialized value
/// might, and [`FilterCriteria::to_params`] treats it as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supermarket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_discount: Option<u8>,
}

impl FilterCriteria {
    /// The canonical empty criteria.
    pub fn reset() -> Self {
        Self::default()
    }

    pub fn search(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    pub fn supermarket(&self) -> Option<&str> {
        non_blank(self.supermarket.as_deref())
    }

    pub fn category(&self) -> Option<&str> {
        non_blank(self.category.as_deref())
    }

    /// The threshold, ignoring a deserialized value above 100.
    pub fn min_discount(&self) -> Option<u8> {
        self.min_discount.filter(|v| *v <= MAX_MIN_DISCOUNT)
    }

    /// Get a field's value rendered as text.
    pub fn get(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Search => self.search().map(str::to_string),
            FilterField::Supermarket => self.supermarket().map(str::to_string),
            FilterField::Category => self.category().map(str::to_string),
            FilterField::MinDiscount => self.min_discount().map(|v| v.to_string()),
        }
    }

    /// Check whether no field constrains the query.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Set fields with their values, in display order.
    pub fn active_filters(&self) -> Vec<(FilterField, String)> {
        FilterField::ALL
            .iter()
            .filter_map(|f| self.get(*f).map(|v| (*f, v)))
            .collect()
    }

    /// Apply a raw UI value to one field.
    ///
    /// Text is trimmed and a blank value clears the field. `min_discount`
    /// must be a whole number in 0-100.
    pub fn try_apply(&self, field: FilterField, raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();
        let mut next = self.clone();

        match field {
            FilterField::Search => next.search = owned_non_blank(value),
            FilterField::Supermarket => next.supermarket = owned_non_blank(value),
            FilterField::Category => next.category = owned_non_blank(value),
            FilterField::MinDiscount => next.min_discount = parse_min_discount(value)?,
        }

        Ok(next)
    }

    /// Apply a raw UI value, keeping the current criteria if it is rejected.
    pub fn apply_edit(&self, field: FilterField, raw: &str) -> Self {
        self.try_apply(field, raw).unwrap_or_else(|_| self.clone())
    }

    /// Translate into the canonical parameter set, omitting unset fields.
    pub fn to_params(&self) -> ParamSet {
        let mut params = ParamSet::new();
        for field in FilterField::ALL {
            if let Some(value) = self.get(field) {
                params.insert(field, value);
            }
        }
        params
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn owned_non_blank(value: &str) -> Option<String> {
    non_blank(Some(value)).map(str::to_string)
}

fn parse_min_discount(value: &str) -> Result<Option<u8>, ValidationError> {
    if value.is_empty() {
        return Ok(None);
    }
    let parsed: i64 = value
        .parse()
        .map_err(|_| ValidationError::NotANumber(value.to_string()))?;
    if !(0..=i64::from(MAX_MIN_DISCOUNT)).contains(&parsed) {
        return Err(ValidationError::OutOfRange(parsed));
    }
    Ok(Some(parsed as u8))
}

/// A change requested through the single filter entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterChange {
    /// Set or clear one field from a raw UI value.
    Edit { field: FilterField, raw: String },
    /// Restore the empty criteria.
    Reset,
}

impl FilterChange {
    /// Field name reserved for resetting all filters.
    pub const RESET: &'static str = "reset";

    /// Create an edit.
    pub fn edit(field: FilterField, raw: impl Into<String>) -> Self {
        FilterChange::Edit {
            field,
            raw: raw.into(),
        }
    }

    /// Parse a `(field, value)` pair as sent by the UI.
    ///
    /// A missing value clears the field.
    pub fn parse(name: &str, value: Option<&str>) -> Result<Self, ValidationError> {
        if name.trim() == Self::RESET {
            return Ok(FilterChange::Reset);
        }
        let field = name.parse()?;
        Ok(FilterChange::edit(field, value.unwrap_or_default()))
    }

    /// Compute the criteria that result from this change.
    pub fn apply(&self, current: &FilterCriteria) -> Result<FilterCriteria, ValidationError> {
        match self {
            FilterChange::Edit { field, raw } => current.try_apply(*field, raw),
            FilterChange::Reset => Ok(FilterCriteria::reset()),
        }
    }
}
