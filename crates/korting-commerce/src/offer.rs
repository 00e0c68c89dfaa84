//! Discount offer snapshots.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::ids::OfferId;
use crate::money::Money;
use crate::stats::round_to;

/// A discount record exactly as the data source sends it.
///
/// Loosely typed: prices are plain decimals, dates are ISO strings and the
/// percentage may be missing. Convert with `DiscountOffer::try_from`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferRecord {
    pub id: u64,
    pub supermarket: String,
    pub product_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub original_price: Option<f64>,
    pub discount_price: f64,
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub valid_until: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A read-only snapshot of one product discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountOffer {
    /// Stable identifier.
    pub id: OfferId,
    /// Supermarket name (e.g., "Albert Heijn").
    pub supermarket: String,
    /// Product name.
    pub product_name: String,
    /// Category, if the supermarket provides one.
    pub category: Option<String>,
    /// Regular price.
    pub original_price: Option<Money>,
    /// Price during the offer. Never above `original_price`.
    pub discount_price: Money,
    /// Discount in percent, 0-100.
    pub discount_percentage: f64,
    /// Free-form offer text.
    pub description: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
}

impl DiscountOffer {
    /// Amount saved compared to the regular price.
    pub fn saving(&self) -> Option<Money> {
        self.original_price
            .map(|original| original.saving_to(&self.discount_price))
    }

    /// Check whether the offer is still valid on `date`.
    ///
    /// Offers without an end date never expire.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_until.map_or(true, |until| date <= until)
    }

    /// Check if the product name contains `needle`, ignoring case.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.product_name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

impl TryFrom<OfferRecord> for DiscountOffer {
    type Error = CommerceError;

    fn try_from(record: OfferRecord) -> Result<Self, Self::Error> {
        let offer_id = record.id.to_string();

        if record.discount_price < 0.0 {
            return Err(CommerceError::NegativePrice {
                offer_id,
                field: "discount_price",
                value: record.discount_price,
            });
        }
        if let Some(original) = record.original_price {
            if original < 0.0 {
                return Err(CommerceError::NegativePrice {
                    offer_id,
                    field: "original_price",
                    value: original,
                });
            }
        }

        let discount_price = Money::from_decimal(record.discount_price);
        let original_price = record.original_price.map(Money::from_decimal);

        if let Some(original) = original_price {
            if discount_price > original {
                return Err(CommerceError::DiscountAboveOriginal {
                    offer_id,
                    discount: discount_price.display(),
                    original: original.display(),
                });
            }
        }

        let discount_percentage = match record.discount_percentage {
            Some(value) => value,
            None => original_price
                .and_then(|original| original.discount_percentage_to(&discount_price))
                .map(|pct| round_to(pct, 2))
                .ok_or_else(|| CommerceError::MissingPercentage(offer_id.clone()))?,
        };
        if !(0.0..=100.0).contains(&discount_percentage) {
            return Err(CommerceError::PercentageOutOfRange {
                offer_id,
                value: discount_percentage,
            });
        }

        let valid_from = parse_date(&offer_id, "valid_from", record.valid_from.as_deref())?;
        let valid_until = parse_date(&offer_id, "valid_until", record.valid_until.as_deref())?;

        Ok(Self {
            id: OfferId::new(record.id),
            supermarket: record.supermarket,
            product_name: record.product_name,
            category: record.category.filter(|c| !c.trim().is_empty()),
            original_price,
            discount_price,
            discount_percentage,
            description: record.description,
            valid_from,
            valid_until,
            image_url: record.image_url,
            product_url: record.product_url,
        })
    }
}

/// Accepts `2024-03-01` as well as `2024-03-01T00:00:00[.ffffff]`.
fn parse_date(
    offer_id: &str,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, CommerceError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| Some(dt.date()))
        .map_err(|_| CommerceError::InvalidDate {
            offer_id: offer_id.to_string(),
            field,
            value: raw.to_string(),
        })
}
