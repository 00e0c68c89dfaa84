//! Aggregate discount statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::offer::DiscountOffer;
use crate::search::OfferList;

/// Decimal places kept on the average discount percentage.
pub const AVERAGE_PRECISION: u32 = 2;

/// Summary over a collection of offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of offers.
    pub total_discounts: u64,
    /// Mean discount percentage, absent when there are no offers.
    #[serde(default)]
    pub average_discount_percentage: Option<f64>,
    /// Offer count per supermarket.
    #[serde(default)]
    pub supermarket_counts: BTreeMap<String, u64>,
}

impl Stats {
    /// Compute stats from a list of offers.
    ///
    /// Total for every input, including the empty list.
    pub fn from_offers(offers: &[DiscountOffer]) -> Self {
        let mut supermarket_counts: BTreeMap<String, u64> = BTreeMap::new();
        for offer in offers {
            *supermarket_counts
                .entry(offer.supermarket.clone())
                .or_insert(0) += 1;
        }

        let average_discount_percentage = if offers.is_empty() {
            None
        } else {
            let sum: f64 = offers.iter().map(|o| o.discount_percentage).sum();
            Some(round_to(sum / offers.len() as f64, AVERAGE_PRECISION))
        };

        Self {
            total_discounts: offers.len() as u64,
            average_discount_percentage,
            supermarket_counts,
        }
    }

    /// Compute stats from an offer list.
    pub fn from_offer_list(list: &OfferList) -> Self {
        Self::from_offers(&list.offers)
    }

    /// Bring stats received from a source in line with the local invariants:
    /// no average without offers, and the average rounded.
    pub fn normalized(mut self) -> Self {
        self.average_discount_percentage = if self.total_discounts == 0 {
            None
        } else {
            self.average_discount_percentage
                .map(|avg| round_to(avg, AVERAGE_PRECISION))
        };
        self
    }

    /// Number of distinct supermarkets.
    pub fn distinct_supermarkets(&self) -> usize {
        self.supermarket_counts.len()
    }

    /// Average formatted for display (e.g., "23.50%"), or "-" when absent.
    pub fn average_display(&self) -> String {
        match self.average_discount_percentage {
            Some(avg) => format!("{:.2}%", avg),
            None => "-".to_string(),
        }
    }
}

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10_f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OfferId;
    use crate::money::Money;

    fn offer(id: u64, supermarket: &str, pct: f64) -> DiscountOffer {
        DiscountOffer {
            id: OfferId::new(id),
            supermarket: supermarket.to_string(),
            product_name: format!("Product {}", id),
            category: None,
            original_price: None,
            discount_price: Money::new(100),
            discount_percentage: pct,
            description: None,
            valid_from: None,
            valid_until: None,
            image_url: None,
            product_url: None,
        }
    }

    #[test]
    fn test_empty_list() {
        let stats = Stats::from_offers(&[]);
        assert_eq!(stats.total_discounts, 0);
        assert_eq!(stats.average_discount_percentage, None);
        assert!(stats.supermarket_counts.is_empty());
        assert_eq!(stats.average_display(), "-");
    }

    #[test]
    fn test_average_of_percentages() {
        let offers = vec![offer(1, "A", 10.0), offer(2, "A", 20.0), offer(3, "B", 30.0)];
        let stats = Stats::from_offers(&offers);
        assert_eq!(stats.total_discounts, 3);
        assert_eq!(stats.average_discount_percentage, Some(20.0));
        assert_eq!(stats.average_display(), "20.00%");
    }

    #[test]
    fn test_supermarket_counts() {
        let offers = vec![offer(1, "A", 5.0), offer(2, "A", 5.0), offer(3, "B", 5.0)];
        let stats = Stats::from_offers(&offers);
        let expected: BTreeMap<String, u64> =
            [("A".to_string(), 2), ("B".to_string(), 1)].into_iter().collect();
        assert_eq!(stats.supermarket_counts, expected);
        assert_eq!(stats.distinct_supermarkets(), 2);
    }

    #[test]
    fn test_average_is_rounded() {
        let offers = vec![offer(1, "A", 10.0), offer(2, "A", 10.0), offer(3, "A", 15.0)];
        let stats = Stats::from_offers(&offers);
        assert_eq!(stats.average_discount_percentage, Some(11.67));
    }

    #[test]
    fn test_normalized_drops_average_without_offers() {
        let wire: Stats = serde_json::from_str(
            r#"{"total_discounts": 0, "supermarket_counts": {}, "average_discount_percentage": 0}"#,
        )
        .unwrap();
        assert_eq!(wire.normalized().average_discount_percentage, None);

        let wire: Stats = serde_json::from_str(
            r#"{"total_discounts": 4, "supermarket_counts": {"Dirk": 4}, "average_discount_percentage": 17.123}"#,
        )
        .unwrap();
        assert_eq!(wire.normalized().average_discount_percentage, Some(17.12));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.005_1, 2), 2.01);
        assert_eq!(round_to(19.999, 2), 20.0);
    }
}
