//! Dashboard state and its read-only snapshot.

use std::collections::BTreeSet;

use korting_commerce::search::{FacetKind, FilterCriteria, FilterField};
use korting_commerce::{DiscountOffer, Stats};
use serde::Serialize;

use crate::slot::Slot;

/// Message shown when a startup fetch fails.
pub const STARTUP_ERROR: &str = "Failed to load initial data";

/// Prefix of the message shown when an offer query fails.
pub const OFFERS_ERROR: &str = "Failed to load discounts";

/// Where the offer list stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No query issued yet.
    #[default]
    Idle,
    /// A query is outstanding.
    Loading,
    /// The latest query succeeded.
    Loaded,
    /// The latest query failed; the previous offers are still shown.
    Failed,
}

/// The offer list as last committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncState {
    /// Offers of the last successful query.
    pub offers: Vec<DiscountOffer>,
    /// Matches reported by the source for that query.
    pub total: u64,
    /// Set while the latest query is outstanding.
    pub loading: bool,
    /// Message for the latest failed query.
    pub error: Option<String>,
    /// Generation of the most recently issued query.
    pub generation: u64,
    pub phase: Phase,
}

/// Everything the dashboard shows, owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub criteria: FilterCriteria,
    pub sync: SyncState,
    pub supermarkets: Slot<BTreeSet<String>>,
    pub categories: Slot<BTreeSet<String>>,
    pub stats: Slot<Stats>,
    /// Set when any startup fetch failed.
    pub startup_error: Option<String>,
}

impl DashboardState {
    /// The loaded values of one facet.
    pub fn facet(&self, kind: FacetKind) -> &Slot<BTreeSet<String>> {
        match kind {
            FacetKind::Supermarket => &self.supermarkets,
            FacetKind::Category => &self.categories,
        }
    }
}

/// Statistics as the dashboard should present them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "stats", rename_all = "snake_case")]
pub enum StatsView {
    /// Global statistics from the source.
    Global(Stats),
    /// Computed from the displayed offers because global stats are missing.
    Derived(Stats),
    /// Nothing to show.
    Unavailable,
}

impl StatsView {
    pub fn stats(&self) -> Option<&Stats> {
        match self {
            StatsView::Global(stats) | StatsView::Derived(stats) => Some(stats),
            StatsView::Unavailable => None,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self, StatsView::Derived(_))
    }
}

/// Read-only copy of the dashboard state handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub criteria: FilterCriteria,
    pub sync: SyncState,
    pub supermarkets: Slot<BTreeSet<String>>,
    pub categories: Slot<BTreeSet<String>>,
    pub stats: Slot<Stats>,
    pub startup_error: Option<String>,
    #[serde(skip)]
    stats_fallback: bool,
}

impl DashboardSnapshot {
    pub(crate) fn new(state: &DashboardState, stats_fallback: bool) -> Self {
        Self {
            criteria: state.criteria.clone(),
            sync: state.sync.clone(),
            supermarkets: state.supermarkets.clone(),
            categories: state.categories.clone(),
            stats: state.stats.clone(),
            startup_error: state.startup_error.clone(),
            stats_fallback,
        }
    }

    pub fn facet(&self, kind: FacetKind) -> &Slot<BTreeSet<String>> {
        match kind {
            FacetKind::Supermarket => &self.supermarkets,
            FacetKind::Category => &self.categories,
        }
    }

    pub fn offers(&self) -> &[DiscountOffer] {
        &self.sync.offers
    }

    pub fn loading(&self) -> bool {
        self.sync.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.sync.error.as_deref()
    }

    pub fn phase(&self) -> Phase {
        self.sync.phase
    }

    /// Number of offers on display ("N kortingen gevonden").
    pub fn result_count(&self) -> usize {
        self.sync.offers.len()
    }

    /// Check for the "no offers match the current filters" state.
    ///
    /// Only true once a query has been answered.
    pub fn is_empty(&self) -> bool {
        self.sync.offers.is_empty() && matches!(self.sync.phase, Phase::Loaded)
    }

    /// Set filters with their values, in display order.
    pub fn active_filters(&self) -> Vec<(FilterField, String)> {
        self.criteria.active_filters()
    }

    /// Stats to present.
    ///
    /// Global stats when loaded. When the stats fetch failed and the
    /// fallback is enabled, stats over the displayed offers instead.
    pub fn stats_view(&self) -> StatsView {
        match &self.stats {
            Slot::Ready(stats) => StatsView::Global(stats.clone()),
            Slot::Failed(_) if self.stats_fallback => {
                StatsView::Derived(Stats::from_offers(&self.sync.offers))
            }
            _ => StatsView::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use korting_commerce::OfferRecord;

    fn offer(id: u64, supermarket: &str, pct: f64) -> DiscountOffer {
        DiscountOffer::try_from(OfferRecord {
            id,
            supermarket: supermarket.to_string(),
            product_name: format!("Product {}", id),
            category: None,
            original_price: None,
            discount_price: 1.0,
            discount_percentage: Some(pct),
            description: None,
            valid_from: None,
            valid_until: None,
            image_url: None,
            product_url: None,
            is_active: true,
        })
        .unwrap()
    }

    fn state_with_offers() -> DashboardState {
        DashboardState {
            sync: SyncState {
                offers: vec![offer(1, "A", 10.0), offer(2, "A", 20.0), offer(3, "B", 30.0)],
                total: 3,
                phase: Phase::Loaded,
                generation: 1,
                ..SyncState::default()
            },
            ..DashboardState::default()
        }
    }

    #[test]
    fn test_stats_view_global() {
        let mut state = state_with_offers();
        let global = Stats::from_offers(&[offer(9, "C", 50.0)]);
        state.stats = Slot::Ready(global.clone());

        let snapshot = DashboardSnapshot::new(&state, true);
        assert_eq!(snapshot.stats_view(), StatsView::Global(global));
    }

    #[test]
    fn test_stats_view_derived_on_failure() {
        let mut state = state_with_offers();
        state.stats = Slot::Failed("HTTP 500".to_string());

        let view = DashboardSnapshot::new(&state, true).stats_view();
        assert!(view.is_derived());
        let stats = view.stats().unwrap();
        assert_eq!(stats.total_discounts, 3);
        assert_eq!(stats.average_discount_percentage, Some(20.0));
        assert_eq!(stats.supermarket_counts.get("A"), Some(&2));
        assert_eq!(stats.supermarket_counts.get("B"), Some(&1));

        let view = DashboardSnapshot::new(&state, false).stats_view();
        assert_eq!(view, StatsView::Unavailable);
    }

    #[test]
    fn test_stats_view_pending() {
        let state = state_with_offers();
        let view = DashboardSnapshot::new(&state, true).stats_view();
        assert_eq!(view, StatsView::Unavailable);
    }

    #[test]
    fn test_empty_state() {
        let mut state = DashboardState::default();
        assert!(!DashboardSnapshot::new(&state, true).is_empty());

        state.sync.phase = Phase::Loaded;
        let snapshot = DashboardSnapshot::new(&state, true);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.result_count(), 0);
    }
}
