//! API endpoints.

use korting_commerce::OfferId;

/// The discount API endpoints consumed by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Filtered offer list.
    Offers,
    /// A single offer by id.
    Offer(OfferId),
    /// Distinct supermarket names.
    Supermarkets,
    /// Distinct category names.
    Categories,
    /// Global statistics.
    Stats,
    /// Liveness probe.
    Health,
}

impl Endpoint {
    /// Path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            Self::Offers => "/discounts".to_string(),
            Self::Offer(id) => format!("/discounts/{}", id),
            Self::Supermarkets => "/supermarkets".to_string(),
            Self::Categories => "/categories".to_string(),
            Self::Stats => "/stats".to_string(),
            Self::Health => "/health".to_string(),
        }
    }

    /// Short name for logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Offers => "offers",
            Self::Offer(_) => "offer",
            Self::Supermarkets => "supermarkets",
            Self::Categories => "categories",
            Self::Stats => "stats",
            Self::Health => "health",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
