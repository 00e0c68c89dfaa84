//! Load status of independently fetched dashboard data.

use serde::Serialize;

/// A piece of dashboard data fetched once at startup.
///
/// Each slot settles on its own; a failed slot does not affect the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Slot<T> {
    /// Fetch not yet answered.
    Pending,
    /// Successfully loaded.
    Ready(T),
    /// Failed with error.
    Failed(String),
}

impl<T> Slot<T> {
    /// Build a slot from a fetch result.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Slot::Ready(value),
            Err(e) => Slot::Failed(e.to_string()),
        }
    }

    /// The loaded value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if the fetch failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Slot::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Slot::Pending)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Slot::Failed(_))
    }

    /// Check if the slot is settled (loaded or failed).
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Slot::Pending
    }
}
