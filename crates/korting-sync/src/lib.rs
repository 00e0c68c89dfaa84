//! Last-request-wins synchronization for the discount dashboard.
//!
//! This crate keeps the dashboard state in step with the filters:
//! - `SyncController` - Issues queries and commits only the latest answer
//! - `DashboardSnapshot` - Read-only view handed to renderers
//! - `Slot` - Load status of facets and stats
//! - `SyncConfig` - Controller tuning

mod config;
mod controller;
mod slot;
mod state;

pub use config::*;
pub use controller::*;
pub use slot::*;
pub use state::*;
