//! Data source adapters for the Korting discount dashboard.
//!
//! This crate provides:
//! - `DataSource` - The async boundary for offers, facets and stats
//! - `HttpSource` - Maps the operations onto the discount API over a `Transport`
//! - `MemorySource` - In-process catalog with the API's query semantics
//! - `Endpoint` - The API endpoints and their paths
//!
//! No adapter retries or times out on its own; that is left to the transport.

mod client;
mod endpoint;
mod error;
mod memory;
mod request;
mod response;
mod source;

pub use client::*;
pub use endpoint::*;
pub use error::*;
pub use memory::*;
pub use request::*;
pub use response::*;
pub use source::*;
