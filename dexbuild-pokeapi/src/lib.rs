//! PokeAPI client and the data audits built on it.
//!
//! The encounter index is built from PokeDB's export, but PokeAPI is
//! the upstream both draw from; the audit commands cross-check the
//! site's fallback data against it. All requests go through one shared
//! client that spaces calls out and sends a real user agent.

pub mod audit;
pub mod client;
pub mod error;
pub mod evolution;
pub mod types;

pub use audit::{ScanProgress, SpeciesAudit};
pub use client::PokeApiClient;
pub use error::ApiError;
