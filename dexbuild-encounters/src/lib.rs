//! The encounter-index pipeline: joins the three export tables, filters
//! them down to the configured regions and versions, normalizes the
//! messy per-row fields, and assembles the payload the site loads.
//!
//! Stages are plain functions over plain data. A whole build is
//! `build_index(&tables, &config)`; everything else here is one stage of
//! it, public so tests and tooling can poke at the seams.

pub mod chance;
pub mod error;
pub mod levels;
pub mod locations;
pub mod normalize;
pub mod payload;
pub mod writer;

pub use chance::parse_percentish;
pub use error::BuildError;
pub use levels::parse_level_range;
pub use locations::{AreaIndex, LocationFilter};
pub use normalize::normalize_row;
pub use payload::{BuildStats, EncounterIndex, IndexMeta, LocationBuckets, TableUrls, build_index};
