//! PokeDB data-export access: row models for the three tables the
//! encounter index consumes, plus a local download cache so rebuilds
//! don't hammer the CDN.

pub mod cache;
pub mod error;
pub mod tables;

pub use error::ExportError;
pub use tables::{
    EncounterRow, ExportTables, LocationAreaRow, LocationRow, RawScalar,
};
