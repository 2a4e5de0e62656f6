pub mod condition;
pub mod config;
pub mod entry;
pub mod settings;

pub use condition::Condition;
pub use config::{BuildConfig, DEFAULT_REGIONS, DEFAULT_VERSIONS};
pub use entry::EncounterEntry;
