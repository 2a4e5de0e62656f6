//! Region and version allowlists for a build run.

use std::collections::BTreeSet;

/// Region slugs included by default.
///
/// The Gen 8/9 regions plus the ones whose games re-use older maps
/// (Let's Go Kanto, BDSP Sinnoh). Galar's DLC areas carry their own
/// region slugs in the export, so they are listed separately.
pub const DEFAULT_REGIONS: &[&str] = &[
    "galar",
    "isle-of-armor",
    "crown-tundra",
    "hisui",
    "paldea",
    "kanto",
    "sinnoh",
];

/// Game version slugs included by default.
pub const DEFAULT_VERSIONS: &[&str] = &[
    "sword",
    "shield",
    "legends-arceus",
    "scarlet",
    "violet",
    "lets-go-pikachu",
    "lets-go-eevee",
    "brilliant-diamond",
    "shining-pearl",
];

/// The allowlists one index build runs against.
///
/// Every pipeline stage takes the config as an explicit argument, so a
/// build is a pure function of (tables, config) and tests can run with
/// tiny hand-made lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Accepted region slugs, lowercase.
    pub regions: BTreeSet<String>,
    /// Accepted game version slugs, lowercase.
    pub versions: BTreeSet<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_REGIONS.iter().map(|s| s.to_string()),
            DEFAULT_VERSIONS.iter().map(|s| s.to_string()),
        )
    }
}

impl BuildConfig {
    /// Build a config from arbitrary slug lists. Slugs are lowercased on
    /// the way in; comparisons elsewhere assume it.
    pub fn new<R, V>(regions: R, versions: V) -> Self
    where
        R: IntoIterator<Item = String>,
        V: IntoIterator<Item = String>,
    {
        Self {
            regions: regions.into_iter().map(|s| s.to_lowercase()).collect(),
            versions: versions.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn allows_region(&self, slug: &str) -> bool {
        self.regions.contains(slug)
    }

    pub fn allows_version(&self, slug: &str) -> bool {
        self.versions.contains(slug)
    }
}
