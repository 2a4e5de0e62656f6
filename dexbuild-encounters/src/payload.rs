//! Aggregation and payload assembly.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use dexbuild_core::{BuildConfig, EncounterEntry};
use dexbuild_export::tables::{URL_ENCOUNTERS, URL_LOCATIONS, URL_LOCATION_AREAS};
use dexbuild_export::ExportTables;

use crate::locations::{AreaIndex, LocationFilter};
use crate::normalize::normalize_row;

/// Fixed attribution strings for the metadata block.
const SOURCE: &str = "PokeDB Data Export";
const SOURCE_URL: &str = "https://pokedb.org/data-export";
const NOTE: &str = "Provided for educational/research/non-commercial use per PokeDB guidelines; see sourceUrl for terms.";

/// Encounter entries grouped by owning location.
///
/// Locations keep first-seen order from the encounters table, and each
/// bucket keeps its rows in table order. Entries are never sorted,
/// merged, or deduplicated; duplicates in the source mean duplicate
/// slots and the frontend wants to see them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationBuckets(pub IndexMap<String, Vec<EncounterEntry>>);

impl LocationBuckets {
    /// Append an entry to its location's bucket, creating the bucket the
    /// first time the location is seen.
    pub fn push(&mut self, location: String, entry: EncounterEntry) {
        self.0.entry(location).or_default().push(entry);
    }

    /// Number of locations with at least one entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total entries across all locations.
    pub fn entry_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

/// Download URLs of the three source tables, recorded for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableUrls {
    pub encounters: String,
    pub location_areas: String,
    pub locations: String,
}

impl Default for TableUrls {
    fn default() -> Self {
        Self {
            encounters: URL_ENCOUNTERS.to_string(),
            location_areas: URL_LOCATION_AREAS.to_string(),
            locations: URL_LOCATIONS.to_string(),
        }
    }
}

/// Metadata block describing one build of the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMeta {
    pub source: String,
    pub source_url: String,
    /// Second-precision UTC timestamp, e.g. `2026-08-22T14:03:11Z`.
    pub generated_at: String,
    /// Region allowlist used for the build, sorted.
    pub regions: Vec<String>,
    /// Version allowlist used for the build, sorted.
    pub versions: Vec<String>,
    pub tables: TableUrls,
    pub note: String,
}

/// The complete payload: metadata, grouped entries, and the
/// location-to-region lookup the frontend uses to split DLC areas out
/// from their base game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterIndex {
    #[serde(rename = "_meta")]
    pub meta: IndexMeta,
    pub locations: LocationBuckets,
    /// One key per emitted location, `null` when the region is unknown.
    /// Same insertion order as `locations`.
    #[serde(rename = "locationRegions")]
    pub location_regions: IndexMap<String, Option<String>>,
}

impl EncounterIndex {
    /// Wrap aggregated buckets and the region lookup into a payload.
    pub fn assemble(
        locations: LocationBuckets,
        filter: &LocationFilter,
        config: &BuildConfig,
    ) -> Self {
        let location_regions = locations
            .0
            .keys()
            .map(|loc| (loc.clone(), filter.region_of(loc).map(str::to_string)))
            .collect();

        Self {
            meta: IndexMeta {
                source: SOURCE.to_string(),
                source_url: SOURCE_URL.to_string(),
                generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                regions: config.regions.iter().cloned().collect(),
                versions: config.versions.iter().cloned().collect(),
                tables: TableUrls::default(),
                note: NOTE.to_string(),
            },
            locations,
            location_regions,
        }
    }
}

/// Counters from one index build, for the CLI summary.
#[derive(Debug, Default)]
pub struct BuildStats {
    /// Locations that passed the region allowlist.
    pub accepted_locations: u64,
    /// Areas owned by an accepted location.
    pub target_areas: u64,
    /// Encounter rows that made it into the payload.
    pub entries: u64,
    /// Encounter rows dropped by the exclusion checks.
    pub skipped_rows: u64,
    /// Encounter rows examined.
    pub total_rows: u64,
}

/// Run the whole transformation: two joins, then one linear pass over
/// the encounters table.
pub fn build_index(tables: &ExportTables, config: &BuildConfig) -> (EncounterIndex, BuildStats) {
    let filter = LocationFilter::from_rows(&tables.locations, config);
    let areas = AreaIndex::from_rows(&tables.areas, &filter);

    let mut stats = BuildStats::default();
    stats.accepted_locations = filter.accepted.len() as u64;
    stats.target_areas = areas.targets.len() as u64;
    stats.total_rows = tables.encounters.len() as u64;

    let mut buckets = LocationBuckets::default();
    for row in &tables.encounters {
        match normalize_row(row, &areas, config) {
            Some((location, entry)) => {
                buckets.push(location, entry);
                stats.entries += 1;
            }
            None => stats.skipped_rows += 1,
        }
    }

    (EncounterIndex::assemble(buckets, &filter, config), stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pokemon: &str) -> EncounterEntry {
        EncounterEntry {
            pokemon: pokemon.to_string(),
            versions: vec!["sword".to_string()],
            method: "walk".to_string(),
            chance: None,
            min_level: None,
            max_level: None,
            conditions: Vec::new(),
            area: "somewhere".to_string(),
        }
    }

    #[test]
    fn buckets_keep_first_seen_order() {
        let mut buckets = LocationBuckets::default();
        buckets.push("motostoke".to_string(), entry("a"));
        buckets.push("route-1".to_string(), entry("b"));
        buckets.push("motostoke".to_string(), entry("c"));

        let keys: Vec<&String> = buckets.0.keys().collect();
        assert_eq!(keys, ["motostoke", "route-1"]);
        assert_eq!(buckets.0["motostoke"].len(), 2);
        assert_eq!(buckets.entry_count(), 3);
    }

    #[test]
    fn duplicate_entries_are_kept() {
        let mut buckets = LocationBuckets::default();
        buckets.push("route-1".to_string(), entry("zigzagoon"));
        buckets.push("route-1".to_string(), entry("zigzagoon"));
        assert_eq!(buckets.0["route-1"].len(), 2);
    }

    #[test]
    fn meta_serializes_with_camel_case_keys() {
        let index = EncounterIndex::assemble(
            LocationBuckets::default(),
            &LocationFilter::default(),
            &BuildConfig::default(),
        );
        let json = serde_json::to_value(&index).unwrap();

        let meta = &json["_meta"];
        assert_eq!(meta["source"], "PokeDB Data Export");
        assert_eq!(meta["sourceUrl"], "https://pokedb.org/data-export");
        assert!(meta["generatedAt"].is_string());
        assert_eq!(
            meta["tables"]["location_areas"],
            "https://cdn.pokedb.org/data_export_location_areas_json"
        );
        assert!(json["locations"].is_object());
        assert!(json["locationRegions"].is_object());
    }

    #[test]
    fn generated_at_is_second_precision_utc() {
        let index = EncounterIndex::assemble(
            LocationBuckets::default(),
            &LocationFilter::default(),
            &BuildConfig::default(),
        );
        let stamp = &index.meta.generated_at;
        assert!(
            chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%dT%H:%M:%SZ").is_ok(),
            "unexpected timestamp shape: {stamp}"
        );
    }
}
