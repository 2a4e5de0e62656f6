//! Location and area resolution: the first two joins of the pipeline.
//!
//! The export splits geography across two tables: locations carry the
//! region, location areas carry the location. Both get folded into
//! lookup structures here before any encounter row is touched.

use std::collections::{HashMap, HashSet};

use dexbuild_core::BuildConfig;
use dexbuild_export::{LocationAreaRow, LocationRow};

/// Locations that survive the region allowlist, with their region slugs.
#[derive(Debug, Default)]
pub struct LocationFilter {
    /// Identifiers of locations in an allowlisted region.
    pub accepted: HashSet<String>,
    /// Accepted location identifier -> lowercased region slug.
    pub regions: HashMap<String, String>,
}

impl LocationFilter {
    /// Build the filter from the raw locations table.
    ///
    /// Rows missing either field, or naming a region outside the
    /// allowlist, are skipped. The export always contains a few
    /// half-filled rows and they must not poison the join.
    pub fn from_rows(rows: &[LocationRow], config: &BuildConfig) -> Self {
        let mut filter = Self::default();

        for row in rows {
            let (identifier, region) = match (&row.identifier, &row.region_area_identifier) {
                (Some(i), Some(r)) if !i.is_empty() && !r.is_empty() => (i, r),
                _ => continue,
            };
            let region = region.to_lowercase();
            if config.regions.contains(&region) {
                filter.accepted.insert(identifier.clone());
                filter.regions.insert(identifier.clone(), region);
            }
        }

        filter
    }

    /// Region slug for an accepted location, if known.
    pub fn region_of(&self, location: &str) -> Option<&str> {
        self.regions.get(location).map(String::as_str)
    }
}

/// Index from location areas to their owning locations.
#[derive(Debug, Default)]
pub struct AreaIndex {
    /// Every area identifier -> owning location identifier, across all
    /// regions. Kept total so lookups never dangle.
    pub locations: HashMap<String, String>,
    /// Areas whose owning location passed the region filter.
    pub targets: HashSet<String>,
}

impl AreaIndex {
    /// Build the index from the raw location-areas table.
    pub fn from_rows(rows: &[LocationAreaRow], filter: &LocationFilter) -> Self {
        let mut index = Self::default();

        for row in rows {
            let (area, location) = match (&row.identifier, &row.location_identifier) {
                (Some(a), Some(l)) if !a.is_empty() && !l.is_empty() => (a, l),
                _ => continue,
            };
            index.locations.insert(area.clone(), location.clone());
            if filter.accepted.contains(location) {
                index.targets.insert(area.clone());
            }
        }

        index
    }

    /// Owning location for an area, if the area is known.
    pub fn location_of(&self, area: &str) -> Option<&str> {
        self.locations.get(area).map(String::as_str)
    }

    /// Whether an area belongs to an allowlisted location.
    pub fn is_target(&self, area: &str) -> bool {
        self.targets.contains(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(identifier: &str, region: &str) -> LocationRow {
        LocationRow {
            identifier: Some(identifier.to_string()),
            region_area_identifier: Some(region.to_string()),
        }
    }

    fn area(identifier: &str, location: &str) -> LocationAreaRow {
        LocationAreaRow {
            identifier: Some(identifier.to_string()),
            location_identifier: Some(location.to_string()),
        }
    }

    fn config() -> BuildConfig {
        BuildConfig::new(
            vec!["galar".to_string()],
            vec!["sword".to_string()],
        )
    }

    #[test]
    fn filter_keeps_allowlisted_regions_only() {
        let rows = vec![
            location("route-1", "galar"),
            location("route-101", "hoenn"),
            location("slumbering-weald", "GALAR"),
        ];
        let filter = LocationFilter::from_rows(&rows, &config());

        assert!(filter.accepted.contains("route-1"));
        assert!(filter.accepted.contains("slumbering-weald"));
        assert!(!filter.accepted.contains("route-101"));
        assert_eq!(filter.region_of("slumbering-weald"), Some("galar"));
    }

    #[test]
    fn filter_skips_incomplete_rows() {
        let rows = vec![
            LocationRow {
                identifier: Some("route-1".to_string()),
                region_area_identifier: None,
            },
            LocationRow {
                identifier: None,
                region_area_identifier: Some("galar".to_string()),
            },
            LocationRow {
                identifier: Some(String::new()),
                region_area_identifier: Some("galar".to_string()),
            },
        ];
        let filter = LocationFilter::from_rows(&rows, &config());
        assert!(filter.accepted.is_empty());
    }

    #[test]
    fn area_index_is_total_but_targets_are_filtered() {
        let filter = LocationFilter::from_rows(&[location("route-1", "galar")], &config());
        let rows = vec![
            area("route-1-area", "route-1"),
            area("route-101-area", "route-101"),
        ];
        let index = AreaIndex::from_rows(&rows, &filter);

        assert!(index.is_target("route-1-area"));
        assert!(!index.is_target("route-101-area"));
        // Non-target areas still resolve; downstream decides what to drop
        assert_eq!(index.location_of("route-101-area"), Some("route-101"));
    }
}
