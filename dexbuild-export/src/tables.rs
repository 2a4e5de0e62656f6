//! Row models for the PokeDB data-export tables.
//!
//! The export is a denormalized dump of PokeDB's internal database and
//! its rows are not uniformly typed: numeric columns sometimes arrive as
//! strings, flag columns as 0/1, and any field can be missing. Rows
//! deserialize leniently here; whether an incomplete row is usable is
//! decided later, per stage.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use dexbuild_core::Condition;

use crate::error::ExportError;

/// Download URLs for the three tables, on PokeDB's CDN.
pub const URL_LOCATIONS: &str = "https://cdn.pokedb.org/data_export_locations_json";
pub const URL_LOCATION_AREAS: &str = "https://cdn.pokedb.org/data_export_location_areas_json";
pub const URL_ENCOUNTERS: &str = "https://cdn.pokedb.org/data_export_encounters_json";

/// A scalar column the export types inconsistently.
///
/// The same column can hold `20`, `"20%"`, or `true` depending on which
/// game's dump a row came from, so scalar fields deserialize into this
/// and get interpreted by the parsers downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl RawScalar {
    /// Text view used by the scalar parsers.
    ///
    /// Numbers format without a trailing `.0`, so `15.0` scans the same
    /// as `"15"`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RawScalar::Flag(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            RawScalar::Number(n) => Cow::Owned(n.to_string()),
            RawScalar::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Truthiness for flag columns: `false`, `0`, and `""` are false,
    /// everything else is true.
    pub fn truthy(&self) -> bool {
        match self {
            RawScalar::Flag(b) => *b,
            RawScalar::Number(n) => *n != 0.0,
            RawScalar::Text(s) => !s.is_empty(),
        }
    }
}

/// One row of the locations table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationRow {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub region_area_identifier: Option<String>,
}

/// One row of the location-areas table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationAreaRow {
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub location_identifier: Option<String>,
}

/// One row of the encounters table.
///
/// Only the columns the normalizer consumes are modelled; the export
/// carries plenty more and serde ignores them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncounterRow {
    #[serde(default)]
    pub location_area_identifier: Option<String>,
    #[serde(default)]
    pub version_identifiers: Vec<String>,
    #[serde(default)]
    pub pokemon_form_identifier: Option<String>,
    #[serde(default)]
    pub levels: Option<RawScalar>,
    #[serde(default)]
    pub rate_overall: Option<RawScalar>,
    #[serde(default)]
    pub probability_overall: Option<RawScalar>,
    #[serde(default)]
    pub encounter_method_identifier: Option<String>,

    #[serde(default)]
    pub during_morning: Option<RawScalar>,
    #[serde(default)]
    pub during_day: Option<RawScalar>,
    #[serde(default)]
    pub during_evening: Option<RawScalar>,
    #[serde(default)]
    pub during_night: Option<RawScalar>,
    #[serde(default)]
    pub while_clear: Option<RawScalar>,
    #[serde(default)]
    pub while_cloudy: Option<RawScalar>,
    #[serde(default)]
    pub while_harsh_sunlight: Option<RawScalar>,
    #[serde(default)]
    pub while_blizzard: Option<RawScalar>,
    #[serde(default)]
    pub on_terrain_land: Option<RawScalar>,
    #[serde(default)]
    pub on_terrain_watersurface: Option<RawScalar>,
    #[serde(default)]
    pub on_terrain_underwater: Option<RawScalar>,
    #[serde(default)]
    pub on_terrain_overland: Option<RawScalar>,
    #[serde(default)]
    pub on_terrain_sky: Option<RawScalar>,
}

impl EncounterRow {
    /// Whether the flag column for `condition` is set on this row.
    pub fn has_condition(&self, condition: Condition) -> bool {
        let flag = match condition {
            Condition::Morning => &self.during_morning,
            Condition::Day => &self.during_day,
            Condition::Evening => &self.during_evening,
            Condition::Night => &self.during_night,
            Condition::Clear => &self.while_clear,
            Condition::Cloudy => &self.while_cloudy,
            Condition::HarshSunlight => &self.while_harsh_sunlight,
            Condition::Blizzard => &self.while_blizzard,
            Condition::Land => &self.on_terrain_land,
            Condition::WaterSurface => &self.on_terrain_watersurface,
            Condition::Underwater => &self.on_terrain_underwater,
            Condition::Overland => &self.on_terrain_overland,
            Condition::Sky => &self.on_terrain_sky,
        };
        flag.as_ref().is_some_and(RawScalar::truthy)
    }
}

/// The three fully-loaded tables a build run consumes.
#[derive(Debug, Clone, Default)]
pub struct ExportTables {
    pub locations: Vec<LocationRow>,
    pub areas: Vec<LocationAreaRow>,
    pub encounters: Vec<EncounterRow>,
}

/// Parse a locations table from raw JSON bytes.
pub fn parse_locations(bytes: &[u8]) -> Result<Vec<LocationRow>, ExportError> {
    parse_rows(bytes, "locations")
}

/// Parse a location-areas table from raw JSON bytes.
pub fn parse_areas(bytes: &[u8]) -> Result<Vec<LocationAreaRow>, ExportError> {
    parse_rows(bytes, "location_areas")
}

/// Parse an encounters table from raw JSON bytes.
pub fn parse_encounters(bytes: &[u8]) -> Result<Vec<EncounterRow>, ExportError> {
    parse_rows(bytes, "encounters")
}

/// Shared row-by-row table parser.
///
/// A table that isn't a JSON array is fatal. A single row that doesn't
/// fit its model is warned about and skipped; the export always has a
/// few rows exported mid-edit.
fn parse_rows<T: DeserializeOwned>(bytes: &[u8], table: &str) -> Result<Vec<T>, ExportError> {
    let raw: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
    let mut rows = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value(value) {
            Ok(row) => rows.push(row),
            Err(e) => log::warn!("Skipping malformed {table} row: {e}"),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_scalar_accepts_all_three_shapes() {
        let n: RawScalar = serde_json::from_str("12.5").unwrap();
        let s: RawScalar = serde_json::from_str("\"20%\"").unwrap();
        let b: RawScalar = serde_json::from_str("true").unwrap();
        assert_eq!(n, RawScalar::Number(12.5));
        assert_eq!(s, RawScalar::Text("20%".to_string()));
        assert_eq!(b, RawScalar::Flag(true));
    }

    #[test]
    fn whole_numbers_render_without_decimal_point() {
        assert_eq!(RawScalar::Number(15.0).as_text(), "15");
        assert_eq!(RawScalar::Number(7.5).as_text(), "7.5");
    }

    #[test]
    fn truthiness_follows_source_conventions() {
        assert!(RawScalar::Flag(true).truthy());
        assert!(!RawScalar::Flag(false).truthy());
        assert!(RawScalar::Number(1.0).truthy());
        assert!(!RawScalar::Number(0.0).truthy());
        assert!(RawScalar::Text("yes".to_string()).truthy());
        assert!(!RawScalar::Text(String::new()).truthy());
    }

    #[test]
    fn rows_tolerate_missing_and_extra_fields() {
        let json = br#"[
            {"identifier": "route-1", "region_area_identifier": "galar", "unrelated": 9},
            {"identifier": "route-2"},
            {}
        ]"#;
        let rows = parse_locations(json).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].identifier.as_deref(), Some("route-1"));
        assert_eq!(rows[1].region_area_identifier, None);
        assert_eq!(rows[2].identifier, None);
    }

    #[test]
    fn structurally_broken_rows_are_skipped() {
        let json = br#"[
            {"location_area_identifier": "a1", "version_identifiers": ["sword"]},
            {"location_area_identifier": "a2", "version_identifiers": "not-a-list"}
        ]"#;
        let rows = parse_encounters(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].location_area_identifier.as_deref(), Some("a1"));
    }

    #[test]
    fn non_array_table_is_fatal() {
        assert!(parse_areas(br#"{"oops": true}"#).is_err());
    }

    #[test]
    fn condition_flags_accept_bools_and_numbers() {
        let json = br#"[
            {"while_clear": true, "on_terrain_land": 1, "during_night": 0}
        ]"#;
        let rows = parse_encounters(json).unwrap();
        assert!(rows[0].has_condition(Condition::Clear));
        assert!(rows[0].has_condition(Condition::Land));
        assert!(!rows[0].has_condition(Condition::Night));
        assert!(!rows[0].has_condition(Condition::Sky));
    }
}
