use serde::{Deserialize, Serialize};

/// One normalized encounter: a form that can be found in one location
/// area, in one or more allowlisted game versions.
///
/// Serializes with the exact key names the site's encounter panel reads,
/// including `null` for fields the source left blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEntry {
    /// Form slug, with a redundant `-default` suffix already collapsed
    /// to the base form.
    pub pokemon: String,

    /// Allowlisted versions this row applies to, source order preserved.
    pub versions: Vec<String>,

    /// Encounter method slug (`walk`, `surf`, ...). Rows with no method
    /// are bucketed under `special`.
    pub method: String,

    /// Encounter chance on a 0-100 scale, when the source provides one.
    pub chance: Option<f64>,

    /// Lowest level seen in the source's level text.
    #[serde(rename = "minLevel")]
    pub min_level: Option<u32>,

    /// Highest level seen in the source's level text.
    #[serde(rename = "maxLevel")]
    pub max_level: Option<u32>,

    /// Condition labels in canonical order (time, weather, terrain).
    pub conditions: Vec<String>,

    /// Raw location-area identifier, kept so the frontend can tell two
    /// areas of the same location apart.
    pub area: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_site_facing_keys() {
        let entry = EncounterEntry {
            pokemon: "rookidee".to_string(),
            versions: vec!["sword".to_string(), "shield".to_string()],
            method: "walk".to_string(),
            chance: Some(40.0),
            min_level: Some(2),
            max_level: Some(4),
            conditions: vec!["Weather Clear".to_string()],
            area: "route-1-area".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["pokemon"], "rookidee");
        assert_eq!(json["minLevel"], 2);
        assert_eq!(json["maxLevel"], 4);
        assert_eq!(json["chance"], 40.0);
        assert_eq!(json["area"], "route-1-area");
    }

    #[test]
    fn missing_values_serialize_as_null() {
        let entry = EncounterEntry {
            pokemon: "eevee".to_string(),
            versions: vec!["lets-go-eevee".to_string()],
            method: "special".to_string(),
            chance: None,
            min_level: None,
            max_level: None,
            conditions: Vec::new(),
            area: "celadon-city-area".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["chance"].is_null());
        assert!(json["minLevel"].is_null());
        assert!(json["maxLevel"].is_null());
        assert_eq!(json["conditions"], serde_json::json!([]));
    }
}
