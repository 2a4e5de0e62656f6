//! Payload sinks.
//!
//! The index is written twice: compact JSON for anything that can fetch,
//! and a `.js` wrapper assigning the same payload to a window global for
//! browsers viewing the site over `file://`, where JSON fetches are
//! blocked.

use std::fs;
use std::path::Path;

use crate::error::BuildError;
use crate::payload::EncounterIndex;

/// Global the wrapper script assigns; the site checks it before fetching.
pub const JS_GLOBAL: &str = "window.__POKEDB_ENCOUNTERS_G8G9__";

/// Default output file names under the data directory.
pub const JSON_FILE: &str = "pokedb-encounters-g8g9.json";
pub const JS_FILE: &str = "pokedb-encounters-g8g9.js";

/// Write the payload as compact JSON.
pub fn write_json(index: &EncounterIndex, path: &Path) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec(index)?)?;
    Ok(())
}

/// Write the payload as a script that assigns the window global.
pub fn write_js(index: &EncounterIndex, path: &Path) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(index)?;
    fs::write(path, format!("{JS_GLOBAL} = {json};\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locations::LocationFilter;
    use crate::payload::LocationBuckets;
    use dexbuild_core::{BuildConfig, EncounterEntry};

    fn sample_index() -> EncounterIndex {
        let mut buckets = LocationBuckets::default();
        buckets.push(
            "route-1".to_string(),
            EncounterEntry {
                pokemon: "rookidee".to_string(),
                versions: vec!["sword".to_string()],
                method: "walk".to_string(),
                chance: Some(40.0),
                min_level: Some(2),
                max_level: Some(5),
                conditions: Vec::new(),
                area: "route-1-area".to_string(),
            },
        );
        EncounterIndex::assemble(buckets, &LocationFilter::default(), &BuildConfig::default())
    }

    #[test]
    fn json_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let index = sample_index();
        write_json(&index, &path).unwrap();

        let loaded: EncounterIndex =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn json_is_compact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        write_json(&sample_index(), &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains('\n'));
        assert!(contents.contains("\"minLevel\":2"));
    }

    #[test]
    fn js_wrapper_assigns_the_global() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.js");

        let index = sample_index();
        write_js(&index, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let payload = contents
            .strip_prefix("window.__POKEDB_ENCOUNTERS_G8G9__ = ")
            .and_then(|rest| rest.strip_suffix(";\n"))
            .unwrap();
        let loaded: EncounterIndex = serde_json::from_str(payload).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn writers_create_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("index.json");
        write_json(&sample_index(), &path).unwrap();
        assert!(path.exists());
    }
}
