//! Shared application settings (data directory, config file location).
//!
//! Every frontend resolves paths through these functions so the settings
//! file is always `~/.config/dexbuild/settings.toml` and data-directory
//! resolution stays consistent.

use std::io;
use std::path::{Path, PathBuf};

/// Canonical path to the settings file: `~/.config/dexbuild/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("dexbuild").join("settings.toml")
}

/// Resolve the data directory using a priority chain:
///
/// 1. CLI override (if `Some`)
/// 2. Saved `output.data_dir` in `settings.toml`
/// 3. `data/` under the current working directory
pub fn resolve_data_dir(cli_override: Option<PathBuf>) -> PathBuf {
    if let Some(p) = cli_override {
        return p;
    }
    if let Some(p) = load_data_dir() {
        return p;
    }
    PathBuf::from("data")
}

/// Read `output.data_dir` from `settings.toml`, if set.
pub fn load_data_dir() -> Option<PathBuf> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let dir = doc.get("output")?.get("data_dir")?.as_str()?;
    if dir.is_empty() {
        None
    } else {
        Some(PathBuf::from(dir))
    }
}

/// Save (or clear) the data directory in `settings.toml`.
///
/// Uses `toml::Value` for a surgical update so unrelated sections added
/// by hand or by future versions are preserved.
pub fn save_data_dir(path: Option<&Path>) -> io::Result<()> {
    let settings = settings_path();
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(&settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    // Ensure [output] table exists
    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let output = table
        .entry("output")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let output_table = output
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[output] is not a table"))?;

    match path {
        Some(p) => {
            output_table.insert(
                "data_dir".to_string(),
                toml::Value::String(p.to_string_lossy().into_owned()),
            );
        }
        None => {
            output_table.remove("data_dir");
        }
    }

    // Write atomically
    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, &settings)?;

    Ok(())
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}
