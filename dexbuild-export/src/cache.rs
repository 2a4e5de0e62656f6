//! Local cache for downloaded export tables.
//!
//! Tables are pulled from the CDN once and re-read from
//! `~/.cache/dexbuild/exports/` on later builds, so iterating on the
//! pipeline doesn't re-download ~40 MB of JSON every run.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::tables::{self, ExportTables};

/// Cache format version. Bump this when changing table sources or the
/// row model enough to invalidate stale cached tables automatically.
const CACHE_VERSION: u32 = 2;

/// The three tables, with their cache keys and download URLs.
const TABLES: &[(&str, &str)] = &[
    ("locations", tables::URL_LOCATIONS),
    ("location_areas", tables::URL_LOCATION_AREAS),
    ("encounters", tables::URL_ENCOUNTERS),
];

/// Metadata about one cached table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTable {
    pub source: String,
    pub downloaded: String,
    pub file_size: u64,
    #[serde(default)]
    pub rows: u64,
}

/// Metadata file tracking all cached tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheMeta {
    /// Cache format version; mismatched versions trigger automatic invalidation.
    #[serde(default)]
    pub version: u32,
    /// Per-table metadata (keyed by cache key, e.g. "encounters").
    pub tables: HashMap<String, CachedTable>,
}

/// Information about a cached table for display purposes.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub table: String,
    pub source: String,
    pub file_size: u64,
    pub downloaded: String,
    pub rows: u64,
}

/// Get the cache directory for export tables.
pub fn cache_dir() -> Result<PathBuf, ExportError> {
    let base = dirs::cache_dir()
        .ok_or_else(|| ExportError::cache("Could not determine cache directory"))?;
    Ok(base.join("dexbuild").join("exports"))
}

/// Get the path to the meta.json file.
fn meta_path() -> Result<PathBuf, ExportError> {
    let base = dirs::cache_dir()
        .ok_or_else(|| ExportError::cache("Could not determine cache directory"))?;
    Ok(base.join("dexbuild").join("meta.json"))
}

/// Load cache metadata. If the cache version doesn't match, clears stale data.
fn load_meta() -> Result<CacheMeta, ExportError> {
    let path = meta_path()?;
    if !path.exists() {
        return Ok(CacheMeta {
            version: CACHE_VERSION,
            ..Default::default()
        });
    }
    let contents = fs::read_to_string(&path)?;
    let meta: CacheMeta = serde_json::from_str(&contents)?;
    if meta.version != CACHE_VERSION {
        // Stale cache from an older table layout; wipe it
        let _ = clear();
        return Ok(CacheMeta {
            version: CACHE_VERSION,
            ..Default::default()
        });
    }
    Ok(meta)
}

/// Save cache metadata.
fn save_meta(meta: &CacheMeta) -> Result<(), ExportError> {
    let path = meta_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(meta)?;
    fs::write(&path, contents)?;
    Ok(())
}

/// Get the on-disk path for a cached table.
fn table_path(name: &str) -> Result<PathBuf, ExportError> {
    Ok(cache_dir()?.join(format!("{name}.json")))
}

/// Download all three export tables into the cache.
///
/// The index join needs every table, so any failed download fails the
/// whole fetch; a partial table set would silently build an empty index.
/// Metadata is only written once all three are on disk.
pub fn fetch() -> Result<(), ExportError> {
    let mut cached_entries = HashMap::new();

    for (name, url) in TABLES {
        let path = table_path(name)?;

        // Ensure cache directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        log::info!("Downloading {url}");
        let response = reqwest::blocking::get(*url)?;
        if !response.status().is_success() {
            return Err(ExportError::download(format!(
                "HTTP {} for {name} ({url})",
                response.status()
            )));
        }
        let bytes = response.bytes()?;

        // Parse for the row count; this also rejects truncated downloads
        // before they can poison the cache.
        let raw: Vec<serde_json::Value> = serde_json::from_slice(&bytes).map_err(|e| {
            ExportError::invalid_table(format!("{name} is not a JSON array: {e}"))
        })?;

        fs::write(&path, &bytes)?;

        cached_entries.insert(
            name.to_string(),
            CachedTable {
                source: url.to_string(),
                downloaded: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                file_size: bytes.len() as u64,
                rows: raw.len() as u64,
            },
        );
    }

    // A fetch replaces every table, so the meta is rebuilt from scratch
    // rather than merged with whatever was there before.
    save_meta(&CacheMeta {
        version: CACHE_VERSION,
        tables: cached_entries,
    })?;

    Ok(())
}

/// Load the three export tables, downloading any that aren't cached.
///
/// `refresh` forces a redownload even when cached copies exist.
pub fn load_tables(refresh: bool) -> Result<ExportTables, ExportError> {
    // Loading the meta first lets a version mismatch wipe stale files
    // before the existence checks below look for them.
    load_meta()?;

    let mut all_cached = true;
    for (name, _) in TABLES {
        if !table_path(name)?.exists() {
            all_cached = false;
            break;
        }
    }

    if refresh || !all_cached {
        fetch()?;
    }

    let locations = tables::parse_locations(&fs::read(table_path("locations")?)?)?;
    let areas = tables::parse_areas(&fs::read(table_path("location_areas")?)?)?;
    let encounters = tables::parse_encounters(&fs::read(table_path("encounters")?)?)?;

    Ok(ExportTables {
        locations,
        areas,
        encounters,
    })
}

/// List all cached tables.
pub fn list() -> Result<Vec<CacheEntry>, ExportError> {
    let meta = load_meta()?;
    let mut entries: Vec<CacheEntry> = meta
        .tables
        .iter()
        .map(|(table, cached)| CacheEntry {
            table: table.clone(),
            source: cached.source.clone(),
            file_size: cached.file_size,
            downloaded: cached.downloaded.clone(),
            rows: cached.rows,
        })
        .collect();

    entries.sort_by(|a, b| a.table.cmp(&b.table));
    Ok(entries)
}

/// Clear all cached tables.
pub fn clear() -> Result<u64, ExportError> {
    let dir = cache_dir()?;
    let mut total_size = 0u64;

    if dir.exists() {
        for entry in fs::read_dir(&dir)?.flatten() {
            let path = entry.path();
            if path.is_file() {
                if let Ok(meta) = fs::metadata(&path) {
                    total_size += meta.len();
                }
                fs::remove_file(&path)?;
            }
        }
    }

    // Also remove meta.json
    let meta = meta_path()?;
    if meta.exists() {
        if let Ok(m) = fs::metadata(&meta) {
            total_size += m.len();
        }
        fs::remove_file(&meta)?;
    }

    Ok(total_size)
}

/// Get the total size of cached tables.
pub fn total_cache_size() -> Result<u64, ExportError> {
    let meta = load_meta()?;
    Ok(meta.tables.values().map(|c| c.file_size).sum())
}
