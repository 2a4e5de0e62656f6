//! Per-row encounter normalization.

use dexbuild_core::{BuildConfig, Condition, EncounterEntry};
use dexbuild_export::{EncounterRow, RawScalar};

use crate::chance::parse_percentish;
use crate::levels::parse_level_range;
use crate::locations::AreaIndex;

/// Form suffix the export appends to a species' base form.
const DEFAULT_FORM_SUFFIX: &str = "-default";

/// Method bucket for rows with no encounter method.
const FALLBACK_METHOD: &str = "special";

/// Normalize one raw encounter row into an entry, or drop it.
///
/// Returns the owning location identifier alongside the entry so the
/// caller can bucket it. A row is dropped when its area isn't targeted,
/// when none of its versions is allowlisted, or when its area has no
/// resolvable owning location. Dropping is the common case; most of the
/// encounters table covers regions outside any given config.
pub fn normalize_row(
    row: &EncounterRow,
    areas: &AreaIndex,
    config: &BuildConfig,
) -> Option<(String, EncounterEntry)> {
    let area = row.location_area_identifier.as_deref()?;
    if !areas.is_target(area) {
        return None;
    }

    let versions: Vec<String> = row
        .version_identifiers
        .iter()
        .filter(|v| config.versions.contains(*v))
        .cloned()
        .collect();
    if versions.is_empty() {
        return None;
    }

    let location = areas.location_of(area)?.to_string();

    let form = row.pokemon_form_identifier.as_deref().unwrap_or_default();
    let pokemon = form.strip_suffix(DEFAULT_FORM_SUFFIX).unwrap_or(form).to_string();

    let (min_level, max_level) = match &row.levels {
        Some(levels) => parse_level_range(&levels.as_text()),
        None => (None, None),
    };

    // rate_overall wins; probability_overall only fills a gap
    let chance = percentish_field(&row.rate_overall)
        .or_else(|| percentish_field(&row.probability_overall));

    let conditions: Vec<String> = Condition::ALL
        .iter()
        .filter(|c| row.has_condition(**c))
        .map(|c| c.label().to_string())
        .collect();

    let method = row
        .encounter_method_identifier
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| FALLBACK_METHOD.to_string());

    Some((
        location,
        EncounterEntry {
            pokemon,
            versions,
            method,
            chance,
            min_level,
            max_level,
            conditions,
            area: area.to_string(),
        },
    ))
}

fn percentish_field(field: &Option<RawScalar>) -> Option<f64> {
    field.as_ref().and_then(|value| parse_percentish(&value.as_text()))
}
