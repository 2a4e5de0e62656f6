//! Form/Pokédex-text audit heuristic.
//!
//! PokeAPI keeps flavor text at species level even when a species has
//! several varieties. When the texts name-drop some variety tokens but
//! never others, the species probably needs hand-written per-form dex
//! text on the site; the scan flags those for review.

use std::collections::{BTreeMap, BTreeSet};

use futures::StreamExt;
use serde::{Deserialize, Serialize};

use crate::client::PokeApiClient;
use crate::error::ApiError;
use crate::types::Species;

/// Variety-name tokens that rarely mean the flavor text differs.
pub const STOP_TOKENS: &[&str] = &[
    "male",
    "female",
    "totem",
    "gmax",
    "mega",
    "primal",
    "eternamax",
    "starter",
    "partner",
    "build",
];

/// Audit record for one species, also the report's JSON row shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesAudit {
    pub species_id: u32,
    pub species_name: String,
    pub variety_count: usize,
    pub varieties: Vec<String>,
    pub tokens: Vec<String>,
    pub heuristic: Heuristic,
}

/// Heuristic verdict for one species.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Heuristic {
    pub suspicious: bool,
    #[serde(default)]
    pub reason: String,
    /// Per-token count of English flavor texts mentioning it.
    #[serde(default)]
    pub hits: BTreeMap<String, usize>,
    #[serde(default)]
    pub example: Option<FlavorExample>,
}

/// A flavor text that mentioned one of the variety tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorExample {
    pub version: String,
    pub token: String,
    pub text: String,
}

/// Collapse the page-control whitespace PokeAPI keeps in flavor text.
pub fn normalize_flavor(text: &str) -> String {
    text.replace(['\u{c}', '\n', '\r'], " ")
}

/// Candidate form tokens from a species' variety names.
///
/// Strips the `<species>-` prefix, splits the remainder on `-`, and
/// keeps the parts that could plausibly appear in prose: pure digits,
/// fragments under four characters, and the stop list are discarded.
/// Sorted and deduplicated for stable reports.
pub fn variety_tokens(species_name: &str, varieties: &[String]) -> Vec<String> {
    let base = species_name.trim().to_lowercase();
    let prefix = format!("{base}-");
    let mut tokens = BTreeSet::new();

    for name in varieties {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            continue;
        }
        let suffix = if !base.is_empty() {
            name.strip_prefix(&prefix).unwrap_or(name.as_str())
        } else {
            name.as_str()
        };

        for part in suffix.split('-') {
            let part = part.trim();
            if part.is_empty() || part.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if part.len() < 4 || STOP_TOKENS.contains(&part) {
                continue;
            }
            tokens.insert(part.to_string());
        }
    }

    tokens.into_iter().collect()
}

/// Count the texts containing `token` as a whole word.
pub fn token_hits(texts: &[String], token: &str) -> usize {
    texts.iter().filter(|t| contains_word(t, token)).count()
}

/// Case-insensitive whole-word search.
///
/// Word boundaries are any non-alphanumeric characters, so a token still
/// matches inside a hyphenation ("Alolan-style"). Tokens come from API
/// slugs and are ASCII.
fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    let word = word.to_lowercase();
    let bytes = text.as_bytes();

    let mut start = 0;
    while let Some(pos) = text[start..].find(&word) {
        let begin = start + pos;
        let end = begin + word.len();
        let left_ok = begin == 0 || !is_word_byte(bytes[begin - 1]);
        let right_ok = end == text.len() || !is_word_byte(bytes[end]);
        if left_ok && right_ok {
            return true;
        }
        start = begin + word.chars().next().map_or(1, char::len_utf8);
    }
    false
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Analyze one species resource into an audit record.
///
/// Pure over the fetched resource so the heuristic is testable without
/// the network.
pub fn analyze_species(species_id: u32, species: &Species) -> SpeciesAudit {
    let varieties: Vec<String> = species
        .varieties
        .iter()
        .map(|v| v.pokemon.name.clone())
        .filter(|n| !n.is_empty())
        .collect();

    let mut record = SpeciesAudit {
        species_id,
        species_name: species.name.clone(),
        variety_count: varieties.len(),
        varieties: varieties.clone(),
        tokens: Vec::new(),
        heuristic: Heuristic::default(),
    };

    // Single-variety species can't have form-specific text to miss
    if varieties.len() <= 1 {
        return record;
    }

    record.tokens = variety_tokens(&species.name, &varieties);

    let flavors: Vec<(String, String)> = species
        .flavor_text_entries
        .iter()
        .filter(|e| e.language.name == "en")
        .filter_map(|e| {
            let version = e
                .version
                .as_ref()
                .map(|v| v.name.clone())
                .unwrap_or_default();
            let text = normalize_flavor(&e.flavor_text).trim().to_string();
            if version.is_empty() || text.is_empty() {
                None
            } else {
                Some((version, text))
            }
        })
        .collect();

    // One token can't disagree with itself
    if record.tokens.len() < 2 || flavors.is_empty() {
        return record;
    }

    let texts: Vec<String> = flavors.iter().map(|(_, text)| text.clone()).collect();
    let hits: BTreeMap<String, usize> = record
        .tokens
        .iter()
        .map(|token| (token.clone(), token_hits(&texts, token)))
        .collect();

    let max_hit = hits.values().copied().max().unwrap_or(0);
    let min_hit = hits.values().copied().min().unwrap_or(0);

    if max_hit > 0 && min_hit == 0 {
        let mut example = None;
        'search: for (version, text) in &flavors {
            for (token, &count) in &hits {
                if count > 0 && contains_word(text, token) {
                    example = Some(FlavorExample {
                        version: version.clone(),
                        token: token.clone(),
                        text: text.clone(),
                    });
                    break 'search;
                }
            }
        }

        record.heuristic.suspicious = true;
        record.heuristic.reason =
            "Flavor texts reference some variety tokens but not others".to_string();
        record.heuristic.example = example;
    }

    record.heuristic.hits = hits;
    record
}

/// Callbacks invoked as a species scan progresses.
pub trait ScanProgress {
    /// A species finished analysis.
    fn on_species(&self, record: &SpeciesAudit);
    /// A species fetch failed and was skipped.
    fn on_error(&self, id: u32, error: &ApiError);
}

/// Scan an inclusive species-id range, yielding audit records in id order.
///
/// Fetches run `concurrency` at a time; `buffered` keeps completion
/// order equal to id order. Individual fetch failures are reported and
/// skipped so one missing id can't kill a thousand-call run.
pub async fn scan_species(
    client: &PokeApiClient,
    start: u32,
    end: u32,
    concurrency: usize,
    progress: Option<&dyn ScanProgress>,
) -> Vec<SpeciesAudit> {
    let mut fetches = futures::stream::iter(start..=end)
        .map(|id| async move { (id, client.species(&id.to_string()).await) })
        .buffered(concurrency.max(1));

    let mut records = Vec::new();
    while let Some((id, fetched)) = fetches.next().await {
        match fetched {
            Ok(species) => {
                let record = analyze_species(id, &species);
                if let Some(p) = progress {
                    p.on_species(&record);
                }
                records.push(record);
            }
            Err(e) => {
                log::warn!("species {id} fetch failed: {e}");
                if let Some(p) = progress {
                    p.on_error(id, &e);
                }
            }
        }
    }
    records
}
