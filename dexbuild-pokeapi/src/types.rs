//! Deserialization targets for the PokeAPI resources the audits read.
//!
//! Each struct models just the fields we consume; PokeAPI responses are
//! large and serde drops the rest. Everything is `#[serde(default)]`
//! lenient because older resources omit fields newer ones carry.

use serde::Deserialize;

/// A name + URL pair, PokeAPI's universal cross-reference shape.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// An unnamed URL reference (evolution chains have no name).
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ApiResource {
    #[serde(default)]
    pub url: String,
}

/// Subset of a `/pokemon/{id}` resource.
#[derive(Debug, Deserialize, Clone)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub species: NamedResource,
}

/// Subset of a `/pokemon-species/{id}` resource.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Species {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub varieties: Vec<Variety>,
    #[serde(default)]
    pub evolution_chain: Option<ApiResource>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorText>,
}

/// One variety (form) of a species.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Variety {
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub pokemon: NamedResource,
}

/// One Pokédex flavor text, tagged with language and game version.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FlavorText {
    #[serde(default)]
    pub flavor_text: String,
    #[serde(default)]
    pub language: NamedResource,
    #[serde(default)]
    pub version: Option<NamedResource>,
}

/// An `/evolution-chain/{id}` resource.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EvolutionChain {
    #[serde(default)]
    pub chain: ChainLink,
}

/// One node in an evolution chain.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChainLink {
    #[serde(default)]
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
}

/// Conditions attached to one evolution edge.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EvolutionDetail {
    #[serde(default)]
    pub trigger: Option<NamedResource>,
    #[serde(default)]
    pub item: Option<NamedResource>,
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub min_happiness: Option<u32>,
    #[serde(default)]
    pub time_of_day: String,
    #[serde(default)]
    pub location: Option<NamedResource>,
}

/// One entry of `/pokemon/{id}/encounters`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EncounterSite {
    #[serde(default)]
    pub location_area: NamedResource,
    #[serde(default)]
    pub version_details: Vec<VersionDetail>,
}

/// Per-version details of one encounter site.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct VersionDetail {
    #[serde(default)]
    pub version: NamedResource,
}
