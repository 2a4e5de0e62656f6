//! Evolution-chain helpers shared by the audit commands.

use crate::types::{ChainLink, EvolutionDetail};

/// One evolution edge with every recorded detail variant.
#[derive(Debug, Clone)]
pub struct EvolutionEdge {
    pub from: String,
    pub to: String,
    pub details: Vec<EvolutionDetail>,
}

/// Flatten a chain into its edges, depth-first.
pub fn chain_edges(root: &ChainLink) -> Vec<EvolutionEdge> {
    let mut edges = Vec::new();
    collect_edges(root, &mut edges);
    edges
}

fn collect_edges(link: &ChainLink, out: &mut Vec<EvolutionEdge>) {
    for child in &link.evolves_to {
        out.push(EvolutionEdge {
            from: link.species.name.clone(),
            to: child.species.name.clone(),
            details: child.evolution_details.clone(),
        });
        collect_edges(child, out);
    }
}

/// Names of the species `target` evolves from, outermost ancestor first.
///
/// Empty for basic (unevolved) species, and for names the chain doesn't
/// contain at all. Branchy chains are searched depth-first and the first
/// hit wins.
pub fn ancestors_of(root: &ChainLink, target: &str) -> Vec<String> {
    let target = target.to_lowercase();
    let mut path = Vec::new();
    if walk(root, &target, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn walk(link: &ChainLink, target: &str, path: &mut Vec<String>) -> bool {
    let name = link.species.name.to_lowercase();
    if name.is_empty() {
        return false;
    }
    if name == target {
        return true;
    }

    path.push(name);
    for child in &link.evolves_to {
        if walk(child, target, path) {
            return true;
        }
    }
    path.pop();
    false
}

/// One-line summary of an evolution detail, e.g.
/// `level-up, min_level=36` or `use-item, item=thunder-stone`.
pub fn summarize_detail(detail: &EvolutionDetail) -> String {
    let mut parts = Vec::new();

    if let Some(trigger) = &detail.trigger {
        if !trigger.name.is_empty() {
            parts.push(trigger.name.clone());
        }
    }
    if let Some(item) = &detail.item {
        parts.push(format!("item={}", item.name));
    }
    if let Some(level) = detail.min_level.filter(|&v| v > 0) {
        parts.push(format!("min_level={level}"));
    }
    if let Some(happiness) = detail.min_happiness.filter(|&v| v > 0) {
        parts.push(format!("min_happiness={happiness}"));
    }
    if !detail.time_of_day.is_empty() {
        parts.push(format!("time_of_day={}", detail.time_of_day));
    }
    if let Some(location) = &detail.location {
        parts.push(format!("location={}", location.name));
    }

    if parts.is_empty() {
        "(no fields)".to_string()
    } else {
        parts.join(", ")
    }
}
