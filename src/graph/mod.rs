//! Reconstruct logical node adjacency by bypassing skip entities.
//!
//! The raw association list connects every entity of a document, including
//! entities that are not part of the story graph: unsupported kinds,
//! sentinel-tagged entities and entities inside an excluded authoring
//! section. The resolver computes, for every retained node, its transitive
//! successors with every skip node bypassed, and is safe on cyclic input.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A directed edge between two raw entities.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Association {
    pub source: String,
    pub target: String,
}

/// Resolved adjacency for every node with outgoing associations.
#[derive(Clone, Debug, Default)]
pub struct Resolution {
    /// Node id to its resolved logical successors, in first-reached order.
    pub next: HashMap<String, Vec<String>>,
    /// How many times the cycle guard cut a bypass chain. Diagnostic only,
    /// never a user-facing failure.
    pub cycles_bypassed: usize,
}

impl Resolution {
    pub fn next_of(&self, id: &str) -> Vec<String> {
        self.next.get(id).cloned().unwrap_or_default()
    }
}

/// Resolve the logical successors of every retained node.
///
/// Depth-first expansion per node with memoization: each node's resolution
/// is computed once and cached. A skip node already present in the current
/// in-progress chain contributes no further successors, so the resolver
/// terminates on any finite or cyclic association graph. A skip node with
/// several outgoing edges fans out to several resolved successors for each
/// of its ancestors.
pub fn resolve_next(associations: &[Association], skip: &HashSet<String>) -> Resolution {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();

    for association in associations {
        adjacency
            .entry(association.source.as_str())
            .or_default()
            .push(association.target.as_str());
    }

    let mut memo: HashMap<String, Vec<String>> = HashMap::new();
    let mut cycles_bypassed = 0;

    let mut sources: Vec<&str> = adjacency
        .keys()
        .copied()
        .filter(|id| !skip.contains(*id))
        .collect();
    sources.sort_unstable();

    let mut next = HashMap::new();

    for source in sources {
        let mut chain = HashSet::new();
        let resolved = expand(source, &adjacency, skip, &mut memo, &mut chain, &mut cycles_bypassed);

        next.insert(source.to_string(), resolved);
    }

    if cycles_bypassed > 0 {
        debug!(cycles_bypassed, "cycle guard cut one or more bypass chains");
    }

    Resolution {
        next,
        cycles_bypassed,
    }
}

/// Resolve the successors of one node, recursing through skip nodes.
fn expand(
    id: &str,
    adjacency: &HashMap<&str, Vec<&str>>,
    skip: &HashSet<String>,
    memo: &mut HashMap<String, Vec<String>>,
    chain: &mut HashSet<String>,
    cycles_bypassed: &mut usize,
) -> Vec<String> {
    if let Some(cached) = memo.get(id) {
        return cached.clone();
    }

    let targets = match adjacency.get(id) {
        Some(targets) => targets.clone(),
        None => Vec::new(),
    };

    let cuts_before = *cycles_bypassed;

    let mut resolved = Vec::new();
    let mut seen = HashSet::new();

    for target in targets {
        if !skip.contains(target) {
            if seen.insert(target.to_string()) {
                resolved.push(target.to_string());
            }
            continue;
        }

        // A skip node already on the in-progress chain is a cycle: this
        // branch contributes no further successors.
        if !chain.insert(target.to_string()) {
            *cycles_bypassed += 1;
            continue;
        }

        for successor in expand(target, adjacency, skip, memo, chain, cycles_bypassed) {
            if seen.insert(successor.clone()) {
                resolved.push(successor);
            }
        }

        chain.remove(target);
    }

    // An expansion truncated by the cycle guard depends on the current
    // in-progress chain and is only valid for this root: never cache it.
    if *cycles_bypassed == cuts_before {
        memo.insert(id.to_string(), resolved.clone());
    }

    resolved
}
