use ahash::AHashMap;

use super::levels::DependencyAnalysis;
use crate::registry::PorterRegistry;
use crate::workflow::{NodeId, Workflow};

/// Greedily partitions nodes into display chains.
///
/// This is a best-effort grouping heuristic, not an invariant-bearing
/// algorithm; the only guarantee is that every node ends up in exactly one
/// chain.
pub(crate) fn partition(
    workflow: &Workflow,
    analysis: &DependencyAnalysis,
    registry: &PorterRegistry,
) -> Vec<Vec<NodeId>> {
    // Every node starts in its own singleton chain.
    let mut chain_of: AHashMap<NodeId, usize> = AHashMap::new();
    let mut chains: Vec<Option<Vec<NodeId>>> = Vec::new();
    for (i, id) in analysis.node_ids().iter().enumerate() {
        chain_of.insert(*id, i);
        chains.push(Some(vec![*id]));
    }

    let node_types: AHashMap<NodeId, &str> = workflow
        .nodes
        .iter()
        .map(|n| (n.id, n.node_type.as_str()))
        .collect();

    // Pass 1: fold single-child nodes into their dominant parent's chain.
    let mut by_level: Vec<NodeId> = analysis.node_ids().to_vec();
    by_level.sort_by_key(|id| analysis.get(*id).map_or(i32::MAX, |d| d.level));
    for id in by_level {
        let Some(deps) = analysis.get(id) else {
            continue;
        };
        if deps.children.len() != 1 {
            continue;
        }
        // Dominant parent: highest level, first-seen wins ties.
        let mut dominant: Option<NodeId> = None;
        let mut best = i32::MIN;
        for &parent in &deps.parents {
            let level = analysis.get(parent).map_or(i32::MIN, |d| d.level);
            if level > best {
                best = level;
                dominant = Some(parent);
            }
        }
        let Some(parent) = dominant else {
            continue;
        };
        // Merging across a virtual edge would visually hide the hand-off.
        if deps.is_virtual_only_parent(parent) {
            continue;
        }
        let Some(parent_deps) = analysis.get(parent) else {
            continue;
        };
        let parent_single_child =
            parent_deps.children.len() == 1 && parent_deps.children[0] == id;
        let node_is_setter = node_types
            .get(&id)
            .is_some_and(|t| registry.is_setter(t));
        if parent_single_child || node_is_setter {
            let src = chain_of[&id];
            let dst = chain_of[&parent];
            merge(&mut chains, &mut chain_of, src, dst);
        }
    }

    // Pass 2: repeatedly collapse chains whose cross-chain edges all land in
    // a single target chain, unless a virtual barrier forbids it.
    loop {
        let mut merged = false;
        'source: for src in 0..chains.len() {
            let Some(members) = chains[src].as_ref() else {
                continue;
            };
            let mut target: Option<usize> = None;
            for &member in members {
                let Some(deps) = analysis.get(member) else {
                    continue;
                };
                for child in &deps.children {
                    let child_chain = chain_of[child];
                    if child_chain == src {
                        continue;
                    }
                    match target {
                        None => target = Some(child_chain),
                        Some(t) if t == child_chain => {}
                        // Outgoing edges split across chains; leave as is.
                        Some(_) => continue 'source,
                    }
                }
            }
            let Some(dst) = target else {
                continue;
            };
            // Virtual barrier: a getter in the target chain whose matching
            // setter lives inside the source chain. Merging would make the
            // getter appear to depend on work drawn after it.
            let barrier = chains[dst].as_ref().is_some_and(|dst_members| {
                dst_members.iter().any(|getter| {
                    analysis.get(*getter).is_some_and(|d| {
                        d.virtual_parents.iter().any(|setter| chain_of[setter] == src)
                    })
                })
            });
            if barrier {
                continue;
            }
            merge(&mut chains, &mut chain_of, src, dst);
            merged = true;
        }
        if !merged {
            break;
        }
    }

    chains.into_iter().flatten().collect()
}

fn merge(
    chains: &mut [Option<Vec<NodeId>>],
    chain_of: &mut AHashMap<NodeId, usize>,
    src: usize,
    dst: usize,
) {
    if src == dst {
        return;
    }
    let Some(moved) = chains[src].take() else {
        return;
    };
    let Some(dst_chain) = chains[dst].as_mut() else {
        chains[src] = Some(moved);
        return;
    };
    for id in &moved {
        chain_of.insert(*id, dst);
    }
    dst_chain.extend(moved);
}
