// src/prune.rs
//
// Produces the reduced graph that only contains preserved contexts.

use crate::builder::RelocatedMap;
use crate::catalog::{Catalog, ContextKind, EntityId};
use crate::errors::ExposeWarning;
use crate::graph::{ContextGraph, NodeId};
use crate::reachability::ReachableSet;
use crate::visibility::EffectiveVisibilityMap;

/// Builds a new graph holding only preserved nodes: types that are
/// effectively visible and namespaces that contain something visible.
/// A node that fails its predicate is skipped together with its entire
/// subtree, which is never materialized in the new graph.
pub fn prune_graph(
    graph: &ContextGraph,
    reachable: &ReachableSet,
    visibilities: &EffectiveVisibilityMap,
) -> ContextGraph {
    let root = graph.node(graph.root());
    let mut pruned = ContextGraph::new(root.entity());
    if reachable.contains(&root.entity()) {
        for &child in root.children() {
            visit(graph, reachable, visibilities, child, pruned.root(), &mut pruned);
        }
    }
    tracing::debug!(before = graph.len(), after = pruned.len(), "graph pruned");
    pruned
}

fn visit(
    graph: &ContextGraph,
    reachable: &ReachableSet,
    visibilities: &EffectiveVisibilityMap,
    node_id: NodeId,
    new_parent: NodeId,
    pruned: &mut ContextGraph,
) {
    let node = graph.node(node_id);
    let preserved = match node.kind() {
        ContextKind::Type => visibilities[&node.entity()],
        ContextKind::Namespace => reachable.contains(&node.entity()),
    };
    if !preserved {
        return;
    }
    let new_node = pruned.get_or_insert(node.entity(), node.kind());
    pruned.add_child(new_parent, new_node);
    for &child in node.children() {
        visit(graph, reachable, visibilities, child, new_node, pruned);
    }
}

/// Warns about contexts that contain visible declarations but did not
/// survive pruning, e.g. because their own container was never preserved.
/// The content is silently dropped from the output; the warning is
/// attributed to the responsible alias if the context had been relocated.
pub fn unreachable_visible_warnings(
    pruned: &ContextGraph,
    catalog: &Catalog,
    reachable: &ReachableSet,
    relocated: &RelocatedMap,
) -> Vec<ExposeWarning> {
    let mut dropped: Vec<EntityId> = reachable
        .iter()
        .copied()
        .filter(|&entity| pruned.get(entity).is_none())
        .collect();
    dropped.sort_by_key(|&entity| catalog.seq(entity));
    dropped
        .into_iter()
        .map(|entity| ExposeWarning::UnreachableVisibleContext {
            name: catalog.name(entity).to_string(),
            entity,
            alias: relocated.get(&entity).copied(),
        })
        .collect()
}
