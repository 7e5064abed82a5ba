// src/reachability.rs
//
// Decides which contexts must be preserved: those that transitively
// contain something that will be emitted. Also applies module-allowlist
// filtering and detects subtrees orphaned by relocation.

use rustc_hash::FxHashSet;

use crate::annotations::AnnotationStore;
use crate::builder::RelocatedMap;
use crate::catalog::{Catalog, ContextKind, EntityId};
use crate::errors::ExposeError;
use crate::graph::{ContextGraph, ContextNode, NodeId};
use crate::visibility::EffectiveVisibilityMap;

/// Contexts whose subtree (in the unpruned graph) contains something
/// that must be emitted.
pub type ReachableSet = FxHashSet<EntityId>;

/// Computes the set of contexts that contain visible declarations,
/// directly or through nested contexts. Post-order: children are resolved
/// before their parents.
pub fn contexts_with_visible_decls(
    graph: &ContextGraph,
    catalog: &Catalog,
    annotations: &AnnotationStore,
    visibilities: &EffectiveVisibilityMap,
) -> ReachableSet {
    let mut result = ReachableSet::default();
    visit(graph, catalog, annotations, visibilities, graph.root(), &mut result);
    tracing::debug!(reachable = result.len(), "reachability computed");
    result
}

fn visit(
    graph: &ContextGraph,
    catalog: &Catalog,
    annotations: &AnnotationStore,
    visibilities: &EffectiveVisibilityMap,
    node_id: NodeId,
    result: &mut ReachableSet,
) {
    let node = graph.node(node_id);
    for &child in node.children() {
        visit(graph, catalog, annotations, visibilities, child, result);
    }
    if has_preserving_child(graph, visibilities, node, result)
        || contains_visible_member(catalog, annotations, visibilities, node)
    {
        result.insert(node.entity());
    }
}

/// A visible type child preserves its container outright; a hidden type
/// child conceals its entire subtree. Namespace children only count if
/// their own subtree contains something visible.
fn has_preserving_child(
    graph: &ContextGraph,
    visibilities: &EffectiveVisibilityMap,
    node: &ContextNode,
    result: &ReachableSet,
) -> bool {
    node.children().iter().any(|&child| {
        let child = graph.node(child);
        match child.kind() {
            ContextKind::Type => visibilities[&child.entity()],
            ContextKind::Namespace => result.contains(&child.entity()),
        }
    })
}

fn contains_visible_member(
    catalog: &Catalog,
    annotations: &AnnotationStore,
    visibilities: &EffectiveVisibilityMap,
    node: &ContextNode,
) -> bool {
    // An unannotated member in a "visible" context is preserved.
    let default_visibility = visibilities[&node.entity()];
    catalog
        .members_of(node.entity())
        .iter()
        .any(|&member| annotations.visible(member).unwrap_or(default_visibility))
}

/// Hides every context below a namespace whose module allowlist does not
/// include `module_name`. A single excluding dominator is tracked; while
/// one is active no new dominator starts, and every dominated node (the
/// dominator included) is dropped from the reachable set and forced
/// hidden.
pub fn hide_filtered_namespaces(
    graph: &ContextGraph,
    annotations: &AnnotationStore,
    module_name: &str,
    reachable: &mut ReachableSet,
    visibilities: &mut EffectiveVisibilityMap,
) {
    visit_filter(graph, annotations, module_name, graph.root(), None, reachable, visibilities);
}

fn visit_filter(
    graph: &ContextGraph,
    annotations: &AnnotationStore,
    module_name: &str,
    node_id: NodeId,
    mut excluding: Option<EntityId>,
    reachable: &mut ReachableSet,
    visibilities: &mut EffectiveVisibilityMap,
) {
    let node = graph.node(node_id);
    if excluding.is_none() && excluded_from_module(annotations, node, module_name) {
        tracing::debug!(dominator = ?node.entity(), module = module_name, "namespace excluded from module");
        excluding = Some(node.entity());
    }
    if excluding.is_some() {
        reachable.remove(&node.entity());
        visibilities.insert(node.entity(), false);
    }
    for &child in node.children() {
        visit_filter(graph, annotations, module_name, child, excluding, reachable, visibilities);
    }
}

fn excluded_from_module(
    annotations: &AnnotationStore,
    node: &ContextNode,
    module_name: &str,
) -> bool {
    node.kind() == ContextKind::Namespace
        && annotations
            .module_allowlist(node.entity())
            .is_some_and(|modules| !modules.contains(module_name))
}

/// Reports relocations that orphaned their target: nodes the visibility
/// pass never reached (they have no path back to the root) whose entity
/// was relocated by an alias. Errors are ordered by the alias's position
/// in the source.
pub fn report_relocation_cycles(
    graph: &ContextGraph,
    catalog: &Catalog,
    visibilities: &EffectiveVisibilityMap,
    relocated: &RelocatedMap,
) -> Vec<ExposeError> {
    let mut orphaned: Vec<(EntityId, EntityId)> = graph
        .node_ids()
        .filter_map(|id| {
            let entity = graph.node(id).entity();
            if visibilities.contains_key(&entity) {
                return None;
            }
            // All unreachable nodes hang off one of the cycles, but only
            // the responsible aliases are reported.
            relocated.get(&entity).map(|&alias| (entity, alias))
        })
        .collect();
    orphaned.sort_by_key(|&(_, alias)| catalog.seq(alias));
    orphaned
        .into_iter()
        .map(|(target, alias)| ExposeError::RelocationCycle {
            target: catalog.name(target).to_string(),
            target_id: target,
            alias: catalog.name(alias).to_string(),
            alias_id: alias,
        })
        .collect()
}
