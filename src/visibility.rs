// src/visibility.rs
//
// Enclosing-scope resolution and effective-visibility propagation. Both
// are single pre-order passes: a node's result depends only on ancestors
// that have already been resolved.

use rustc_hash::FxHashMap;

use crate::annotations::AnnotationStore;
use crate::catalog::{AccessSpecifier, Catalog, ContextKind, EntityId};
use crate::graph::{ContextGraph, ContextNode, NodeId};

/// Entity id → nearest non-transparent ancestor scope (None at top level).
pub type EnclosingScopeMap = FxHashMap<EntityId, Option<EntityId>>;

/// Entity id → final emit/don't-emit decision for the context itself.
pub type EffectiveVisibilityMap = FxHashMap<EntityId, bool>;

fn is_transparent(node: &ContextNode, annotations: &AnnotationStore) -> bool {
    node.kind() == ContextKind::Namespace && !annotations.is_scope_boundary(node.entity())
}

/// Computes the enclosing scope of every node in `graph`.
///
/// Namespaces are transparent unless marked as scope boundaries; the
/// synthetic root is always transparent, so top-level declarations have no
/// enclosing scope.
pub fn find_enclosing_scopes(
    graph: &ContextGraph,
    annotations: &AnnotationStore,
) -> EnclosingScopeMap {
    let mut result = EnclosingScopeMap::default();
    let root = graph.root();
    result.insert(graph.node(root).entity(), None);
    for &child in graph.node(root).children() {
        visit_scopes(graph, annotations, child, root, &mut result);
    }
    result
}

fn visit_scopes(
    graph: &ContextGraph,
    annotations: &AnnotationStore,
    node_id: NodeId,
    parent_id: NodeId,
    result: &mut EnclosingScopeMap,
) {
    let parent = graph.node(parent_id);
    let enclosing = if is_transparent(parent, annotations) {
        // The parent was visited first, so its own enclosing scope is known.
        result[&parent.entity()]
    } else {
        Some(parent.entity())
    };
    result.insert(graph.node(node_id).entity(), enclosing);
    for &child in graph.node(node_id).children() {
        visit_scopes(graph, annotations, child, node_id, result);
    }
}

/// Computes the effective visibility of every node in `graph`.
///
/// Children inherit their parent's visibility (the root is implicitly
/// hidden), protected/private access forces a node hidden, and an explicit
/// annotation overrides everything.
pub fn derive_effective_visibility(
    graph: &ContextGraph,
    catalog: &Catalog,
    annotations: &AnnotationStore,
) -> EffectiveVisibilityMap {
    let mut result = EffectiveVisibilityMap::default();
    visit_visibility(graph, catalog, annotations, graph.root(), false, &mut result);
    result
}

fn visit_visibility(
    graph: &ContextGraph,
    catalog: &Catalog,
    annotations: &AnnotationStore,
    node_id: NodeId,
    inherited: bool,
    result: &mut EffectiveVisibilityMap,
) {
    let entity = graph.node(node_id).entity();
    let mut visible = inherited;
    match catalog.access(entity) {
        AccessSpecifier::Protected | AccessSpecifier::Private => visible = false,
        AccessSpecifier::Public | AccessSpecifier::Unspecified => {}
    }
    if let Some(explicit) = annotations.visible(entity) {
        visible = explicit;
    }
    result.insert(entity, visible);
    for &child in graph.node(node_id).children() {
        visit_visibility(graph, catalog, annotations, child, visible, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;

    struct Fixture {
        catalog: Catalog,
        annotations: AnnotationStore,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: Catalog::new(),
                annotations: AnnotationStore::new(),
            }
        }

        fn graph(&mut self) -> ContextGraph {
            GraphBuilder::new(&self.catalog)
                .build(&mut self.annotations)
                .unwrap()
                .graph
        }
    }

    #[test]
    fn transparent_namespaces_are_skipped() {
        let mut f = Fixture::new();
        let root = f.catalog.root();
        let outer = f.catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "outer");
        let inner = f.catalog.add_context(outer, ContextKind::Namespace, AccessSpecifier::Unspecified, "inner");
        let ty = f.catalog.add_context(inner, ContextKind::Type, AccessSpecifier::Unspecified, "T");
        let graph = f.graph();

        let scopes = find_enclosing_scopes(&graph, &f.annotations);
        assert_eq!(scopes[&root], None);
        assert_eq!(scopes[&outer], None);
        assert_eq!(scopes[&inner], None);
        assert_eq!(scopes[&ty], None);
    }

    #[test]
    fn scope_boundaries_and_types_enclose() {
        let mut f = Fixture::new();
        let root = f.catalog.root();
        let ns = f.catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "api");
        let ty = f.catalog.add_context(ns, ContextKind::Type, AccessSpecifier::Unspecified, "Outer");
        let nested = f.catalog.add_context(ty, ContextKind::Type, AccessSpecifier::Public, "Inner");
        f.annotations.mark_scope_boundary(ns);
        let graph = f.graph();

        let scopes = find_enclosing_scopes(&graph, &f.annotations);
        assert_eq!(scopes[&ns], None);
        assert_eq!(scopes[&ty], Some(ns));
        assert_eq!(scopes[&nested], Some(ty));
    }

    #[test]
    fn visibility_is_inherited_from_the_parent() {
        let mut f = Fixture::new();
        let root = f.catalog.root();
        let ns = f.catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "api");
        let ty = f.catalog.add_context(ns, ContextKind::Type, AccessSpecifier::Unspecified, "T");
        f.annotations.set_visible(ns, true);
        let graph = f.graph();

        let vis = derive_effective_visibility(&graph, &f.catalog, &f.annotations);
        assert!(!vis[&root]);
        assert!(vis[&ns]);
        assert!(vis[&ty]);
    }

    #[test]
    fn protected_and_private_access_hides() {
        let mut f = Fixture::new();
        let root = f.catalog.root();
        let outer = f.catalog.add_context(root, ContextKind::Type, AccessSpecifier::Unspecified, "Outer");
        let protected = f.catalog.add_context(outer, ContextKind::Type, AccessSpecifier::Protected, "P");
        let private = f.catalog.add_context(outer, ContextKind::Type, AccessSpecifier::Private, "Q");
        let public = f.catalog.add_context(outer, ContextKind::Type, AccessSpecifier::Public, "R");
        f.annotations.set_visible(outer, true);
        let graph = f.graph();

        let vis = derive_effective_visibility(&graph, &f.catalog, &f.annotations);
        assert!(!vis[&protected]);
        assert!(!vis[&private]);
        assert!(vis[&public]);
    }

    #[test]
    fn explicit_annotation_overrides_access() {
        let mut f = Fixture::new();
        let root = f.catalog.root();
        let outer = f.catalog.add_context(root, ContextKind::Type, AccessSpecifier::Unspecified, "Outer");
        let forced = f.catalog.add_context(outer, ContextKind::Type, AccessSpecifier::Private, "Forced");
        let hidden = f.catalog.add_context(outer, ContextKind::Type, AccessSpecifier::Public, "Hidden");
        f.annotations.set_visible(outer, true);
        f.annotations.set_visible(forced, true);
        f.annotations.set_visible(hidden, false);
        let graph = f.graph();

        let vis = derive_effective_visibility(&graph, &f.catalog, &f.annotations);
        assert!(vis[&forced]);
        assert!(!vis[&hidden]);
    }
}
