// src/builder.rs
//
// Builds the context graph from the catalog and the relocation requests.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::annotations::AnnotationStore;
use crate::catalog::{Catalog, EntityId};
use crate::errors::ExposeError;
use crate::graph::ContextGraph;

/// Relocated targets and the alias responsible for each move.
pub type RelocatedMap = FxHashMap<EntityId, EntityId>;

#[derive(Debug)]
pub struct BuiltGraph {
    pub graph: ContextGraph,
    pub relocated: RelocatedMap,
}

/// Turns the declaration catalog into a [`ContextGraph`].
///
/// Relocation requests are processed first, in source order, with the first
/// request for a target winning; natural parent edges are then added for
/// every context that has not been moved. Conflicts abort the build, since
/// downstream stages assume a tree.
pub struct GraphBuilder<'a> {
    catalog: &'a Catalog,
    graph: ContextGraph,
    relocated: RelocatedMap,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            graph: ContextGraph::new(catalog.root()),
            relocated: RelocatedMap::default(),
        }
    }

    pub fn build(mut self, annotations: &mut AnnotationStore) -> Result<BuiltGraph, Vec<ExposeError>> {
        // Visibility nudges are plain annotation edits; they never move a
        // declaration and cannot conflict.
        for nudge in annotations.nudges().to_vec() {
            annotations.set_visible(nudge.target, true);
        }

        let mut errors = Vec::new();
        for request in annotations.relocations().to_vec() {
            match self.relocated.entry(request.target) {
                Entry::Occupied(previous) => {
                    let previous_alias = *previous.get();
                    errors.push(ExposeError::RelocationConflict {
                        target: self.catalog.name(request.target).to_string(),
                        target_id: request.target,
                        alias: self.catalog.name(request.alias).to_string(),
                        alias_id: request.alias,
                        previous: self.catalog.name(previous_alias).to_string(),
                        previous_id: previous_alias,
                    });
                    continue;
                }
                Entry::Vacant(slot) => {
                    slot.insert(request.alias);
                }
            }

            // The alias names the target at its new location, so its own
            // explicit visibility speaks for the target unless the target
            // already carries one.
            if annotations.visible(request.target).is_none() {
                if let Some(visible) = annotations.visible(request.alias) {
                    annotations.set_visible(request.target, visible);
                }
            }

            let target_kind = self
                .catalog
                .context_kind(request.target)
                .expect("relocation target must be a context");
            let parent_kind = self
                .catalog
                .context_kind(request.new_parent)
                .expect("relocation parent must be a context");
            let parent = self.graph.get_or_insert(request.new_parent, parent_kind);
            let child = self.graph.get_or_insert(request.target, target_kind);
            self.graph.add_child(parent, child);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        for entity in self.catalog.contexts() {
            // A relocation supersedes the natural parent edge.
            if self.relocated.contains_key(&entity) {
                continue;
            }
            let kind = self
                .catalog
                .context_kind(entity)
                .expect("catalog context entries are contexts");
            let parent_entity = self
                .catalog
                .lexical_parent(entity)
                .expect("non-root contexts have a lexical parent");
            let parent_kind = self
                .catalog
                .context_kind(parent_entity)
                .expect("lexical parents are contexts");
            let parent = self.graph.get_or_insert(parent_entity, parent_kind);
            let child = self.graph.get_or_insert(entity, kind);
            self.graph.add_child(parent, child);
        }

        tracing::debug!(nodes = self.graph.len(), relocated = self.relocated.len(), "context graph built");
        Ok(BuiltGraph {
            graph: self.graph,
            relocated: self.relocated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AccessSpecifier, ContextKind};

    fn names(graph: &ContextGraph, catalog: &Catalog, parent: EntityId) -> Vec<String> {
        let node = graph.get(parent).expect("parent in graph");
        graph
            .node(node)
            .children()
            .iter()
            .map(|&c| catalog.name(graph.node(c).entity()).to_string())
            .collect()
    }

    #[test]
    fn natural_edges_follow_lexical_parents() {
        let mut catalog = Catalog::new();
        let root = catalog.root();
        let ns = catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "outer");
        let _ty = catalog.add_context(ns, ContextKind::Type, AccessSpecifier::Unspecified, "Widget");
        let mut annotations = AnnotationStore::new();

        let built = GraphBuilder::new(&catalog).build(&mut annotations).unwrap();
        assert_eq!(names(&built.graph, &catalog, root), vec!["outer"]);
        assert_eq!(names(&built.graph, &catalog, ns), vec!["Widget"]);
        assert!(built.relocated.is_empty());
    }

    #[test]
    fn relocation_supersedes_the_natural_edge() {
        let mut catalog = Catalog::new();
        let root = catalog.root();
        let detail = catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "detail");
        let ty = catalog.add_context(detail, ContextKind::Type, AccessSpecifier::Unspecified, "Widget");
        let api = catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "api");
        let alias = catalog.add_alias(api, "Widget");

        let mut annotations = AnnotationStore::new();
        annotations.relocate(ty, api, alias);

        let built = GraphBuilder::new(&catalog).build(&mut annotations).unwrap();
        assert_eq!(names(&built.graph, &catalog, detail), Vec::<String>::new());
        assert_eq!(names(&built.graph, &catalog, api), vec!["Widget"]);
        assert_eq!(built.relocated.get(&ty), Some(&alias));
    }

    #[test]
    fn second_relocation_for_a_target_is_a_conflict() {
        let mut catalog = Catalog::new();
        let root = catalog.root();
        let ty = catalog.add_context(root, ContextKind::Type, AccessSpecifier::Unspecified, "X");
        let ns = catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "api");
        let a1 = catalog.add_alias(ns, "A1");
        let a2 = catalog.add_alias(ns, "A2");

        let mut annotations = AnnotationStore::new();
        annotations.relocate(ty, ns, a1);
        annotations.relocate(ty, ns, a2);

        let errors = GraphBuilder::new(&catalog).build(&mut annotations).unwrap_err();
        assert_eq!(errors.len(), 1);
        match &errors[0] {
            ExposeError::RelocationConflict {
                alias_id,
                previous_id,
                ..
            } => {
                assert_eq!(*alias_id, a2);
                assert_eq!(*previous_id, a1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn built_graphs_are_trees() {
        let mut catalog = Catalog::new();
        let root = catalog.root();
        let detail = catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "detail");
        let ty = catalog.add_context(detail, ContextKind::Type, AccessSpecifier::Unspecified, "Widget");
        catalog.add_context(ty, ContextKind::Type, AccessSpecifier::Unspecified, "Inner");
        let api = catalog.add_context(root, ContextKind::Namespace, AccessSpecifier::Unspecified, "api");
        let alias = catalog.add_alias(api, "Widget");
        let mut annotations = AnnotationStore::new();
        annotations.relocate(ty, api, alias);

        let built = GraphBuilder::new(&catalog).build(&mut annotations).unwrap();
        let mut parent_count = vec![0usize; built.graph.len()];
        for id in built.graph.node_ids() {
            for &child in built.graph.node(id).children() {
                parent_count[child.index()] += 1;
            }
        }
        assert_eq!(parent_count[built.graph.root().index()], 0);
        for id in built.graph.node_ids() {
            if id != built.graph.root() {
                assert_eq!(parent_count[id.index()], 1, "{:?} must have one parent", built.graph.node(id).entity());
            }
        }
    }

    #[test]
    fn nudge_forces_target_visible() {
        let mut catalog = Catalog::new();
        let root = catalog.root();
        let ty = catalog.add_context(root, ContextKind::Type, AccessSpecifier::Unspecified, "Hidden");
        let alias = catalog.add_alias(root, "Nudge");

        let mut annotations = AnnotationStore::new();
        annotations.nudge_visible(ty, alias);

        GraphBuilder::new(&catalog).build(&mut annotations).unwrap();
        assert_eq!(annotations.visible(ty), Some(true));
    }

    #[test]
    fn relocation_propagates_alias_visibility() {
        let mut catalog = Catalog::new();
        let root = catalog.root();
        let ty = catalog.add_context(root, ContextKind::Type, AccessSpecifier::Unspecified, "T");
        let other = catalog.add_context(root, ContextKind::Type, AccessSpecifier::Unspecified, "U");
        let a1 = catalog.add_alias(root, "VisibleT");
        let a2 = catalog.add_alias(root, "HiddenU");

        let mut annotations = AnnotationStore::new();
        annotations.set_visible(a1, true);
        annotations.relocate(ty, root, a1);
        // Target's own annotation wins over the alias's.
        annotations.set_visible(other, true);
        annotations.set_visible(a2, false);
        annotations.relocate(other, root, a2);

        GraphBuilder::new(&catalog).build(&mut annotations).unwrap();
        assert_eq!(annotations.visible(ty), Some(true));
        assert_eq!(annotations.visible(other), Some(true));
    }
}
