// src/order.rs
//
// Topological emission order for the pruned graph. Containers come before
// their contents and public bases before derived types, since the output
// format registers contexts incrementally and a derived type's
// registration references its base by name.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::annotations::AnnotationStore;
use crate::catalog::{Catalog, EntityId};
use crate::errors::ExposeError;
use crate::graph::{ContextGraph, NodeId};

/// Ready-queue entry; the heap is a max-heap, so among ready nodes the one
/// latest in source order is dequeued first. This tie-break is a behavioral
/// contract of the emission order, not an arbitrary choice.
#[derive(PartialEq, Eq)]
struct Ready {
    seq: u32,
    node: NodeId,
}

impl Ord for Ready {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.seq
            .cmp(&other.seq)
            .then_with(|| self.node.index().cmp(&other.node.index()))
    }
}

impl PartialOrd for Ready {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Kahn's algorithm over the pruned graph. Predecessors of a node are its
/// containing context and every public base present in the graph. Returns
/// the emission order with the synthetic root omitted, or a
/// [`ExposeError::DependencyCycle`] naming a representative stuck node.
pub fn sort_contexts_by_dependencies(
    graph: &ContextGraph,
    catalog: &Catalog,
    annotations: &AnnotationStore,
) -> Result<Vec<EntityId>, ExposeError> {
    let node_count = graph.len();
    let mut unmet = vec![0u32; node_count];
    let mut dependents: Vec<Vec<NodeId>> = vec![Vec::new(); node_count];

    for id in graph.node_ids() {
        for &child in graph.node(id).children() {
            unmet[child.index()] += 1;
            dependents[id.index()].push(child);
        }
        let entity = graph.node(id).entity();
        for &base in annotations.public_bases(entity) {
            // Bases that were pruned away (or never exposed) are no
            // ordering constraint.
            if let Some(base_node) = graph.get(base) {
                unmet[id.index()] += 1;
                dependents[base_node.index()].push(id);
            }
        }
    }

    let mut ready = BinaryHeap::new();
    for id in graph.node_ids() {
        if unmet[id.index()] == 0 {
            ready.push(Ready {
                seq: catalog.seq(graph.node(id).entity()),
                node: id,
            });
        }
    }

    let mut result = Vec::with_capacity(node_count);
    while let Some(Ready { node, .. }) = ready.pop() {
        result.push(graph.node(node).entity());
        for &dependent in &dependents[node.index()] {
            unmet[dependent.index()] -= 1;
            if unmet[dependent.index()] == 0 {
                ready.push(Ready {
                    seq: catalog.seq(graph.node(dependent).entity()),
                    node: dependent,
                });
            }
        }
    }

    if result.len() < node_count {
        // Representative of the cycle: fewest unmet predecessors, then the
        // usual source-order tie-break.
        let stuck = graph
            .node_ids()
            .filter(|id| unmet[id.index()] > 0)
            .min_by_key(|id| {
                (
                    unmet[id.index()],
                    Reverse(catalog.seq(graph.node(*id).entity())),
                )
            })
            .expect("an unfinished sort leaves a stuck node");
        let entity = graph.node(stuck).entity();
        return Err(ExposeError::DependencyCycle {
            name: catalog.name(entity).to_string(),
            entity,
        });
    }

    let root_entity = graph.node(graph.root()).entity();
    Ok(result.into_iter().filter(|&e| e != root_entity).collect())
}
