// src/graph.rs
//
// Arena-backed tree of exposable contexts.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::catalog::{ContextKind, EntityId};

/// Handle to a node inside one [`ContextGraph`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One exposable scope: a namespace-like or type-like entity together with
/// the contexts exposed beneath it.
#[derive(Debug)]
pub struct ContextNode {
    entity: EntityId,
    kind: ContextKind,
    children: SmallVec<[NodeId; 8]>,
}

impl ContextNode {
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Tree of exposable contexts rooted at the synthetic whole-unit scope.
///
/// All nodes are owned by the arena; children are plain indices into it, so
/// no ownership cycle is representable. Excluding transient states during
/// construction, every node reachable from the root has exactly one parent.
#[derive(Debug)]
pub struct ContextGraph {
    nodes: Vec<ContextNode>,
    by_entity: FxHashMap<EntityId, NodeId>,
    root: NodeId,
}

impl ContextGraph {
    pub fn new(root_entity: EntityId) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            by_entity: FxHashMap::default(),
            root: NodeId(0),
        };
        graph.root = graph.get_or_insert(root_entity, ContextKind::Namespace);
        graph
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up the node for `entity`, creating a placeholder if this is the
    /// first reference to it. Idempotent, independent of discovery order.
    pub fn get_or_insert(&mut self, entity: EntityId, kind: ContextKind) -> NodeId {
        if let Some(&id) = self.by_entity.get(&entity) {
            debug_assert_eq!(self.nodes[id.index()].kind, kind);
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(ContextNode {
            entity,
            kind,
            children: SmallVec::new(),
        });
        self.by_entity.insert(entity, id);
        id
    }

    pub fn get(&self, entity: EntityId) -> Option<NodeId> {
        self.by_entity.get(&entity).copied()
    }

    pub fn node(&self, id: NodeId) -> &ContextNode {
        &self.nodes[id.index()]
    }

    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.index()].children.push(child);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in arena (insertion) order, which is deterministic for a
    /// given build but carries no semantic meaning.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}
