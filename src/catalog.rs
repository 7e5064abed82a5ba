// src/catalog.rs
//
// Declaration catalog: stable identities and source order for everything
// the exposure pipeline reasons about.

use rustc_hash::FxHashMap;

/// Stable identity of a catalogued declaration.
///
/// Allocated by [`Catalog`] in source order; the raw index doubles as an
/// arena slot and is meaningless outside the catalog that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Kind of an exposable context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Namespace,
    Type,
}

/// Access specifier recorded for a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
    #[default]
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Context(ContextKind),
    Member,
    Alias,
}

#[derive(Debug, Clone)]
struct DeclInfo {
    name: String,
    kind: DeclKind,
    parent: Option<EntityId>,
    access: AccessSpecifier,
    /// Immutable sequence number assigned at ingestion; all deterministic
    /// tie-breaking in later stages is done on this integer.
    seq: u32,
}

/// Ordered catalog of the declarations of one compilation unit.
///
/// Contexts (namespaces and types), ordinary members, and alias
/// declarations all receive an [`EntityId`]. The `parent` of an entry is
/// its nearest lookup-eligible ancestor, i.e. intermediate non-scope
/// declarations have already been skipped by the producer.
#[derive(Debug)]
pub struct Catalog {
    decls: Vec<DeclInfo>,
    contexts: Vec<EntityId>,
    members_by_parent: FxHashMap<EntityId, Vec<EntityId>>,
}

impl Catalog {
    pub fn new() -> Self {
        let mut catalog = Self {
            decls: Vec::new(),
            contexts: Vec::new(),
            members_by_parent: FxHashMap::default(),
        };
        // Synthetic whole-unit scope; behaves like an unnamed transparent
        // namespace and is never emitted itself.
        catalog.push(
            String::new(),
            DeclKind::Context(ContextKind::Namespace),
            None,
            AccessSpecifier::Unspecified,
        );
        catalog
    }

    /// The synthetic root scope enclosing all top-level declarations.
    pub fn root(&self) -> EntityId {
        EntityId(0)
    }

    fn push(
        &mut self,
        name: String,
        kind: DeclKind,
        parent: Option<EntityId>,
        access: AccessSpecifier,
    ) -> EntityId {
        let id = EntityId(self.decls.len() as u32);
        let seq = id.index();
        self.decls.push(DeclInfo {
            name,
            kind,
            parent,
            access,
            seq,
        });
        id
    }

    pub fn add_context(
        &mut self,
        parent: EntityId,
        kind: ContextKind,
        access: AccessSpecifier,
        name: &str,
    ) -> EntityId {
        debug_assert!(self.is_context(parent), "parent must be a context");
        let id = self.push(name.to_string(), DeclKind::Context(kind), Some(parent), access);
        self.contexts.push(id);
        id
    }

    /// Record an ordinary (non-scope) named member of `parent`.
    pub fn add_member(&mut self, parent: EntityId, name: &str) -> EntityId {
        debug_assert!(self.is_context(parent), "parent must be a context");
        let id = self.push(
            name.to_string(),
            DeclKind::Member,
            Some(parent),
            AccessSpecifier::Unspecified,
        );
        self.members_by_parent.entry(parent).or_default().push(id);
        id
    }

    /// Record an alias declaration; relocation requests and visibility
    /// nudges name the responsible alias by this id.
    pub fn add_alias(&mut self, parent: EntityId, name: &str) -> EntityId {
        debug_assert!(self.is_context(parent), "parent must be a context");
        self.push(
            name.to_string(),
            DeclKind::Alias,
            Some(parent),
            AccessSpecifier::Unspecified,
        )
    }

    pub fn name(&self, id: EntityId) -> &str {
        &self.decls[id.index() as usize].name
    }

    pub fn seq(&self, id: EntityId) -> u32 {
        self.decls[id.index() as usize].seq
    }

    pub fn access(&self, id: EntityId) -> AccessSpecifier {
        self.decls[id.index() as usize].access
    }

    pub fn lexical_parent(&self, id: EntityId) -> Option<EntityId> {
        self.decls[id.index() as usize].parent
    }

    pub fn context_kind(&self, id: EntityId) -> Option<ContextKind> {
        match self.decls[id.index() as usize].kind {
            DeclKind::Context(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_context(&self, id: EntityId) -> bool {
        self.context_kind(id).is_some()
    }

    /// Context declarations in source order, root excluded.
    pub fn contexts(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.contexts.iter().copied()
    }

    /// Ordinary members recorded for `context`, in source order.
    pub fn members_of(&self, context: EntityId) -> &[EntityId] {
        self.members_by_parent
            .get(&context)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
