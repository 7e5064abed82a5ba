// src/annotations.rs
//
// Exposure annotations attached to catalogued declarations.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::catalog::EntityId;

#[derive(Debug, Clone, Default)]
struct NamedAnnotations {
    visible: Option<bool>,
    scope_boundary: bool,
    only_expose_in: Option<BTreeSet<String>>,
}

/// A request to expose `target` under `new_parent` instead of its natural
/// lexical parent, made by the alias declaration `alias`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocationRequest {
    pub target: EntityId,
    pub new_parent: EntityId,
    pub alias: EntityId,
}

/// A request by `alias` that `target` be made visible in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityNudge {
    pub target: EntityId,
    pub alias: EntityId,
}

/// Per-entity exposure metadata, produced by the annotation parser.
///
/// Explicit visibility overrides the inherited default; a namespace marked
/// as a scope boundary introduces its own emitted scope instead of being
/// transparent; a module allowlist restricts the modules a namespace is
/// exposed in. Relocation requests and visibility nudges are kept in
/// source order.
#[derive(Debug, Default)]
pub struct AnnotationStore {
    named: FxHashMap<EntityId, NamedAnnotations>,
    public_bases: FxHashMap<EntityId, Vec<EntityId>>,
    relocations: Vec<RelocationRequest>,
    nudges: Vec<VisibilityNudge>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, id: EntityId) -> &mut NamedAnnotations {
        self.named.entry(id).or_default()
    }

    pub fn set_visible(&mut self, id: EntityId, visible: bool) {
        self.entry(id).visible = Some(visible);
    }

    pub fn visible(&self, id: EntityId) -> Option<bool> {
        self.named.get(&id).and_then(|a| a.visible)
    }

    pub fn mark_scope_boundary(&mut self, id: EntityId) {
        self.entry(id).scope_boundary = true;
    }

    pub fn is_scope_boundary(&self, id: EntityId) -> bool {
        self.named.get(&id).is_some_and(|a| a.scope_boundary)
    }

    pub fn restrict_to_modules<I, S>(&mut self, id: EntityId, modules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = modules.into_iter().map(Into::into).collect();
        self.entry(id).only_expose_in = Some(set);
    }

    pub fn module_allowlist(&self, id: EntityId) -> Option<&BTreeSet<String>> {
        self.named.get(&id).and_then(|a| a.only_expose_in.as_ref())
    }

    pub fn add_public_base(&mut self, ty: EntityId, base: EntityId) {
        self.public_bases.entry(ty).or_default().push(base);
    }

    pub fn public_bases(&self, ty: EntityId) -> &[EntityId] {
        self.public_bases
            .get(&ty)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn relocate(&mut self, target: EntityId, new_parent: EntityId, alias: EntityId) {
        self.relocations.push(RelocationRequest {
            target,
            new_parent,
            alias,
        });
    }

    pub fn relocations(&self) -> &[RelocationRequest] {
        &self.relocations
    }

    pub fn nudge_visible(&mut self, target: EntityId, alias: EntityId) {
        self.nudges.push(VisibilityNudge { target, alias });
    }

    pub fn nudges(&self) -> &[VisibilityNudge] {
        &self.nudges
    }
}
