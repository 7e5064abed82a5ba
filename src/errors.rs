// src/errors.rs
//! Structured diagnostics for the exposure pipeline (E4xxx / W4xxx).
//!
//! The pipeline only classifies problems; rendering and source locations
//! are the caller's concern, so every variant carries the entity ids the
//! diagnostic layer needs to point back at source.

use miette::Diagnostic;
use thiserror::Error;

use crate::catalog::EntityId;

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ExposeError {
    #[error("'{target}' has already been exposed elsewhere by '{previous}'; conflicting alias '{alias}' is ignored")]
    #[diagnostic(
        code(E4001),
        help("remove one of the aliases exposing this declaration")
    )]
    RelocationConflict {
        target: String,
        target_id: EntityId,
        /// Alias whose request lost the conflict.
        alias: String,
        alias_id: EntityId,
        /// Alias whose earlier request won.
        previous: String,
        previous_id: EntityId,
    },

    #[error("exposing '{target}' at '{alias}' detaches it from the module root")]
    #[diagnostic(
        code(E4002),
        help("the alias sits inside a scope that is only reachable through the relocated declaration itself")
    )]
    RelocationCycle {
        target: String,
        target_id: EntityId,
        alias: String,
        alias_id: EntityId,
    },

    #[error("cannot order '{name}' for emission: it is part of a dependency cycle")]
    #[diagnostic(
        code(E4003),
        help("a relocated declaration depends on one of its own public bases")
    )]
    DependencyCycle { name: String, entity: EntityId },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ExposeWarning {
    #[error("'{name}' contains visible declarations but is not reachable from the module root")]
    #[diagnostic(
        code(W4101),
        severity(Warning),
        help("expose one of its enclosing scopes, or move the declaration")
    )]
    UnreachableVisibleContext {
        name: String,
        entity: EntityId,
        /// The responsible alias, if the context had been relocated.
        alias: Option<EntityId>,
    },
}
