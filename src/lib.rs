// src/lib.rs
//! Decides which declarations of a compilation unit are exposed as
//! bindings: where they are nested, whether they are visible, and the
//! order in which they must be emitted.
//!
//! The pipeline runs over a tree of exposable contexts: the graph builder
//! consumes the declaration catalog and relocation requests, visibility
//! and enclosing scopes are resolved top-down, reachability bottom-up, the
//! graph is pruned to the preserved contexts, and a dependency-respecting
//! emission order is produced. Annotation parsing, code emission, and
//! diagnostic rendering live outside this crate.

pub mod annotations;
pub mod builder;
pub mod catalog;
pub mod errors;
pub mod graph;
pub mod inspect;
pub mod order;
pub mod plan;
pub mod prune;
pub mod reachability;
pub mod visibility;

pub use annotations::{AnnotationStore, RelocationRequest, VisibilityNudge};
pub use builder::{BuiltGraph, GraphBuilder, RelocatedMap};
pub use catalog::{AccessSpecifier, Catalog, ContextKind, EntityId};
pub use errors::{ExposeError, ExposeWarning};
pub use graph::{ContextGraph, ContextNode, NodeId};
pub use plan::{plan_exposure, ExposurePlan, PlanFailure, PlannedContext};
pub use visibility::{EffectiveVisibilityMap, EnclosingScopeMap};
