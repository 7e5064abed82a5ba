// src/plan.rs
//
// Pipeline driver: catalog + annotations → ordered exposure plan.

use crate::annotations::AnnotationStore;
use crate::builder::GraphBuilder;
use crate::catalog::{Catalog, EntityId};
use crate::errors::{ExposeError, ExposeWarning};
use crate::order::sort_contexts_by_dependencies;
use crate::prune::{prune_graph, unreachable_visible_warnings};
use crate::reachability::{
    contexts_with_visible_decls, hide_filtered_namespaces, report_relocation_cycles,
};
use crate::visibility::{derive_effective_visibility, find_enclosing_scopes};

/// One context in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedContext {
    pub entity: EntityId,
    /// Nearest non-transparent ancestor scope, if any.
    pub enclosing_scope: Option<EntityId>,
    pub visible: bool,
}

/// The decided output for one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposurePlan {
    pub contexts: Vec<PlannedContext>,
    pub warnings: Vec<ExposeWarning>,
}

/// A failed run; errors are batched so one run surfaces the whole problem
/// set, and warnings gathered before the failure are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanFailure {
    pub errors: Vec<ExposeError>,
    pub warnings: Vec<ExposeWarning>,
}

impl PlanFailure {
    fn new(errors: Vec<ExposeError>) -> Self {
        Self {
            errors,
            warnings: Vec::new(),
        }
    }
}

/// Runs the whole pipeline for one compilation unit: build the context
/// graph, resolve visibility, check relocation cycles, compute
/// reachability, apply the module filter, prune, and order.
#[tracing::instrument(skip_all, fields(module = module_name))]
pub fn plan_exposure(
    catalog: &Catalog,
    annotations: &mut AnnotationStore,
    module_name: &str,
) -> Result<ExposurePlan, PlanFailure> {
    let built = GraphBuilder::new(catalog)
        .build(annotations)
        .map_err(PlanFailure::new)?;

    let mut visibilities = derive_effective_visibility(&built.graph, catalog, annotations);

    let cycle_errors =
        report_relocation_cycles(&built.graph, catalog, &visibilities, &built.relocated);
    if !cycle_errors.is_empty() {
        return Err(PlanFailure::new(cycle_errors));
    }

    let mut reachable =
        contexts_with_visible_decls(&built.graph, catalog, annotations, &visibilities);
    hide_filtered_namespaces(
        &built.graph,
        annotations,
        module_name,
        &mut reachable,
        &mut visibilities,
    );

    let pruned = prune_graph(&built.graph, &reachable, &visibilities);
    let warnings = unreachable_visible_warnings(&pruned, catalog, &reachable, &built.relocated);

    let enclosing = find_enclosing_scopes(&pruned, annotations);
    let order = sort_contexts_by_dependencies(&pruned, catalog, annotations).map_err(|error| {
        PlanFailure {
            errors: vec![error],
            warnings: warnings.clone(),
        }
    })?;

    tracing::debug!(contexts = order.len(), warnings = warnings.len(), "exposure plan ready");
    let contexts = order
        .into_iter()
        .map(|entity| PlannedContext {
            entity,
            enclosing_scope: enclosing.get(&entity).copied().flatten(),
            visible: visibilities.get(&entity).copied().unwrap_or(false),
        })
        .collect();
    Ok(ExposurePlan { contexts, warnings })
}
