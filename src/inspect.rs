// src/inspect.rs
//
// Textual dump of a context graph for debugging and golden tests.

use crate::catalog::{Catalog, ContextKind};
use crate::graph::{ContextGraph, NodeId};
use crate::visibility::EffectiveVisibilityMap;

/// Renders `graph` as an indented tree, one context per line. When a
/// visibility map is given, each line carries a `[visible]`/`[hidden]`
/// marker.
pub fn render_graph(
    graph: &ContextGraph,
    catalog: &Catalog,
    visibilities: Option<&EffectiveVisibilityMap>,
) -> String {
    let mut out = String::new();
    render(graph, catalog, visibilities, graph.root(), 0, &mut out);
    out
}

fn render(
    graph: &ContextGraph,
    catalog: &Catalog,
    visibilities: Option<&EffectiveVisibilityMap>,
    node_id: NodeId,
    depth: usize,
    out: &mut String,
) {
    let node = graph.node(node_id);
    let entity = node.entity();
    for _ in 0..depth {
        out.push_str("  ");
    }
    out.push_str(match node.kind() {
        ContextKind::Namespace => "namespace",
        ContextKind::Type => "type",
    });
    let name = catalog.name(entity);
    out.push_str(" '");
    out.push_str(if name.is_empty() { "<unit>" } else { name });
    out.push('\'');
    if let Some(visibilities) = visibilities {
        out.push_str(match visibilities.get(&entity) {
            Some(true) => " [visible]",
            _ => " [hidden]",
        });
    }
    out.push('\n');
    for &child in node.children() {
        render(graph, catalog, visibilities, child, depth + 1, out);
    }
}
