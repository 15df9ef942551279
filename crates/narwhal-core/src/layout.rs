//! Seam to the external layout engine.
//!
//! The ranking/ordering algorithm is not part of narwhal: hosts plug one in through
//! [`LayoutOracle`] and [`apply_layout`] writes its answer back into the graph.

use crate::error::{Error, Result};
use crate::geom::Point;
use crate::graph::Graph;
use crate::model::LayoutOptions;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    /// Node centers by node id.
    pub positions: BTreeMap<String, Point>,
    /// Suggested waypoints by edge id, including the two endpoints when the engine produces
    /// them. Missing entries mean "no suggestion".
    pub edge_points: BTreeMap<String, Vec<Point>>,
}

/// Assigns node positions and a first-pass polyline per edge. Called synchronously.
pub trait LayoutOracle {
    fn layout(&self, graph: &Graph, options: &LayoutOptions) -> Result<LayoutResult>;
}

impl<F> LayoutOracle for F
where
    F: Fn(&Graph, &LayoutOptions) -> Result<LayoutResult>,
{
    fn layout(&self, graph: &Graph, options: &LayoutOptions) -> Result<LayoutResult> {
        self(graph, options)
    }
}

/// Keeps whatever positions the nodes and waypoints the edges already carry. Edges without
/// waypoints become direct connector-to-connector paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetLayout;

impl LayoutOracle for PresetLayout {
    fn layout(&self, graph: &Graph, _options: &LayoutOptions) -> Result<LayoutResult> {
        let mut out = LayoutResult::default();
        for node in graph.nodes() {
            let center = node.center().ok_or_else(|| Error::MissingPosition {
                node_id: node.id.clone(),
            })?;
            out.positions.insert(node.id.clone(), center);
        }
        for edge in graph.edges().filter(|e| !e.points.is_empty()) {
            out.edge_points.insert(edge.id.clone(), edge.points.clone());
        }
        Ok(out)
    }
}

/// Runs the oracle and stores its answer: node centers, edge waypoints, then connector
/// pinning so every edge starts and ends on its endpoint nodes.
pub fn apply_layout(
    graph: &mut Graph,
    oracle: &dyn LayoutOracle,
    options: &LayoutOptions,
) -> Result<()> {
    let LayoutResult {
        positions,
        mut edge_points,
    } = oracle.layout(graph, options)?;

    let ids: Vec<String> = graph.nodes().map(|n| n.id.clone()).collect();
    for id in ids {
        let Some(node) = graph.node_mut(&id) else {
            continue;
        };
        match positions.get(&id) {
            Some(p) => node.set_center(*p),
            None if node.center().is_some() => {}
            None => return Err(Error::IncompleteLayout { node_id: id }),
        }
    }

    let edge_ids: Vec<String> = graph.edges().map(|e| e.id.clone()).collect();
    for id in edge_ids {
        if let Some(edge) = graph.edge_mut(&id) {
            edge.points = edge_points.remove(&id).unwrap_or_default();
        }
    }

    let pinned = graph.pin_connectors(options.rank_direction);
    tracing::debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        pinned,
        rankdir = ?options.rank_direction,
        "applied layout"
    );
    Ok(())
}
