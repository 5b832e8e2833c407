//! Node table the host renders next to the canvas: one row per active node.

use serde::Serialize;

use crate::grid::{Grid, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeRow {
    pub index: NodeId,
    pub x: usize,
    pub y: usize,
    pub edges: Vec<NodeId>,
    /// Edge list as shown in the table, e.g. `{1,5}`.
    pub label: String,
}

fn edge_label(edges: &[NodeId]) -> String {
    let items: Vec<String> = edges.iter().map(|e| e.to_string()).collect();
    format!("{{{}}}", items.join(","))
}

/// Active nodes in row-major order.
pub fn rows(grid: &Grid) -> Vec<NodeRow> {
    grid.active_nodes()
        .map(|n| {
            let edges: Vec<NodeId> = n.neighbor_indices().collect();
            NodeRow {
                index: n.index(),
                x: n.x(),
                y: n.y(),
                label: edge_label(&edges),
                edges,
            }
        })
        .collect()
}
