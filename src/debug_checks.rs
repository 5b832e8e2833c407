//! Debug-only integrity checks for detecting corrupted state early.
//! All functions are no-ops in release builds.

use crate::grid::Grid;
use crate::Session;

/// Check grid shape and edge invariants
#[allow(unused_variables)]
pub fn check_grid_integrity(grid: &Grid) {
    #[cfg(debug_assertions)]
    {
        // Check 1: exactly N² nodes, indexed row-major
        debug_assert_eq!(
            grid.node_count(),
            grid.size() * grid.size(),
            "Grid of size {} has {} nodes",
            grid.size(),
            grid.node_count()
        );
        for (idx, node) in grid.nodes().enumerate() {
            debug_assert!(
                node.index() == idx && node.index() == node.y() * grid.size() + node.x(),
                "Node {} at ({}, {}) is stored at position {}",
                node.index(),
                node.x(),
                node.y(),
                idx
            );
        }

        for node in grid.nodes() {
            // Check 2: inactive nodes carry no edges
            debug_assert!(
                node.is_active() || node.degree() == 0,
                "Inactive node {} has {} edges",
                node.index(),
                node.degree()
            );

            for other in node.neighbor_indices() {
                // Check 3: no self edges
                debug_assert!(
                    other != node.index(),
                    "Node {} has a self edge",
                    node.index()
                );
                // Check 4: edges are mutual
                let mutual = grid
                    .node(other)
                    .map(|n| n.has_edge(node.index()))
                    .unwrap_or(false);
                debug_assert!(
                    mutual,
                    "Edge {} -> {} has no reverse edge",
                    node.index(),
                    other
                );
            }
        }
    }
}

/// Check export buffers match the grid they were built from
#[allow(unused_variables)]
pub fn check_session_integrity(session: &Session) {
    #[cfg(debug_assertions)]
    {
        let grid = session.state().grid();
        check_grid_integrity(grid);

        debug_assert_eq!(
            session.active_buf.len(),
            grid.active_nodes().count(),
            "Active buffer out of sync"
        );
        debug_assert_eq!(
            session.edges_buf.len(),
            grid.edges().count() * 2,
            "Edge buffer out of sync"
        );
        debug_assert_eq!(
            session.startpoints_buf.len(),
            session.report().startpoints.len(),
            "Startpoint buffer out of sync"
        );
    }
}
