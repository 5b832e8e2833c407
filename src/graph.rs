//! Owned graph state and the mutations the host may apply to it.
//! Edges are undirected: every insert and removal touches both endpoints.

use tracing::{debug, trace};

use crate::config::GridConfig;
use crate::debug_checks::check_grid_integrity;
use crate::error::Result;
use crate::grid::{Grid, NodeId};

/// Result of [`GraphState::toggle_edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeToggle {
    Added,
    Removed,
    /// Self edge, inactive source or inactive target.
    Ignored,
}

/// What a pointer press/release pair turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Activated,
    Deactivated,
    EdgeAdded,
    EdgeRemoved,
    Ignored,
}

impl From<EdgeToggle> for Gesture {
    fn from(toggle: EdgeToggle) -> Self {
        match toggle {
            EdgeToggle::Added => Gesture::EdgeAdded,
            EdgeToggle::Removed => Gesture::EdgeRemoved,
            EdgeToggle::Ignored => Gesture::Ignored,
        }
    }
}

/// The grid plus a revision counter the host polls to know when to redraw.
/// The counter wraps around at `u32::MAX`; hosts should compare for
/// inequality, not order.
#[derive(Debug, Clone)]
pub struct GraphState {
    grid: Grid,
    revision: u32,
}

impl GraphState {
    pub fn new(cells: usize) -> Result<Self> {
        Self::with_config(GridConfig::new(cells))
    }

    pub fn with_config(config: GridConfig) -> Result<Self> {
        Ok(GraphState {
            grid: Grid::with_config(config)?,
            revision: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Bumped by every mutation that changed something.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        check_grid_integrity(&self.grid);
    }

    /// Discard the grid and start over with `cells`×`cells` nodes.
    pub fn resize(&mut self, cells: usize) -> Result<()> {
        self.grid.resize(cells)?;
        self.touch();
        Ok(())
    }

    /// Returns whether the node changed.
    pub fn activate(&mut self, id: NodeId) -> Result<bool> {
        let node = self.grid.node_mut(id)?;
        if node.active {
            return Ok(false);
        }
        node.active = true;
        trace!(node = id, "activated");
        self.touch();
        Ok(true)
    }

    /// Deactivate a node and drop all its edges on both sides.
    /// Returns whether the node changed.
    pub fn deactivate(&mut self, id: NodeId) -> Result<bool> {
        let node = self.grid.node_mut(id)?;
        if !node.active && node.edges.is_empty() {
            return Ok(false);
        }
        node.active = false;
        let neighbors = std::mem::take(&mut node.edges);
        for other in &neighbors {
            self.grid.node_mut(*other)?.edges.remove(&id);
        }
        trace!(node = id, dropped_edges = neighbors.len(), "deactivated");
        self.touch();
        Ok(true)
    }

    /// Add the edge `a`-`b` if absent, remove it if present.
    ///
    /// The source must be active and the target must be active; anything
    /// else, including `a == b`, is a no-op.
    pub fn toggle_edge(&mut self, a: NodeId, b: NodeId) -> Result<EdgeToggle> {
        let source = self.grid.node(a)?;
        let target = self.grid.node(b)?;
        if a == b || !source.active || !target.active {
            return Ok(EdgeToggle::Ignored);
        }

        let outcome = if source.has_edge(b) {
            self.grid.node_mut(a)?.edges.remove(&b);
            self.grid.node_mut(b)?.edges.remove(&a);
            EdgeToggle::Removed
        } else {
            self.grid.node_mut(a)?.edges.insert(b);
            self.grid.node_mut(b)?.edges.insert(a);
            EdgeToggle::Added
        };
        trace!(a, b, ?outcome, "edge toggled");
        self.touch();
        Ok(outcome)
    }

    /// Resolve a pointer press on `pressed` released over `released`.
    ///
    /// Press and release on the same cell toggles its activation. A drag
    /// onto an active cell toggles the edge between the two; a drag onto an
    /// inactive cell does nothing.
    pub fn release(&mut self, pressed: NodeId, released: NodeId) -> Result<Gesture> {
        if pressed == released {
            if self.grid.node(pressed)?.active {
                self.deactivate(pressed)?;
                return Ok(Gesture::Deactivated);
            }
            self.activate(pressed)?;
            return Ok(Gesture::Activated);
        }
        Ok(self.toggle_edge(pressed, released)?.into())
    }

    /// Deactivate every node.
    pub fn clear(&mut self) {
        let mut changed = 0usize;
        for node in self.grid.nodes_mut() {
            if node.active || !node.edges.is_empty() {
                node.active = false;
                node.edges.clear();
                changed += 1;
            }
        }
        debug!(changed, "grid cleared");
        if changed > 0 {
            self.touch();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn state_with_active(cells: usize, ids: &[NodeId]) -> GraphState {
        let mut state = GraphState::new(cells).unwrap();
        for &id in ids {
            state.activate(id).unwrap();
        }
        state
    }

    #[test]
    fn activate_is_idempotent() {
        let mut state = GraphState::new(3).unwrap();
        assert!(state.activate(4).unwrap());
        let rev = state.revision();
        assert!(!state.activate(4).unwrap());
        assert_eq!(state.revision(), rev);
        assert!(state.grid().node(4).unwrap().is_active());
    }

    #[test]
    fn revision_wraps_instead_of_overflowing() {
        let mut state = GraphState::new(2).unwrap();
        state.revision = u32::MAX;
        assert!(state.activate(0).unwrap());
        assert_eq!(state.revision(), 0);
        assert!(state.activate(1).unwrap());
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn toggle_twice_restores_edges() {
        let mut state = state_with_active(3, &[0, 1]);
        assert_eq!(state.toggle_edge(0, 1).unwrap(), EdgeToggle::Added);
        assert!(state.grid().node(1).unwrap().has_edge(0));
        assert_eq!(state.toggle_edge(1, 0).unwrap(), EdgeToggle::Removed);
        assert_eq!(state.grid().node(0).unwrap().degree(), 0);
        assert_eq!(state.grid().node(1).unwrap().degree(), 0);
    }

    #[test]
    fn toggle_requires_active_endpoints() {
        let mut state = state_with_active(3, &[0]);
        assert_eq!(state.toggle_edge(0, 1).unwrap(), EdgeToggle::Ignored);
        assert_eq!(state.toggle_edge(1, 0).unwrap(), EdgeToggle::Ignored);
        assert_eq!(state.toggle_edge(0, 0).unwrap(), EdgeToggle::Ignored);
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn deactivate_drops_edges_on_both_sides() {
        let mut state = state_with_active(3, &[0, 1, 2]);
        state.toggle_edge(0, 1).unwrap();
        state.toggle_edge(0, 2).unwrap();
        state.toggle_edge(1, 2).unwrap();

        assert!(state.deactivate(0).unwrap());
        let grid = state.grid();
        assert_eq!(grid.node(0).unwrap().degree(), 0);
        assert!(!grid.node(1).unwrap().has_edge(0));
        assert!(!grid.node(2).unwrap().has_edge(0));
        assert!(grid.node(1).unwrap().has_edge(2));

        assert!(!state.deactivate(0).unwrap());
    }

    #[test]
    fn click_toggles_activation_and_drag_toggles_edge() {
        let mut state = GraphState::new(3).unwrap();
        assert_eq!(state.release(0, 0).unwrap(), Gesture::Activated);
        assert_eq!(state.release(0, 1).unwrap(), Gesture::Ignored);
        assert_eq!(state.release(1, 1).unwrap(), Gesture::Activated);
        assert_eq!(state.release(0, 1).unwrap(), Gesture::EdgeAdded);
        assert_eq!(state.release(1, 0).unwrap(), Gesture::EdgeRemoved);
        assert_eq!(state.release(0, 0).unwrap(), Gesture::Deactivated);
    }

    #[test]
    fn unknown_nodes_are_out_of_bounds() {
        let mut state = GraphState::new(2).unwrap();
        assert!(matches!(state.activate(4), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(state.toggle_edge(0, 9), Err(GridError::OutOfBounds { .. })));
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn clear_leaves_inactive_edgeless_grid() {
        let mut state = state_with_active(2, &[0, 1, 3]);
        state.toggle_edge(0, 1).unwrap();
        state.toggle_edge(1, 3).unwrap();
        state.clear();
        assert!(state.grid().nodes().all(|n| !n.is_active() && n.degree() == 0));

        let rev = state.revision();
        state.clear();
        assert_eq!(state.revision(), rev);
    }
}
