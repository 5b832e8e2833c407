//! Fixed N×N grid of cells. Every cell is a potential graph node.
//! Nodes are addressed by their row-major index; adjacency is stored as
//! index sets so neighbors never hold references to each other.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::GridConfig;
use crate::error::{GridError, Result};

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    index: NodeId,
    x: usize,
    y: usize,
    pub(crate) active: bool,
    pub(crate) edges: BTreeSet<NodeId>,
}

impl Node {
    fn new(index: NodeId, x: usize, y: usize) -> Self {
        Node {
            index,
            x,
            y,
            active: false,
            edges: BTreeSet::new(),
        }
    }

    pub fn index(&self) -> NodeId {
        self.index
    }

    pub fn x(&self) -> usize {
        self.x
    }

    pub fn y(&self) -> usize {
        self.y
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edge(&self, other: NodeId) -> bool {
        self.edges.contains(&other)
    }

    /// Neighbor indices in ascending order.
    pub fn neighbor_indices(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    nodes: Vec<Node>,
}

impl Grid {
    /// Fresh grid of `cells`×`cells` inactive, edgeless nodes.
    ///
    /// Returns [`GridError::InvalidConfig`] for zero cells and for more than
    /// [`MAX_CELLS`](crate::config::MAX_CELLS) cells per side.
    pub fn new(cells: usize) -> Result<Self> {
        Self::with_config(GridConfig::new(cells))
    }

    pub fn with_config(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let size = config.cells;
        let mut nodes = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                nodes.push(Node::new(y * size + x, x, y));
            }
        }
        debug!(size, nodes = nodes.len(), "grid created");
        Ok(Grid { size, nodes })
    }

    /// Replace the whole grid. No state carries over. On error the current
    /// grid is left untouched.
    pub fn resize(&mut self, cells: usize) -> Result<()> {
        *self = Grid::new(cells)?;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn index_of(&self, x: usize, y: usize) -> Result<NodeId> {
        if x >= self.size || y >= self.size {
            return Err(GridError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        Ok(y * self.size + x)
    }

    pub fn node_at(&self, x: usize, y: usize) -> Result<&Node> {
        let index = self.index_of(x, y)?;
        Ok(&self.nodes[index])
    }

    pub fn node(&self, index: NodeId) -> Result<&Node> {
        self.nodes
            .get(index)
            .ok_or_else(|| GridError::index_out_of_bounds(index, self.size))
    }

    pub(crate) fn node_mut(&mut self, index: NodeId) -> Result<&mut Node> {
        let size = self.size;
        self.nodes
            .get_mut(index)
            .ok_or_else(|| GridError::index_out_of_bounds(index, size))
    }

    /// All nodes in row-major order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn active_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.active)
    }

    /// Each undirected edge once, as `(a, b)` with `a < b`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes.iter().flat_map(|n| {
            n.edges
                .range(n.index + 1..)
                .map(move |&other| (n.index, other))
        })
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }
}
