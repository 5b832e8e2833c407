//! Eulerian-circuit feasibility classification over the active subgraph.
//!
//! The classification is a degree-parity heuristic and is connectivity
//! blind: two disjoint even cycles classify as [`Classification::AllEven`]
//! even though no single circuit covers both. [`EulerReport::edge_components`]
//! and [`EulerReport::is_true_circuit`] expose the connectivity side so hosts
//! can tell the difference, but they never change the classification.

use std::collections::BTreeSet;

use tracing::debug;

use crate::grid::{Grid, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No edges, or fewer than two even-degree nodes.
    None,
    /// Every node with an edge has even degree.
    AllEven,
    /// At least two nodes with edges have even degree, but not all.
    SomeEven,
}

impl Classification {
    /// Numeric code handed across the wasm boundary.
    pub fn code(self) -> u32 {
        match self {
            Classification::None => 0,
            Classification::AllEven => 1,
            Classification::SomeEven => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EulerReport {
    pub classification: Classification,
    /// Nodes highlighted as eligible circuit starts.
    pub startpoints: BTreeSet<NodeId>,
    /// Connected components among nodes with at least one edge.
    pub edge_components: usize,
}

impl EulerReport {
    pub fn start_enabled(&self) -> bool {
        self.classification != Classification::None
    }

    /// All degrees even and all edges in one component.
    pub fn is_true_circuit(&self) -> bool {
        self.classification == Classification::AllEven && self.edge_components == 1
    }
}

/// Classify the current grid. Pure: recomputed from scratch on each call.
pub fn classify(grid: &Grid) -> EulerReport {
    let mut touched: BTreeSet<NodeId> = BTreeSet::new();
    let mut even_count = 0usize;
    for node in grid.active_nodes().filter(|n| n.degree() > 0) {
        touched.extend(node.neighbor_indices());
        if node.degree() % 2 == 0 {
            even_count += 1;
        }
    }

    let (classification, startpoints) = if touched.is_empty() {
        (Classification::None, BTreeSet::new())
    } else if even_count == touched.len() {
        let starts = grid
            .active_nodes()
            .filter(|n| n.degree() > 0)
            .map(|n| n.index())
            .collect();
        (Classification::AllEven, starts)
    } else if even_count >= 2 {
        let starts = grid
            .active_nodes()
            .filter(|n| n.degree() % 2 == 1)
            .map(|n| n.index())
            .collect();
        (Classification::SomeEven, starts)
    } else {
        (Classification::None, BTreeSet::new())
    };

    let edge_components = count_edge_components(grid);
    debug!(
        ?classification,
        even_count,
        touched = touched.len(),
        startpoints = startpoints.len(),
        edge_components,
        "classified grid"
    );

    EulerReport {
        classification,
        startpoints,
        edge_components,
    }
}

fn count_edge_components(grid: &Grid) -> usize {
    let mut dsu = Dsu::new(grid.node_count());
    for (a, b) in grid.edges() {
        dsu.union(a, b);
    }
    let mut roots = BTreeSet::new();
    for node in grid.nodes().filter(|n| n.degree() > 0) {
        roots.insert(dsu.find(node.index()));
    }
    roots.len()
}

/// Disjoint Set Union (Union-Find) with path compression
#[derive(Debug, Clone)]
struct Dsu {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl Dsu {
    fn new(n: usize) -> Self {
        Dsu {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while x != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return;
        }

        let (small, large) = if self.size[rx] < self.size[ry] {
            (rx, ry)
        } else {
            (ry, rx)
        };

        self.parent[small] = large;
        self.size[large] += self.size[small];
    }
}
