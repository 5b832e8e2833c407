//! Property-based tests for the graph mutations.
//!
//! Random operation sequences must never break edge symmetry or leave
//! edges on inactive nodes.

use proptest::prelude::*;

use eulergrid::{classify, Classification, EdgeToggle, GraphState, Grid};

const CELLS: usize = 4;
const NODES: usize = CELLS * CELLS;

#[derive(Debug, Clone)]
enum Op {
    Activate(usize),
    Deactivate(usize),
    Toggle(usize, usize),
    Release(usize, usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..NODES).prop_map(Op::Activate),
        1 => (0..NODES).prop_map(Op::Deactivate),
        4 => (0..NODES, 0..NODES).prop_map(|(a, b)| Op::Toggle(a, b)),
        2 => (0..NODES, 0..NODES).prop_map(|(a, b)| Op::Release(a, b)),
        1 => Just(Op::Clear),
    ]
}

fn apply(state: &mut GraphState, op: &Op) {
    match *op {
        Op::Activate(i) => {
            state.activate(i).unwrap();
        }
        Op::Deactivate(i) => {
            state.deactivate(i).unwrap();
        }
        Op::Toggle(a, b) => {
            state.toggle_edge(a, b).unwrap();
        }
        Op::Release(a, b) => {
            state.release(a, b).unwrap();
        }
        Op::Clear => state.clear(),
    }
}

fn assert_invariants(grid: &Grid) -> Result<(), TestCaseError> {
    for node in grid.nodes() {
        if !node.is_active() {
            prop_assert_eq!(node.degree(), 0, "inactive node {} has edges", node.index());
        }
        for other in node.neighbor_indices() {
            prop_assert!(other != node.index());
            prop_assert!(grid.node(other).unwrap().has_edge(node.index()));
        }
    }
    Ok(())
}

proptest! {
    /// Edges stay mutual and inactive nodes stay edgeless
    #[test]
    fn prop_invariants_hold(ops in prop::collection::vec(op(), 0..64)) {
        let mut state = GraphState::new(CELLS).unwrap();
        for op in &ops {
            apply(&mut state, op);
            assert_invariants(state.grid())?;
        }
    }

    /// Toggling the same pair twice restores both edge sets
    #[test]
    fn prop_double_toggle_restores(
        ops in prop::collection::vec(op(), 0..32),
        a in 0..NODES,
        b in 0..NODES,
    ) {
        let mut state = GraphState::new(CELLS).unwrap();
        for op in &ops {
            apply(&mut state, op);
        }
        let before = state.grid().clone();
        let first = state.toggle_edge(a, b).unwrap();
        let second = state.toggle_edge(a, b).unwrap();
        prop_assert_eq!(state.grid(), &before);
        if first == EdgeToggle::Ignored {
            prop_assert_eq!(second, EdgeToggle::Ignored);
        } else {
            prop_assert_ne!(first, second);
        }
    }

    /// Deactivation leaves no reference to the node anywhere
    #[test]
    fn prop_deactivate_detaches(ops in prop::collection::vec(op(), 0..48), target in 0..NODES) {
        let mut state = GraphState::new(CELLS).unwrap();
        for op in &ops {
            apply(&mut state, op);
        }
        state.deactivate(target).unwrap();
        let grid = state.grid();
        prop_assert_eq!(grid.node(target).unwrap().degree(), 0);
        let detached = grid.nodes().all(|n| !n.has_edge(target));
        prop_assert!(detached);
    }

    /// All-even means every node with an edge is even and listed as a start
    #[test]
    fn prop_all_even_startpoints(ops in prop::collection::vec(op(), 0..64)) {
        let mut state = GraphState::new(CELLS).unwrap();
        for op in &ops {
            apply(&mut state, op);
        }
        let report = classify(state.grid());
        let with_edges: Vec<usize> = state
            .grid()
            .nodes()
            .filter(|n| n.degree() > 0)
            .map(|n| n.index())
            .collect();
        match report.classification {
            Classification::AllEven => {
                let all_even = state.grid().nodes().all(|n| n.degree() % 2 == 0);
                prop_assert!(all_even);
                let starts: Vec<usize> = report.startpoints.iter().copied().collect();
                prop_assert_eq!(starts, with_edges);
            }
            Classification::SomeEven => {
                let all_odd = report
                    .startpoints
                    .iter()
                    .all(|&i| state.grid().node(i).unwrap().degree() % 2 == 1);
                prop_assert!(all_odd);
            }
            Classification::None => prop_assert!(report.startpoints.is_empty()),
        }
        prop_assert_eq!(report.start_enabled(), report.classification != Classification::None);
    }
}
