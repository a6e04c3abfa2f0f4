//! Dense grid graph over every cell of the canvas
//!
//! Every cell becomes a [`GridNode`] linked to its positional neighbors. The
//! links depend only on geometry, never on occupancy, so the graph is built
//! once per canvas and shared by every rotated copy of a field. Occupancy is
//! checked by the search at query time.
//!
//! The motion model has seven offsets, not eight: the `(0, -1)` step is left
//! out. A cell therefore lists the cell above it but not the cell below it,
//! and adjacency is directed.

use itertools::iproduct;

use crate::common::{CellId, Edge, GridNode, RoboticsError, RoboticsResult};

/// Node type stored in the dense graph
pub type CellNode = GridNode<CellId>;

/// Positional offsets linked at construction time, `(0, -1)` omitted
pub const MOTION_OFFSETS: [(i64, i64); 7] = [
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Fixed-size `dim × dim` arena of grid nodes in row-major order
#[derive(Debug, Clone)]
pub struct DenseGraph {
    dim: usize,
    nodes: Vec<CellNode>,
}

impl DenseGraph {
    pub fn new(dim: usize) -> Self {
        let mut nodes: Vec<CellNode> = iproduct!(0..dim, 0..dim)
            .map(|(y, x)| GridNode::new(x as i64, y as i64))
            .collect();

        for (y, x) in iproduct!(0..dim, 0..dim) {
            let index = y * dim + x;
            for &(dx, dy) in MOTION_OFFSETS.iter() {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if Self::contains(dim, nx, ny) {
                    nodes[index].push_neighbor(CellId(ny as usize * dim + nx as usize));
                }
            }
        }

        DenseGraph { dim, nodes }
    }

    fn contains(dim: usize, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < dim as u64 && (y as u64) < dim as u64
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// O(1) lookup of the node at `(x, y)`
    pub fn id(&self, x: i64, y: i64) -> RoboticsResult<CellId> {
        if !Self::contains(self.dim, x, y) {
            return Err(RoboticsError::OutOfRange { x, y, dim: self.dim });
        }
        Ok(CellId(y as usize * self.dim + x as usize))
    }

    pub fn node(&self, id: CellId) -> &CellNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: CellId) -> &mut CellNode {
        &mut self.nodes[id.0]
    }

    pub fn neighbors(&self, id: CellId) -> &[CellId] {
        self.nodes[id.0].neighbors()
    }

    pub fn ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.nodes.len()).map(CellId)
    }

    /// Every directed edge, grouped by source cell
    pub fn edges(&self) -> impl Iterator<Item = Edge<CellId>> + '_ {
        self.nodes.iter().enumerate().flat_map(|(i, node)| {
            node.neighbors().iter().map(move |&to| Edge::new(CellId(i), to))
        })
    }

    pub fn has_edge(&self, from: CellId, to: CellId) -> bool {
        self.nodes[from.0].neighbors().contains(&to)
    }

    pub fn reset_search_state(&mut self) {
        for node in self.nodes.iter_mut() {
            node.reset_search_state();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degree(graph: &DenseGraph, x: i64, y: i64) -> usize {
        graph.neighbors(graph.id(x, y).unwrap()).len()
    }

    #[test]
    fn test_graph_covers_every_cell() {
        let graph = DenseGraph::new(15);
        assert_eq!(graph.len(), 225);
        for id in graph.ids() {
            let node = graph.node(id);
            assert_eq!(graph.id(node.x(), node.y()).unwrap(), id);
        }
    }

    #[test]
    fn test_out_degree_never_exceeds_seven() {
        let graph = DenseGraph::new(9);
        for id in graph.ids() {
            assert!(graph.neighbors(id).len() <= 7);
        }
    }

    #[test]
    fn test_interior_and_first_row_degrees() {
        let graph = DenseGraph::new(15);
        assert_eq!(degree(&graph, 7, 7), 7);
        assert_eq!(degree(&graph, 0, 0), 3);
        assert_eq!(degree(&graph, 14, 0), 3);
        assert_eq!(degree(&graph, 6, 0), 5);
    }

    #[test]
    fn test_borders_missing_the_omitted_offset() {
        let graph = DenseGraph::new(15);
        assert_eq!(degree(&graph, 0, 14), 2);
        assert_eq!(degree(&graph, 14, 14), 2);
        assert_eq!(degree(&graph, 6, 14), 4);
        assert_eq!(degree(&graph, 0, 6), 4);
        assert_eq!(degree(&graph, 14, 6), 4);
    }

    #[test]
    fn test_vertical_asymmetry_is_locked_in() {
        let graph = DenseGraph::new(5);
        let upper = graph.id(2, 1).unwrap();
        let lower = graph.id(2, 2).unwrap();

        // (2,1) reaches (2,2) through (0, 1); the reverse (0, -1) is not linked
        assert!(graph.has_edge(upper, lower));
        assert!(!graph.has_edge(lower, upper));

        let left = graph.id(1, 2).unwrap();
        assert!(graph.has_edge(lower, left));
        assert!(graph.has_edge(left, lower));
    }

    #[test]
    fn test_asymmetric_pairs_are_exactly_the_vertical_ones() {
        let graph = DenseGraph::new(6);
        for edge in graph.edges() {
            let a = graph.node(edge.from);
            let b = graph.node(edge.to);
            let reverse = graph.has_edge(edge.to, edge.from);
            let vertical = a.x() == b.x();
            assert_eq!(reverse, !vertical, "edge {:?} -> {:?}", a.position(), b.position());
        }
    }

    #[test]
    fn test_out_of_range_lookup() {
        let graph = DenseGraph::new(15);
        assert_eq!(graph.id(15, 0), Err(RoboticsError::OutOfRange { x: 15, y: 0, dim: 15 }));
        assert!(graph.id(-1, 3).is_err());
        assert!(graph.id(3, -1).is_err());
        assert!(graph.id(14, 14).is_ok());
    }

    #[test]
    fn test_edges_count_matches_degrees() {
        let graph = DenseGraph::new(4);
        let total: usize = graph.ids().map(|id| graph.neighbors(id).len()).sum();
        assert_eq!(graph.edges().count(), total);
    }

    #[test]
    fn test_empty_graph() {
        let graph = DenseGraph::new(0);
        assert!(graph.is_empty());
        assert!(graph.id(0, 0).is_err());
    }

    #[test]
    fn test_reset_search_state() {
        let mut graph = DenseGraph::new(3);
        let a = graph.id(0, 0).unwrap();
        let b = graph.id(1, 1).unwrap();
        graph.node_mut(b).g_cost = 1.4;
        graph.node_mut(b).parent = Some(a);

        graph.reset_search_state();
        assert!(graph.node(b).g_cost.is_infinite());
        assert!(graph.node(b).parent.is_none());
    }
}
