//! Common types used throughout prm_field

use std::cmp::Ordering;
use std::fmt;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

/// Path represented as a sequence of 2D points
#[derive(Debug, Clone)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn total_length(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.points.windows(2)
            .map(|w| w[0].distance(&w[1]))
            .sum()
    }
}

impl Default for Path2D {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of a cell in the dense grid graph (row-major arena index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl CellId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell#{}", self.0)
    }
}

/// Identity of a roadmap sample; equals its insertion position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(pub(crate) usize);

impl SampleId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sample#{}", self.0)
    }
}

/// Directed edge between two nodes of the same graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<I> {
    pub from: I,
    pub to: I,
}

impl<I> Edge<I> {
    pub fn new(from: I, to: I) -> Self {
        Self { from, to }
    }
}

/// Graph vertex shared between the graphs of this crate and external search strategies.
///
/// Position is fixed at creation. The cost fields and `parent` belong to
/// whichever search is currently running; `f_cost` is only refreshed by an
/// explicit [`GridNode::calculate_f_cost`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct GridNode<I> {
    x: i64,
    y: i64,
    pub g_cost: f64,
    pub h_cost: f64,
    pub f_cost: f64,
    pub parent: Option<I>,
    neighbors: Vec<I>,
}

impl<I: Copy + PartialEq> GridNode<I> {
    pub fn new(x: i64, y: i64) -> Self {
        GridNode {
            x,
            y,
            g_cost: f64::INFINITY,
            h_cost: f64::INFINITY,
            f_cost: f64::INFINITY,
            parent: None,
            neighbors: Vec::new(),
        }
    }

    pub fn x(&self) -> i64 {
        self.x
    }

    pub fn y(&self) -> i64 {
        self.y
    }

    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Outgoing neighbors in insertion order
    pub fn neighbors(&self) -> &[I] {
        &self.neighbors
    }

    pub fn calculate_f_cost(&mut self) {
        self.f_cost = self.g_cost + self.h_cost;
    }

    /// Clear costs and parent left behind by a previous search run
    pub fn reset_search_state(&mut self) {
        self.g_cost = f64::INFINITY;
        self.h_cost = f64::INFINITY;
        self.f_cost = f64::INFINITY;
        self.parent = None;
    }

    pub fn distance_to(&self, other: &GridNode<I>) -> f64 {
        (((self.x - other.x).pow(2) + (self.y - other.y).pow(2)) as f64).sqrt()
    }

    pub(crate) fn push_neighbor(&mut self, id: I) {
        self.neighbors.push(id);
    }

    /// Keeps neighbors for which `keep` returns true, returns how many were dropped
    pub(crate) fn retain_neighbors<F: FnMut(I) -> bool>(&mut self, mut keep: F) -> usize {
        let before = self.neighbors.len();
        self.neighbors.retain(|&id| keep(id));
        before - self.neighbors.len()
    }
}

/// Open-list entry for searches over a [`GridNode`] graph
///
/// Ordered in reverse on `cost`, so a `BinaryHeap<QueueItem<_>>` pops the
/// lowest cost first. NaN costs compare equal to everything.
#[derive(Debug, Clone, Copy)]
pub struct QueueItem<I> {
    pub cost: f64,
    pub id: I,
}

impl<I> QueueItem<I> {
    pub fn new(id: I, cost: f64) -> Self {
        QueueItem { cost, id }
    }

    /// Entry keyed on the node's current `f_cost`
    pub fn from_node(id: I, node: &GridNode<I>) -> Self {
        QueueItem { cost: node.f_cost, id }
    }
}

impl<I> PartialEq for QueueItem<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl<I> Eq for QueueItem<I> {}

impl<I> Ord for QueueItem<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
    }
}

impl<I> PartialOrd for QueueItem<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point2d_distance() {
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(3.0, 4.0);
        assert!((p1.distance(&p2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_path2d_total_length() {
        let path = Path2D::from_points(vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
        ]);
        assert!((path.total_length() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_grid_node_defaults_to_infinite_costs() {
        let node: GridNode<CellId> = GridNode::new(3, 4);
        assert_eq!(node.position(), (3, 4));
        assert!(node.g_cost.is_infinite());
        assert!(node.h_cost.is_infinite());
        assert!(node.f_cost.is_infinite());
        assert!(node.parent.is_none());
        assert!(node.neighbors().is_empty());
    }

    #[test]
    fn test_f_cost_only_updates_on_request() {
        let mut node: GridNode<CellId> = GridNode::new(0, 0);
        node.g_cost = 2.0;
        node.h_cost = 3.5;
        assert!(node.f_cost.is_infinite());

        node.calculate_f_cost();
        assert!((node.f_cost - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_reset_search_state() {
        let mut node: GridNode<SampleId> = GridNode::new(1, 1);
        node.g_cost = 1.0;
        node.h_cost = 1.0;
        node.calculate_f_cost();
        node.parent = Some(SampleId(7));
        node.push_neighbor(SampleId(2));

        node.reset_search_state();
        assert!(node.f_cost.is_infinite());
        assert!(node.parent.is_none());
        assert_eq!(node.neighbors(), &[SampleId(2)]);
    }

    #[test]
    fn test_retain_neighbors_reports_dropped() {
        let mut node: GridNode<SampleId> = GridNode::new(0, 0);
        for i in 0..5 {
            node.push_neighbor(SampleId(i));
        }
        let dropped = node.retain_neighbors(|id| id.index() % 2 == 0);
        assert_eq!(dropped, 2);
        assert_eq!(node.neighbors(), &[SampleId(0), SampleId(2), SampleId(4)]);
    }

    #[test]
    fn test_queue_item_pops_lowest_cost_first() {
        use std::collections::BinaryHeap;

        let mut heap = BinaryHeap::new();
        heap.push(QueueItem::new(CellId(0), 4.0));
        heap.push(QueueItem::new(CellId(1), 1.5));
        heap.push(QueueItem::new(CellId(2), 9.0));
        heap.push(QueueItem::new(CellId(3), 2.0));

        let order: Vec<CellId> = std::iter::from_fn(|| heap.pop()).map(|item| item.id).collect();
        assert_eq!(order, vec![CellId(1), CellId(3), CellId(0), CellId(2)]);
    }

    #[test]
    fn test_queue_item_from_node_uses_f_cost() {
        let mut node: GridNode<SampleId> = GridNode::new(1, 1);
        node.g_cost = 2.0;
        node.h_cost = 3.0;
        node.calculate_f_cost();

        let item = QueueItem::from_node(SampleId(7), &node);
        assert_eq!(item.cost, 5.0);
        assert_eq!(item.id, SampleId(7));
        assert!(item > QueueItem::new(SampleId(8), 6.0));
    }

    #[test]
    fn test_queue_item_nan_cost_compares_equal() {
        use std::collections::BinaryHeap;

        let nan = QueueItem::new(CellId(0), f64::NAN);
        assert_eq!(nan.cmp(&QueueItem::new(CellId(1), 1.0)), Ordering::Equal);

        let mut heap = BinaryHeap::new();
        heap.push(nan);
        heap.push(QueueItem::new(CellId(1), 1.0));
        assert_eq!(heap.len(), 2);
        assert!(heap.pop().is_some());
        assert!(heap.pop().is_some());
        assert!(heap.pop().is_none());
    }
}
