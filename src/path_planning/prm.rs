//! Probabilistic Road-Map (PRM) layered over the canvas
//!
//! The roadmap is an append-only arena of sampled [`GridNode`]s plus an
//! R*-tree over their positions. Entry `i` of the tree always carries sample
//! `i`. Samples are only appended, either one at a time through
//! [`Roadmap::push_sample`] or in bulk followed by a full reindex, so a
//! [`SampleId`] stays valid for the life of the roadmap.
//!
//! Bulk construction links each sample to its k nearest samples in one
//! direction only, so `a -> b` does not imply `b -> a`. Incremental insertion
//! links the new sample both ways. Edges encode proximity, not line of sight;
//! see [`crate::mapping::OccupancyField::prune_roadmap_edges`] for the
//! optional visibility filter.

use log::{debug, trace};
use rand::Rng;
use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::common::{Edge, GridNode, RoboticsError, RoboticsResult, SampleId};

// Parameters
pub const N_KNN: usize = 10; // number of nearest samples queried per node

/// Node type stored in the roadmap
pub type SampleNode = GridNode<SampleId>;

type IndexedSample = GeomWithData<[f64; 2], usize>;

/// Configuration for roadmap construction
#[derive(Debug, Clone)]
pub struct RoadmapConfig {
    /// Nearest samples queried per node during bulk build, the node itself included
    pub n_knn: usize,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self { n_knn: N_KNN }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoadmapState {
    Unbuilt,
    Built,
    Frozen,
}

/// Sparse sampled graph with a nearest-neighbor index in lock-step
#[derive(Debug)]
pub struct Roadmap {
    config: RoadmapConfig,
    nodes: Vec<SampleNode>,
    index: RTree<IndexedSample>,
    state: RoadmapState,
}

impl Default for Roadmap {
    fn default() -> Self {
        Self::new(RoadmapConfig::default())
    }
}

impl Roadmap {
    pub fn new(config: RoadmapConfig) -> Self {
        Roadmap {
            config,
            nodes: Vec::new(),
            index: RTree::new(),
            state: RoadmapState::Unbuilt,
        }
    }

    pub fn config(&self) -> &RoadmapConfig {
        &self.config
    }

    /// Sample `sample_count` nodes uniformly over `[0, canvas_dim)²` and link them
    ///
    /// Returns the number of samples appended.
    pub fn build(&mut self, sample_count: i64, canvas_dim: usize) -> RoboticsResult<usize> {
        self.build_with_rng(sample_count, canvas_dim, &mut rand::thread_rng())
    }

    pub fn build_with_rng<R: Rng>(
        &mut self,
        sample_count: i64,
        canvas_dim: usize,
        rng: &mut R,
    ) -> RoboticsResult<usize> {
        let positions: Vec<(i64, i64)> = if sample_count <= 0 || canvas_dim == 0 {
            Vec::new()
        } else {
            let dim = canvas_dim as i64;
            (0..sample_count)
                .map(|_| (rng.gen_range(0..dim), rng.gen_range(0..dim)))
                .collect()
        };
        self.build_from_positions(&positions)
    }

    /// Append samples at explicit positions, reindex, and link the new ones
    ///
    /// Samples already in the roadmap keep their identity and their edges.
    /// Only the appended samples get outgoing edges; they may point at older
    /// samples.
    pub fn build_from_positions(&mut self, positions: &[(i64, i64)]) -> RoboticsResult<usize> {
        if self.state == RoadmapState::Frozen {
            return Err(RoboticsError::RoadmapFrozen);
        }

        let first_new = self.nodes.len();
        self.nodes.extend(positions.iter().map(|&(x, y)| GridNode::new(x, y)));
        self.reindex();

        let k = self.config.n_knn;
        let mut edge_count = 0;
        for i in first_new..self.nodes.len() {
            let (x, y) = self.nodes[i].position();
            let found = self.nearest(x, y, k);
            for neighbor in found {
                if neighbor.0 == i {
                    continue;
                }
                self.nodes[i].push_neighbor(neighbor);
                edge_count += 1;
            }
        }

        self.state = RoadmapState::Built;
        debug!(
            "[PRM] built roadmap: {} new samples ({} total), {} directed edges (k={})",
            positions.len(), self.nodes.len(), edge_count, k
        );
        Ok(positions.len())
    }

    /// Bulk-load a fresh tree over the whole arena, entry `i` carrying sample `i`
    fn reindex(&mut self) {
        let entries: Vec<IndexedSample> = self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| GeomWithData::new(Self::key(node.x(), node.y()), i))
            .collect();
        self.index = RTree::bulk_load(entries);
        self.check_alignment();
    }

    /// Insert one sample and link it both ways with up to `max_neighbors` nearest samples
    ///
    /// The node itself counts towards `max_neighbors`, since the query runs
    /// after insertion.
    pub fn add_node(&mut self, x: i64, y: i64, max_neighbors: usize) -> RoboticsResult<SampleId> {
        match self.state {
            RoadmapState::Unbuilt => return Err(RoboticsError::RoadmapNotBuilt),
            RoadmapState::Frozen => return Err(RoboticsError::RoadmapFrozen),
            RoadmapState::Built => {}
        }

        let id = self.push_sample(x, y);
        let found = self.nearest(x, y, max_neighbors);
        trace!("[PRM] add_node ({},{}): {} candidates", x, y, found.len());

        let mut linked = 0;
        for neighbor in found {
            if neighbor == id {
                continue;
            }
            self.nodes[id.0].push_neighbor(neighbor);
            self.nodes[neighbor.0].push_neighbor(id);
            linked += 1;
        }
        debug!("[PRM] added {} at ({},{}), neighbors found: {}", id, x, y, linked);

        Ok(id)
    }

    /// Append one sample to the arena and the index
    fn push_sample(&mut self, x: i64, y: i64) -> SampleId {
        let id = SampleId(self.nodes.len());
        self.nodes.push(GridNode::new(x, y));
        self.index.insert(GeomWithData::new(Self::key(x, y), id.0));
        self.check_alignment();
        id
    }

    fn check_alignment(&self) {
        assert_eq!(
            self.index.size(),
            self.nodes.len(),
            "roadmap index and sample sequence out of step"
        );
    }

    fn key(x: i64, y: i64) -> [f64; 2] {
        [x as f64, y as f64]
    }

    /// Stop accepting insertions; the roadmap stays queryable
    pub fn freeze(&mut self) {
        if self.state == RoadmapState::Built {
            self.state = RoadmapState::Frozen;
        }
    }

    pub fn is_built(&self) -> bool {
        self.state != RoadmapState::Unbuilt
    }

    pub fn is_frozen(&self) -> bool {
        self.state == RoadmapState::Frozen
    }

    /// Up to `k` samples nearest to `(x, y)`, closest first
    pub fn nearest(&self, x: i64, y: i64, k: usize) -> Vec<SampleId> {
        self.index
            .nearest_neighbor_iter(&Self::key(x, y))
            .take(k)
            .map(|entry| SampleId(entry.data))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Validated lookup by insertion position
    pub fn get(&self, index: usize) -> Option<SampleId> {
        if index < self.nodes.len() {
            Some(SampleId(index))
        } else {
            None
        }
    }

    pub fn node(&self, id: SampleId) -> &SampleNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: SampleId) -> &mut SampleNode {
        &mut self.nodes[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = SampleId> {
        (0..self.nodes.len()).map(SampleId)
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge<SampleId>> + '_ {
        self.nodes.iter().enumerate().flat_map(|(i, node)| {
            node.neighbors().iter().map(move |&to| Edge::new(SampleId(i), to))
        })
    }

    pub fn has_edge(&self, from: SampleId, to: SampleId) -> bool {
        self.nodes[from.0].neighbors().contains(&to)
    }

    /// Drop every directed edge for which `keep` returns false
    pub fn retain_edges<F: FnMut(Edge<SampleId>) -> bool>(&mut self, mut keep: F) -> usize {
        let mut removed = 0;
        for (i, node) in self.nodes.iter_mut().enumerate() {
            removed += node.retain_neighbors(|to| keep(Edge::new(SampleId(i), to)));
        }
        removed
    }

    pub fn reset_search_state(&mut self) {
        for node in self.nodes.iter_mut() {
            node.reset_search_state();
        }
    }
}
