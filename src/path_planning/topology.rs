//! Graph topology shared between an occupancy field and its rotated copies

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::path_planning::dense_graph::DenseGraph;
use crate::path_planning::prm::{Roadmap, RoadmapConfig};

/// The position-based graphs laid over one canvas
#[derive(Debug)]
pub struct Topology {
    pub dense: DenseGraph,
    pub roadmap: Roadmap,
}

impl Topology {
    pub fn new(canvas_dim: usize, config: RoadmapConfig) -> Self {
        Topology {
            dense: DenseGraph::new(canvas_dim),
            roadmap: Roadmap::new(config),
        }
    }

    /// Reset costs and parents on both graphs before a new search run
    pub fn reset_search_state(&mut self) {
        self.dense.reset_search_state();
        self.roadmap.reset_search_state();
    }
}

/// Reference-counted handle to a [`Topology`]
///
/// Cloning happens only through [`SharedTopology::share`]. Every field holding
/// a handle sees mutations made through any other handle, so roadmap edits
/// must be serialized by the caller. Single-threaded only.
#[derive(Debug)]
pub struct SharedTopology(Rc<RefCell<Topology>>);

impl SharedTopology {
    pub fn new(topology: Topology) -> Self {
        SharedTopology(Rc::new(RefCell::new(topology)))
    }

    pub fn share(&self) -> Self {
        SharedTopology(Rc::clone(&self.0))
    }

    pub fn borrow(&self) -> Ref<'_, Topology> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Topology> {
        self.0.borrow_mut()
    }

    pub fn shares_with(&self, other: &SharedTopology) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles, this one included
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}
