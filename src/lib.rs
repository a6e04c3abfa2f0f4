//! prm_field - occupancy grids with dense and roadmap graph layers
//!
//! This crate builds the spatial representation a grid planner searches:
//! a padded occupancy canvas that can be rotated without rebuilding its
//! graphs, a dense 7-connected grid graph over every cell, and a sparse
//! probabilistic roadmap that can be densified one node at a time.
//! Search algorithms plug in through [`SearchStrategy`].

// Core modules
pub mod common;

// Algorithm modules
pub mod mapping;
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Point2D, Path2D, GridNode, CellId, SampleId, Edge, QueueItem};
pub use common::{SearchStrategy, VisibilityOracle};
pub use common::{RoboticsError, RoboticsResult};
pub use mapping::OccupancyField;
pub use path_planning::{DenseGraph, LineOfSight, Roadmap, RoadmapConfig, SharedTopology, Topology};
