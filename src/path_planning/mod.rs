// Graph layers over the occupancy field

pub mod dense_graph;
pub mod prm;
pub mod topology;
pub mod line_of_sight;

pub use dense_graph::*;
pub use prm::*;
pub use topology::*;
pub use line_of_sight::*;
