//! Occupancy field and obstacle generation

pub mod occupancy_field;
pub mod obstacles;

pub use occupancy_field::*;
pub use obstacles::*;
