//! Common types, traits, and error definitions for prm_field
//!
//! This module provides the node, identity and error types shared by the
//! occupancy field, the dense grid graph and the roadmap.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
