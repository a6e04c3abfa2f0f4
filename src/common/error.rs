//! Error types for prm_field

use std::fmt;

/// Main error type for field, graph and roadmap operations
#[derive(Debug, Clone, PartialEq)]
pub enum RoboticsError {
    /// Coordinate lies outside the `[0, dim)` canvas
    OutOfRange { x: i64, y: i64, dim: usize },
    /// Invalid parameter
    InvalidParameter(String),
    /// Roadmap has not been built yet, so it cannot be extended
    RoadmapNotBuilt,
    /// Roadmap was frozen for read-only querying
    RoadmapFrozen,
    /// Path planning failed (reported by search strategies)
    PlanningError(String),
}

impl fmt::Display for RoboticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoboticsError::OutOfRange { x, y, dim } => {
                write!(f, "Out of range: ({}, {}) outside {}x{} canvas", x, y, dim, dim)
            }
            RoboticsError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            RoboticsError::RoadmapNotBuilt => write!(f, "Roadmap error: roadmap has not been built"),
            RoboticsError::RoadmapFrozen => write!(f, "Roadmap error: roadmap is frozen"),
            RoboticsError::PlanningError(msg) => write!(f, "Planning error: {}", msg),
        }
    }
}

impl std::error::Error for RoboticsError {}

/// Result type alias for robotics operations
pub type RoboticsResult<T> = Result<T, RoboticsError>;
