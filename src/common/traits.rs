//! Common traits defining the collaborators of the occupancy field

use crate::common::error::RoboticsError;
use crate::common::types::*;
use crate::mapping::OccupancyField;

/// Straight-line visibility between two canvas cells
pub trait VisibilityOracle {
    /// True when the segment from `from` to `to` crosses no occupied cell
    fn is_visible(&self, field: &OccupancyField, from: (i64, i64), to: (i64, i64)) -> bool;

    /// Visibility between two graph nodes
    fn nodes_visible<I: Copy + PartialEq>(
        &self,
        field: &OccupancyField,
        a: &GridNode<I>,
        b: &GridNode<I>,
    ) -> bool
    where
        Self: Sized,
    {
        self.is_visible(field, a.position(), b.position())
    }
}

/// Search algorithm consuming the field's dense graph
///
/// `heading_rad` and `no_go_half_width_rad` describe a no-go cone: travel
/// directions within `no_go_half_width_rad` of `heading_rad` are penalized or
/// forbidden, at the strategy's discretion.
pub trait SearchStrategy {
    fn solve(
        &self,
        field: &OccupancyField,
        start: CellId,
        goal: CellId,
        heading_rad: f64,
        no_go_half_width_rad: f64,
    ) -> Result<Path2D, RoboticsError>;
}
