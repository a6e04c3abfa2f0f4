//! Bresenham line-of-sight over an occupancy field

use crate::common::VisibilityOracle;
use crate::mapping::OccupancyField;

/// Visibility oracle that walks the cells between two endpoints
///
/// Both endpoints are checked. Any blocked or out-of-range cell on the line
/// breaks visibility.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineOfSight;

impl VisibilityOracle for LineOfSight {
    fn is_visible(&self, field: &OccupancyField, from: (i64, i64), to: (i64, i64)) -> bool {
        let (mut x, mut y) = from;
        let (x1, y1) = to;
        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };

        let mut err = dx - dy;

        loop {
            if !field.is_walkable(x, y) {
                return false;
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walled_field() -> OccupancyField {
        // 20x20 logical area, canvas 29, padding 4; wall across x = 14
        let mut field = OccupancyField::new(20, 20);
        for y in 8..20 {
            field.set_value(14, y, 1.0).unwrap();
        }
        field
    }

    #[test]
    fn test_clear_line_of_sight() {
        let field = walled_field();
        assert!(LineOfSight.is_visible(&field, (6, 6), (10, 10)));
        assert!(LineOfSight.is_visible(&field, (10, 10), (6, 6)));
    }

    #[test]
    fn test_blocked_by_wall() {
        let field = walled_field();
        assert!(!LineOfSight.is_visible(&field, (8, 12), (20, 12)));
    }

    #[test]
    fn test_blocked_endpoint_and_padding() {
        let field = walled_field();
        assert!(!LineOfSight.is_visible(&field, (0, 0), (10, 10)));
        assert!(!LineOfSight.is_visible(&field, (10, 10), (40, 10)));
    }

    #[test]
    fn test_single_cell() {
        let field = walled_field();
        assert!(LineOfSight.is_visible(&field, (10, 10), (10, 10)));
        assert!(!LineOfSight.is_visible(&field, (14, 10), (14, 10)));
    }
}
