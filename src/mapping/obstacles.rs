//! Random-walk obstacle blobs

use rand::Rng;

use crate::mapping::occupancy_field::{OCCUPANCY_THRESHOLD, OCCUPIED};

/// Axis-aligned steps of the blob walk
const BLOB_DIRECTIONS: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

/// Grow one blob by a random walk of `blob_size` steps starting at `(x, y)`
///
/// Each step marks the current cell occupied, then moves one cell in a random
/// axis direction, clamped to the canvas. A walk pinned against the border
/// keeps re-marking the border cell. Returns how many free cells became
/// occupied, which is at most `blob_size`.
pub fn grow_blob<R: Rng>(
    cells: &mut [f32],
    dim: usize,
    x: usize,
    y: usize,
    blob_size: usize,
    rng: &mut R,
) -> usize {
    if dim == 0 {
        return 0;
    }
    let max = dim as i64 - 1;
    let mut x = (x as i64).min(max);
    let mut y = (y as i64).min(max);
    let mut newly_occupied = 0;

    for _ in 0..blob_size {
        let index = y as usize * dim + x as usize;
        if cells[index] < OCCUPANCY_THRESHOLD {
            newly_occupied += 1;
        }
        cells[index] = OCCUPIED;

        let (dx, dy) = BLOB_DIRECTIONS[rng.gen_range(0..BLOB_DIRECTIONS.len())];
        x = (x + dx).clamp(0, max);
        y = (y + dy).clamp(0, max);
    }

    newly_occupied
}
