//! Occupancy field on a rotation-safe padded canvas
//!
//! The logical `width × height` rectangle is centered inside a square canvas
//! whose side is the rectangle's diagonal, rounded up. Any rotation of the
//! rectangle about the canvas center therefore stays on the canvas. Cells
//! outside the rectangle start occupied, so the border is always blocked.
//!
//! The dense graph and the roadmap depend only on cell positions and live in
//! a [`SharedTopology`] that rotated copies keep pointing at. Each field owns
//! its own occupancy buffer.

use std::collections::HashSet;

use itertools::iproduct;
use log::{debug, trace};
use nalgebra::{Rotation2, Vector2};
use rand::Rng;

use crate::common::{CellId, Edge, RoboticsError, RoboticsResult, SampleId, VisibilityOracle};
use crate::mapping::obstacles::grow_blob;
use crate::path_planning::prm::RoadmapConfig;
use crate::path_planning::topology::{SharedTopology, Topology};

// Cell values
pub const FREE: f32 = 0.0;
pub const OCCUPIED: f32 = 1.0;
/// Cells at or above this value are blocked
pub const OCCUPANCY_THRESHOLD: f32 = 0.5;

/// Padded square occupancy buffer plus its shared graph topology
#[derive(Debug)]
pub struct OccupancyField {
    width: u32,
    height: u32,
    canvas_dim: usize,
    x_pad: usize,
    y_pad: usize,
    cells: Vec<f32>,
    topology: SharedTopology,
}

impl OccupancyField {
    /// Create a field with a free `width × height` interior and a default roadmap config
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(width, height, RoadmapConfig::default())
    }

    pub fn with_config(width: u32, height: u32, config: RoadmapConfig) -> Self {
        let canvas_dim = Self::calc_canvas_dim(width, height);
        let x_pad = (canvas_dim - width as usize) / 2;
        let y_pad = (canvas_dim - height as usize) / 2;

        let mut cells = vec![OCCUPIED; canvas_dim * canvas_dim];
        for (y, x) in iproduct!(y_pad..y_pad + height as usize, x_pad..x_pad + width as usize) {
            cells[y * canvas_dim + x] = FREE;
        }

        let topology = SharedTopology::new(Topology::new(canvas_dim, config));
        debug!(
            "[Field] {}x{} logical area on {}x{} canvas, padding ({}, {})",
            width, height, canvas_dim, canvas_dim, x_pad, y_pad
        );

        OccupancyField {
            width,
            height,
            canvas_dim,
            x_pad,
            y_pad,
            cells,
            topology,
        }
    }

    /// Smallest integer side that holds the rectangle's diagonal
    pub fn calc_canvas_dim(width: u32, height: u32) -> usize {
        let w = width as f64;
        let h = height as f64;
        (w * w + h * h).sqrt().ceil() as usize
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn canvas_dim(&self) -> usize {
        self.canvas_dim
    }

    pub fn x_pad(&self) -> usize {
        self.x_pad
    }

    pub fn y_pad(&self) -> usize {
        self.y_pad
    }

    /// Row-major occupancy values
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub fn topology(&self) -> &SharedTopology {
        &self.topology
    }

    fn calc_index(&self, x: i64, y: i64) -> Option<usize> {
        let dim = self.canvas_dim as i64;
        if x < 0 || y < 0 || x >= dim || y >= dim {
            return None;
        }
        Some(y as usize * self.canvas_dim + x as usize)
    }

    fn out_of_range(&self, x: i64, y: i64) -> RoboticsError {
        RoboticsError::OutOfRange { x, y, dim: self.canvas_dim }
    }

    /// Free cell on the canvas; anything off the canvas is not walkable
    pub fn is_walkable(&self, x: i64, y: i64) -> bool {
        match self.calc_index(x, y) {
            Some(i) => self.cells[i] < OCCUPANCY_THRESHOLD,
            None => false,
        }
    }

    /// Occupied cell, or any coordinate off the canvas
    pub fn is_blocked(&self, x: i64, y: i64) -> bool {
        match self.calc_index(x, y) {
            Some(i) => self.cells[i] >= OCCUPANCY_THRESHOLD,
            None => true,
        }
    }

    pub fn value(&self, x: i64, y: i64) -> RoboticsResult<f32> {
        self.calc_index(x, y)
            .map(|i| self.cells[i])
            .ok_or_else(|| self.out_of_range(x, y))
    }

    pub fn set_value(&mut self, x: i64, y: i64, value: f32) -> RoboticsResult<()> {
        let i = self.calc_index(x, y).ok_or_else(|| self.out_of_range(x, y))?;
        self.cells[i] = value;
        Ok(())
    }

    /// Whether `(x, y)` lies inside the centered logical rectangle
    pub fn in_logical_area(&self, x: i64, y: i64) -> bool {
        let x0 = self.x_pad as i64;
        let y0 = self.y_pad as i64;
        x >= x0 && y >= y0 && x < x0 + self.width as i64 && y < y0 + self.height as i64
    }

    /// Scatter `count` random-walk blobs of 1..=`max_blob_size` cells over the logical area
    pub fn generate_obstacles(&mut self, count: i64, max_blob_size: i64) -> usize {
        self.generate_obstacles_with_rng(count, max_blob_size, &mut rand::thread_rng())
    }

    /// Returns the number of cells that went from free to occupied
    pub fn generate_obstacles_with_rng<R: Rng>(
        &mut self,
        count: i64,
        max_blob_size: i64,
        rng: &mut R,
    ) -> usize {
        if count <= 0 || max_blob_size <= 0 || self.width == 0 || self.height == 0 {
            debug!(
                "[Field] generate_obstacles({}, {}) skipped",
                count, max_blob_size
            );
            return 0;
        }

        let mut newly_occupied = 0;
        for _ in 0..count {
            let x = rng.gen_range(0..self.width as usize) + self.x_pad;
            let y = rng.gen_range(0..self.height as usize) + self.y_pad;
            let blob_size = rng.gen_range(1..=max_blob_size) as usize;
            trace!("[Field] blob of {} at ({},{})", blob_size, x, y);
            newly_occupied += grow_blob(&mut self.cells, self.canvas_dim, x, y, blob_size, rng);
        }

        debug!(
            "[Field] generated {} blobs, {} cells newly occupied",
            count, newly_occupied
        );
        newly_occupied
    }

    /// Rotated copy of this field that shares its dense graph and roadmap
    ///
    /// Positive angles turn the image counter-clockwise about the canvas
    /// center, sampled nearest-neighbor; cells sourced from off the canvas
    /// come out occupied. Shared roadmap edges are not re-validated: anything
    /// relying on line of sight must be checked again on the rotated field.
    pub fn rotate(&self, angle_degrees: f64) -> OccupancyField {
        let dim = self.canvas_dim;
        let center = (dim as f64 - 1.0) / 2.0;
        let c = Vector2::new(center, center);
        let rotation = Rotation2::new(angle_degrees.to_radians());

        let cells: Vec<f32> = iproduct!(0..dim, 0..dim)
            .map(|(y, x)| {
                let source = rotation * (Vector2::new(x as f64, y as f64) - c) + c;
                self.calc_index(source.x.round() as i64, source.y.round() as i64)
                    .map(|i| self.cells[i])
                    .unwrap_or(OCCUPIED)
            })
            .collect();

        assert_eq!(
            cells.len(),
            dim * dim,
            "rotation produced {} cells for a {}x{} canvas",
            cells.len(), dim, dim
        );
        debug!("[Field] rotated {}x{} canvas by {} deg", dim, dim, angle_degrees);

        OccupancyField {
            width: self.width,
            height: self.height,
            canvas_dim: dim,
            x_pad: self.x_pad,
            y_pad: self.y_pad,
            cells,
            topology: self.topology.share(),
        }
    }

    /// O(1) dense-graph lookup of the cell at `(x, y)`
    pub fn dense_node(&self, x: i64, y: i64) -> RoboticsResult<CellId> {
        self.topology.borrow().dense.id(x, y)
    }

    /// Uniformly random dense-graph cell inside the logical area
    pub fn random_node(&self) -> RoboticsResult<CellId> {
        self.random_node_with_rng(&mut rand::thread_rng())
    }

    pub fn random_node_with_rng<R: Rng>(&self, rng: &mut R) -> RoboticsResult<CellId> {
        if self.width == 0 || self.height == 0 {
            return Err(RoboticsError::InvalidParameter(format!(
                "cannot sample from an empty {}x{} logical area",
                self.width, self.height
            )));
        }
        let x = rng.gen_range(0..self.width as i64) + self.x_pad as i64;
        let y = rng.gen_range(0..self.height as i64) + self.y_pad as i64;
        self.dense_node(x, y)
    }

    /// Append samples over the whole canvas to the shared roadmap
    ///
    /// Existing samples keep their ids. Returns the number of samples added,
    /// or `RoadmapFrozen` once the roadmap has been frozen.
    pub fn build_roadmap(&self, sample_count: i64) -> RoboticsResult<usize> {
        self.build_roadmap_with_rng(sample_count, &mut rand::thread_rng())
    }

    pub fn build_roadmap_with_rng<R: Rng>(&self, sample_count: i64, rng: &mut R) -> RoboticsResult<usize> {
        self.topology
            .borrow_mut()
            .roadmap
            .build_with_rng(sample_count, self.canvas_dim, rng)
    }

    /// Add one sample to the shared roadmap; the position must lie on the canvas
    pub fn add_roadmap_node(&self, x: i64, y: i64, max_neighbors: usize) -> RoboticsResult<SampleId> {
        if self.calc_index(x, y).is_none() {
            return Err(self.out_of_range(x, y));
        }
        self.topology.borrow_mut().roadmap.add_node(x, y, max_neighbors)
    }

    /// Remove roadmap edges that `oracle` reports as not visible on this field
    ///
    /// The roadmap is shared, so pruning on one field affects every field
    /// sharing it. Returns the number of directed edges removed.
    pub fn prune_roadmap_edges<V: VisibilityOracle>(&self, oracle: &V) -> usize {
        let topology = self.topology.borrow();
        let roadmap = &topology.roadmap;
        let rejected: HashSet<Edge<SampleId>> = roadmap
            .edges()
            .filter(|e| {
                let from = roadmap.node(e.from).position();
                let to = roadmap.node(e.to).position();
                !oracle.is_visible(self, from, to)
            })
            .collect();
        drop(topology);

        let removed = self
            .topology
            .borrow_mut()
            .roadmap
            .retain_edges(|e| !rejected.contains(&e));
        debug!("[Field] pruned {} roadmap edges without line of sight", removed);
        removed
    }
}
