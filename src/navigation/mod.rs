//! Path search for generated worlds
//!
//! This module finds a turn-limited, wall-avoiding path through the
//! configuration space, guided by a distance-to-obstacle field.
pub mod distance;
pub mod planner;

pub use distance::{DistanceField, DistanceFieldProvider, NearestObstacleField};
pub use planner::{AStarSearch, ConstrainedPathSearch, NodeCost, SegmentPlan, PENALTY_FACTOR};

use crate::core::Coord;
use serde::{Deserialize, Serialize};

/// Ordered cells from the first waypoint to the last
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Path cells
    cells: Vec<Coord>,
}

impl Path {
    /// Wrap an ordered list of cells
    pub fn new(cells: Vec<Coord>) -> Self {
        Path { cells }
    }

    /// Cells in travel order
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the path has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// First cell
    pub fn start(&self) -> Option<Coord> {
        self.cells.first().copied()
    }

    /// Last cell
    pub fn goal(&self) -> Option<Coord> {
        self.cells.last().copied()
    }

    /// Total travelled distance in cells
    pub fn length(&self) -> f64 {
        self.cells
            .windows(2)
            .map(|pair| pair[0].euclidean(pair[1]))
            .sum()
    }
}

/// Navigation error types
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Bad waypoints or mismatched inputs
    InvalidInput(String),
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            NavigationError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for NavigationError {}
