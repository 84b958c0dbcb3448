// core/cspace.rs

// Configuration space for a square robot footprint. The robot occupies a
// (2r+1)x(2r+1) block of cells centred on its position, so its centre may only
// rest on cells whose whole block is free in the occupancy grid.

// Dependencies
use log::debug;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Coord, OccupancyGrid};

/// Grid of legal robot-centre positions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSpaceGrid {
    grid: OccupancyGrid,
    robot_radius: usize,
}

impl ConfigurationSpaceGrid {
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Footprint radius this grid was derived with
    pub fn robot_radius(&self) -> usize {
        self.robot_radius
    }

    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.grid.get(coord)
    }

    pub fn is_free(&self, coord: Coord) -> bool {
        self.grid.is_free(coord)
    }

    pub fn is_obstacle(&self, coord: Coord) -> bool {
        self.grid.is_obstacle(coord)
    }

    /// Read-only view of the underlying cells
    pub fn as_grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Consumes the configuration space and returns its cells
    pub fn into_grid(self) -> OccupancyGrid {
        self.grid
    }

    /// Forces a cell open. Only region analysis uses this, when an edge column
    /// has no free cell at all.
    pub(crate) fn force_free(&mut self, coord: Coord) {
        self.grid.set(coord, Cell::Free);
    }
}

/// Derives configuration space from an occupancy grid
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationSpaceMapper {
    robot_radius: usize,
}

impl ConfigurationSpaceMapper {
    /// `robot_radius` is the number of cells the footprint extends past the
    /// centre cell on each side: 1 means 3x3, 2 means 5x5.
    pub fn new(robot_radius: usize) -> Self {
        ConfigurationSpaceMapper { robot_radius }
    }

    /// Marks every cell whose footprint touches an obstacle
    pub fn map(&self, obstacles: &OccupancyGrid) -> ConfigurationSpaceGrid {
        let mut grid = OccupancyGrid::new(obstacles.rows(), obstacles.cols(), Cell::Free);
        for coord in obstacles.coords() {
            if !self.footprint_clear(obstacles, coord) {
                grid.set(coord, Cell::Obstacle);
            }
        }

        debug!(
            "Configuration space for radius {}: {} of {} cells blocked",
            self.robot_radius,
            grid.obstacle_count(),
            grid.rows() * grid.cols()
        );

        ConfigurationSpaceGrid {
            grid,
            robot_radius: self.robot_radius,
        }
    }

    /// True if no obstacle lies in the footprint square around `centre`.
    /// Cells beyond the grid edge impose no constraint.
    fn footprint_clear(&self, obstacles: &OccupancyGrid, centre: Coord) -> bool {
        let r = self.robot_radius;
        let row_lo = centre.row.saturating_sub(r);
        let row_hi = (centre.row + r).min(obstacles.rows() - 1);
        let col_lo = centre.col.saturating_sub(r);
        let col_hi = (centre.col + r).min(obstacles.cols() - 1);

        (row_lo..=row_hi)
            .all(|row| (col_lo..=col_hi).all(|col| obstacles.is_free(Coord::new(row, col))))
    }
}
