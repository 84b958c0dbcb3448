// core/generator.rs

// Cave-style terrain generation. A grid is seeded with random obstacles and then
// smoothed with a cellular automaton until the noise settles into connected
// rock formations and open caverns. The top and bottom rows are always walls.

// Dependencies
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use super::grid::{Cell, Coord, OccupancyGrid};

/// More obstacle neighbours than this turns a cell into an obstacle
const FILL_THRESHOLD: usize = 4;
/// Fewer obstacle neighbours than this clears a cell
const CLEAR_THRESHOLD: usize = 2;

/// Errors raised while validating generation parameters
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Grid smaller than 3x3
    InvalidDimensions { rows: usize, cols: usize },
    /// Fill probability outside [0, 1]
    InvalidFillProbability(f64),
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerationError::InvalidDimensions { rows, cols } => {
                write!(f, "Grid must be at least 3x3, got {}x{}", rows, cols)
            }
            GenerationError::InvalidFillProbability(p) => {
                write!(f, "Fill probability must be within [0, 1], got {}", p)
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// Cellular-automaton occupancy grid generator
#[derive(Debug, Clone)]
pub struct GridGenerator {
    rows: usize,
    cols: usize,
    fill_probability: f64,
    smooth_iterations: usize,
}

impl GridGenerator {
    /// Validates the parameters and creates a generator
    pub fn new(
        rows: usize,
        cols: usize,
        fill_probability: f64,
        smooth_iterations: usize,
    ) -> Result<Self, GenerationError> {
        if rows < 3 || cols < 3 {
            return Err(GenerationError::InvalidDimensions { rows, cols });
        }
        if !(0.0..=1.0).contains(&fill_probability) {
            return Err(GenerationError::InvalidFillProbability(fill_probability));
        }

        Ok(GridGenerator {
            rows,
            cols,
            fill_probability,
            smooth_iterations,
        })
    }

    /// Generates a grid from an optional seed. Without a seed the generator
    /// draws from OS entropy.
    pub fn generate_seeded(&self, seed: Option<u64>) -> OccupancyGrid {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.generate(&mut rng)
    }

    /// Random fill followed by `smooth_iterations` smoothing passes.
    /// Identical RNG state yields an identical grid.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> OccupancyGrid {
        let mut grid = self.random_fill(rng);
        debug!(
            "Random fill placed {} obstacles in {}x{} grid",
            grid.obstacle_count(),
            self.rows,
            self.cols
        );

        for _ in 0..self.smooth_iterations {
            grid = Self::smooth(&grid);
        }

        info!(
            "Generated {}x{} grid: {} obstacles after {} smoothing passes",
            self.rows,
            self.cols,
            grid.obstacle_count(),
            self.smooth_iterations
        );
        grid
    }

    /// Border rows become walls; every interior cell is a wall with
    /// probability `fill_probability`
    fn random_fill<R: Rng>(&self, rng: &mut R) -> OccupancyGrid {
        let mut grid = OccupancyGrid::new(self.rows, self.cols, Cell::Free);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = if row == 0 || row == self.rows - 1 {
                    Cell::Obstacle
                } else if rng.random::<f64>() < self.fill_probability {
                    Cell::Obstacle
                } else {
                    Cell::Free
                };
                grid.set(Coord::new(row, col), cell);
            }
        }
        grid
    }

    /// One smoothing pass. Every decision reads from `grid`; the result is a new grid.
    pub fn smooth(grid: &OccupancyGrid) -> OccupancyGrid {
        let mut next = grid.clone();
        for coord in grid.coords() {
            let walls = Self::wall_neighbors(grid, coord);
            if walls > FILL_THRESHOLD {
                next.set(coord, Cell::Obstacle);
            } else if walls < CLEAR_THRESHOLD {
                next.set(coord, Cell::Free);
            }
        }
        next
    }

    /// Obstacle count among the 8 neighbours of `coord`. Positions above or
    /// below the grid count as walls; positions beside it do not.
    pub fn wall_neighbors(grid: &OccupancyGrid, coord: Coord) -> usize {
        let (r, c) = (coord.row as isize, coord.col as isize);
        let mut count = 0;
        for i in r - 1..=r + 1 {
            for j in c - 1..=c + 1 {
                if i == r && j == c {
                    continue;
                }
                if grid.in_bounds(i, j) {
                    if grid.is_obstacle(Coord::new(i as usize, j as usize)) {
                        count += 1;
                    }
                } else if i < 0 || i >= grid.rows() as isize {
                    count += 1;
                }
            }
        }
        count
    }
}
