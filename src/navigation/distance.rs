// navigation/distance.rs

// Distance-to-nearest-obstacle fields consumed by the path search. The field is
// produced by an external metrics collaborator; this module defines the shape of
// that contract plus a small neighbourhood-scan provider for headless runs.

// Dependencies
use nalgebra::DMatrix;

use crate::core::{ConfigurationSpaceGrid, Coord};

/// Per-cell distance (in cells) to the closest obstacle
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    values: DMatrix<f64>,
}

impl DistanceField {
    /// Wraps a rows x cols matrix of distances
    pub fn from_matrix(values: DMatrix<f64>) -> Self {
        DistanceField { values }
    }

    /// Builds a field from row-major nested vectors. Returns None for ragged input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return None;
        }
        let values = DMatrix::from_fn(rows.len(), cols, |r, c| rows[r][c]);
        Some(DistanceField { values })
    }

    /// Same distance everywhere
    pub fn uniform(rows: usize, cols: usize, distance: f64) -> Self {
        DistanceField {
            values: DMatrix::from_element(rows, cols, distance),
        }
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Distance at `coord`, or None outside the field
    pub fn get(&self, coord: Coord) -> Option<f64> {
        self.values.get((coord.row, coord.col)).copied()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.values
    }
}

/// Source of distance fields for a configuration-space grid
pub trait DistanceFieldProvider {
    /// Returns a field shaped like `grid`. `radius` bounds the neighbourhood the
    /// provider inspects around each cell.
    fn distance_field(&self, grid: &ConfigurationSpaceGrid, radius: usize) -> DistanceField;
}

/// Scans the square neighbourhood of each cell for the closest obstacle.
/// Cells with no obstacle in range report `radius + 1`; obstacle cells report 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestObstacleField;

impl DistanceFieldProvider for NearestObstacleField {
    fn distance_field(&self, grid: &ConfigurationSpaceGrid, radius: usize) -> DistanceField {
        let cutoff = (radius + 1) as f64;
        let values = DMatrix::from_fn(grid.rows(), grid.cols(), |row, col| {
            let centre = Coord::new(row, col);
            if grid.is_obstacle(centre) {
                return 0.0;
            }

            let mut closest = cutoff;
            for r in row.saturating_sub(radius)..=(row + radius).min(grid.rows() - 1) {
                for c in col.saturating_sub(radius)..=(col + radius).min(grid.cols() - 1) {
                    let other = Coord::new(r, c);
                    if grid.is_obstacle(other) {
                        closest = closest.min(centre.euclidean(other));
                    }
                }
            }
            closest
        });

        DistanceField::from_matrix(values)
    }
}
