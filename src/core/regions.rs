// core/regions.rs

// Connectivity analysis over configuration space. Flood fills from the left and
// right map edges find the open areas a robot can enter from either side; a
// world is only worth keeping when those areas join up.

// Dependencies
use log::{debug, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::cspace::ConfigurationSpaceGrid;
use super::grid::Coord;

/// 4-connected moves used by the flood fill
const CARDINAL: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Boundary column a region is grown from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeColumn {
    /// Column 0
    Left,
    /// Last column
    Right,
}

impl EdgeColumn {
    /// Column index for a grid with `cols` columns
    pub fn index(self, cols: usize) -> usize {
        match self {
            EdgeColumn::Left => 0,
            EdgeColumn::Right => cols - 1,
        }
    }
}

/// Set of cells reachable from one seed, stored as a grid-shaped mask
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    rows: usize,
    cols: usize,
    mask: Vec<bool>,
    size: usize,
}

impl Region {
    fn empty(rows: usize, cols: usize) -> Self {
        Region {
            rows,
            cols,
            mask: vec![false; rows * cols],
            size: 0,
        }
    }

    /// Number of cells in the region
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols && self.mask[coord.row * self.cols + coord.col]
    }

    /// Member rows within column `col`, top to bottom
    pub fn rows_in_column(&self, col: usize) -> Vec<usize> {
        (0..self.rows)
            .filter(|&row| self.contains(Coord::new(row, col)))
            .collect()
    }

    fn insert(&mut self, coord: Coord) -> bool {
        let idx = coord.row * self.cols + coord.col;
        if self.mask[idx] {
            return false;
        }
        self.mask[idx] = true;
        self.size += 1;
        true
    }
}

/// Region queries over a configuration-space grid.
///
/// Holds exclusive access to the grid because `largest_region_touching` may
/// open a cell when an edge column is completely blocked.
pub struct RegionConnectivity<'a> {
    cspace: &'a mut ConfigurationSpaceGrid,
}

impl<'a> RegionConnectivity<'a> {
    pub fn new(cspace: &'a mut ConfigurationSpaceGrid) -> Self {
        RegionConnectivity { cspace }
    }

    /// Breadth-first flood fill through free cells starting at `seed`.
    /// A blocked seed yields an empty region.
    pub fn region_from(&self, seed: Coord) -> Region {
        let mut region = Region::empty(self.cspace.rows(), self.cspace.cols());
        if !self.cspace.is_free(seed) {
            return region;
        }

        let mut queue = VecDeque::new();
        region.insert(seed);
        queue.push_back(seed);

        while let Some(current) = queue.pop_front() {
            for (dr, dc) in CARDINAL {
                let Some(next) = current.offset(dr, dc) else {
                    continue;
                };
                if self.cspace.is_free(next) && region.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        region
    }

    /// Largest region seeded from any row of `edge`. Ties keep the topmost seed.
    ///
    /// Side effect: when the edge column has no free cell, a random interior row
    /// of that column is forced free in the configuration space and returned as
    /// a single-cell region, so generation can keep going.
    pub fn largest_region_touching<R: Rng>(
        &mut self,
        edge: EdgeColumn,
        rng: &mut R,
    ) -> Region {
        let rows = self.cspace.rows();
        let col = edge.index(self.cspace.cols());

        let mut best = Region::empty(rows, self.cspace.cols());
        for row in 0..rows {
            let region = self.region_from(Coord::new(row, col));
            if region.size() > best.size() {
                best = region;
            }
        }

        if best.is_empty() {
            // Border rows are excluded whenever the grid has an interior
            let row = if rows > 2 {
                rng.random_range(1..rows - 1)
            } else {
                rows / 2
            };
            let coord = Coord::new(row, col);
            warn!("No open cell on {:?} edge, forcing {} open", edge, coord);
            self.cspace.force_free(coord);
            best.insert(coord);
        } else {
            debug!("Largest {:?} edge region covers {} cells", edge, best.size());
        }

        best
    }

    /// Row-major scan: the first cell where the masks disagree means "not
    /// connected", the first cell both contain means "connected".
    ///
    /// Flood-filled regions are either identical or disjoint, which is what
    /// this relies on.
    pub fn regions_connected(a: &Region, b: &Region) -> bool {
        for (in_a, in_b) in a.mask.iter().zip(b.mask.iter()) {
            if in_a != in_b {
                return false;
            } else if *in_a && *in_b {
                return true;
            }
        }
        false
    }
}

// Current Functionality:
// - Grows 4-connected regions with a queue-based flood fill.
// - Picks the largest region touching the left or right edge, opening a cell when
//   the edge is sealed.
// - Compares two regions with a first-difference scan.
