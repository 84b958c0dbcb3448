// core/grid.rs

// Binary occupancy grid shared by every stage of world generation. Cells are
// stored row-major; coordinates are (row, col) with row 0 at the top.

// Dependencies
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Traversable terrain
    Free,
    /// Wall or rock
    Obstacle,
}

impl Cell {
    /// Returns true for `Cell::Free`
    pub fn is_free(self) -> bool {
        self == Cell::Free
    }

    /// Returns true for `Cell::Obstacle`
    pub fn is_obstacle(self) -> bool {
        self == Cell::Obstacle
    }
}

/// Grid coordinate (row, col)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// Offsets this coordinate by (dr, dc), returning None when it would go negative
    pub fn offset(self, dr: isize, dc: isize) -> Option<Coord> {
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        Some(Coord { row, col })
    }

    /// Straight-line distance to another coordinate, in cells
    pub fn euclidean(self, other: Coord) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Rectangular binary occupancy grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRecord")]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

/// On-disk form of a grid, checked before it becomes an `OccupancyGrid`
#[derive(Deserialize)]
struct GridRecord {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridRecord> for OccupancyGrid {
    type Error = String;

    fn try_from(record: GridRecord) -> Result<Self, Self::Error> {
        if record.rows.checked_mul(record.cols) != Some(record.cells.len()) {
            return Err(format!(
                "{}x{} grid needs {} cells, found {}",
                record.rows,
                record.cols,
                record.rows.saturating_mul(record.cols),
                record.cells.len()
            ));
        }
        Ok(OccupancyGrid {
            rows: record.rows,
            cols: record.cols,
            cells: record.cells,
        })
    }
}

impl OccupancyGrid {
    /// Creates a grid with every cell set to `fill`
    pub fn new(rows: usize, cols: usize, fill: Cell) -> Self {
        OccupancyGrid {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        }
    }

    /// Builds a grid from an ASCII picture: `#` is an obstacle, anything else is free.
    /// Every line must have the same width.
    pub fn from_ascii(picture: &str) -> Option<Self> {
        let lines: Vec<&str> = picture
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let cols = lines.first()?.chars().count();
        if cols == 0 || lines.iter().any(|line| line.chars().count() != cols) {
            return None;
        }

        let cells = lines
            .iter()
            .flat_map(|line| line.chars())
            .map(|ch| if ch == '#' { Cell::Obstacle } else { Cell::Free })
            .collect();

        Some(OccupancyGrid {
            rows: lines.len(),
            cols,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true when (row, col) lies inside the grid
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Cell at `coord`, or None outside the grid
    pub fn get(&self, coord: Coord) -> Option<Cell> {
        if coord.row < self.rows && coord.col < self.cols {
            Some(self.cells[self.index(coord)])
        } else {
            None
        }
    }

    /// Returns true when `coord` is inside the grid and free
    pub fn is_free(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_free)
    }

    /// Returns true when `coord` is inside the grid and an obstacle
    pub fn is_obstacle(&self, coord: Coord) -> bool {
        self.get(coord).is_some_and(Cell::is_obstacle)
    }

    /// Sets a cell; writes outside the grid are ignored
    pub fn set(&mut self, coord: Coord, cell: Cell) {
        if coord.row < self.rows && coord.col < self.cols {
            let idx = self.index(coord);
            self.cells[idx] = cell;
        }
    }

    /// Number of obstacle cells
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_obstacle()).count()
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterates every coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Coord { row, col }))
    }

    /// Row-major index of `coord`
    pub(crate) fn index(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            for cell in self.row(row) {
                let ch = if cell.is_obstacle() { '#' } else { '.' };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_picture_round_trips_through_display() {
        let picture = "###\n.#.\n###\n";
        let grid = OccupancyGrid::from_ascii(picture).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.to_string(), picture);
    }

    #[test]
    fn ragged_pictures_are_rejected() {
        assert!(OccupancyGrid::from_ascii("###\n##\n").is_none());
        assert!(OccupancyGrid::from_ascii("").is_none());
    }

    #[test]
    fn deserialized_grid_must_have_rows_times_cols_cells() {
        let short: Result<OccupancyGrid, _> =
            serde_yaml::from_str("rows: 5\ncols: 5\ncells: [Free]\n");
        assert!(short.is_err());

        let grid: OccupancyGrid =
            serde_yaml::from_str("rows: 1\ncols: 2\ncells: [Free, Obstacle]\n").unwrap();
        assert_eq!(grid.get(Coord::new(0, 1)), Some(Cell::Obstacle));
    }

    #[test]
    fn offset_refuses_negative_coordinates() {
        assert_eq!(Coord::new(0, 3).offset(-1, 0), None);
        assert_eq!(Coord::new(2, 3).offset(-1, 1), Some(Coord::new(1, 4)));
    }
}
