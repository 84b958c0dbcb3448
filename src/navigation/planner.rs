// navigation/planner.rs

// Turn-limited A* over configuration space. After the first step the robot may
// only keep its heading or turn by 45 degrees, may not slip diagonally between
// two walls, and pays extra for cells that sit inside the inflation radius of an
// obstacle. Multi-waypoint requests run one search per leg.

// Dependencies
use log::{debug, info};
use std::f64::consts::SQRT_2;

use super::distance::DistanceField;
use super::{NavigationError, Path};
use crate::core::{ConfigurationSpaceGrid, Coord};

/// Cost factor for cells within the inflation radius
pub const PENALTY_FACTOR: f64 = 5.0;

/// All 8 moves, clockwise starting east
const ALL_MOVES: [(isize, isize); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Moves allowed after arriving with heading `ALL_MOVES[i]`: straight or 45 degrees
const TURN_TABLE: [[(isize, isize); 3]; 8] = [
    [(-1, 1), (0, 1), (1, 1)],
    [(0, 1), (1, 1), (1, 0)],
    [(1, 1), (1, 0), (1, -1)],
    [(1, 0), (1, -1), (0, -1)],
    [(1, -1), (0, -1), (-1, -1)],
    [(0, -1), (-1, -1), (-1, 0)],
    [(-1, -1), (-1, 0), (-1, 1)],
    [(-1, 0), (-1, 1), (0, 1)],
];

/// Cost terms recorded on a search node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeCost {
    /// Distance travelled from the segment start
    pub g: f64,
    /// Straight-line distance to the segment goal
    pub h: f64,
    /// g + h + wall proximity penalty
    pub f: f64,
}

/// One A* leg: the cells visited plus the costs on each node
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentPlan {
    pub cells: Vec<Coord>,
    pub costs: Vec<NodeCost>,
}

/// Search-time record. Two nodes are the same node when they share a cell.
#[derive(Clone, Debug)]
struct PathNode {
    coord: Coord,
    cost: NodeCost,
    parent: Option<usize>,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum NodeState {
    Unseen,
    Open(usize),
    Closed,
}

/// Single start-to-goal search
pub struct AStarSearch<'a> {
    grid: &'a ConfigurationSpaceGrid,
    inflation_radius: f64,
}

impl<'a> AStarSearch<'a> {
    pub fn new(grid: &'a ConfigurationSpaceGrid, inflation_radius: f64) -> Self {
        AStarSearch {
            grid,
            inflation_radius,
        }
    }

    /// Runs the search. Returns None once the open set is exhausted.
    /// Endpoints are assumed valid; `ConstrainedPathSearch` checks them.
    pub fn search(&self, start: Coord, goal: Coord, field: &DistanceField) -> Option<SegmentPlan> {
        let cols = self.grid.cols();
        let mut state = vec![NodeState::Unseen; self.grid.rows() * cols];
        let mut nodes = vec![PathNode {
            coord: start,
            cost: NodeCost {
                g: 0.0,
                h: 0.0,
                f: 0.0,
            },
            parent: None,
        }];
        // Insertion-ordered so equal f values resolve to the earliest entry
        let mut open: Vec<usize> = vec![0];
        state[start.row * cols + start.col] = NodeState::Open(0);

        while !open.is_empty() {
            let mut best = 0;
            for (pos, &idx) in open.iter().enumerate() {
                if nodes[idx].cost.f < nodes[open[best]].cost.f {
                    best = pos;
                }
            }
            let current_idx = open.remove(best);
            let current = nodes[current_idx].clone();
            state[current.coord.row * cols + current.coord.col] = NodeState::Closed;

            if current.coord == goal {
                debug!("Reached {} after creating {} nodes", goal, nodes.len());
                return Some(Self::reconstruct(&nodes, current_idx));
            }

            let moves: &[(isize, isize)] = match current.parent {
                None => &ALL_MOVES,
                Some(parent) => {
                    let from = nodes[parent].coord;
                    let heading = (
                        current.coord.row as isize - from.row as isize,
                        current.coord.col as isize - from.col as isize,
                    );
                    match ALL_MOVES.iter().position(|&m| m == heading) {
                        Some(i) => &TURN_TABLE[i],
                        None => &[],
                    }
                }
            };

            for &(dr, dc) in moves {
                let Some(child) = self.walkable_step(current.coord, dr, dc) else {
                    continue;
                };
                let slot = child.row * cols + child.col;
                if state[slot] == NodeState::Closed {
                    continue;
                }

                let step = if dr != 0 && dc != 0 { SQRT_2 } else { 1.0 };
                let g = current.cost.g + step;
                let h = child.euclidean(goal);
                let f = g + h + self.wall_penalty(field, child);

                match state[slot] {
                    NodeState::Open(idx) => {
                        if g < nodes[idx].cost.g {
                            nodes[idx].parent = Some(current_idx);
                            nodes[idx].cost = NodeCost { g, h, f };
                        }
                    }
                    NodeState::Unseen => {
                        nodes.push(PathNode {
                            coord: child,
                            cost: NodeCost { g, h, f },
                            parent: Some(current_idx),
                        });
                        let idx = nodes.len() - 1;
                        open.push(idx);
                        state[slot] = NodeState::Open(idx);
                    }
                    NodeState::Closed => {}
                }
            }
        }

        debug!("Open set exhausted between {} and {}", start, goal);
        None
    }

    /// Destination of a move if it stays on the grid, lands on a free cell, and
    /// does not squeeze diagonally between two walls
    fn walkable_step(&self, from: Coord, dr: isize, dc: isize) -> Option<Coord> {
        let to = from.offset(dr, dc)?;
        if !self.grid.is_free(to) {
            return None;
        }
        if dr != 0 && dc != 0 {
            let vertical = Coord::new(to.row, from.col);
            let horizontal = Coord::new(from.row, to.col);
            if self.grid.is_obstacle(vertical) && self.grid.is_obstacle(horizontal) {
                return None;
            }
        }
        Some(to)
    }

    /// `PENALTY_FACTOR / distance` inside the inflation radius, zero beyond it
    fn wall_penalty(&self, field: &DistanceField, cell: Coord) -> f64 {
        match field.get(cell) {
            Some(distance) if distance <= self.inflation_radius => PENALTY_FACTOR / distance,
            _ => 0.0,
        }
    }

    fn reconstruct(nodes: &[PathNode], goal_idx: usize) -> SegmentPlan {
        let mut cells = Vec::new();
        let mut costs = Vec::new();
        let mut cursor = Some(goal_idx);
        while let Some(idx) = cursor {
            cells.push(nodes[idx].coord);
            costs.push(nodes[idx].cost);
            cursor = nodes[idx].parent;
        }
        cells.reverse();
        costs.reverse();
        SegmentPlan { cells, costs }
    }
}

/// Multi-waypoint path search with input validation
pub struct ConstrainedPathSearch<'a> {
    grid: &'a ConfigurationSpaceGrid,
    inflation_radius: f64,
}

impl<'a> ConstrainedPathSearch<'a> {
    /// `inflation_radius` is in cells
    pub fn new(grid: &'a ConfigurationSpaceGrid, inflation_radius: f64) -> Self {
        ConstrainedPathSearch {
            grid,
            inflation_radius,
        }
    }

    /// Path through every waypoint in order.
    ///
    /// `Err` for bad input (fewer than two waypoints, a waypoint off the grid or
    /// on an obstacle, a distance field of the wrong shape). `Ok(None)` when any
    /// leg has no path.
    pub fn find_path(
        &self,
        waypoints: &[Coord],
        field: &DistanceField,
    ) -> Result<Option<Path>, NavigationError> {
        if waypoints.len() < 2 {
            return Err(NavigationError::InvalidInput(format!(
                "Path needs at least two points, got {}",
                waypoints.len()
            )));
        }
        self.check_field(field)?;
        for &point in waypoints {
            self.check_waypoint(point)?;
        }

        let search = AStarSearch::new(self.grid, self.inflation_radius);
        let mut cells: Vec<Coord> = Vec::new();
        for (leg, pair) in waypoints.windows(2).enumerate() {
            let Some(plan) = search.search(pair[0], pair[1], field) else {
                info!("No path on leg {} from {} to {}", leg, pair[0], pair[1]);
                return Ok(None);
            };
            // Each leg starts where the previous one ended
            let skip = if cells.is_empty() { 0 } else { 1 };
            cells.extend(plan.cells.into_iter().skip(skip));
        }

        info!("Found path with {} cells through {} waypoints", cells.len(), waypoints.len());
        Ok(Some(Path::new(cells)))
    }

    /// Single leg with the same validation as `find_path`, keeping node costs
    pub fn search_segment(
        &self,
        start: Coord,
        goal: Coord,
        field: &DistanceField,
    ) -> Result<Option<SegmentPlan>, NavigationError> {
        self.check_field(field)?;
        self.check_waypoint(start)?;
        self.check_waypoint(goal)?;
        Ok(AStarSearch::new(self.grid, self.inflation_radius).search(start, goal, field))
    }

    fn check_waypoint(&self, point: Coord) -> Result<(), NavigationError> {
        match self.grid.get(point) {
            None => Err(NavigationError::InvalidInput(format!(
                "The point {} is outside the {}x{} grid",
                point,
                self.grid.rows(),
                self.grid.cols()
            ))),
            Some(cell) if cell.is_obstacle() => Err(NavigationError::InvalidInput(format!(
                "The point {} is a wall",
                point
            ))),
            Some(_) => Ok(()),
        }
    }

    fn check_field(&self, field: &DistanceField) -> Result<(), NavigationError> {
        if field.rows() != self.grid.rows() || field.cols() != self.grid.cols() {
            return Err(NavigationError::InvalidInput(format!(
                "Distance field is {}x{} but grid is {}x{}",
                field.rows(),
                field.cols(),
                self.grid.rows(),
                self.grid.cols()
            )));
        }
        Ok(())
    }
}
