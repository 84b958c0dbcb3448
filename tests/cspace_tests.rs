use cave_worlds::{Cell, ConfigurationSpaceMapper, Coord, GridGenerator, OccupancyGrid};
use rstest::rstest;

/// Reference check: free iff no obstacle within Chebyshev distance `radius`
fn footprint_is_clear(grid: &OccupancyGrid, centre: Coord, radius: usize) -> bool {
    grid.coords().all(|other| {
        let dr = centre.row.abs_diff(other.row);
        let dc = centre.col.abs_diff(other.col);
        dr > radius || dc > radius || grid.is_free(other)
    })
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
#[case(3)]
fn free_exactly_when_footprint_is_clear(#[case] radius: usize) {
    let generator = GridGenerator::new(18, 23, 0.2, 3).unwrap();
    for seed in [3, 11, 42] {
        let grid = generator.generate_seeded(Some(seed));
        let cspace = ConfigurationSpaceMapper::new(radius).map(&grid);
        assert_eq!(cspace.rows(), grid.rows());
        assert_eq!(cspace.cols(), grid.cols());
        assert_eq!(cspace.robot_radius(), radius);
        for coord in grid.coords() {
            assert_eq!(
                cspace.is_free(coord),
                footprint_is_clear(&grid, coord, radius),
                "radius {} seed {} at {}",
                radius,
                seed,
                coord
            );
        }
    }
}

#[test]
fn radius_zero_is_identity() {
    let grid = OccupancyGrid::from_ascii(
        "#####
         .#..#
         #####",
    )
    .unwrap();
    let cspace = ConfigurationSpaceMapper::new(0).map(&grid);
    assert_eq!(cspace.as_grid(), &grid);
}

#[test]
fn single_obstacle_grows_into_a_square() {
    let mut grid = OccupancyGrid::new(7, 7, Cell::Free);
    grid.set(Coord::new(3, 3), Cell::Obstacle);
    let cspace = ConfigurationSpaceMapper::new(1).map(&grid);

    let expected = OccupancyGrid::from_ascii(
        ".......
         .......
         ..###..
         ..###..
         ..###..
         .......
         .......",
    )
    .unwrap();
    assert_eq!(cspace.into_grid(), expected);
}

#[test]
fn corner_obstacle_is_clipped_at_the_grid_edge() {
    let mut grid = OccupancyGrid::new(5, 5, Cell::Free);
    grid.set(Coord::new(0, 0), Cell::Obstacle);
    let cspace = ConfigurationSpaceMapper::new(2).map(&grid);

    for coord in grid.coords() {
        let blocked = coord.row <= 2 && coord.col <= 2;
        assert_eq!(cspace.is_obstacle(coord), blocked, "{}", coord);
    }
}

#[test]
fn cells_beyond_the_edge_impose_no_constraint() {
    // Footprint is larger than the grid itself
    let grid = OccupancyGrid::new(4, 4, Cell::Free);
    let cspace = ConfigurationSpaceMapper::new(3).map(&grid);
    assert_eq!(cspace.as_grid().obstacle_count(), 0);
}
