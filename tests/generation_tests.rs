use cave_worlds::{Cell, Coord, GenerationError, GridGenerator, OccupancyGrid};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;

fn grid(picture: &str) -> OccupancyGrid {
    OccupancyGrid::from_ascii(picture).expect("valid picture")
}

#[rstest]
#[case(3, 3, 0.5, 0)]
#[case(10, 25, 0.27, 4)]
#[case(30, 30, 0.45, 5)]
#[case(40, 12, 0.0, 2)]
fn border_rows_are_always_walls(
    #[case] rows: usize,
    #[case] cols: usize,
    #[case] fill: f64,
    #[case] iterations: usize,
) {
    let generator = GridGenerator::new(rows, cols, fill, iterations).unwrap();
    for seed in 0..5 {
        let map = generator.generate_seeded(Some(seed));
        assert_eq!(map.rows(), rows);
        assert_eq!(map.cols(), cols);
        for col in 0..cols {
            assert_eq!(map.get(Coord::new(0, col)), Some(Cell::Obstacle));
            assert_eq!(map.get(Coord::new(rows - 1, col)), Some(Cell::Obstacle));
        }
    }
}

#[test]
fn smoothing_fills_dense_cells_in_small_fixture() {
    // The two free cells each see five walls
    let before = grid(
        "###
         .#.
         ###",
    );
    let after = GridGenerator::smooth(&before);
    assert_eq!(after, grid("###\n###\n###"));
}

#[test]
fn smoothing_applies_thresholds_against_the_previous_snapshot() {
    let before = grid(
        "#####
         ##...
         #..#.
         .....
         #####",
    );
    let after = GridGenerator::smooth(&before);

    // (2,3) has no wall neighbours and clears; (1,2) sees five walls and fills.
    // (1,3) sees four walls in the snapshot, so it stays free even though its
    // left neighbour fills during the same pass.
    let expected = grid(
        "#####
         ###..
         #....
         .....
         #####",
    );
    assert_eq!(after, expected);
    assert_eq!(GridGenerator::wall_neighbors(&before, Coord::new(1, 3)), 4);
    assert_eq!(GridGenerator::wall_neighbors(&before, Coord::new(1, 2)), 5);
    assert_eq!(GridGenerator::wall_neighbors(&before, Coord::new(2, 3)), 0);
}

#[test]
fn cells_in_the_neutral_band_keep_their_state() {
    let before = grid(
        "#####
         ##...
         #..#.
         .....
         #####",
    );
    let after = GridGenerator::smooth(&before);
    for coord in before.coords() {
        let walls = GridGenerator::wall_neighbors(&before, coord);
        match walls {
            0..=1 => assert_eq!(after.get(coord), Some(Cell::Free), "{}", coord),
            2..=4 => assert_eq!(after.get(coord), before.get(coord), "{}", coord),
            _ => assert_eq!(after.get(coord), Some(Cell::Obstacle), "{}", coord),
        }
    }
}

#[test]
fn same_seed_gives_identical_grids() {
    let generator = GridGenerator::new(40, 40, 0.35, 4).unwrap();
    let first = generator.generate_seeded(Some(2_422_863_611));
    let second = generator.generate_seeded(Some(2_422_863_611));
    assert_eq!(first, second);

    let other = generator.generate_seeded(Some(17));
    assert_ne!(first, other);
}

#[test]
fn explicit_rng_matches_seeded_generation() {
    let generator = GridGenerator::new(20, 25, 0.3, 3).unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    assert_eq!(generator.generate(&mut rng), generator.generate_seeded(Some(99)));
}

#[test]
fn zero_fill_leaves_only_the_border_rows() {
    let generator = GridGenerator::new(6, 8, 0.0, 0).unwrap();
    let map = generator.generate_seeded(Some(1));
    assert_eq!(map.obstacle_count(), 2 * 8);
}

#[test]
fn full_fill_blocks_everything() {
    let generator = GridGenerator::new(6, 8, 1.0, 3).unwrap();
    let map = generator.generate_seeded(Some(1));
    assert_eq!(map.obstacle_count(), 6 * 8);
}

#[rstest]
#[case(2, 5)]
#[case(5, 2)]
#[case(0, 0)]
fn undersized_grids_are_rejected(#[case] rows: usize, #[case] cols: usize) {
    assert_eq!(
        GridGenerator::new(rows, cols, 0.3, 4).unwrap_err(),
        GenerationError::InvalidDimensions { rows, cols }
    );
}

#[rstest]
#[case(-0.1)]
#[case(1.5)]
fn fill_probability_must_be_a_probability(#[case] fill: f64) {
    assert_eq!(
        GridGenerator::new(10, 10, fill, 4).unwrap_err(),
        GenerationError::InvalidFillProbability(fill)
    );
}
