//! Cave Worlds - procedural test worlds for mobile robot navigation
//!
//! This library generates cave-like occupancy grids with a cellular automaton,
//! inflates them into the robot's configuration space, checks that the left
//! and right map edges are connected, and plans a turn-limited path across.

#![warn(unused_extern_crates)]

pub mod core;
pub mod navigation;

// Re-export commonly used items for easier access
pub use crate::core::{
    Cell, ConfigurationSpaceGrid, ConfigurationSpaceMapper, Coord, EdgeColumn, GenerationError,
    GridGenerator, OccupancyGrid, Region, RegionConnectivity,
};
pub use navigation::{
    ConstrainedPathSearch, DistanceField, DistanceFieldProvider, NavigationError,
    NearestObstacleField, Path,
};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::File;

/// Main configuration structure for world generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Terrain generation parameters
    pub generation: GenerationConfig,
    /// Robot footprint and inflation parameters
    pub robot: RobotConfig,
    /// Retry loop parameters
    pub pipeline: PipelineConfig,
}

/// Cellular automaton parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Chance that an interior cell starts as an obstacle
    pub fill_probability: f64,
    /// Number of smoothing passes
    pub smooth_iterations: usize,
    /// Master seed; OS entropy when absent
    pub seed: Option<u64>,
}

/// Robot geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Cells the footprint extends past the centre cell on each side
    pub footprint_radius: usize,
    /// Planner inflation radius in meters
    pub inflation_radius_m: f64,
    /// Map resolution in meters per cell
    pub map_resolution_m: f64,
}

/// Generation driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Attempts before giving up
    pub max_attempts: usize,
    /// Neighbourhood radius passed to the distance field provider
    pub distance_radius: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            rows: 30,
            cols: 30,
            fill_probability: 0.27,
            smooth_iterations: 4,
            seed: None,
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        RobotConfig {
            footprint_radius: 2,
            inflation_radius_m: 0.3,
            map_resolution_m: 0.15,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            max_attempts: 100,
            distance_radius: 3,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            generation: GenerationConfig::default(),
            robot: RobotConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl RobotConfig {
    /// Inflation radius translated from meters to whole cells
    pub fn inflation_radius_cells(&self) -> f64 {
        (self.inflation_radius_m / self.map_resolution_m).round()
    }
}

impl WorldConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, WorldGenError> {
        let file = File::open(path)?;
        let config: WorldConfig = serde_yaml::from_reader(file)?;
        info!("Loaded configuration from {}", path);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, WorldGenError> {
        let config: WorldConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to YAML
    pub fn to_yaml_string(&self) -> Result<String, WorldGenError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks values the individual stages do not validate themselves
    pub fn validate(&self) -> Result<(), WorldGenError> {
        if !(self.robot.map_resolution_m > 0.0) {
            return Err(WorldGenError::ConfigError(format!(
                "map_resolution_m must be positive, got {}",
                self.robot.map_resolution_m
            )));
        }
        if !(self.robot.inflation_radius_m >= 0.0) {
            return Err(WorldGenError::ConfigError(format!(
                "inflation_radius_m must not be negative, got {}",
                self.robot.inflation_radius_m
            )));
        }
        if self.pipeline.max_attempts == 0 {
            return Err(WorldGenError::ConfigError(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A world that passed connectivity and path checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedWorld {
    /// Seed of the accepted attempt
    pub seed: u64,
    /// Terrain
    pub occupancy: OccupancyGrid,
    /// Legal robot-centre cells
    pub cspace: ConfigurationSpaceGrid,
    /// Start cell in the left column
    pub start: Coord,
    /// Goal cell in the right column
    pub goal: Coord,
    /// Path from start to goal
    pub path: Path,
}

impl GeneratedWorld {
    /// Serializes the world to a YAML file
    pub fn save(&self, path: &str) -> Result<(), WorldGenError> {
        let file = File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        info!("Saved world (seed {}) to {}", self.seed, path);
        Ok(())
    }

    /// Loads a world from a YAML file
    pub fn load(path: &str) -> Result<Self, WorldGenError> {
        let file = File::open(path)?;
        let world: GeneratedWorld = serde_yaml::from_reader(file)?;
        world.check_shape()?;
        info!("Loaded world (seed {}) from {}", world.seed, path);
        Ok(world)
    }

    /// Both grids must agree on size and every path cell must lie inside them
    fn check_shape(&self) -> Result<(), WorldGenError> {
        let (rows, cols) = (self.occupancy.rows(), self.occupancy.cols());
        if self.cspace.rows() != rows || self.cspace.cols() != cols {
            return Err(WorldGenError::ConfigError(format!(
                "Configuration space is {}x{} but occupancy grid is {}x{}",
                self.cspace.rows(),
                self.cspace.cols(),
                rows,
                cols
            )));
        }
        let endpoints = [self.start, self.goal];
        if let Some(outside) = endpoints
            .iter()
            .chain(self.path.cells())
            .find(|coord| self.occupancy.get(**coord).is_none())
        {
            return Err(WorldGenError::ConfigError(format!(
                "Cell {} lies outside the {}x{} world",
                outside, rows, cols
            )));
        }
        Ok(())
    }
}

/// Result of a single generation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// Connected and pathable
    Accepted(GeneratedWorld),
    /// Left and right regions do not meet
    Disconnected,
    /// Regions meet but the constrained search found no path
    NoPath,
}

/// Generation driver: builds worlds until one is connected and pathable
pub struct WorldPipeline<P: DistanceFieldProvider> {
    config: WorldConfig,
    generator: GridGenerator,
    mapper: ConfigurationSpaceMapper,
    provider: P,
}

impl<P: DistanceFieldProvider> WorldPipeline<P> {
    /// Create a new pipeline with the given configuration and distance field source
    pub fn new(config: WorldConfig, provider: P) -> Result<Self, WorldGenError> {
        config.validate()?;
        let generation = &config.generation;
        let generator = GridGenerator::new(
            generation.rows,
            generation.cols,
            generation.fill_probability,
            generation.smooth_iterations,
        )?;
        let mapper = ConfigurationSpaceMapper::new(config.robot.footprint_radius);

        Ok(WorldPipeline {
            config,
            generator,
            mapper,
            provider,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Runs one attempt. All randomness in the attempt comes from `seed`.
    pub fn attempt(&self, seed: u64) -> Result<AttemptOutcome, WorldGenError> {
        let mut rng = StdRng::seed_from_u64(seed);

        let occupancy = self.generator.generate(&mut rng);
        let mut cspace = self.mapper.map(&occupancy);

        let (start_region, goal_region) = {
            let mut connectivity = RegionConnectivity::new(&mut cspace);
            let left = connectivity.largest_region_touching(EdgeColumn::Left, &mut rng);
            let right = connectivity.largest_region_touching(EdgeColumn::Right, &mut rng);
            (left, right)
        };

        if !RegionConnectivity::regions_connected(&start_region, &goal_region) {
            debug!("Seed {}: edge regions are not connected", seed);
            return Ok(AttemptOutcome::Disconnected);
        }

        let last_col = EdgeColumn::Right.index(cspace.cols());
        let start_rows = start_region.rows_in_column(0);
        let goal_rows = goal_region.rows_in_column(last_col);
        let (Some(&start_row), Some(&goal_row)) =
            (start_rows.choose(&mut rng), goal_rows.choose(&mut rng))
        else {
            return Ok(AttemptOutcome::Disconnected);
        };
        let start = Coord::new(start_row, 0);
        let goal = Coord::new(goal_row, last_col);
        info!("Seed {}: searching from {} to {}", seed, start, goal);

        let field = self
            .provider
            .distance_field(&cspace, self.config.pipeline.distance_radius);
        let search = ConstrainedPathSearch::new(&cspace, self.config.robot.inflation_radius_cells());
        let Some(path) = search.find_path(&[start, goal], &field)? else {
            debug!("Seed {}: no path found", seed);
            return Ok(AttemptOutcome::NoPath);
        };

        Ok(AttemptOutcome::Accepted(GeneratedWorld {
            seed,
            occupancy,
            cspace,
            start,
            goal,
            path,
        }))
    }

    /// Retries attempts with fresh seeds until one is accepted
    pub fn run(&self) -> Result<GeneratedWorld, WorldGenError> {
        let mut master = match self.config.generation.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        for attempt in 1..=self.config.pipeline.max_attempts {
            let seed: u64 = master.random();
            match self.attempt(seed)? {
                AttemptOutcome::Accepted(world) => {
                    info!(
                        "Accepted world on attempt {} (seed {}, path of {} cells)",
                        attempt,
                        seed,
                        world.path.len()
                    );
                    return Ok(world);
                }
                outcome => debug!("Attempt {} rejected: {:?}", attempt, outcome),
            }
        }

        Err(WorldGenError::AttemptsExhausted(
            self.config.pipeline.max_attempts,
        ))
    }
}

/// World generation error types
#[derive(Debug)]
pub enum WorldGenError {
    /// Invalid generation parameters
    Generation(GenerationError),
    /// Invalid path search input
    Navigation(NavigationError),
    /// Configuration error
    ConfigError(String),
    /// File system error
    Io(String),
    /// Every attempt was rejected
    AttemptsExhausted(usize),
}

impl std::fmt::Display for WorldGenError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            WorldGenError::Generation(e) => write!(f, "Generation error: {}", e),
            WorldGenError::Navigation(e) => write!(f, "Navigation error: {}", e),
            WorldGenError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            WorldGenError::Io(msg) => write!(f, "I/O error: {}", msg),
            WorldGenError::AttemptsExhausted(n) => {
                write!(f, "No usable world after {} attempts", n)
            }
        }
    }
}

impl std::error::Error for WorldGenError {}

impl From<GenerationError> for WorldGenError {
    fn from(e: GenerationError) -> Self {
        WorldGenError::Generation(e)
    }
}

impl From<NavigationError> for WorldGenError {
    fn from(e: NavigationError) -> Self {
        WorldGenError::Navigation(e)
    }
}

impl From<std::io::Error> for WorldGenError {
    fn from(e: std::io::Error) -> Self {
        WorldGenError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for WorldGenError {
    fn from(e: serde_yaml::Error) -> Self {
        WorldGenError::ConfigError(e.to_string())
    }
}
