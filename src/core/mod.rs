// core/mod.rs

// World-building stages: occupancy grid generation, configuration-space
// inflation, and edge-to-edge connectivity analysis. Each stage hands its grid
// forward by value; later stages only read it.

pub mod cspace;
pub mod generator;
pub mod grid;
pub mod regions;

// Re-export key types for a unified API
pub use cspace::{ConfigurationSpaceGrid, ConfigurationSpaceMapper};
pub use generator::{GenerationError, GridGenerator};
pub use grid::{Cell, Coord, OccupancyGrid};
pub use regions::{EdgeColumn, Region, RegionConnectivity};
