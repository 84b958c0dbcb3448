// src/main.rs
// Headless driver: generates worlds until one has a traversable left-to-right
// crossing, then reports it and optionally saves it.

// Usage: cave_worlds [config.yaml] [output.yaml]
use cave_worlds::{NearestObstacleField, WorldConfig, WorldPipeline};
use log::{debug, error, info};
use std::error::Error;

/// Main function to load configuration and run the generation loop.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for debugging
    env_logger::init();
    info!("Starting cave world generation...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::from_yaml_file(&path)?,
        None => WorldConfig::default(),
    };
    let output = args.next();

    let pipeline = WorldPipeline::new(config, NearestObstacleField)?;
    let generation = &pipeline.config().generation;
    info!(
        "Grid {}x{}, fill {:.2}, {} smoothing passes, seed {:?}",
        generation.rows,
        generation.cols,
        generation.fill_probability,
        generation.smooth_iterations,
        generation.seed
    );

    let world = match pipeline.run() {
        Ok(world) => world,
        Err(e) => {
            error!("World generation failed: {}", e);
            return Err(e.into());
        }
    };

    info!(
        "Found path! {} -> {} ({} cells, length {:.2})",
        world.start,
        world.goal,
        world.path.len(),
        world.path.length()
    );
    debug!("Occupancy grid:\n{}", world.occupancy);
    debug!("Configuration space:\n{}", world.cspace.as_grid());

    if let Some(path) = output {
        world.save(&path)?;
    }

    Ok(())
}
