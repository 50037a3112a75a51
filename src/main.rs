//! Headless steering demo
//!
//! Usage: `steering [scene.ron|scene.json] [config.ron] [ticks]`
//!
//! Runs the scene (the built-in chase scene when none is given) for a fixed
//! number of ticks and prints the final vehicle states as JSON.

use std::error::Error;

use steering::prelude::*;

const DEFAULT_TICKS: u64 = 600;

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);

    let scene = match args.next() {
        Some(path) => {
            log::info!("Loading scene from {path}");
            Scene::load(&path)?
        }
        None => Scene::demo(),
    };
    let config = match args.next() {
        Some(path) => SimConfig::load_ron(&path)?,
        None => SimConfig::default(),
    };
    let ticks = match args.next() {
        Some(count) => count.parse()?,
        None => DEFAULT_TICKS,
    };

    let mut simulation = Simulation::from_scene(config, &scene)?;
    simulation.run_fixed(ticks);

    println!("{}", serde_json::to_string_pretty(&simulation.vehicle_views())?);
    Ok(())
}
