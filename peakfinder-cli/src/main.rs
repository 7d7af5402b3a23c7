use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use log::info;
use peakfinder_core::{Drone, MissionConfig, MoveStrategyType, Point2, SharedTerrain};

/// Fly a simulated drone to the nearest peak while keeping sensor costs low.
#[derive(Parser, Debug)]
#[command(name = "peakfinder", version, about, long_about = None)]
struct Args {
    /// Mission configuration (TOML). Defaults apply to anything missing.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Move strategy preset, e.g. climb-move-1 or binary-search
    #[arg(short, long)]
    strategy: Option<MoveStrategyType>,

    /// Start point as x,y
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    start: Option<Point2>,

    /// Seed for the generated peak field
    #[arg(long)]
    seed: Option<u64>,

    /// Write the visited path with per-point scan costs as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn parse_point(text: &str) -> Result<Point2, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {text:?}"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in {text:?}: {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in {text:?}: {e}"))?;
    Ok(Point2::new(x, y))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            info!("loading mission from {}", path.display());
            MissionConfig::load(path)?
        }
        None => MissionConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(start) = args.start {
        config.start = start;
    }
    if let Some(seed) = args.seed {
        config.terrain.reseed(seed);
    }

    let terrain = config.build_terrain()?;
    if let Some((width, height)) = terrain.width_and_height() {
        info!("terrain is {width}x{height} cells");
    }
    let terrain: SharedTerrain = Arc::new(terrain);

    let mut drone = Drone::from_config(&config, &terrain);
    let visited = drone.navigate_to_destination(config.start)?;

    let navigator = drone.navigator();
    println!("strategy: {}", navigator.strategy().name());
    for (step, waypoint) in visited.iter().enumerate() {
        let z = waypoint
            .z()
            .map_or_else(|| "?".to_string(), |z| z.to_string());
        let cost = navigator.scan_cost_at(waypoint.point).unwrap_or(0);
        println!(
            "{step:>5}  ({:>4}, {:>4})  z={z:<4} scan cost {cost}",
            waypoint.point.x, waypoint.point.y
        );
    }
    match navigator.found() {
        Some(destination) => println!("destination: ({}, {})", destination.x, destination.y),
        None => println!("destination: none"),
    }
    println!("total scan cost: {}", navigator.total_scan_cost());
    for (index, sensor) in drone.sensors().iter().enumerate() {
        let usage = sensor.usage();
        println!(
            "sensor {index}: {} activations, {} cells, cost {}",
            usage.power_on_count, usage.scan_point_count, usage.total_cost
        );
    }

    if let Some(path) = &args.json {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &navigator.path_record())?;
        info!("wrote path to {}", path.display());
    }
    Ok(())
}
