use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use tracing::info;
use tracing_subscriber::EnvFilter;

use murmuration::{PolylinePath, Swarm, SwarmConfig};

#[derive(Parser, Debug)]
#[command(name = "murmuration", about = "Headless flocking simulation runner")]
struct Args {
    /// Configuration file; a default one is written if missing.
    #[arg(long, default_value = "murmuration.toml")]
    config: PathBuf,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Override the configured agent count.
    #[arg(long)]
    agents: Option<usize>,

    /// Override the configured RNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut config = SwarmConfig::load_or_default(&args.config);
    if let Some(agents) = args.agents {
        config.world.agent_count = agents;
    }
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let area_center = Vec2::new(
        config.world.origin_x + config.world.width * 0.5,
        config.world.origin_y + config.world.height * 0.5,
    );
    let radius = config.world.width.min(config.world.height) * 0.35;
    let path = PolylinePath::ring(area_center, radius, 64);

    let mut swarm = Swarm::new(config, None)?;
    info!(
        agents = swarm.boids().len(),
        seed = swarm.seed(),
        ticks = args.ticks,
        "starting simulation"
    );

    // Drop a marker on the loop so the flock has something to chase.
    swarm.place_food(area_center + Vec2::new(radius, 0.0));

    let mut bites = 0u64;
    for _ in 0..args.ticks {
        let events = swarm.tick(Some(&path));
        bites += events
            .iter()
            .filter(|e| matches!(e, murmuration::SwarmEvent::FoodEaten { .. }))
            .count() as u64;

        if swarm.current_tick() % 100 == 0 {
            let centroid = swarm
                .boids()
                .iter()
                .map(|b| b.position)
                .sum::<Vec2>()
                / swarm.boids().len().max(1) as f32;
            info!(
                tick = swarm.current_tick(),
                centroid_x = centroid.x,
                centroid_y = centroid.y,
                food = swarm.food().len(),
                bites,
                "tick summary"
            );
        }
    }

    info!(ticks = swarm.current_tick(), bites, "simulation finished");
    Ok(())
}
