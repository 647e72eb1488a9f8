use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::boid::{self, Boid, StepContext, StepResult};
use crate::config::SwarmConfig;
use crate::food::FoodMarker;
use crate::math::Rect;
use crate::obstacle::Polygon;
use crate::path::PathOracle;
use crate::quadtree::QuadTree;

/// Things that happened during a tick, for an external visual layer to react
/// to (dropping an expired marker's sprite, scoring a bite).
#[derive(Clone, Debug, PartialEq)]
pub enum SwarmEvent {
    FoodExpired { position: Vec2 },
    FoodEaten { marker: usize, agent: u32 },
}

/// Owns the agent collection, the spatial index and the food markers, and
/// drives the per-tick cycle: parallel update, index rebuild, food aging.
pub struct Swarm {
    config: SwarmConfig,
    area: Rect,
    boids: Vec<Boid>,
    index: QuadTree,
    food: Vec<FoodMarker>,
    obstacle: Option<Polygon>,
    tick: u64,
    seed: u64,
}

impl Swarm {
    /// Spawns `agent_count` boids at random positions inside the play-area,
    /// rejecting positions inside the obstacle polygon, and builds the
    /// initial index.
    pub fn new(config: SwarmConfig, obstacle: Option<Polygon>) -> anyhow::Result<Self> {
        config.validate()?;

        let w = &config.world;
        let area = Rect::from_origin(
            Vec2::new(w.origin_x, w.origin_y),
            Vec2::new(w.width, w.height),
        );
        let seed = w.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut boids = Vec::with_capacity(w.agent_count);
        for id in 0..w.agent_count as u32 {
            let pos = spawn_position(area, obstacle.as_ref(), &mut rng);
            boids.push(Boid::new(id, pos));
        }

        let index = QuadTree::build(area, w.index_capacity, &boids);
        debug!(agents = boids.len(), seed, "swarm spawned");

        Ok(Self {
            config,
            area,
            boids,
            index,
            food: Vec::new(),
            obstacle,
            tick: 0,
            seed,
        })
    }

    /// Advances the simulation by one tick.
    ///
    /// Phases, in order:
    /// 1. Parallel per-agent update against a read-only snapshot of last
    ///    tick's index and food list. Every agent observes last tick's
    ///    positions, so the pass is order-independent. Each agent gets its
    ///    own RNG stream derived from the root seed, the tick number and its
    ///    id, keeping runs reproducible under any thread schedule.
    /// 2. Sequential apply: commit kinematics and reduce the per-agent
    ///    "marker eaten" side outputs into bite increments.
    /// 3. Single-threaded index rebuild from the new positions.
    /// 4. Food aging and expiry.
    ///
    /// Returns the events of this tick.
    pub fn tick(&mut self, path: Option<&dyn PathOracle>) -> Vec<SwarmEvent> {
        self.tick += 1;
        let tick = self.tick;
        let seed = self.seed;

        let ctx = StepContext {
            index: &self.index,
            boids: &self.boids,
            path,
            food: &self.food,
            obstacle: self.obstacle.as_ref(),
            area: self.area,
            forces: &self.config.forces,
            food_cfg: &self.config.food,
        };

        let results: Vec<StepResult> = self
            .boids
            .par_iter()
            .map(|b| {
                let mut rng = ChaCha8Rng::seed_from_u64(agent_stream_seed(seed, tick, b.id));
                boid::step(b, &ctx, &mut rng)
            })
            .collect();

        let mut events = Vec::new();
        for (b, result) in self.boids.iter_mut().zip(results) {
            b.acceleration = result.acceleration;
            b.velocity = result.velocity;
            b.position = result.position;
            if let Some(marker) = result.ate {
                self.food[marker].bites += 1;
                events.push(SwarmEvent::FoodEaten {
                    marker,
                    agent: b.id,
                });
            }
        }

        self.index = QuadTree::build(self.area, self.config.world.index_capacity, &self.boids);

        let lifetime = self.config.food.lifetime;
        let mut i = 0;
        while i < self.food.len() {
            self.food[i].age += 1;
            if self.food[i].age >= lifetime {
                let expired = self.food.remove(i);
                events.push(SwarmEvent::FoodExpired {
                    position: expired.position,
                });
            } else {
                i += 1;
            }
        }

        events
    }

    /// Appends a food marker at `position`. A point outside the play-area is
    /// a no-op, reported via the return value. Must be called between ticks.
    pub fn place_food(&mut self, position: Vec2) -> bool {
        if !self.area.contains(position) {
            return false;
        }
        self.food.push(FoodMarker::new(position));
        true
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn food(&self) -> &[FoodMarker] {
        &self.food
    }

    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Per-agent deterministic RNG stream. Mixing the tick and the id into the
/// root seed gives every agent a fresh stream every tick without any shared
/// generator on the hot path.
fn agent_stream_seed(root: u64, tick: u64, id: u32) -> u64 {
    root.wrapping_add(tick.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add((id as u64).wrapping_mul(0x5EED))
}

fn spawn_position(area: Rect, obstacle: Option<&Polygon>, rng: &mut ChaCha8Rng) -> Vec2 {
    let min = area.min();
    let max = area.max();
    let mut sample =
        |rng: &mut ChaCha8Rng| Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y));

    let mut pos = sample(rng);
    if let Some(poly) = obstacle {
        let mut attempts = 0;
        while poly.contains(pos) && attempts < 1000 {
            pos = sample(rng);
            attempts += 1;
        }
        if poly.contains(pos) {
            warn!("obstacle covers the play-area, spawning inside it");
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_seeds_differ_per_agent_and_tick() {
        let a = agent_stream_seed(42, 1, 0);
        let b = agent_stream_seed(42, 1, 1);
        let c = agent_stream_seed(42, 2, 0);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, agent_stream_seed(42, 1, 0));
    }

    #[test]
    fn place_food_rejects_points_outside_the_area() {
        let mut config = SwarmConfig::default();
        config.world.agent_count = 1;
        config.world.seed = Some(9);
        let mut swarm = Swarm::new(config, None).expect("valid config");

        assert!(swarm.place_food(Vec2::new(10.0, 10.0)));
        assert!(!swarm.place_food(Vec2::new(-10.0, 10.0)));
        assert_eq!(swarm.food().len(), 1);
    }
}
