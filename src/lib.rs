//! Flocking simulation core: boids steering under alignment, cohesion and
//! separation, following a guide curve, chasing transient food markers and
//! staying clear of the play-area edges and an optional polygonal obstacle.
//! The spatial index is rebuilt every tick; agent updates run data-parallel
//! over a read-only snapshot of the previous tick.

pub mod boid;
pub mod config;
pub mod food;
pub mod math;
pub mod obstacle;
pub mod path;
pub mod quadtree;
pub mod swarm;

pub use boid::Boid;
pub use config::SwarmConfig;
pub use food::FoodMarker;
pub use math::{Positioned, Rect};
pub use obstacle::Polygon;
pub use path::{PathOracle, PolylinePath};
pub use quadtree::QuadTree;
pub use swarm::{Swarm, SwarmEvent};
