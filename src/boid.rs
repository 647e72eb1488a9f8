use glam::Vec2;
use rand::Rng;

use crate::config::{FoodConfig, ForcesConfig};
use crate::food::FoodMarker;
use crate::math::{self, Positioned, Rect};
use crate::obstacle::Polygon;
use crate::path::PathOracle;
use crate::quadtree::QuadTree;

/// An autonomous flocking agent. The id is stable across ticks and exists to
/// address an external visual and to exclude the agent from its own neighbor
/// query; the steering math never looks at it.
#[derive(Clone, Debug)]
pub struct Boid {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
}

impl Boid {
    pub fn new(id: u32, position: Vec2) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
        }
    }

    /// Heading angle for the visual layer.
    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }
}

impl Positioned for Boid {
    fn position(&self) -> Vec2 {
        self.position
    }
}

/// Everything a boid reads during one tick. All references point at last
/// tick's committed state, so the parallel phase shares this immutably.
pub struct StepContext<'a> {
    pub index: &'a QuadTree,
    pub boids: &'a [Boid],
    pub path: Option<&'a dyn PathOracle>,
    pub food: &'a [FoodMarker],
    pub obstacle: Option<&'a Polygon>,
    pub area: Rect,
    pub forces: &'a ForcesConfig,
    pub food_cfg: &'a FoodConfig,
}

/// Result of one boid's update, applied after the parallel phase joins.
#[derive(Clone, Debug)]
pub struct StepResult {
    pub acceleration: Vec2,
    pub velocity: Vec2,
    pub position: Vec2,
    /// Index of the marker this boid took a bite of, if any. The increment
    /// itself happens single-threaded after the join.
    pub ate: Option<usize>,
}

/// Computes one boid's next kinematic state.
///
/// Pure with respect to the shared context; the only state it draws on
/// besides `boid` is the caller-provided RNG, so identical inputs and seeds
/// reproduce identical trajectories.
pub fn step<R: Rng>(boid: &Boid, ctx: &StepContext<'_>, rng: &mut R) -> StepResult {
    let f = ctx.forces;

    // Neighbor gather over last tick's index. Self shows up in its own query
    // and is excluded by id, never by coordinate comparison.
    let flock = ctx.index.query_radius(boid.position, f.large_range);
    let close_sq = f.close_range * f.close_range;

    let mut vel_sum = Vec2::ZERO;
    let mut pos_sum = Vec2::ZERO;
    let mut others = 0u32;
    let mut close_sum = Vec2::ZERO;
    let mut close_count = 0u32;

    for idx in flock {
        let other = &ctx.boids[idx];
        if other.id == boid.id {
            continue;
        }
        vel_sum += other.velocity;
        pos_sum += other.position;
        others += 1;
        if boid.position.distance_squared(other.position) < close_sq {
            close_sum += other.position;
            close_count += 1;
        }
    }

    // An empty flock defaults both averages to the boid's own state: the
    // alignment and cohesion terms then normalize to zero instead of
    // dividing by zero or pulling toward the origin.
    let (avg_vel, avg_pos) = if others > 0 {
        (vel_sum / others as f32, pos_sum / others as f32)
    } else {
        (boid.velocity, boid.position)
    };

    let path_target = ctx.path.map(|path| {
        let lookahead = f.lookahead_fraction * path.total_length();
        path.sample(path.closest_offset(boid.position) + lookahead)
    });

    // Nearest in-range marker wins the attraction term; scanned in storage
    // order so equal distances resolve to the earlier marker.
    let detection_sq = ctx.food_cfg.detection_radius * ctx.food_cfg.detection_radius;
    let eat_sq = ctx.food_cfg.eat_radius * ctx.food_cfg.eat_radius;
    let mut nearest_food: Option<(usize, f32)> = None;
    for (i, marker) in ctx.food.iter().enumerate() {
        let dist_sq = boid.position.distance_squared(marker.position);
        if dist_sq >= detection_sq {
            continue;
        }
        if nearest_food.map_or(true, |(_, best)| dist_sq < best) {
            nearest_food = Some((i, dist_sq));
        }
    }
    let ate = nearest_food
        .filter(|&(_, dist_sq)| dist_sq < eat_sq)
        .map(|(i, _)| i);

    // Force composition. Every normalize here is zero-safe.
    let mut acc = (avg_vel - boid.velocity).normalize_or_zero() * f.velocity_alignment
        + (avg_pos - boid.position).normalize_or_zero() * f.position_alignment
        + math::random_unit(rng) * f.random_strength;
    if let Some(target) = path_target {
        acc += (target - boid.position).normalize_or_zero() * f.path_alignment;
    }
    if close_count > 0 {
        let avg_close = close_sum / close_count as f32;
        acc -= (avg_close - boid.position).normalize_or_zero() * f.avoid_strength;
    }
    if let Some((i, _)) = nearest_food {
        acc += (ctx.food[i].position - boid.position).normalize_or_zero()
            * ctx.food_cfg.attraction_strength;
    }

    // Soft boundary: the offending axis component is overridden (not added
    // to) so it points inward, measured against the explicit area origin.
    let min = ctx.area.min();
    let max = ctx.area.max();
    if boid.position.x < min.x + f.margin {
        acc.x = acc.x.abs() * f.margin_steer;
    }
    if boid.position.y < min.y + f.margin {
        acc.y = acc.y.abs() * f.margin_steer;
    }
    if boid.position.x > max.x - f.margin {
        acc.x = -acc.x.abs() * f.margin_steer;
    }
    if boid.position.y > max.y - f.margin {
        acc.y = -acc.y.abs() * f.margin_steer;
    }
    if let Some(poly) = ctx.obstacle {
        steer_axes(&mut acc, boid.position, poly, f.margin, f.margin_steer);
    }

    // Velocity integration: fixed-magnitude acceleration on top of decayed
    // velocity, then a per-axis clamp.
    let acc = math::set_magnitude(acc, f.acc_strength);
    let mut vel = boid.velocity * f.velocity_decay + acc;
    vel = math::clamp_axis(vel, -f.max_vel, f.max_vel);

    // Hard boundary: force the component sign strictly inward.
    if boid.position.x < min.x + f.critical_margin {
        vel.x = vel.x.abs();
    }
    if boid.position.y < min.y + f.critical_margin {
        vel.y = vel.y.abs();
    }
    if boid.position.x > max.x - f.critical_margin {
        vel.x = -vel.x.abs();
    }
    if boid.position.y > max.y - f.critical_margin {
        vel.y = -vel.y.abs();
    }
    if let Some(poly) = ctx.obstacle {
        steer_axes(&mut vel, boid.position, poly, f.critical_margin, 1.0);
    }

    // Position integration with the accumulated second-order term, then a
    // clamp back into the play-area.
    let mut pos = boid.position + vel + 0.5 * Vec2::new(acc.x * acc.x, acc.y * acc.y);
    pos = ctx.area.clamp_point(pos);

    StepResult {
        acceleration: acc,
        velocity: vel,
        position: pos,
        ate,
    }
}

/// Axis-wise obstacle probe: if the point displaced by `reach` along an axis
/// lands inside the polygon, that component of `v` is overridden to point
/// away from it.
fn steer_axes(v: &mut Vec2, pos: Vec2, poly: &Polygon, reach: f32, scale: f32) {
    if poly.contains(pos + Vec2::new(reach, 0.0)) {
        v.x = -v.x.abs() * scale;
    }
    if poly.contains(pos - Vec2::new(reach, 0.0)) {
        v.x = v.x.abs() * scale;
    }
    if poly.contains(pos + Vec2::new(0.0, reach)) {
        v.y = -v.y.abs() * scale;
    }
    if poly.contains(pos - Vec2::new(0.0, reach)) {
        v.y = v.y.abs() * scale;
    }
}
