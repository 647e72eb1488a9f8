use glam::Vec2;
use rand::Rng;

/// Anything with a 2D position can go into the spatial index.
pub trait Positioned {
    fn position(&self) -> Vec2;
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

/// Axis-aligned rectangle stored as center + half-extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Builds a rectangle from its minimum corner and size.
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin + size * 0.5, size)
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        !(b_min.x > a_max.x || b_max.x < a_min.x || b_min.y > a_max.y || b_max.y < a_min.y)
    }

    /// Conservative circle overlap test: the AABB expanded by `r` contains the
    /// circle's center. May report overlap for circles that only touch the
    /// expanded corners, which is fine for pruning.
    #[inline]
    pub fn overlaps_circle(&self, center: Vec2, r: f32) -> bool {
        let min = self.min();
        let max = self.max();
        center.x >= min.x - r && center.x <= max.x + r && center.y >= min.y - r && center.y <= max.y + r
    }

    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min(), self.max())
    }
}

/// Rescales `v` to length `mag`. The zero vector stays zero.
#[inline]
pub fn set_magnitude(v: Vec2, mag: f32) -> Vec2 {
    v.normalize_or_zero() * mag
}

/// Clamps each component of `v` independently into `[min, max]`.
#[inline]
pub fn clamp_axis(v: Vec2, min: f32, max: f32) -> Vec2 {
    v.clamp(Vec2::splat(min), Vec2::splat(max))
}

/// Uniformly distributed unit vector. Sampling an angle avoids the
/// normalize-a-zero-sample failure mode entirely.
pub fn random_unit<R: Rng>(rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn rect_contains_is_inclusive_on_edges() {
        let r = Rect::from_origin(Vec2::ZERO, Vec2::new(100.0, 50.0));
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(100.0, 50.0)));
        assert!(r.contains(Vec2::new(50.0, 25.0)));
        assert!(!r.contains(Vec2::new(100.1, 25.0)));
        assert!(!r.contains(Vec2::new(50.0, -0.1)));
    }

    #[test]
    fn rect_circle_overlap_expands_by_radius() {
        let r = Rect::from_origin(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert!(r.overlaps_circle(Vec2::new(12.0, 5.0), 3.0));
        assert!(!r.overlaps_circle(Vec2::new(14.0, 5.0), 3.0));
    }

    #[test]
    fn set_magnitude_of_zero_vector_is_zero() {
        assert_eq!(set_magnitude(Vec2::ZERO, 5.0), Vec2::ZERO);
        let v = set_magnitude(Vec2::new(3.0, 4.0), 10.0);
        assert!((v.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn clamp_axis_clamps_each_component() {
        let v = clamp_axis(Vec2::new(5.0, -3.0), -2.0, 2.0);
        assert_eq!(v, Vec2::new(2.0, -2.0));
    }

    #[test]
    fn random_unit_has_unit_length() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            let v = random_unit(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }
}
