use glam::Vec2;

/// Oracle over a fixed guide curve. The boid update only ever asks for the
/// nearest arc-length offset to a point and a sample some distance further
/// along; how the curve is authored or baked is the oracle's business, as is
/// wrapping at the curve ends.
pub trait PathOracle: Sync {
    /// Arc-length offset of the curve point nearest to `point`.
    fn closest_offset(&self, point: Vec2) -> f32;

    /// Total arc length of the curve.
    fn total_length(&self) -> f32;

    /// Point on the curve at `offset`, wrapping out-of-range offsets.
    fn sample(&self, offset: f32) -> Vec2;
}

/// Closed polyline path: the segment from the last point back to the first is
/// part of the loop. Good enough for the headless runner and the tests; a
/// real curve baker can implement [`PathOracle`] directly.
#[derive(Clone, Debug)]
pub struct PolylinePath {
    points: Vec<Vec2>,
    /// cumulative[i] is the arc length at the start of segment i.
    cumulative: Vec<f32>,
    total: f32,
}

impl PolylinePath {
    pub fn new(points: Vec<Vec2>) -> Self {
        let n = points.len();
        let mut cumulative = Vec::with_capacity(n);
        let mut total = 0.0;
        for i in 0..n {
            cumulative.push(total);
            total += points[i].distance(points[(i + 1) % n]);
        }
        Self {
            points,
            cumulative,
            total,
        }
    }

    /// A regular polygon approximating a circle, handy as a default loop.
    pub fn ring(center: Vec2, radius: f32, segments: usize) -> Self {
        let segments = segments.max(3);
        let points = (0..segments)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / segments as f32;
                center + Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();
        Self::new(points)
    }

    fn segment(&self, i: usize) -> (Vec2, Vec2) {
        let n = self.points.len();
        (self.points[i], self.points[(i + 1) % n])
    }
}

impl PathOracle for PolylinePath {
    fn closest_offset(&self, point: Vec2) -> f32 {
        if self.points.len() < 2 {
            return 0.0;
        }

        let mut best_offset = 0.0;
        let mut best_dist_sq = f32::MAX;
        for i in 0..self.points.len() {
            let (a, b) = self.segment(i);
            let ab = b - a;
            let len_sq = ab.length_squared();
            let t = if len_sq > 0.0 {
                ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let candidate = a + ab * t;
            let dist_sq = point.distance_squared(candidate);
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best_offset = self.cumulative[i] + len_sq.sqrt() * t;
            }
        }
        best_offset
    }

    fn total_length(&self) -> f32 {
        self.total
    }

    fn sample(&self, offset: f32) -> Vec2 {
        match self.points.len() {
            0 => return Vec2::ZERO,
            1 => return self.points[0],
            _ => {}
        }
        if self.total <= 0.0 {
            return self.points[0];
        }

        let offset = offset.rem_euclid(self.total);
        // Last segment whose start offset is <= the target.
        let i = match self
            .cumulative
            .iter()
            .rposition(|&start| start <= offset)
        {
            Some(i) => i,
            None => 0,
        };
        let (a, b) = self.segment(i);
        let seg_len = a.distance(b);
        if seg_len <= 0.0 {
            return a;
        }
        let t = (offset - self.cumulative[i]) / seg_len;
        a.lerp(b, t.clamp(0.0, 1.0))
    }
}
