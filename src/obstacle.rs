use glam::Vec2;

/// Closed polygon in world coordinates, used to reject spawn positions and as
/// an extra steer-away boundary during the update. The authoring side that
/// bakes curves into vertices is not this crate's concern.
#[derive(Clone, Debug)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Even-odd ray-cast point-in-polygon test. Degenerate polygons with
    /// fewer than three vertices contain nothing.
    pub fn contains(&self, p: Vec2) -> bool {
        if self.points.len() < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let t = (p.y - a.y) / (b.y - a.y);
                if p.x < a.x + t * (b.x - a.x) {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}
