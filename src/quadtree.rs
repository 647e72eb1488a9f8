use glam::Vec2;

use crate::math::{Positioned, Rect};

/// Node arena index.
pub type NodeId = usize;

#[derive(Debug)]
pub struct Node {
    pub boundary: Rect,
    /// Item handle + position captured at insertion time.
    pub items: Vec<(usize, Vec2)>,
    /// Child nodes in canonical NE, SE, SW, NW order, allocated on first overflow.
    pub children: Option<[NodeId; 4]>,
}

/// Bucketed quad-tree over 2D points, rebuilt from scratch every tick.
///
/// Nodes live in a flat arena and address their children by index, so tearing
/// the whole tree down is a single `Vec` drop. Items overflowing a node are
/// routed into the first child whose boundary contains them; items already
/// stored at the parent are not redistributed after a subdivision, which is
/// sound because no tree outlives the tick it was built for.
#[derive(Debug)]
pub struct QuadTree {
    pub nodes: Vec<Node>,
    capacity: usize,
}

impl QuadTree {
    pub fn new(boundary: Rect, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            nodes: vec![Node {
                boundary,
                items: Vec::with_capacity(capacity),
                children: None,
            }],
            capacity,
        }
    }

    /// Builds a tree over every item of `items`, keyed by slice index.
    /// Items outside `boundary` are silently absent from the tree.
    pub fn build<T: Positioned>(boundary: Rect, capacity: usize, items: &[T]) -> Self {
        let mut tree = Self::new(boundary, capacity);
        for (idx, item) in items.iter().enumerate() {
            tree.insert(idx, item.position());
        }
        tree
    }

    pub fn boundary(&self) -> Rect {
        self.nodes[0].boundary
    }

    /// Inserts an item handle at `pos`. Returns `false` without effect when
    /// `pos` lies outside the root boundary.
    pub fn insert(&mut self, item: usize, pos: Vec2) -> bool {
        self.insert_at(0, item, pos)
    }

    fn insert_at(&mut self, node: NodeId, item: usize, pos: Vec2) -> bool {
        if !self.nodes[node].boundary.contains(pos) {
            return false;
        }

        if self.nodes[node].items.len() < self.capacity {
            self.nodes[node].items.push((item, pos));
            return true;
        }

        let children = match self.nodes[node].children {
            Some(children) => children,
            None => self.subdivide(node),
        };

        for child in children {
            if self.insert_at(child, item, pos) {
                return true;
            }
        }
        // Unreachable with correct subdivision geometry: the children tile the
        // parent exactly. Reported rather than trapped regardless.
        false
    }

    fn subdivide(&mut self, node: NodeId) -> [NodeId; 4] {
        let parent = self.nodes[node].boundary;
        let quarter = parent.half * 0.5;
        // NE, SE, SW, NW with y growing downward.
        let centers = [
            parent.center + Vec2::new(quarter.x, -quarter.y),
            parent.center + Vec2::new(quarter.x, quarter.y),
            parent.center + Vec2::new(-quarter.x, quarter.y),
            parent.center + Vec2::new(-quarter.x, -quarter.y),
        ];

        let mut ids = [0; 4];
        for (slot, center) in ids.iter_mut().zip(centers) {
            self.nodes.push(Node {
                boundary: Rect {
                    center,
                    half: quarter,
                },
                items: Vec::with_capacity(self.capacity),
                children: None,
            });
            *slot = self.nodes.len() - 1;
        }
        self.nodes[node].children = Some(ids);
        ids
    }

    /// All item handles with squared distance `< r*r` from `center`.
    ///
    /// Result order is unspecified. An item sharing the exact query
    /// coordinates is a valid result; callers wanting to exclude themselves
    /// must filter by identity, not by position.
    pub fn query_radius(&self, center: Vec2, r: f32) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_radius_at(0, center, r, &mut out);
        out
    }

    fn query_radius_at(&self, node: NodeId, center: Vec2, r: f32, out: &mut Vec<usize>) {
        let node = &self.nodes[node];
        if !node.boundary.overlaps_circle(center, r) {
            return;
        }

        let r_sq = r * r;
        for &(item, pos) in &node.items {
            if pos.distance_squared(center) < r_sq {
                out.push(item);
            }
        }

        if let Some(children) = node.children {
            for child in children {
                self.query_radius_at(child, center, r, out);
            }
        }
    }

    /// All item handles whose position lies inside `rect`.
    pub fn query_rect(&self, rect: Rect) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_rect_at(0, rect, &mut out);
        out
    }

    fn query_rect_at(&self, node: NodeId, rect: Rect, out: &mut Vec<usize>) {
        let node = &self.nodes[node];
        if !node.boundary.intersects(&rect) {
            return;
        }

        for &(item, pos) in &node.items {
            if rect.contains(pos) {
                out.push(item);
            }
        }

        if let Some(children) = node.children {
            for child in children {
                self.query_rect_at(child, rect, out);
            }
        }
    }

    /// Total number of stored items.
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| n.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.items.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_area() -> Rect {
        Rect::from_origin(Vec2::ZERO, Vec2::new(100.0, 100.0))
    }

    #[test]
    fn insert_and_query_radius_finds_nearby() {
        let mut tree = QuadTree::new(unit_area(), 10);
        assert!(tree.insert(0, Vec2::new(10.0, 10.0)));
        assert!(tree.insert(1, Vec2::new(12.0, 10.0)));
        assert!(tree.insert(2, Vec2::new(90.0, 90.0)));

        let results = tree.query_radius(Vec2::new(11.0, 10.0), 5.0);
        assert!(results.contains(&0), "should find item 0");
        assert!(results.contains(&1), "should find item 1");
        assert!(!results.contains(&2), "should NOT find distant item 2");
    }

    #[test]
    fn insert_outside_boundary_is_rejected() {
        let mut tree = QuadTree::new(unit_area(), 10);
        assert!(!tree.insert(0, Vec2::new(150.0, 50.0)));
        assert!(!tree.insert(1, Vec2::new(50.0, -1.0)));
        assert!(tree.is_empty());
    }

    #[test]
    fn overflow_subdivides_exactly_once() {
        let mut tree = QuadTree::new(unit_area(), 10);
        // All 11 points in the NW quadrant of the boundary.
        for i in 0..11 {
            let pos = Vec2::new(5.0 + i as f32, 5.0);
            assert!(tree.insert(i, pos));
        }
        assert_eq!(tree.nodes.len(), 5, "root + four children");
        assert_eq!(tree.len(), 11);

        let all = tree.query_rect(unit_area());
        assert_eq!(all.len(), 11, "every point retrievable via rect query");
    }

    #[test]
    fn overflowing_items_stay_at_the_parent() {
        let mut tree = QuadTree::new(unit_area(), 2);
        for i in 0..3 {
            tree.insert(i, Vec2::new(10.0, 10.0 + i as f32));
        }
        assert_eq!(tree.nodes[0].items.len(), 2);
        let child_total: usize = tree.nodes[1..].iter().map(|n| n.items.len()).sum();
        assert_eq!(child_total, 1);
    }

    #[test]
    fn radius_query_excludes_boundary_distance() {
        let mut tree = QuadTree::new(unit_area(), 10);
        tree.insert(0, Vec2::new(50.0, 50.0));
        tree.insert(1, Vec2::new(55.0, 50.0));

        // Strict inequality: a point exactly r away is not a hit.
        let results = tree.query_radius(Vec2::new(50.0, 50.0), 5.0);
        assert!(results.contains(&0));
        assert!(!results.contains(&1));
    }

    #[test]
    fn coincident_point_is_a_valid_query_result() {
        let mut tree = QuadTree::new(unit_area(), 10);
        tree.insert(0, Vec2::new(30.0, 30.0));
        tree.insert(1, Vec2::new(30.0, 30.0));

        let results = tree.query_radius(Vec2::new(30.0, 30.0), 1.0);
        assert!(results.contains(&0));
        assert!(results.contains(&1));
    }

    #[test]
    fn rect_query_respects_rect_bounds() {
        let mut tree = QuadTree::new(unit_area(), 4);
        for i in 0..20 {
            tree.insert(i, Vec2::new(5.0 * i as f32, 5.0 * i as f32));
        }
        let window = Rect::from_origin(Vec2::ZERO, Vec2::new(26.0, 26.0));
        let mut hits = tree.query_rect(window);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1, 2, 3, 4, 5]);
    }
}
