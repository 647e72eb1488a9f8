use glam::Vec2;

/// A transient food marker placed by an external request.
///
/// Markers age once per tick and disappear when they reach the configured
/// lifetime. Being eaten only increments the bite counter (kept for scoring);
/// it never removes the marker.
#[derive(Clone, Debug, PartialEq)]
pub struct FoodMarker {
    pub position: Vec2,
    pub age: u32,
    pub bites: u32,
}

impl FoodMarker {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            age: 0,
            bites: 0,
        }
    }
}
