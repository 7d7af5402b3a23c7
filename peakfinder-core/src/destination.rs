use crate::coordinates::Point2;
use crate::height_map::KnownHeightMap;

pub trait Destination {
    fn radius_needed_to_check(&self) -> u32;

    fn is_destination(&self, map: &KnownHeightMap, point: Point2) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionPoint {
    radius: u32,
}

impl ExtractionPoint {
    pub fn new() -> Self {
        Self::with_radius(1)
    }

    pub fn with_radius(radius: u32) -> Self {
        Self { radius }
    }
}

impl Default for ExtractionPoint {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for ExtractionPoint {
    fn radius_needed_to_check(&self) -> u32 {
        self.radius
    }

    fn is_destination(&self, map: &KnownHeightMap, point: Point2) -> bool {
        map.is_highest_or_tie_and_all_known(point, self.radius)
    }
}
