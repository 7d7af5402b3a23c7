use log::debug;

use crate::coordinates::{Height, Point2};
use crate::error::NavigationError;
use crate::height_map::KnownHeightMap;
use crate::strategy::climb::ClimbStrategy;

/// Hill climbing with shrinking strides and bisection on overshoot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySearchStrategy {
    name: String,
    climb: ClimbStrategy,
    start_cardinal_step: i32,
    start_ordinal_step: i32,
    min_cardinal_step: i32,
    min_ordinal_step: i32,
    cardinal_step: i32,
    ordinal_step: i32,
    best: Option<(Point2, Height)>,
}

impl BinarySearchStrategy {
    pub fn new(name: impl Into<String>, cardinal_step: i32, ordinal_step: i32) -> Self {
        let name = name.into();
        let cardinal_step = cardinal_step.max(1);
        let ordinal_step = ordinal_step.max(1);
        Self {
            climb: ClimbStrategy::new(name.clone(), cardinal_step, ordinal_step),
            name,
            start_cardinal_step: cardinal_step,
            start_ordinal_step: ordinal_step,
            min_cardinal_step: 1,
            min_ordinal_step: 1,
            cardinal_step,
            ordinal_step,
            best: None,
        }
    }

    pub fn with_floors(mut self, min_cardinal_step: i32, min_ordinal_step: i32) -> Self {
        self.min_cardinal_step = min_cardinal_step.clamp(1, self.start_cardinal_step);
        self.min_ordinal_step = min_ordinal_step.clamp(1, self.start_ordinal_step);
        self
    }

    pub fn with_climb(mut self, climb: ClimbStrategy) -> Self {
        self.climb = climb;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> (i32, i32) {
        (self.cardinal_step, self.ordinal_step)
    }

    pub fn best(&self) -> Option<(Point2, Height)> {
        self.best
    }

    pub fn reset(&mut self) {
        self.cardinal_step = self.start_cardinal_step;
        self.ordinal_step = self.start_ordinal_step;
        self.best = None;
    }

    pub fn next_point(
        &mut self,
        map: &KnownHeightMap,
        point: Point2,
        radius: u32,
    ) -> Result<Point2, NavigationError> {
        let (cardinal_step, ordinal_step) = self.steps();
        self.cardinal_step = (cardinal_step - 1).max(self.min_cardinal_step);
        self.ordinal_step = (ordinal_step - 1).max(self.min_ordinal_step);

        // Off-terrain and unread cells rank below any height.
        let current = map.get(point).height();

        if let Some((best_point, best_z)) = self.best {
            if current.is_none_or(|z| z < best_z) {
                let midpoint = point.midpoint_to(&best_point);
                // Adjacent points can floor onto the current one.
                let target = if midpoint == point { best_point } else { midpoint };
                debug!(
                    "{}: overshot at {:?} ({:?} < {}), bisecting back to {:?}",
                    self.name, point, current, best_z, target
                );
                return Ok(target);
            }
        }

        if let Some(z) = current {
            self.best = Some((point, z));
        }
        self.climb
            .propose(map, point, radius, cardinal_step, ordinal_step)
    }
}
