use log::debug;

use crate::coordinates::{Offset, Point2};
use crate::error::NavigationError;
use crate::height_map::KnownHeightMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClimbStrategy {
    name: String,
    cardinal_step: i32,
    ordinal_step: i32,
    prefer_unknown: bool,
    prefer_cardinal: bool,
}

impl ClimbStrategy {
    pub fn new(name: impl Into<String>, cardinal_step: i32, ordinal_step: i32) -> Self {
        Self {
            name: name.into(),
            cardinal_step: cardinal_step.max(1),
            ordinal_step: ordinal_step.max(1),
            prefer_unknown: true,
            prefer_cardinal: true,
        }
    }

    pub fn preferring_known(mut self) -> Self {
        self.prefer_unknown = false;
        self
    }

    pub fn preferring_ordinal(mut self) -> Self {
        self.prefer_cardinal = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cardinal_step(&self) -> i32 {
        self.cardinal_step
    }

    pub fn ordinal_step(&self) -> i32 {
        self.ordinal_step
    }

    pub fn next_point(
        &self,
        map: &KnownHeightMap,
        point: Point2,
        radius: u32,
    ) -> Result<Point2, NavigationError> {
        self.propose(map, point, radius, self.cardinal_step, self.ordinal_step)
    }

    pub(crate) fn propose(
        &self,
        map: &KnownHeightMap,
        point: Point2,
        radius: u32,
        cardinal_step: i32,
        ordinal_step: i32,
    ) -> Result<Point2, NavigationError> {
        let reach = cardinal_step.max(ordinal_step).max(1) as u32;
        let directions = climb_directions(map, point, radius, reach)?;

        let (candidates, cardinal) = self.choose_candidate_directions(&directions);
        let step = (if cardinal { cardinal_step } else { ordinal_step }).max(1);

        let mut chosen: Option<(Offset, Point2, usize)> = None;
        for direction in candidates {
            let candidate = point.offset_by(direction.scaled(step));
            let unknown = map.count_unknown_in_radius(candidate, radius);
            let better = match chosen {
                None => true,
                Some((_, _, best)) if self.prefer_unknown => unknown > best,
                Some((_, _, best)) => unknown < best,
            };
            if better {
                chosen = Some((direction, candidate, unknown));
            }
        }

        let (direction, candidate, unknown) =
            chosen.ok_or(NavigationError::NoKnownHeights { point })?;

        if unknown == 0 {
            let deflected = deflect(point, direction, step);
            debug!(
                "{}: {:?} is already charted, deflecting to {:?}",
                self.name, candidate, deflected
            );
            return Ok(deflected);
        }
        Ok(candidate)
    }

    fn choose_candidate_directions(&self, directions: &[Offset]) -> (Vec<Offset>, bool) {
        let (edges, corners): (Vec<Offset>, Vec<Offset>) =
            directions.iter().partition(|direction| direction.is_cardinal());

        if !edges.is_empty() && (self.prefer_cardinal || corners.is_empty()) {
            (edges, true)
        } else {
            (corners, false)
        }
    }
}

fn climb_directions(
    map: &KnownHeightMap,
    point: Point2,
    radius: u32,
    reach: u32,
) -> Result<Vec<Offset>, NavigationError> {
    let first = radius.max(1);
    for ring in first..=first.saturating_add(reach) {
        let Some((_, highest)) = map.highest_known_in_radius(point, ring) else {
            continue;
        };

        let mut directions: Vec<Offset> = Vec::with_capacity(highest.len());
        for cell in highest {
            let direction = cell.offset.signum();
            if direction != Offset::ZERO && !directions.contains(&direction) {
                directions.push(direction);
            }
        }
        if !directions.is_empty() {
            return Ok(directions);
        }
    }
    Err(NavigationError::NoKnownHeights { point })
}

/// Sidesteps a move that would land on charted ground: one unit along the
/// perpendicular of `direction`, pulled one unit back toward `origin` when the
/// step was longer than one. Never returns `origin`.
fn deflect(origin: Point2, direction: Offset, step: i32) -> Point2 {
    let unit = direction.signum();
    let reach = if step > 1 { step - 1 } else { step };
    origin
        .offset_by(unit.scaled(reach))
        .offset_by(unit.perpendicular())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MAP: [[i32; 7]; 6] = [
        [1, 1, 1, 1, 1, 1, 1],
        [1, 2, 2, 1, 1, 2, 4],
        [1, 2, 2, 2, 1, 2, 2],
        [1, 2, 3, 2, 1, 1, 1],
        [1, 1, 2, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 2],
    ];

    fn reveal(known: &mut KnownHeightMap, point: Point2, radius: u32) {
        let full = KnownHeightMap::from_matrix(&TEST_MAP, Point2::ORIGIN, true);
        for cell in full.cells_in_radius(point, radius) {
            if let Some(z) = cell.lookup.height() {
                known.set_z(cell.point, z);
            }
        }
    }

    #[test]
    fn climbs_to_the_only_higher_corner() {
        let mut known = KnownHeightMap::new();
        reveal(&mut known, Point2::new(4, 1), 1);

        let climb = ClimbStrategy::new("climb", 1, 1);
        assert_eq!(
            climb.next_point(&known, Point2::new(4, 1), 1),
            Ok(Point2::new(3, 2))
        );
    }

    #[test]
    fn cardinal_moves_use_the_cardinal_step() {
        let mut known = KnownHeightMap::new();
        reveal(&mut known, Point2::new(3, 2), 1);

        let climb = ClimbStrategy::new("climb", 3, 1);
        assert_eq!(
            climb.next_point(&known, Point2::new(3, 2), 1),
            Ok(Point2::new(0, 2))
        );
    }

    #[test]
    fn prefers_edges_over_corners() {
        let mut known = KnownHeightMap::new();
        known.set_z(Point2::new(0, 0), 1);
        known.set_z(Point2::new(1, 1), 5);
        known.set_z(Point2::new(0, 1), 5);

        let climb = ClimbStrategy::new("climb", 1, 1);
        assert_eq!(
            climb.next_point(&known, Point2::new(0, 0), 1),
            Ok(Point2::new(0, 1))
        );

        let diagonal = ClimbStrategy::new("climb", 1, 1).preferring_ordinal();
        assert_eq!(
            diagonal.next_point(&known, Point2::new(0, 0), 1),
            Ok(Point2::new(1, 1))
        );
    }

    #[test]
    fn picks_least_charted_candidate_first_on_ties() {
        let mut known = KnownHeightMap::new();
        known.set_z(Point2::new(0, 0), 1);
        known.set_z(Point2::new(0, -1), 5);
        known.set_z(Point2::new(0, 1), 5);
        // Chart the area around the upper candidate.
        known.set_z(Point2::new(0, 2), 1);
        known.set_z(Point2::new(1, 2), 1);

        let explorer = ClimbStrategy::new("climb", 1, 1);
        assert_eq!(
            explorer.next_point(&known, Point2::new(0, 0), 1),
            Ok(Point2::new(0, -1))
        );

        let consolidator = ClimbStrategy::new("climb", 1, 1).preferring_known();
        assert_eq!(
            consolidator.next_point(&known, Point2::new(0, 0), 1),
            Ok(Point2::new(0, 1))
        );

        let mut tied = KnownHeightMap::new();
        tied.set_z(Point2::new(0, 0), 1);
        tied.set_z(Point2::new(-1, 0), 5);
        tied.set_z(Point2::new(1, 0), 5);
        assert_eq!(
            explorer.next_point(&tied, Point2::new(0, 0), 1),
            Ok(Point2::new(-1, 0))
        );
    }

    #[test]
    fn deflects_off_fully_known_ground() {
        let mut known = KnownHeightMap::new();
        known.set_z(Point2::new(1, 0), 5);
        for x in -1..=3 {
            for y in -1..=1 {
                known.set_z(Point2::new(x, y), 1);
            }
        }

        let climb = ClimbStrategy::new("climb", 1, 1);
        let next = climb.next_point(&known, Point2::new(0, 0), 1).unwrap();
        assert_eq!(next, Point2::new(1, 1));
    }

    #[test]
    fn deflection_never_returns_origin() {
        let origin = Point2::new(5, 5);
        for direction in crate::height_map::offsets_in_radius(1) {
            if direction == Offset::ZERO {
                continue;
            }
            for step in 1..5 {
                assert_ne!(deflect(origin, direction, step), origin);
            }
        }
    }

    #[test]
    fn widens_search_when_standing_off_terrain() {
        let mut known = KnownHeightMap::new();
        for offset in crate::height_map::offsets_in_radius(1) {
            known.set_out_of_bounds(Point2::new(10, 0).offset_by(offset));
        }
        known.set_z(Point2::new(8, 0), 3);

        let climb = ClimbStrategy::new("climb", 1, 1);
        assert_eq!(
            climb.next_point(&known, Point2::new(10, 0), 1),
            Ok(Point2::new(9, 0))
        );
    }

    #[test]
    fn nothing_known_is_a_precondition_violation() {
        let known = KnownHeightMap::new();
        let climb = ClimbStrategy::new("climb", 1, 1);
        assert_eq!(
            climb.next_point(&known, Point2::new(0, 0), 1),
            Err(NavigationError::NoKnownHeights {
                point: Point2::new(0, 0)
            })
        );
    }
}
