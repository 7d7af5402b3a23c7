use std::collections::HashMap;

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::coordinates::{Height, Point2};
use crate::height_map::{HeightLookup, KnownHeightMap};

pub const SEEDS_PER_PASS: usize = 5;

pub trait TerrainSource {
    fn height(&self, point: Point2) -> HeightLookup;
}

impl TerrainSource for KnownHeightMap {
    fn height(&self, point: Point2) -> HeightLookup {
        self.get(point)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakStyle {
    Cone,
    Pyramid,
}

impl PeakStyle {
    fn distance(self, a: Point2, b: Point2) -> f64 {
        match self {
            PeakStyle::Cone => a.distance(&b),
            PeakStyle::Pyramid => f64::from(a.max_orthogonal_distance(&b)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PeakSeed {
    point: Point2,
    z: Height,
}

#[derive(Debug, Clone)]
pub struct PeakField {
    seed: u64,
    lower_left: Point2,
    upper_right: Point2,
    density: f64,
    max_z: Option<Height>,
}

impl PeakField {
    pub fn new(seed: u64, lower_left: Point2, upper_right: Point2) -> Self {
        Self {
            seed,
            lower_left,
            upper_right,
            density: 0.03,
            max_z: None,
        }
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_max_z(mut self, max_z: Height) -> Self {
        self.max_z = Some(max_z);
        self
    }

    pub fn cell_count(&self) -> usize {
        let side = |low: i32, high: i32| {
            if high < low {
                0
            } else {
                high.abs_diff(low) as usize + 1
            }
        };
        side(self.lower_left.x, self.upper_right.x)
            .saturating_mul(side(self.lower_left.y, self.upper_right.y))
    }

    pub fn generate(&self) -> KnownHeightMap {
        let mut rng = Rng::with_seed(self.seed);
        let max_z = self.max_z.unwrap_or_else(|| {
            let biggest_axis = (self.upper_right.x.saturating_sub(self.lower_left.x))
                .max(self.upper_right.y.saturating_sub(self.lower_left.y));
            (f64::from(biggest_axis) / 1.2).round() as Height
        });

        let seed_count = (self.cell_count() as f64 * self.density).round() as usize;
        // Always at least one pass so that tiny fields still get a summit.
        let passes = (seed_count / SEEDS_PER_PASS).max(1);

        let mut heights: HashMap<Point2, Height> = HashMap::with_capacity(self.cell_count());
        for pass in 1..=passes {
            let max_z_pass = (f64::from(max_z) / pass as f64).round() as Height;
            let min_z_pass = max_z_pass / 2;

            let seeds = self.random_seeds(&mut rng, SEEDS_PER_PASS, min_z_pass, max_z_pass);
            let steepness = 1.0 + rng.f64() * 3.0;
            let style = if rng.bool() {
                PeakStyle::Cone
            } else {
                PeakStyle::Pyramid
            };
            self.add_peaks(&mut heights, &seeds, style, steepness);
        }

        let mut map = KnownHeightMap::with_bounds(self.lower_left, self.upper_right);
        for y in self.lower_left.y..=self.upper_right.y {
            for x in self.lower_left.x..=self.upper_right.x {
                let point = Point2::new(x, y);
                map.set_z(point, heights.get(&point).copied().unwrap_or(0));
            }
        }
        map
    }

    fn add_peaks(
        &self,
        heights: &mut HashMap<Point2, Height>,
        seeds: &[PeakSeed],
        style: PeakStyle,
        steepness: f64,
    ) {
        for y in self.lower_left.y..=self.upper_right.y {
            for x in self.lower_left.x..=self.upper_right.x {
                let point = Point2::new(x, y);
                let Some(closest) = seeds.iter().min_by(|a, b| {
                    point
                        .distance(&a.point)
                        .total_cmp(&point.distance(&b.point))
                }) else {
                    return;
                };

                let raw = steepness * (f64::from(closest.z) - style.distance(point, closest.point));
                let delta = (raw.round() as Height).max(0);
                *heights.entry(point).or_insert(0) += delta;
            }
        }
    }

    fn random_seeds(&self, rng: &mut Rng, count: usize, min_z: Height, max_z: Height) -> Vec<PeakSeed> {
        let count = count.min(self.cell_count());
        let mut seeds: Vec<PeakSeed> = Vec::with_capacity(count);
        while seeds.len() < count {
            let point = Point2::new(
                rng.i32(self.lower_left.x..=self.upper_right.x),
                rng.i32(self.lower_left.y..=self.upper_right.y),
            );
            if seeds.iter().all(|seed| seed.point != point) {
                seeds.push(PeakSeed {
                    point,
                    z: rng.i32(min_z..=max_z.max(min_z)),
                });
            }
        }
        seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64) -> PeakField {
        PeakField::new(seed, Point2::ORIGIN, Point2::new(30, 20))
    }

    #[test]
    fn known_height_map_is_a_terrain() {
        let map = KnownHeightMap::from_matrix(&[[1, 2], [3, 4]], Point2::ORIGIN, true);
        assert_eq!(map.height(Point2::new(0, 1)), HeightLookup::Known(1));
        assert_eq!(map.height(Point2::new(1, 0)), HeightLookup::Known(4));
        assert_eq!(map.height(Point2::new(2, 0)), HeightLookup::OutOfBounds);
    }

    #[test]
    fn fills_every_cell_within_bounds() {
        let generated = field(42).generate();
        assert_eq!(generated.len(), field(42).cell_count());
        assert_eq!(generated.width_and_height(), Some((31, 21)));
        assert_eq!(generated.height(Point2::new(-1, 0)), HeightLookup::OutOfBounds);
        assert!(generated.iter_points().all(|p| p.z >= 0));
    }

    #[test]
    fn same_seed_same_terrain() {
        let a = field(100).generate();
        let b = field(100).generate();
        for point in a.iter_points() {
            assert_eq!(b.height(point.to_2d()), HeightLookup::Known(point.z));
        }

        let different = field(7).generate();
        let diverges = a
            .iter_points()
            .any(|p| different.height(p.to_2d()) != HeightLookup::Known(p.z));
        assert!(diverges);
    }

    #[test]
    fn produces_some_relief() {
        let generated = field(3).with_max_z(20).generate();
        let highest = generated.iter_points().map(|p| p.z).max().unwrap();
        assert!(highest > 0);
    }
}
