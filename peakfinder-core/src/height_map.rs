use crate::coordinates::{Height, Offset, Point2, Point3};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightLookup {
    Known(Height),
    Unknown,
    OutOfBounds,
}

impl HeightLookup {
    pub fn height(self) -> Option<Height> {
        match self {
            HeightLookup::Known(height) => Some(height),
            HeightLookup::Unknown | HeightLookup::OutOfBounds => None,
        }
    }

    pub fn is_unknown(self) -> bool {
        self == HeightLookup::Unknown
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sample {
    Height(Height),
    OutOfBounds,
}

impl Sample {
    fn lookup(self) -> HeightLookup {
        match self {
            Sample::Height(height) => HeightLookup::Known(height),
            Sample::OutOfBounds => HeightLookup::OutOfBounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower_left: Point2,
    pub upper_right: Point2,
}

impl Bounds {
    pub fn new(lower_left: Point2, upper_right: Point2) -> Self {
        Self {
            lower_left,
            upper_right,
        }
    }

    pub fn contains(&self, point: Point2) -> bool {
        (self.lower_left.x..=self.upper_right.x).contains(&point.x)
            && (self.lower_left.y..=self.upper_right.y).contains(&point.y)
    }

    fn extended_to(self, point: Point2) -> Self {
        Self {
            lower_left: Point2::new(
                self.lower_left.x.min(point.x),
                self.lower_left.y.min(point.y),
            ),
            upper_right: Point2::new(
                self.upper_right.x.max(point.x),
                self.upper_right.y.max(point.y),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadiusCell {
    pub offset: Offset,
    pub lookup: HeightLookup,
    pub point: Point2,
}

#[derive(Debug, Clone, Default)]
pub struct KnownHeightMap {
    known: HashMap<Point2, Sample>,
    extent: Option<Bounds>,
    valid: Option<Bounds>,
}

impl KnownHeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(lower_left: Point2, upper_right: Point2) -> Self {
        Self {
            valid: Some(Bounds::new(lower_left, upper_right)),
            ..Self::default()
        }
    }

    /// Builds a map from rows of heights. Row 0 is the top row, so it lands on
    /// the largest `y`; column 0 lands on `origin.x`.
    pub fn from_matrix<R: AsRef<[Height]>>(rows: &[R], origin: Point2, with_bounds: bool) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.as_ref().len()) as i32;

        let mut map = if with_bounds && height > 0 && width > 0 {
            Self::with_bounds(origin, origin.translate(width - 1, height - 1))
        } else {
            Self::new()
        };

        for (row_index, row) in rows.iter().enumerate() {
            let y = height - row_index as i32 - 1;
            for (column, &z) in row.as_ref().iter().enumerate() {
                map.set_z(origin.translate(column as i32, y), z);
            }
        }
        map
    }

    pub fn validity_bounds(&self) -> Option<Bounds> {
        self.valid
    }

    pub fn is_out_of_bounds(&self, point: Point2) -> bool {
        self.valid.is_some_and(|bounds| !bounds.contains(point))
    }

    pub fn get(&self, point: Point2) -> HeightLookup {
        if self.is_out_of_bounds(point) {
            return HeightLookup::OutOfBounds;
        }
        self.known
            .get(&point)
            .map_or(HeightLookup::Unknown, |sample| sample.lookup())
    }

    /// Records the height at `point`. Returns `true` if the cell was unknown.
    /// A cell that already holds something keeps it.
    pub fn set_z(&mut self, point: Point2, height: Height) -> bool {
        self.record(point, Sample::Height(height))
    }

    pub fn set_out_of_bounds(&mut self, point: Point2) -> bool {
        self.record(point, Sample::OutOfBounds)
    }

    fn record(&mut self, point: Point2, sample: Sample) -> bool {
        if let Some(existing) = self.known.get(&point) {
            if *existing != sample {
                warn!(
                    "ignoring conflicting write at {:?}: have {:?}, got {:?}",
                    point, existing, sample
                );
            }
            return false;
        }

        self.known.insert(point, sample);
        self.extent = Some(match self.extent {
            Some(extent) => extent.extended_to(point),
            None => Bounds::new(point, point),
        });
        true
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    pub fn boundary_points(&self) -> Option<(Point2, Point2)> {
        self.extent
            .map(|extent| (extent.lower_left, extent.upper_right))
    }

    pub fn width_and_height(&self) -> Option<(i32, i32)> {
        self.extent.map(|extent| {
            let side = |low: i32, high: i32| {
                i32::try_from(u64::from(high.abs_diff(low)) + 1).unwrap_or(i32::MAX)
            };
            (
                side(extent.lower_left.x, extent.upper_right.x),
                side(extent.lower_left.y, extent.upper_right.y),
            )
        })
    }

    pub fn iter_points(&self) -> impl Iterator<Item = Point3> + '_ {
        self.known.iter().filter_map(|(point, sample)| match sample {
            Sample::Height(z) => Some(point.with_z(*z)),
            Sample::OutOfBounds => None,
        })
    }

    pub fn to_point3(&self, point: Point2) -> Option<Point3> {
        self.get(point).height().map(|z| point.with_z(z))
    }

    /// All `(2r+1)^2` cells of the square centered on `point`, row-major:
    /// `dy` ascending in the outer loop, `dx` ascending in the inner loop.
    pub fn cells_in_radius(
        &self,
        point: Point2,
        radius: u32,
    ) -> impl Iterator<Item = RadiusCell> + '_ {
        offsets_in_radius(radius).map(move |offset| {
            let absolute = point.offset_by(offset);
            RadiusCell {
                offset,
                lookup: self.get(absolute),
                point: absolute,
            }
        })
    }

    pub fn unknown_offsets_in_radius(&self, point: Point2, radius: u32) -> Vec<Offset> {
        self.cells_in_radius(point, radius)
            .filter(|cell| cell.lookup.is_unknown())
            .map(|cell| cell.offset)
            .collect()
    }

    pub fn count_unknown_in_radius(&self, point: Point2, radius: u32) -> usize {
        self.cells_in_radius(point, radius)
            .filter(|cell| cell.lookup.is_unknown())
            .count()
    }

    pub fn highest_known_in_radius(
        &self,
        point: Point2,
        radius: u32,
    ) -> Option<(Height, Vec<RadiusCell>)> {
        let max_z = self
            .cells_in_radius(point, radius)
            .filter_map(|cell| cell.lookup.height())
            .max()?;

        let highest = self
            .cells_in_radius(point, radius)
            .filter(|cell| cell.lookup == HeightLookup::Known(max_z))
            .collect();
        Some((max_z, highest))
    }

    /// True when the whole square is known and no cell in it is higher than the
    /// center. Off-terrain cells count as known and lower than any height.
    pub fn is_highest_or_tie_and_all_known(&self, point: Point2, radius: u32) -> bool {
        let HeightLookup::Known(center) = self.get(point) else {
            return false;
        };

        self.cells_in_radius(point, radius)
            .all(|cell| match cell.lookup {
                HeightLookup::Known(z) => z <= center,
                HeightLookup::OutOfBounds => true,
                HeightLookup::Unknown => false,
            })
    }
}

pub fn offsets_in_radius(radius: u32) -> impl Iterator<Item = Offset> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    (-r..=r).flat_map(move |dy| (-r..=r).map(move |dx| Offset::new(dx, dy)))
}
