use serde::{Deserialize, Serialize};

pub type Height = i32;
pub type Cost = u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point2 {
    pub x: i32,
    pub y: i32,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    pub fn offset_by(self, offset: Offset) -> Self {
        self.translate(offset.dx, offset.dy)
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (f64::from(self.x) - f64::from(other.x)).hypot(f64::from(self.y) - f64::from(other.y))
    }

    pub fn max_orthogonal_distance(&self, other: &Point2) -> i32 {
        let distance = self.x.abs_diff(other.x).max(self.y.abs_diff(other.y));
        i32::try_from(distance).unwrap_or(i32::MAX)
    }

    /// Component-wise mean, rounded toward negative infinity.
    pub fn midpoint_to(&self, other: &Point2) -> Point2 {
        let mean = |a: i32, b: i32| (i64::from(a) + i64::from(b)).div_euclid(2) as i32;
        Point2::new(mean(self.x, other.x), mean(self.y, other.y))
    }

    pub fn offset_to(&self, other: &Point2) -> Offset {
        Offset::new(other.x.saturating_sub(self.x), other.y.saturating_sub(self.y))
    }

    pub fn with_z(self, z: Height) -> Point3 {
        Point3::new(self.x, self.y, z)
    }
}

impl From<(i32, i32)> for Point2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point3 {
    pub x: i32,
    pub y: i32,
    pub z: Height,
}

impl Point3 {
    pub fn new(x: i32, y: i32, z: Height) -> Self {
        Self { x, y, z }
    }

    pub fn to_2d(self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_cardinal(&self) -> bool {
        self.dx == 0 || self.dy == 0
    }

    pub fn is_ordinal(&self) -> bool {
        !self.is_cardinal()
    }

    pub fn scaled(self, step: i32) -> Self {
        Self::new(self.dx.saturating_mul(step), self.dy.saturating_mul(step))
    }

    pub fn signum(self) -> Self {
        Self::new(self.dx.signum(), self.dy.signum())
    }

    pub fn perpendicular(self) -> Self {
        Self::new(-self.dy.signum(), self.dx.signum())
    }
}

impl From<(i32, i32)> for Offset {
    fn from((dx, dy): (i32, i32)) -> Self {
        Self::new(dx, dy)
    }
}
