use crate::coordinates::{Offset, Point2};

const COUNTER_CLOCKWISE: [Offset; 4] = [
    Offset { dx: 0, dy: 1 },
    Offset { dx: -1, dy: 0 },
    Offset { dx: 0, dy: -1 },
    Offset { dx: 1, dy: 0 },
];

const CLOCKWISE: [Offset; 4] = [
    Offset { dx: 1, dy: 0 },
    Offset { dx: 0, dy: -1 },
    Offset { dx: -1, dy: 0 },
    Offset { dx: 0, dy: 1 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

impl Rotation {
    pub fn directions(self) -> &'static [Offset; 4] {
        match self {
            Rotation::Clockwise => &CLOCKWISE,
            Rotation::CounterClockwise => &COUNTER_CLOCKWISE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiralOutStrategy {
    name: String,
    rotation: Rotation,
    step: i32,
    index: usize,
    leg_length: u32,
    leg_progress: u32,
    legs_at_length: u32,
}

impl SpiralOutStrategy {
    pub fn new(name: impl Into<String>, rotation: Rotation, step: i32) -> Self {
        Self {
            name: name.into(),
            rotation,
            step: step.max(1),
            index: 0,
            leg_length: 1,
            leg_progress: 0,
            legs_at_length: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.leg_length = 1;
        self.leg_progress = 0;
        self.legs_at_length = 0;
    }

    pub fn next_point(&mut self, point: Point2) -> Point2 {
        point.offset_by(self.next_offset())
    }

    fn next_offset(&mut self) -> Offset {
        let directions = self.rotation.directions();
        let direction = directions[self.index];

        self.leg_progress += 1;
        if self.leg_progress == self.leg_length {
            self.leg_progress = 0;
            self.index = (self.index + 1) % directions.len();
            self.legs_at_length += 1;
            if self.legs_at_length == 2 {
                self.legs_at_length = 0;
                self.leg_length += 1;
            }
        }

        direction.scaled(self.step)
    }
}
