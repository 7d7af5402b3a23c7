mod bisect;
mod climb;
mod spiral;

pub use bisect::BinarySearchStrategy;
pub use climb::ClimbStrategy;
pub use spiral::{Rotation, SpiralOutStrategy};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::coordinates::Point2;
use crate::destination::Destination;
use crate::error::{ConfigError, NavigationError};
use crate::height_map::KnownHeightMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveStrategy {
    Climb(ClimbStrategy),
    SpiralOut(SpiralOutStrategy),
    BinarySearch(BinarySearchStrategy),
}

impl MoveStrategy {
    pub fn from_type(kind: MoveStrategyType) -> Self {
        let name = kind.to_string();
        match kind {
            MoveStrategyType::ClimbMove1 => ClimbStrategy::new(name, 1, 1).into(),
            MoveStrategyType::Climb3Cardinal1Ordinal => ClimbStrategy::new(name, 3, 1).into(),
            MoveStrategyType::SpiralOutCw3 => {
                SpiralOutStrategy::new(name, Rotation::Clockwise, 3).into()
            }
            MoveStrategyType::SpiralOutCcw => {
                SpiralOutStrategy::new(name, Rotation::CounterClockwise, 1).into()
            }
            MoveStrategyType::BinarySearch => BinarySearchStrategy::new(name, 10, 10)
                .with_floors(1, 1)
                .into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MoveStrategy::Climb(strategy) => strategy.name(),
            MoveStrategy::SpiralOut(strategy) => strategy.name(),
            MoveStrategy::BinarySearch(strategy) => strategy.name(),
        }
    }

    pub fn reset(&mut self) {
        match self {
            MoveStrategy::Climb(_) => {}
            MoveStrategy::SpiralOut(strategy) => strategy.reset(),
            MoveStrategy::BinarySearch(strategy) => strategy.reset(),
        }
    }

    pub fn next_point(
        &mut self,
        map: &KnownHeightMap,
        point: Point2,
        destination: &dyn Destination,
    ) -> Result<Point2, NavigationError> {
        let radius = destination.radius_needed_to_check();
        match self {
            MoveStrategy::Climb(strategy) => strategy.next_point(map, point, radius),
            MoveStrategy::SpiralOut(strategy) => Ok(strategy.next_point(point)),
            MoveStrategy::BinarySearch(strategy) => strategy.next_point(map, point, radius),
        }
    }
}

impl From<ClimbStrategy> for MoveStrategy {
    fn from(strategy: ClimbStrategy) -> Self {
        MoveStrategy::Climb(strategy)
    }
}

impl From<SpiralOutStrategy> for MoveStrategy {
    fn from(strategy: SpiralOutStrategy) -> Self {
        MoveStrategy::SpiralOut(strategy)
    }
}

impl From<BinarySearchStrategy> for MoveStrategy {
    fn from(strategy: BinarySearchStrategy) -> Self {
        MoveStrategy::BinarySearch(strategy)
    }
}

impl From<MoveStrategyType> for MoveStrategy {
    fn from(kind: MoveStrategyType) -> Self {
        MoveStrategy::from_type(kind)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MoveStrategyType {
    #[default]
    ClimbMove1,
    Climb3Cardinal1Ordinal,
    SpiralOutCw3,
    SpiralOutCcw,
    BinarySearch,
}

impl MoveStrategyType {
    pub const ALL: [MoveStrategyType; 5] = [
        MoveStrategyType::ClimbMove1,
        MoveStrategyType::Climb3Cardinal1Ordinal,
        MoveStrategyType::SpiralOutCw3,
        MoveStrategyType::SpiralOutCcw,
        MoveStrategyType::BinarySearch,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MoveStrategyType::ClimbMove1 => "climb-move-1",
            MoveStrategyType::Climb3Cardinal1Ordinal => "climb-3-cardinal-1-ordinal",
            MoveStrategyType::SpiralOutCw3 => "spiral-out-cw-3",
            MoveStrategyType::SpiralOutCcw => "spiral-out-ccw",
            MoveStrategyType::BinarySearch => "binary-search",
        }
    }
}

impl FromStr for MoveStrategyType {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        MoveStrategyType::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownStrategy(name.to_string()))
    }
}

impl TryFrom<String> for MoveStrategyType {
    type Error = ConfigError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<MoveStrategyType> for String {
    fn from(kind: MoveStrategyType) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for MoveStrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
