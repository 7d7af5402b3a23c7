use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coordinates::{Cost, Height, Point2};
use crate::destination::ExtractionPoint;
use crate::error::ConfigError;
use crate::height_map::KnownHeightMap;
use crate::navigator::{Navigator, NavigatorConfig};
use crate::sensor::{Sensor, SensorCosts, SensorKind, SharedTerrain, SimulatedSensor};
use crate::strategy::{MoveStrategy, MoveStrategyType};
use crate::terrain::PeakField;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub strategy: MoveStrategyType,
    pub start: Point2,
    pub destination: DestinationConfig,
    pub navigator: NavigatorConfig,
    pub sensors: Vec<SensorConfig>,
    pub terrain: TerrainConfig,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            strategy: MoveStrategyType::default(),
            start: Point2::ORIGIN,
            destination: DestinationConfig::default(),
            navigator: NavigatorConfig::default(),
            sensors: vec![SensorConfig::default()],
            terrain: TerrainConfig::default(),
        }
    }
}

impl MissionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    pub fn build_terrain(&self) -> Result<KnownHeightMap, ConfigError> {
        self.terrain.build()
    }

    pub fn build_strategy(&self) -> MoveStrategy {
        MoveStrategy::from_type(self.strategy)
    }

    pub fn build_sensors(&self, terrain: &SharedTerrain) -> Vec<Box<dyn Sensor>> {
        self.sensors
            .iter()
            .map(|sensor| sensor.build(Arc::clone(terrain)))
            .collect()
    }

    pub fn build_navigator(&self) -> Navigator {
        Navigator::new(
            self.build_strategy(),
            Box::new(ExtractionPoint::with_radius(self.destination.radius)),
        )
        .with_config(self.navigator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DestinationConfig {
    pub radius: u32,
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self { radius: 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub kind: SensorKind,
    pub radius: u32,
    pub power_on_cost: Cost,
    pub scan_point_cost: Cost,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            kind: SensorKind::Laser,
            radius: 1,
            power_on_cost: 4,
            scan_point_cost: 2,
        }
    }
}

impl SensorConfig {
    pub fn costs(&self) -> SensorCosts {
        SensorCosts::new(self.radius, self.power_on_cost, self.scan_point_cost)
    }

    pub fn build(&self, terrain: SharedTerrain) -> Box<dyn Sensor> {
        Box::new(SimulatedSensor::new(self.kind, self.costs(), terrain))
    }
}

pub const DEFAULT_PEAK_DENSITY: f64 = 0.0075;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainConfig {
    Peaks {
        #[serde(default)]
        seed: u64,
        #[serde(default)]
        lower_left: Point2,
        #[serde(default = "default_upper_right")]
        upper_right: Point2,
        #[serde(default = "default_density")]
        density: f64,
        #[serde(default)]
        max_z: Option<Height>,
    },
    Matrix {
        rows: Vec<Vec<Height>>,
        #[serde(default)]
        origin: Point2,
    },
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig::Peaks {
            seed: 0,
            lower_left: Point2::ORIGIN,
            upper_right: default_upper_right(),
            density: default_density(),
            max_z: None,
        }
    }
}

impl TerrainConfig {
    pub fn reseed(&mut self, new_seed: u64) {
        if let TerrainConfig::Peaks { seed, .. } = self {
            *seed = new_seed;
        }
    }

    pub fn build(&self) -> Result<KnownHeightMap, ConfigError> {
        match self {
            TerrainConfig::Peaks {
                seed,
                lower_left,
                upper_right,
                density,
                max_z,
            } => {
                if lower_left.x > upper_right.x || lower_left.y > upper_right.y {
                    return Err(ConfigError::InvalidTerrain(format!(
                        "lower left {lower_left:?} lies above or right of upper right {upper_right:?}"
                    )));
                }
                if !density.is_finite() || *density < 0.0 {
                    return Err(ConfigError::InvalidTerrain(format!(
                        "peak density must be a non-negative number, got {density}"
                    )));
                }

                let mut field =
                    PeakField::new(*seed, *lower_left, *upper_right).with_density(*density);
                if let Some(max_z) = max_z {
                    field = field.with_max_z(*max_z);
                }
                Ok(field.generate())
            }
            TerrainConfig::Matrix { rows, origin } => {
                let width = rows.first().map_or(0, Vec::len);
                if width == 0 {
                    return Err(ConfigError::InvalidTerrain(
                        "height matrix is empty".to_string(),
                    ));
                }
                if let Some(index) = rows.iter().position(|row| row.len() != width) {
                    return Err(ConfigError::InvalidTerrain(format!(
                        "row {index} has {} heights, expected {width}",
                        rows[index].len()
                    )));
                }
                Ok(KnownHeightMap::from_matrix(rows, *origin, true))
            }
        }
    }
}

fn default_upper_right() -> Point2 {
    Point2::new(48, 32)
}

fn default_density() -> f64 {
    DEFAULT_PEAK_DENSITY
}
