use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coordinates::{Cost, Offset, Point2};
use crate::error::ConfigError;
use crate::height_map::{HeightLookup, offsets_in_radius};
use crate::terrain::TerrainSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorCosts {
    pub radius: u32,
    pub power_on_cost: Cost,
    pub scan_point_cost: Cost,
}

impl SensorCosts {
    pub fn new(radius: u32, power_on_cost: Cost, scan_point_cost: Cost) -> Self {
        Self {
            radius,
            power_on_cost,
            scan_point_cost,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SensorUsage {
    pub power_on_count: u64,
    pub scan_point_count: u64,
    pub total_cost: Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReading {
    pub offset: Offset,
    pub point: Point2,
    pub lookup: HeightLookup,
}

/// Result of one scan. `readings` may hold more cells than were requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    pub readings: Vec<ScanReading>,
    pub cost: Cost,
}

pub trait Sensor {
    fn costs(&self) -> SensorCosts;

    fn usage(&self) -> SensorUsage;

    fn turn_on(&mut self);

    fn scan_points(&mut self, offsets: &[Offset], home: Point2) -> Scan;

    fn radius(&self) -> u32 {
        self.costs().radius
    }

    fn estimate_cost(&self, offsets: &[Offset]) -> Cost {
        if offsets.is_empty() {
            return 0;
        }
        let costs = self.costs();
        costs.power_on_cost + costs.scan_point_cost * offsets.len() as Cost
    }

    fn turn_off(&mut self) {}
}

/// Index of the sensor with the lowest estimate. Ties go to the earliest
/// sensor in the list.
pub fn choose_best_sensor(sensors: &[Box<dyn Sensor>], offsets: &[Offset]) -> Option<usize> {
    if sensors.len() == 1 {
        return Some(0);
    }

    sensors
        .iter()
        .enumerate()
        .min_by_key(|(_, sensor)| sensor.estimate_cost(offsets))
        .map(|(index, _)| index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Laser,
    Radar,
}

impl FromStr for SensorKind {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "laser" => Ok(SensorKind::Laser),
            "radar" => Ok(SensorKind::Radar),
            _ => Err(ConfigError::UnknownSensor(name.to_string())),
        }
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Laser => f.write_str("laser"),
            SensorKind::Radar => f.write_str("radar"),
        }
    }
}

pub type SharedTerrain = Arc<dyn TerrainSource + Send + Sync>;

pub struct SimulatedSensor {
    kind: SensorKind,
    costs: SensorCosts,
    usage: SensorUsage,
    terrain: SharedTerrain,
}

impl SimulatedSensor {
    pub fn new(kind: SensorKind, costs: SensorCosts, terrain: SharedTerrain) -> Self {
        Self {
            kind,
            costs,
            usage: SensorUsage::default(),
            terrain,
        }
    }

    pub fn laser(terrain: SharedTerrain, power_on_cost: Cost, scan_point_cost: Cost) -> Self {
        Self::new(
            SensorKind::Laser,
            SensorCosts::new(1, power_on_cost, scan_point_cost),
            terrain,
        )
    }

    pub fn radar(
        terrain: SharedTerrain,
        radius: u32,
        power_on_cost: Cost,
        scan_point_cost: Cost,
    ) -> Self {
        Self::new(
            SensorKind::Radar,
            SensorCosts::new(radius, power_on_cost, scan_point_cost),
            terrain,
        )
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }
}

impl fmt::Debug for SimulatedSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedSensor")
            .field("kind", &self.kind)
            .field("costs", &self.costs)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

impl Sensor for SimulatedSensor {
    fn costs(&self) -> SensorCosts {
        self.costs
    }

    fn usage(&self) -> SensorUsage {
        self.usage
    }

    fn turn_on(&mut self) {
        self.usage.power_on_count += 1;
        self.usage.total_cost += self.costs.power_on_cost;
    }

    fn scan_points(&mut self, offsets: &[Offset], home: Point2) -> Scan {
        let read = |offset: Offset| {
            let point = home.offset_by(offset);
            ScanReading {
                offset,
                point,
                lookup: self.terrain.height(point),
            }
        };

        let readings: Vec<ScanReading> = match self.kind {
            SensorKind::Laser => offsets.iter().copied().map(read).collect(),
            SensorKind::Radar => {
                let mut readings: Vec<ScanReading> =
                    offsets_in_radius(self.costs.radius).map(read).collect();
                // Requested cells beyond the beam are still read.
                for offset in offsets {
                    if readings.iter().all(|reading| reading.offset != *offset) {
                        readings.push(read(*offset));
                    }
                }
                readings
            }
        };

        let cost = self.costs.scan_point_cost * readings.len() as Cost;
        self.usage.scan_point_count += readings.len() as u64;
        self.usage.total_cost += cost;
        Scan { readings, cost }
    }
}
