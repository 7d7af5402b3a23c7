pub mod config;
pub mod coordinates;
pub mod destination;
pub mod drone;
pub mod error;
pub mod height_map;
pub mod navigator;
pub mod sensor;
pub mod strategy;
pub mod terrain;

pub use config::{DestinationConfig, MissionConfig, SensorConfig, TerrainConfig};
pub use coordinates::{Cost, Height, Offset, Point2, Point3};
pub use destination::{Destination, ExtractionPoint};
pub use drone::{Actuator, Drone, IdealActuator};
pub use error::{ConfigError, NavigationError};
pub use height_map::{Bounds, HeightLookup, KnownHeightMap, RadiusCell};
pub use navigator::{
    NavigationCursor, NavigationRun, Navigator, NavigatorConfig, PathRecord, StepOutcome,
    Waypoint,
};
pub use sensor::{
    Scan, ScanReading, Sensor, SensorCosts, SensorKind, SensorUsage, SharedTerrain,
    SimulatedSensor, choose_best_sensor,
};
pub use strategy::{
    BinarySearchStrategy, ClimbStrategy, MoveStrategy, MoveStrategyType, Rotation,
    SpiralOutStrategy,
};
pub use terrain::{PeakField, PeakStyle, TerrainSource};
