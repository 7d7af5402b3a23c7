use thiserror::Error;

use crate::coordinates::Point2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown move strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown sensor kind: {0}")]
    UnknownSensor(String),

    #[error("invalid terrain: {0}")]
    InvalidTerrain(String),

    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("no sensor is available to scan")]
    NoSensorAvailable,

    #[error("no height is known around {point:?}")]
    NoKnownHeights { point: Point2 },

    #[error("gave up after {limit} steps without finding a destination")]
    StepLimitExceeded { limit: usize },
}
