use log::{debug, info};

use crate::config::MissionConfig;
use crate::coordinates::Point2;
use crate::error::NavigationError;
use crate::navigator::{Navigator, Waypoint};
use crate::sensor::{Sensor, SharedTerrain};

pub trait Actuator {
    fn move_to(&mut self, waypoint: Waypoint) -> Waypoint;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdealActuator;

impl Actuator for IdealActuator {
    fn move_to(&mut self, waypoint: Waypoint) -> Waypoint {
        debug!("moving to {:?} ({:?})", waypoint.point, waypoint.height);
        waypoint
    }
}

pub struct Drone {
    navigator: Navigator,
    sensors: Vec<Box<dyn Sensor>>,
    actuator: Box<dyn Actuator>,
    position: Option<Point2>,
}

impl Drone {
    pub fn new(navigator: Navigator, sensors: Vec<Box<dyn Sensor>>) -> Self {
        Self {
            navigator,
            sensors,
            actuator: Box::new(IdealActuator),
            position: None,
        }
    }

    pub fn from_config(config: &MissionConfig, terrain: &SharedTerrain) -> Self {
        Self::new(config.build_navigator(), config.build_sensors(terrain))
    }

    pub fn with_actuator(mut self, actuator: impl Actuator + 'static) -> Self {
        self.actuator = Box::new(actuator);
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn sensors(&self) -> &[Box<dyn Sensor>] {
        &self.sensors
    }

    pub fn position(&self) -> Option<Point2> {
        self.position
    }

    pub fn navigate_to_destination(
        &mut self,
        start: Point2,
    ) -> Result<Vec<Waypoint>, NavigationError> {
        let mut visited = Vec::new();
        for waypoint in self.navigator.navigate(start, &mut self.sensors) {
            let reached = self.actuator.move_to(waypoint?);
            self.position = Some(reached.point);
            visited.push(reached);
        }

        if let Some(destination) = self.navigator.found() {
            info!(
                "reached {:?} after {} points, scan cost {}",
                destination,
                visited.len(),
                self.navigator.total_scan_cost()
            );
        }
        Ok(visited)
    }
}
