use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::coordinates::{Cost, Height, Point2, Point3};
use crate::destination::Destination;
use crate::error::NavigationError;
use crate::height_map::{Bounds, HeightLookup, KnownHeightMap};
use crate::sensor::{Sensor, choose_best_sensor};
use crate::strategy::MoveStrategy;

pub const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub max_steps: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Waypoint {
    pub point: Point2,
    pub height: HeightLookup,
}

impl Waypoint {
    pub fn new(point: Point2, height: HeightLookup) -> Self {
        Self { point, height }
    }

    pub fn z(&self) -> Option<Height> {
        self.height.height()
    }

    pub fn to_point3(&self) -> Option<Point3> {
        self.z().map(|z| self.point.with_z(z))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    pub x: i32,
    pub y: i32,
    pub z: Option<Height>,
    pub scan_cost: Cost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationCursor {
    Running { point: Point2, steps: usize },
    Found { destination: Point2 },
    Failed(NavigationError),
    Done,
}

impl NavigationCursor {
    pub fn start(point: Point2) -> Self {
        NavigationCursor::Running { point, steps: 0 }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, NavigationCursor::Done)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub waypoint: Waypoint,
    pub terminal: bool,
}

pub struct Navigator {
    map: KnownHeightMap,
    bounds: Option<Bounds>,
    strategy: MoveStrategy,
    destination: Box<dyn Destination>,
    config: NavigatorConfig,
    path: Vec<Waypoint>,
    ledger: HashMap<Point2, Cost>,
    found: Option<Point2>,
}

impl Navigator {
    pub fn new(strategy: impl Into<MoveStrategy>, destination: Box<dyn Destination>) -> Self {
        Self {
            map: KnownHeightMap::new(),
            bounds: None,
            strategy: strategy.into(),
            destination,
            config: NavigatorConfig::default(),
            path: Vec::new(),
            ledger: HashMap::new(),
            found: None,
        }
    }

    pub fn with_config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_bounds(mut self, lower_left: Point2, upper_right: Point2) -> Self {
        self.bounds = Some(Bounds::new(lower_left, upper_right));
        self.map = self.fresh_map();
        self
    }

    pub fn config(&self) -> NavigatorConfig {
        self.config
    }

    pub fn map(&self) -> &KnownHeightMap {
        &self.map
    }

    pub fn path(&self) -> &[Waypoint] {
        &self.path
    }

    pub fn found(&self) -> Option<Point2> {
        self.found
    }

    pub fn strategy(&self) -> &MoveStrategy {
        &self.strategy
    }

    pub fn set_move_strategy(&mut self, strategy: impl Into<MoveStrategy>) {
        self.strategy = strategy.into();
    }

    pub fn scan_cost_at(&self, point: Point2) -> Option<Cost> {
        self.ledger.get(&point).copied()
    }

    pub fn total_scan_cost(&self) -> Cost {
        self.ledger.values().sum()
    }

    pub fn path_record(&self) -> Vec<PathRecord> {
        self.path
            .iter()
            .map(|waypoint| PathRecord {
                x: waypoint.point.x,
                y: waypoint.point.y,
                z: waypoint.z(),
                scan_cost: self.scan_cost_at(waypoint.point).unwrap_or(0),
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.map = self.fresh_map();
        self.path.clear();
        self.ledger.clear();
        self.found = None;
        self.strategy.reset();
    }

    pub fn start(&mut self, start: Point2) -> NavigationCursor {
        self.reset();
        info!(
            "starting at {:?} with strategy {}",
            start,
            self.strategy.name()
        );
        NavigationCursor::start(start)
    }

    pub fn navigate<'a>(
        &'a mut self,
        start: Point2,
        sensors: &'a mut [Box<dyn Sensor>],
    ) -> NavigationRun<'a> {
        let cursor = self.start(start);
        NavigationRun {
            navigator: self,
            sensors,
            cursor,
        }
    }

    /// Advances the run by one point. Returns `Ok(None)` once the run is over.
    pub fn step(
        &mut self,
        cursor: &mut NavigationCursor,
        sensors: &mut [Box<dyn Sensor>],
    ) -> Result<Option<StepOutcome>, NavigationError> {
        match std::mem::replace(cursor, NavigationCursor::Done) {
            NavigationCursor::Done => Ok(None),
            NavigationCursor::Failed(error) => Err(error),
            NavigationCursor::Found { destination } => {
                let waypoint = self.visit(destination);
                Ok(Some(StepOutcome {
                    waypoint,
                    terminal: true,
                }))
            }
            NavigationCursor::Running { point, steps } => {
                if steps >= self.config.max_steps {
                    return Err(NavigationError::StepLimitExceeded {
                        limit: self.config.max_steps,
                    });
                }
                self.run_step(cursor, point, steps, sensors).map(Some)
            }
        }
    }

    fn run_step(
        &mut self,
        cursor: &mut NavigationCursor,
        point: Point2,
        steps: usize,
        sensors: &mut [Box<dyn Sensor>],
    ) -> Result<StepOutcome, NavigationError> {
        let radius = self.destination.radius_needed_to_check();
        let candidate_radius = match self.scan_around(point, radius, sensors)? {
            Some(sensor_radius) => sensor_radius.saturating_add(radius),
            None => radius,
        };

        let waypoint = self.visit(point);

        let found = self
            .map
            .cells_in_radius(point, candidate_radius)
            .map(|cell| cell.point)
            .find(|candidate| self.destination.is_destination(&self.map, *candidate));

        if let Some(destination) = found {
            info!(
                "found destination {:?} after {} steps",
                destination,
                steps + 1
            );
            self.found = Some(destination);
            let terminal = destination == point;
            if !terminal {
                *cursor = NavigationCursor::Found { destination };
            }
            return Ok(StepOutcome { waypoint, terminal });
        }

        *cursor = match self
            .strategy
            .next_point(&self.map, point, self.destination.as_ref())
        {
            Ok(next) => {
                debug!("{}: {:?} -> {:?}", self.strategy.name(), point, next);
                NavigationCursor::Running {
                    point: next,
                    steps: steps + 1,
                }
            }
            Err(error) => NavigationCursor::Failed(error),
        };
        Ok(StepOutcome {
            waypoint,
            terminal: false,
        })
    }

    fn scan_around(
        &mut self,
        point: Point2,
        radius: u32,
        sensors: &mut [Box<dyn Sensor>],
    ) -> Result<Option<u32>, NavigationError> {
        let unknown = self.map.unknown_offsets_in_radius(point, radius);
        if unknown.is_empty() {
            self.ledger.entry(point).or_insert(0);
            return Ok(None);
        }

        let index =
            choose_best_sensor(sensors, &unknown).ok_or(NavigationError::NoSensorAvailable)?;
        let sensor = &mut sensors[index];

        sensor.turn_on();
        let scan = sensor.scan_points(&unknown, point);
        sensor.turn_off();

        let mut written = 0;
        for reading in &scan.readings {
            if !self.map.get(reading.point).is_unknown() {
                continue;
            }
            let learned = match reading.lookup {
                HeightLookup::Known(z) => self.map.set_z(reading.point, z),
                HeightLookup::OutOfBounds => self.map.set_out_of_bounds(reading.point),
                HeightLookup::Unknown => false,
            };
            written += usize::from(learned);
        }

        let cost = sensor.costs().power_on_cost + scan.cost;
        *self.ledger.entry(point).or_insert(0) += cost;
        debug!(
            "scanned {} cells around {:?} with sensor {} ({} new, cost {})",
            scan.readings.len(),
            point,
            index,
            written,
            cost
        );
        Ok(Some(sensor.radius()))
    }

    fn visit(&mut self, point: Point2) -> Waypoint {
        let waypoint = Waypoint::new(point, self.map.get(point));
        self.path.push(waypoint);
        waypoint
    }

    fn fresh_map(&self) -> KnownHeightMap {
        match self.bounds {
            Some(bounds) => KnownHeightMap::with_bounds(bounds.lower_left, bounds.upper_right),
            None => KnownHeightMap::new(),
        }
    }
}

pub struct NavigationRun<'a> {
    navigator: &'a mut Navigator,
    sensors: &'a mut [Box<dyn Sensor>],
    cursor: NavigationCursor,
}

impl NavigationRun<'_> {
    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    pub fn navigator(&self) -> &Navigator {
        self.navigator
    }
}

impl Iterator for NavigationRun<'_> {
    type Item = Result<Waypoint, NavigationError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.navigator.step(&mut self.cursor, self.sensors) {
            Ok(Some(outcome)) => Some(Ok(outcome.waypoint)),
            Ok(None) => None,
            Err(error) => Some(Err(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::destination::ExtractionPoint;
    use crate::sensor::{SharedTerrain, SimulatedSensor};
    use crate::strategy::{ClimbStrategy, MoveStrategyType};

    const TEST_MAP: [[Height; 7]; 6] = [
        [1, 1, 1, 1, 1, 1, 1],
        [1, 2, 2, 1, 1, 2, 4],
        [1, 2, 2, 2, 1, 2, 2],
        [1, 2, 3, 2, 1, 1, 1],
        [1, 1, 2, 1, 1, 1, 1],
        [1, 1, 1, 1, 1, 1, 2],
    ];

    fn test_terrain() -> SharedTerrain {
        Arc::new(KnownHeightMap::from_matrix(&TEST_MAP, Point2::ORIGIN, true))
    }

    fn laser_only(terrain: SharedTerrain) -> Vec<Box<dyn Sensor>> {
        vec![Box::new(SimulatedSensor::laser(terrain, 4, 2))]
    }

    fn climber() -> Navigator {
        Navigator::new(
            ClimbStrategy::new("climb", 1, 1),
            Box::new(ExtractionPoint::new()),
        )
    }

    #[test]
    fn climbs_the_test_grid_to_its_peak() {
        let mut navigator = climber();
        let mut sensors = laser_only(test_terrain());

        let path: Vec<Point3> = navigator
            .navigate(Point2::new(4, 1), &mut sensors)
            .map(|waypoint| waypoint.unwrap().to_point3().unwrap())
            .collect();

        assert_eq!(
            path,
            vec![
                Point3::new(4, 1, 1),
                Point3::new(3, 2, 2),
                Point3::new(2, 2, 3)
            ]
        );
        assert_eq!(navigator.found(), Some(Point2::new(2, 2)));
    }

    #[test]
    fn ledger_matches_sensor_usage() {
        let mut navigator = climber();
        let mut sensors = laser_only(test_terrain());
        for waypoint in navigator.navigate(Point2::new(4, 1), &mut sensors) {
            waypoint.unwrap();
        }

        assert_eq!(navigator.scan_cost_at(Point2::new(4, 1)), Some(22));
        assert_eq!(navigator.scan_cost_at(Point2::new(3, 2)), Some(14));
        assert_eq!(navigator.scan_cost_at(Point2::new(2, 2)), Some(10));
        assert_eq!(navigator.total_scan_cost(), 46);
        assert_eq!(sensors[0].usage().total_cost, 46);
        assert_eq!(sensors[0].usage().power_on_count, 3);
    }

    #[test]
    fn step_function_marks_the_last_point_terminal() {
        let mut navigator = climber();
        let mut sensors = laser_only(test_terrain());
        let mut cursor = navigator.start(Point2::new(4, 1));

        let mut terminal = Vec::new();
        while let Some(outcome) = navigator.step(&mut cursor, &mut sensors).unwrap() {
            terminal.push(outcome.terminal);
        }

        assert_eq!(terminal, vec![false, false, true]);
        assert!(cursor.is_done());
        assert_eq!(navigator.step(&mut cursor, &mut sensors), Ok(None));
    }

    #[test]
    fn wide_beam_readings_reach_the_candidate_set() {
        // Peak at (1, 1); the radar reveals its whole neighbourhood from (0, 0).
        let rows: Vec<Vec<Height>> = (-2..=4)
            .rev()
            .map(|y: i32| {
                (-2..=4)
                    .map(|x: i32| 10 - Point2::new(x, y).max_orthogonal_distance(&Point2::new(1, 1)))
                    .collect()
            })
            .collect();
        let terrain: SharedTerrain = Arc::new(KnownHeightMap::from_matrix(
            &rows,
            Point2::new(-2, -2),
            true,
        ));
        let mut sensors: Vec<Box<dyn Sensor>> = vec![
            Box::new(SimulatedSensor::laser(Arc::clone(&terrain), 4, 2)),
            Box::new(SimulatedSensor::radar(terrain, 2, 5, 0)),
        ];

        let mut navigator = climber();
        let path: Vec<Waypoint> = navigator
            .navigate(Point2::new(0, 0), &mut sensors)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            path,
            vec![
                Waypoint::new(Point2::new(0, 0), HeightLookup::Known(9)),
                Waypoint::new(Point2::new(1, 1), HeightLookup::Known(10)),
            ]
        );
        assert_eq!(navigator.map().get(Point2::new(2, 2)), HeightLookup::Known(9));
        assert_eq!(navigator.map().len(), 25);
        assert_eq!(sensors[0].usage().power_on_count, 0);
        assert_eq!(sensors[1].usage().power_on_count, 1);
        assert_eq!(navigator.scan_cost_at(Point2::new(1, 1)), None);
    }

    #[test]
    fn off_terrain_readings_are_recorded() {
        let mut navigator = climber();
        let mut sensors = laser_only(test_terrain());
        let mut cursor = navigator.start(Point2::new(0, 0));
        navigator.step(&mut cursor, &mut sensors).unwrap();

        assert_eq!(
            navigator.map().get(Point2::new(-1, -1)),
            HeightLookup::OutOfBounds
        );
        assert_eq!(navigator.map().count_unknown_in_radius(Point2::new(0, 0), 1), 0);
    }

    #[test]
    fn gives_up_after_max_steps() {
        let rows: Vec<Vec<Height>> = (0..5).map(|_| (0..20).collect()).collect();
        let terrain: SharedTerrain =
            Arc::new(KnownHeightMap::from_matrix(&rows, Point2::ORIGIN, true));
        let mut sensors = laser_only(terrain);

        let mut navigator = Navigator::new(
            MoveStrategyType::SpiralOutCcw,
            Box::new(ExtractionPoint::new()),
        )
        .with_config(NavigatorConfig { max_steps: 2 });

        let results: Vec<_> = navigator.navigate(Point2::new(0, 0), &mut sensors).collect();
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok() && results[1].is_ok());
        assert_eq!(
            results[2],
            Err(NavigationError::StepLimitExceeded { limit: 2 })
        );
    }

    #[test]
    fn missing_sensor_aborts_the_run() {
        let mut navigator = climber();
        let mut sensors: Vec<Box<dyn Sensor>> = Vec::new();
        let mut run = navigator.navigate(Point2::new(4, 1), &mut sensors);

        assert_eq!(run.next(), Some(Err(NavigationError::NoSensorAvailable)));
        assert_eq!(run.next(), None);
    }

    #[test]
    fn starting_at_the_coordinate_edge_fails_cleanly() {
        let mut navigator = climber();
        let mut sensors = laser_only(test_terrain());
        let start = Point2::new(i32::MAX, 0);

        let results: Vec<_> = navigator.navigate(start, &mut sensors).collect();

        assert_eq!(
            results,
            vec![
                Ok(Waypoint::new(start, HeightLookup::OutOfBounds)),
                Err(NavigationError::NoKnownHeights { point: start }),
            ]
        );
        // The ring beyond the edge folds onto the edge column.
        assert_eq!(navigator.map().len(), 6);
        assert_eq!(navigator.scan_cost_at(start), Some(4 + 2 * 9));
    }

    #[test]
    fn restarting_forgets_the_previous_run() {
        let mut navigator = climber();
        let mut sensors = laser_only(test_terrain());
        navigator
            .navigate(Point2::new(4, 1), &mut sensors)
            .for_each(drop);
        assert_eq!(navigator.path().len(), 3);

        let mut run = navigator.navigate(Point2::new(4, 1), &mut sensors);
        run.next();
        drop(run);

        assert_eq!(navigator.path().len(), 1);
        assert_eq!(navigator.found(), None);
        assert_eq!(navigator.map().len(), 9);
    }

    #[test]
    fn path_record_pairs_points_with_costs() {
        let mut navigator = climber();
        let mut sensors = laser_only(test_terrain());
        navigator
            .navigate(Point2::new(4, 1), &mut sensors)
            .for_each(drop);

        let records = navigator.path_record();
        assert_eq!(
            records[0],
            PathRecord {
                x: 4,
                y: 1,
                z: Some(1),
                scan_cost: 22
            }
        );
        assert_eq!(records.last().map(|record| record.z), Some(Some(3)));
    }

    #[test]
    fn strategy_can_be_replaced_between_runs() {
        let mut navigator = climber().with_bounds(Point2::new(0, 0), Point2::new(6, 5));
        navigator.set_move_strategy(MoveStrategyType::Climb3Cardinal1Ordinal);
        assert_eq!(navigator.strategy().name(), "climb-3-cardinal-1-ordinal");

        let mut sensors = laser_only(test_terrain());
        let mut run = navigator.navigate(Point2::new(6, 5), &mut sensors);
        run.next();
        drop(run);

        assert_eq!(
            navigator.map().validity_bounds(),
            Some(Bounds::new(Point2::new(0, 0), Point2::new(6, 5)))
        );
        // Only the four cells inside the bounds needed scanning.
        assert_eq!(navigator.scan_cost_at(Point2::new(6, 5)), Some(4 + 2 * 4));
    }
}
