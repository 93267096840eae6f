//! Scenario file loading.
//!
//! A scenario is a flat list of waypoints plus three robot limits, so a
//! self-describing table format (`serde` + `toml`) fits better than an
//! INI-style key/value config.

use std::path::Path;

use anyhow::{Context, Result};
use motion::{Robot, Vector2, Waypoint};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    ds: f64,
    robot: RobotFile,
    #[serde(default, rename = "waypoint")]
    waypoints: Vec<WaypointFile>,
}

#[derive(Debug, Deserialize)]
struct RobotFile {
    width: f64,
    max_velocity: f64,
    max_acceleration: f64,
}

#[derive(Debug, Deserialize)]
struct WaypointFile {
    position: [f64; 2],
    velocity: [f64; 2],
    acceleration: [f64; 2],
}

impl From<WaypointFile> for Waypoint {
    fn from(w: WaypointFile) -> Self {
        Waypoint::new(
            Vector2::new(w.position[0], w.position[1]),
            Vector2::new(w.velocity[0], w.velocity[1]),
            Vector2::new(w.acceleration[0], w.acceleration[1]),
        )
    }
}

/// A fully loaded, not-yet-validated scenario: waypoints, robot limits, and
/// the arc-length resampling step.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub waypoints: Vec<Waypoint>,
    pub robot: Robot,
    pub ds: f64,
}

/// Loads a scenario from a TOML file at `path`.
///
/// Expected shape:
///
/// ```toml
/// ds = 0.1
///
/// [robot]
/// width = 0.5
/// max_velocity = 2.0
/// max_acceleration = 3.0
///
/// [[waypoint]]
/// position = [0.0, 0.0]
/// velocity = [1.0, 0.0]
/// acceleration = [0.0, 0.0]
/// ```
pub fn load(path: &Path) -> Result<Scenario> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file: {:?}", path))?;
    let parsed: ScenarioFile =
        toml::from_str(&raw).with_context(|| format!("failed to parse scenario file: {:?}", path))?;

    let robot = Robot::new(
        parsed.robot.width,
        parsed.robot.max_velocity,
        parsed.robot.max_acceleration,
    )
    .context("invalid [robot] limits in scenario file")?;

    Ok(Scenario {
        waypoints: parsed.waypoints.into_iter().map(Waypoint::from).collect(),
        robot,
        ds: parsed.ds,
    })
}
