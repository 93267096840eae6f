//! In-memory editing session backing the REPL: the waypoint list, the
//! robot's limits, and the most recently computed profile.

use anyhow::{bail, Result};
use motion::{Path, PlanningPoint, Robot, Vector2, VelocityProfile, Waypoint};
use tracing::{info, warn};

/// A named snapshot of the last successful [`VelocityProfile::build`],
/// flattened to owned data so the session doesn't need to hold a profile
/// borrowing a path it also owns.
#[derive(Debug, Clone)]
pub struct ComputedProfile {
    pub points: Vec<PlanningPoint>,
    pub total_time: f64,
    pub converged_max_acceleration: f64,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub waypoints: Vec<Waypoint>,
    pub robot: Robot,
    pub last_profile: Option<ComputedProfile>,
}

impl Session {
    pub fn new(waypoints: Vec<Waypoint>, robot: Robot) -> Self {
        Session {
            waypoints,
            robot,
            last_profile: None,
        }
    }

    pub fn add_waypoint(&mut self, waypoint: Waypoint) {
        self.waypoints.push(waypoint);
        self.last_profile = None;
    }

    /// Removes the waypoint at `index`, 0-based in list order.
    pub fn remove_waypoint(&mut self, index: usize) -> Result<()> {
        if index >= self.waypoints.len() {
            bail!("no waypoint at index {index}");
        }
        self.waypoints.remove(index);
        self.last_profile = None;
        Ok(())
    }

    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
        self.last_profile = None;
    }

    /// Sets one of the robot's scalar attributes by name, rejecting the
    /// change if it would leave the robot invalid.
    pub fn set_robot_attribute(&mut self, attribute: &str, value: f64) -> Result<()> {
        let mut candidate = self.robot;
        match attribute {
            "width" => candidate.width = value,
            "max_velocity" => candidate.max_velocity = value,
            "max_acceleration" => candidate.max_acceleration = value,
            other => bail!("unknown robot attribute: {other}"),
        }
        self.robot = Robot::new(candidate.width, candidate.max_velocity, candidate.max_acceleration)?;
        self.last_profile = None;
        Ok(())
    }

    /// Builds the path and velocity profile at arc-length step `ds`,
    /// caching the flattened result as `last_profile`.
    pub fn compute(&mut self, ds: f64) -> Result<()> {
        let path = Path::from_waypoints(&self.waypoints)?;
        info!(segments = path.segments(), ds, "built path, starting profile");

        let profile = VelocityProfile::build(&path, &self.robot, ds)?;
        if (profile.converged_max_acceleration() - self.robot.max_acceleration).abs() > 1e-12 {
            warn!(
                original = self.robot.max_acceleration,
                converged = profile.converged_max_acceleration(),
                "stage 6 reduced the working acceleration ceiling to converge"
            );
        }

        self.last_profile = Some(ComputedProfile {
            points: profile.points().to_vec(),
            total_time: profile.total_time(),
            converged_max_acceleration: profile.converged_max_acceleration(),
        });
        Ok(())
    }
}

/// Parses a `"x,y"` pair into a [`Vector2`], used by the REPL's `waypoint
/// add` command.
pub fn parse_vector2(text: &str) -> Result<Vector2> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("expected \"x,y\", got {text:?}"))?;
    let x: f64 = x.trim().parse().map_err(|_| anyhow::anyhow!("bad x component: {x:?}"))?;
    let y: f64 = y.trim().parse().map_err(|_| anyhow::anyhow!("bad y component: {y:?}"))?;
    Ok(Vector2::new(x, y))
}
