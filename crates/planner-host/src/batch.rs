//! Non-interactive batch processing: load a scenario, compute its profile
//! once, and render the JSON wire format.

use std::path::Path;

use anyhow::{Context, Result};
use motion::VelocityProfile;
use tracing::{info, warn};

use crate::config;
use crate::output;

/// Loads the scenario at `scenario_path`, builds its path and velocity
/// profile, and returns the pretty-printed JSON wire format.
pub fn run(scenario_path: &Path) -> Result<String> {
    info!(?scenario_path, "loading scenario");
    let scenario = config::load(scenario_path)?;

    let path = motion::Path::from_waypoints(&scenario.waypoints)
        .with_context(|| format!("failed to build path from scenario {:?}", scenario_path))?;
    info!(segments = path.segments(), "path built");

    let profile = VelocityProfile::build(&path, &scenario.robot, scenario.ds)
        .with_context(|| format!("failed to build velocity profile for scenario {:?}", scenario_path))?;

    if (profile.converged_max_acceleration() - scenario.robot.max_acceleration).abs() > 1e-12 {
        warn!(
            original = scenario.robot.max_acceleration,
            converged = profile.converged_max_acceleration(),
            "stage 6 reduced the working acceleration ceiling to converge"
        );
    }
    info!(points = profile.points().len(), total_time = profile.total_time(), "batch complete");

    output::to_json(profile.points()).context("failed to serialize planning points")
}
