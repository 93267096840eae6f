//! Error types for the path/velocity planning pipeline.

use thiserror::Error;

/// Failure modes surfaced by [`crate::spline`], [`crate::path`], and
/// [`crate::profile`]. All failures abort construction; there is no partial
/// recovery.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum PlannerError {
    /// Fewer than two waypoints were supplied to a path builder.
    #[error("at least two waypoints are required, got {0}")]
    DegenerateInput(usize),

    /// A supplied numeric input (`ds`, `width`, `max_velocity`,
    /// `max_acceleration`, or a waypoint component) was not finite and
    /// positive where required.
    #[error("invalid input '{field}': {value}")]
    InvalidInput { field: &'static str, value: f64 },

    /// The tangent vector at parameter `t` was zero, so it cannot be
    /// normalized into a unit tangent or heading.
    #[error("degenerate tangent at parameter t = {t}")]
    DegenerateTangent { t: f64 },

    /// Stage 4 (timestamp assignment) needed to divide by a zero sum of
    /// consecutive actual velocities across a nonzero arc-length gap.
    #[error(
        "path infeasible: zero velocity sum with nonzero distance {distance} between samples {index} and {}",
        index + 1
    )]
    PathInfeasible { index: usize, distance: f64 },

    /// Stage 6's outer consistency loop did not bring the measured per-wheel
    /// acceleration within the working ceiling after `iterations` attempts.
    #[error("wheel-acceleration consistency loop failed to converge after {iterations} iterations (measured {measured}, ceiling {ceiling})")]
    ConvergenceFailure {
        iterations: u32,
        measured: f64,
        ceiling: f64,
    },
}
