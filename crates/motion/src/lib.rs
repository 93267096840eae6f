//! # Motion Crate
//!
//! Geometric and kinematic path planning for a differential-drive ground
//! robot: a quintic Bezier spline primitive, a `Path` that stitches splines
//! under one parameter domain with arc-length resampling, and a
//! `VelocityProfile` that turns a resampled path into a time-parameterized,
//! per-wheel motion plan.
//!
//! Provides core planning primitives:
//! - `Vector2` / `Waypoint`: the 2D geometry vocabulary.
//! - `Spline` / `Path`: continuous curve evaluation and arc-length queries.
//! - `Robot` / `VelocityProfile`: curvature and acceleration limited speed
//!   planning, with a wheel-acceleration consistency loop.

pub mod errors;
mod numerics;
pub mod path;
pub mod profile;
pub mod robot;
pub mod spline;
pub mod vector2;
pub mod waypoint;

pub use errors::PlannerError;
pub use path::Path;
pub use profile::{PlanningPoint, VelocityProfile};
pub use robot::Robot;
pub use spline::Spline;
pub use vector2::Vector2;
pub use waypoint::Waypoint;
