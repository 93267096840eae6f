//! A waypoint fixes position, velocity, and acceleration at a spline boundary.

use crate::vector2::Vector2;

/// A boundary condition for a [`crate::spline::Spline`] segment: the curve
/// must pass through `position` with first derivative `velocity` and second
/// derivative `acceleration`, with respect to the segment's local parameter.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
}

impl Waypoint {
    pub fn new(position: Vector2, velocity: Vector2, acceleration: Vector2) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.acceleration.is_finite()
    }
}
