//! The differential-drive robot's physical and kinematic limits.

use crate::errors::PlannerError;

/// Track gauge and kinematic ceilings for a differential-drive robot.
///
/// `VelocityProfile` construction never mutates a caller's `Robot` in
/// place; instead the profiler threads a private working acceleration
/// ceiling through its consistency loop and reports the converged value
/// separately (see [`crate::profile::VelocityProfile::converged_max_acceleration`]).
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    pub width: f64,
    pub max_velocity: f64,
    pub max_acceleration: f64,
}

impl Robot {
    pub fn new(width: f64, max_velocity: f64, max_acceleration: f64) -> Result<Self, PlannerError> {
        let robot = Robot {
            width,
            max_velocity,
            max_acceleration,
        };
        robot.validate()?;
        Ok(robot)
    }

    pub(crate) fn validate(&self) -> Result<(), PlannerError> {
        check_positive("width", self.width)?;
        check_positive("max_velocity", self.max_velocity)?;
        check_positive("max_acceleration", self.max_acceleration)?;
        Ok(())
    }
}

pub(crate) fn check_positive(field: &'static str, value: f64) -> Result<(), PlannerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PlannerError::InvalidInput { field, value })
    }
}
