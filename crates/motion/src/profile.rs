//! The velocity profiler: resampling, curvature-limited speed, the
//! forward/reverse acceleration sweeps, timestamps, wheel speeds, and the
//! wheel-acceleration consistency loop.
//!
//! Fields are populated in stages; rather than one struct with a handful of
//! `Option`s that get filled in over time, each stage consumes the previous
//! stage's point type and produces its own, so reading `actual_velocity`
//! before stage 2 has run is a compile error. Only the final
//! [`PlanningPoint`], after all stages have run, is exported from the crate.

use core::ops::Deref;

use crate::errors::PlannerError;
use crate::path::Path;
use crate::robot::{check_positive, Robot};
use crate::vector2::Vector2;

/// Per-iteration shrink factor applied to the working acceleration ceiling
/// in the wheel-acceleration consistency loop.
const CEILING_SHRINK: f64 = 0.75;
/// Consistency-loop iteration budget before giving up with `ConvergenceFailure`.
const MAX_CONSISTENCY_ITERATIONS: u32 = 64;
/// Below this, a radius is treated as "straight" (a literally straight
/// segment has `radius == infinity`; a curvature that overflows gives
/// `radius == 0.0` — both mean the outer-wheel speed bound doesn't apply).
fn is_straight(radius: f64) -> bool {
    radius == 0.0 || !radius.is_finite()
}

// --- Stage 0: resampling -----------------------------------------------

#[derive(Clone, Copy)]
struct ResampledPoint {
    position: Vector2,
    internal_time: f64,
    radius: f64,
    distance: f64,
    heading: f64,
}

fn resample(path: &Path, ds: f64) -> Result<Vec<ResampledPoint>, PlannerError> {
    let mut points = Vec::new();
    let mut last_t = 0.0;
    for t in path.planning_times(ds) {
        let point = ResampledPoint {
            position: path.eval(t),
            internal_time: t,
            radius: path.curvature_radius(t),
            distance: path.length(last_t, t),
            heading: path.heading(t)?,
        };
        points.push(point);
        last_t = t;
    }
    Ok(points)
}

// --- Stage 1: curvature-limited speed -----------------------------------

#[derive(Clone, Copy)]
struct SpeedBounded {
    base: ResampledPoint,
    max_velocity: f64,
}

impl Deref for SpeedBounded {
    type Target = ResampledPoint;
    fn deref(&self) -> &ResampledPoint {
        &self.base
    }
}

fn bound_speed(points: Vec<ResampledPoint>, robot: &Robot) -> Vec<SpeedBounded> {
    points
        .into_iter()
        .map(|base| {
            let max_velocity = curvature_limited_speed(base.radius, robot);
            SpeedBounded { base, max_velocity }
        })
        .collect()
}

fn curvature_limited_speed(radius: f64, robot: &Robot) -> f64 {
    if is_straight(radius) {
        robot.max_velocity
    } else if radius > 0.0 {
        radius * robot.max_velocity / (radius + robot.width / 2.0)
    } else {
        radius * robot.max_velocity / (radius - robot.width / 2.0)
    }
}

// --- Stages 2 & 3: forward and reverse acceleration sweeps --------------

#[derive(Clone, Copy)]
struct SweptPoint {
    base: SpeedBounded,
    actual_velocity: f64,
}

impl Deref for SweptPoint {
    type Target = SpeedBounded;
    fn deref(&self) -> &SpeedBounded {
        &self.base
    }
}

fn forward_sweep(points: &[SpeedBounded], max_accel: f64, initial_velocity: f64) -> Vec<SweptPoint> {
    let mut out = Vec::with_capacity(points.len());
    let mut prev: Option<f64> = None;
    for &base in points {
        let actual_velocity = match prev {
            None => initial_velocity.min(base.max_velocity),
            Some(prev_v) => {
                let obtainable = (prev_v * prev_v + 2.0 * max_accel * base.distance).sqrt();
                base.max_velocity.min(obtainable)
            }
        };
        prev = Some(actual_velocity);
        out.push(SweptPoint { base, actual_velocity });
    }
    out
}

fn reverse_sweep(mut points: Vec<SweptPoint>, max_accel: f64, final_velocity: f64) -> Vec<SweptPoint> {
    let mut next: Option<(f64, f64)> = None; // (actual_velocity, distance) of the point ahead
    for point in points.iter_mut().rev() {
        point.actual_velocity = match next {
            None => final_velocity.min(point.actual_velocity),
            Some((next_v, next_distance)) => {
                let obtainable = (next_v * next_v + 2.0 * max_accel * next_distance).sqrt();
                point.actual_velocity.min(obtainable)
            }
        };
        next = Some((point.actual_velocity, point.distance));
    }
    points
}

// --- Stage 4: timestamps -------------------------------------------------

#[derive(Clone, Copy)]
struct TimedPoint {
    base: SweptPoint,
    external_time: f64,
}

impl Deref for TimedPoint {
    type Target = SweptPoint;
    fn deref(&self) -> &SweptPoint {
        &self.base
    }
}

fn establish_timestamps(points: Vec<SweptPoint>) -> Result<Vec<TimedPoint>, PlannerError> {
    let mut out = Vec::with_capacity(points.len());
    let mut prev: Option<(f64, f64)> = None; // (external_time, actual_velocity)
    for (index, base) in points.into_iter().enumerate() {
        let external_time = match prev {
            None => 0.0,
            Some((prev_time, prev_v)) => {
                let speed_sum = base.actual_velocity + prev_v;
                if speed_sum <= 0.0 {
                    if base.distance > 0.0 {
                        return Err(PlannerError::PathInfeasible {
                            index: index - 1,
                            distance: base.distance,
                        });
                    }
                    prev_time
                } else {
                    prev_time + 2.0 * base.distance / speed_sum
                }
            }
        };
        prev = Some((external_time, base.actual_velocity));
        out.push(TimedPoint { base, external_time });
    }
    Ok(out)
}

// --- Stage 5: wheel speeds -----------------------------------------------

/// One fully-staged sample: a position on the path with a heading, a
/// timestamp, and the per-wheel linear speeds needed to reach it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanningPoint {
    pub position: Vector2,
    pub internal_time: f64,
    pub radius: f64,
    pub distance: f64,
    pub heading: f64,
    pub max_velocity: f64,
    pub actual_velocity: f64,
    pub external_time: f64,
    pub left_velocity: f64,
    pub right_velocity: f64,
}

fn wheel_speeds(points: Vec<TimedPoint>, robot: &Robot) -> Vec<PlanningPoint> {
    points
        .into_iter()
        .map(|p| {
            let (left_velocity, right_velocity) = if is_straight(p.radius) {
                (p.actual_velocity, p.actual_velocity)
            } else {
                let half_width = robot.width / 2.0;
                (
                    p.actual_velocity * (p.radius - half_width) / p.radius,
                    p.actual_velocity * (p.radius + half_width) / p.radius,
                )
            };
            PlanningPoint {
                position: p.position,
                internal_time: p.internal_time,
                radius: p.radius,
                distance: p.distance,
                heading: p.heading,
                max_velocity: p.max_velocity,
                actual_velocity: p.actual_velocity,
                external_time: p.external_time,
                left_velocity,
                right_velocity,
            }
        })
        .collect()
}

// --- Stage 6: wheel-acceleration consistency loop ------------------------

/// Maximum per-wheel acceleration measured across consecutive samples.
fn measured_max_wheel_acceleration(points: &[PlanningPoint]) -> f64 {
    points
        .windows(2)
        .filter_map(|w| {
            let dt = w[1].external_time - w[0].external_time;
            if dt <= 0.0 {
                return None;
            }
            let left_accel = (w[1].left_velocity - w[0].left_velocity).abs() / dt;
            let right_accel = (w[1].right_velocity - w[0].right_velocity).abs() / dt;
            Some(left_accel.max(right_accel))
        })
        .fold(0.0_f64, f64::max)
}

/// An ordered sequence of [`PlanningPoint`]s describing a feasible,
/// time-parameterized traversal of `path` by `robot`.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityProfile<'a> {
    path: &'a Path,
    robot: Robot,
    points: Vec<PlanningPoint>,
    total_time: f64,
    converged_max_acceleration: f64,
}

impl<'a> VelocityProfile<'a> {
    /// Builds a velocity profile over `path` for `robot`, resampling at
    /// arc-length step `ds`.
    pub fn build(path: &'a Path, robot: &Robot, ds: f64) -> Result<Self, PlannerError> {
        check_positive("ds", ds)?;
        robot.validate()?;

        let resampled = resample(path, ds)?;
        let bounded = bound_speed(resampled, robot);

        let mut working_max_accel = robot.max_acceleration;
        for iteration in 0..MAX_CONSISTENCY_ITERATIONS {
            let forward = forward_sweep(&bounded, working_max_accel, 0.0);
            let swept = reverse_sweep(forward, working_max_accel, 0.0);
            let timed = establish_timestamps(swept)?;
            let points = wheel_speeds(timed, robot);

            let measured = measured_max_wheel_acceleration(&points);
            if measured <= working_max_accel {
                let total_time = points.last().map(|p| p.external_time).unwrap_or(0.0);
                return Ok(VelocityProfile {
                    path,
                    robot: *robot,
                    points,
                    total_time,
                    converged_max_acceleration: working_max_accel,
                });
            }

            if iteration + 1 == MAX_CONSISTENCY_ITERATIONS {
                return Err(PlannerError::ConvergenceFailure {
                    iterations: MAX_CONSISTENCY_ITERATIONS,
                    measured,
                    ceiling: working_max_accel,
                });
            }
            working_max_accel *= CEILING_SHRINK;
        }
        unreachable!("loop always returns or errors on its last iteration");
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn points(&self) -> &[PlanningPoint] {
        &self.points
    }

    /// Timestamp of the last point.
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// The working acceleration ceiling the consistency loop converged on.
    /// Equal to `robot.max_acceleration` unless the loop needed to shrink it;
    /// the caller's `Robot` is never mutated.
    pub fn converged_max_acceleration(&self) -> f64 {
        self.converged_max_acceleration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waypoint::Waypoint;

    fn straight_line_path() -> Path {
        let waypoints = [
            Waypoint::new(Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0), Vector2::ZERO),
            Waypoint::new(Vector2::new(10.0, 0.0), Vector2::new(1.0, 0.0), Vector2::ZERO),
        ];
        Path::from_waypoints(&waypoints).unwrap()
    }

    fn quarter_circle_path() -> Path {
        // Control points chosen so the spline traces close to a unit-radius
        // quarter circle from (1, 0) to (0, 1).
        let waypoints = [
            Waypoint::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.88), Vector2::new(-1.88, 0.0)),
            Waypoint::new(Vector2::new(0.0, 1.0), Vector2::new(-1.88, 0.0), Vector2::new(0.0, -1.88)),
        ];
        Path::from_waypoints(&waypoints).unwrap()
    }

    #[test]
    fn straight_line_scenario() {
        let path = straight_line_path();
        let robot = Robot::new(2.0, 5.0, 5.0).unwrap();
        let profile = VelocityProfile::build(&path, &robot, 1.0).unwrap();

        let points = profile.points();
        assert!(points.len() >= 10 && points.len() <= 13);
        assert_eq!(points.first().unwrap().actual_velocity, 0.0);
        assert_eq!(points.last().unwrap().actual_velocity, 0.0);
        for p in points {
            assert!((p.max_velocity - 5.0).abs() < 1e-9);
            assert!((p.left_velocity - p.right_velocity).abs() < 1e-9);
        }
        assert!((profile.total_time() - 3.0).abs() / 3.0 < 0.05);
    }

    #[test]
    fn quarter_circle_scenario() {
        let path = quarter_circle_path();
        let robot = Robot::new(0.2, 1.0, 10.0).unwrap();
        let profile = VelocityProfile::build(&path, &robot, 0.1).unwrap();

        let expected_max_v = 1.0 / 1.1;
        for p in profile.points() {
            assert!((p.max_velocity - expected_max_v).abs() < 0.05);
        }
        let mid = &profile.points()[profile.points().len() / 2];
        assert!(mid.right_velocity > mid.left_velocity);
    }

    #[test]
    fn acceleration_bound_holds_between_consecutive_points() {
        let path = straight_line_path();
        let robot = Robot::new(2.0, 5.0, 5.0).unwrap();
        let profile = VelocityProfile::build(&path, &robot, 1.0).unwrap();
        let a_max = profile.converged_max_acceleration();
        for w in profile.points().windows(2) {
            let lhs = (w[1].actual_velocity.powi(2) - w[0].actual_velocity.powi(2)).abs();
            assert!(lhs <= 2.0 * a_max * w[1].distance + 1e-6);
        }
    }

    #[test]
    fn external_time_is_non_decreasing() {
        let path = straight_line_path();
        let robot = Robot::new(2.0, 5.0, 5.0).unwrap();
        let profile = VelocityProfile::build(&path, &robot, 1.0).unwrap();
        for w in profile.points().windows(2) {
            assert!(w[1].external_time >= w[0].external_time);
        }
    }

    #[test]
    fn rejects_fewer_than_two_waypoints_transitively() {
        let waypoints = [Waypoint::new(Vector2::ZERO, Vector2::ZERO, Vector2::ZERO)];
        assert_eq!(
            Path::from_waypoints(&waypoints),
            Err(PlannerError::DegenerateInput(1))
        );
    }

    fn swept(max_velocity: f64, actual_velocity: f64, distance: f64) -> SweptPoint {
        SweptPoint {
            base: SpeedBounded {
                base: ResampledPoint {
                    position: Vector2::ZERO,
                    internal_time: 0.0,
                    radius: f64::INFINITY,
                    distance,
                    heading: 0.0,
                },
                max_velocity,
            },
            actual_velocity,
        }
    }

    #[test]
    fn two_consecutive_stalled_points_with_real_distance_are_infeasible() {
        // A stretch where both endpoints settle to zero velocity (e.g. two
        // curvature ceilings that both collapsed toward zero) but the
        // samples are not coincident: the timestamp recurrence divides by
        // a zero speed sum and the move cannot be timed.
        let points = vec![swept(0.0, 0.0, 0.0), swept(0.0, 0.0, 0.5)];
        let err = establish_timestamps(points).unwrap_err();
        assert_eq!(
            err,
            PlannerError::PathInfeasible {
                index: 0,
                distance: 0.5,
            }
        );
    }

    #[test]
    fn coincident_stalled_points_are_not_infeasible() {
        // Zero speed sum but zero distance too: nothing to traverse, so the
        // timestamp just holds steady rather than erroring.
        let points = vec![swept(0.0, 0.0, 0.0), swept(0.0, 0.0, 0.0)];
        let timed = establish_timestamps(points).unwrap();
        assert_eq!(timed[1].external_time, timed[0].external_time);
    }
}
