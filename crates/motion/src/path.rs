//! Concatenation of splines into a single `[0, 1]`-parameterized curve.

use crate::errors::PlannerError;
use crate::numerics::{self, adaptive_simpson, ArcLengthCurve};
use crate::spline::Spline;
use crate::vector2::Vector2;
use crate::waypoint::Waypoint;

/// An end-to-end stitch of [`Spline`] segments under one parameter domain.
///
/// `t` in `[0, 1]` is scaled so each segment occupies an equal share of the
/// domain regardless of its own arc length: segment `k` covers
/// `[k/N, (k+1)/N]`. Building a `Path` from a waypoint list guarantees
/// consecutive splines share an endpoint position; tangent/curvature
/// continuity across joins is not required.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    splines: Vec<Spline>,
    total_length: f64,
}

impl Path {
    /// Builds a path from a waypoint list. Requires at least two waypoints,
    /// each with finite position/velocity/acceleration components.
    pub fn from_waypoints(waypoints: &[Waypoint]) -> Result<Self, PlannerError> {
        if waypoints.len() < 2 {
            return Err(PlannerError::DegenerateInput(waypoints.len()));
        }
        if let Some(index) = waypoints.iter().position(|w| !w.is_finite()) {
            return Err(PlannerError::InvalidInput {
                field: "waypoint",
                value: index as f64,
            });
        }
        let splines = waypoints
            .windows(2)
            .map(|pair| Spline::from_waypoints(&pair[0], &pair[1]))
            .collect();
        Ok(Self::from_splines(splines))
    }

    fn from_splines(splines: Vec<Spline>) -> Self {
        let mut path = Path {
            splines,
            total_length: 0.0,
        };
        path.total_length = path.length(0.0, 1.0);
        path
    }

    /// Number of spline segments.
    pub fn segments(&self) -> usize {
        self.splines.len()
    }

    /// Total arc length across all segments, cached and re-derived whenever
    /// a segment is added via [`Path::stitch`].
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Appends a spline to the end of the path and re-derives `total_length`.
    /// Does not check that the new segment agrees with the path's current
    /// endpoint; callers that need that guarantee should build splines from
    /// a shared waypoint, as [`Path::from_waypoints`] does.
    pub fn stitch(&mut self, spline: Spline) {
        self.splines.push(spline);
        self.total_length = self.length(0.0, 1.0);
    }

    /// Maps a global parameter to `(segment index, local parameter)`.
    fn pick_segment(&self, t: f64) -> (usize, f64) {
        let n = self.splines.len();
        if t <= 0.0 {
            (0, t)
        } else if t >= 1.0 {
            (n - 1, t * n as f64 - (n - 1) as f64)
        } else {
            let scaled = t * n as f64;
            let k = scaled.floor();
            (k as usize, scaled - k)
        }
    }

    pub fn eval(&self, t: f64) -> Vector2 {
        let (k, u) = self.pick_segment(t);
        self.splines[k].eval(u)
    }

    /// Derivative of the path's position with respect to the *global*
    /// parameter: `segments() * segment.tangent(local)`, since the local
    /// parameter advances `segments()` times faster than the global one.
    /// This scaling is what makes [`Path::length`]'s quadrature correct.
    pub fn tangent(&self, t: f64) -> Vector2 {
        let (k, u) = self.pick_segment(t);
        self.splines[k].tangent(u) * self.splines.len() as f64
    }

    pub fn unit_tangent(&self, t: f64) -> Result<Vector2, PlannerError> {
        let (k, u) = self.pick_segment(t);
        self.splines[k].unit_tangent(u)
    }

    pub fn unit_normal(&self, t: f64) -> Result<Vector2, PlannerError> {
        let (k, u) = self.pick_segment(t);
        self.splines[k].unit_normal(u)
    }

    pub fn heading(&self, t: f64) -> Result<f64, PlannerError> {
        let (k, u) = self.pick_segment(t);
        self.splines[k].heading(u)
    }

    pub fn curvature_radius(&self, t: f64) -> f64 {
        let (k, u) = self.pick_segment(t);
        self.splines[k].curvature_radius(u)
    }

    /// Arc length between two global parameters, by adaptive quadrature of
    /// `||tangent(t)||` over the global parameter.
    pub fn length(&self, a: f64, b: f64) -> f64 {
        adaptive_simpson(&|t| self.tangent(t).norm(), a, b)
    }

    /// Finds `s > t` such that `length(t, s) == ds`, clamped to `1.0`.
    pub fn next(&self, t: f64, ds: f64) -> f64 {
        numerics::next_parameter(self, t, ds)
    }

    /// Lazy sequence of global parameter values spaced `ds` apart by arc
    /// length, always ending with `1.0`.
    pub fn planning_times(&self, ds: f64) -> impl Iterator<Item = f64> + '_ {
        numerics::PlanningTimes::new(self, ds)
    }
}

impl ArcLengthCurve for Path {
    fn total_length(&self) -> f64 {
        self.total_length
    }

    fn length(&self, a: f64, b: f64) -> f64 {
        Path::length(self, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector2::Vector2;

    fn three_waypoint_path() -> Path {
        let waypoints = [
            Waypoint::new(Vector2::ZERO, Vector2::new(1.0, 0.0), Vector2::ZERO),
            Waypoint::new(Vector2::new(5.0, 0.0), Vector2::new(1.0, 1.0), Vector2::ZERO),
            Waypoint::new(Vector2::new(10.0, 5.0), Vector2::new(1.0, 0.0), Vector2::ZERO),
        ];
        Path::from_waypoints(&waypoints).unwrap()
    }

    #[test]
    fn requires_at_least_two_waypoints() {
        let one = [Waypoint::new(Vector2::ZERO, Vector2::ZERO, Vector2::ZERO)];
        assert_eq!(
            Path::from_waypoints(&one),
            Err(PlannerError::DegenerateInput(1))
        );
    }

    #[test]
    fn rejects_a_non_finite_waypoint_component() {
        let waypoints = [
            Waypoint::new(Vector2::ZERO, Vector2::new(1.0, 0.0), Vector2::ZERO),
            Waypoint::new(Vector2::new(f64::NAN, 0.0), Vector2::new(1.0, 0.0), Vector2::ZERO),
        ];
        assert_eq!(
            Path::from_waypoints(&waypoints),
            Err(PlannerError::InvalidInput { field: "waypoint", value: 1.0 })
        );
    }

    #[test]
    fn segment_count_matches_waypoint_count_minus_one() {
        let path = three_waypoint_path();
        assert_eq!(path.segments(), 2);
    }

    #[test]
    fn endpoint_continuity_across_segment_boundary() {
        let path = three_waypoint_path();
        let n = path.segments() as f64;
        for k in 0..path.segments() - 1 {
            let boundary = (k + 1) as f64 / n;
            let from_left = path.eval(boundary);
            let from_right = path.splines[k + 1].eval(0.0);
            assert!((from_left - from_right).norm() < 1e-9);
        }
    }

    #[test]
    fn total_length_equals_sum_of_segment_lengths() {
        let path = three_waypoint_path();
        let sum: f64 = path.splines.iter().map(|s| s.total_length()).sum();
        assert!((path.total_length() - sum).abs() < 1e-6);
    }

    #[test]
    fn planning_times_ends_at_one() {
        let path = three_waypoint_path();
        let times: Vec<f64> = path.planning_times(0.5).collect();
        assert_eq!(*times.last().unwrap(), 1.0);
        assert!(times.windows(2).all(|w| w[1] > w[0]));
    }
}
