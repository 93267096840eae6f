//! A single quintic Bezier segment between two waypoints.

use crate::errors::PlannerError;
use crate::numerics::{self, adaptive_simpson, ArcLengthCurve};
use crate::vector2::Vector2;
use crate::waypoint::Waypoint;

/// Tangent vectors below this magnitude are treated as zero when deciding
/// whether a unit tangent/normal/heading can be computed, and when deciding
/// whether the curve is locally straight.
const TANGENT_EPS: f64 = 1e-12;

/// A quintic polynomial curve in 2D, stored as six monomial coefficients
/// `c0 + c1*t + c2*t^2 + ... + c5*t^5`, valid for `t` in `[0, 1]`.
///
/// Built from two [`Waypoint`]s via [`Spline::from_waypoints`]; immutable
/// afterwards, with `total_length` cached at construction time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct Spline {
    c: [Vector2; 6],
    total_length: f64,
}

impl Spline {
    /// Builds the quintic Bezier curve interpolating `initial` and `final_`.
    ///
    /// `p0`/`p5` are the waypoint positions, `p1`/`p4` absorb the
    /// velocities, and `p2`/`p3` absorb the accelerations, then the
    /// Bernstein form is expanded into monomial
    /// coefficients.
    pub fn from_waypoints(initial: &Waypoint, final_: &Waypoint) -> Self {
        let p0 = initial.position;
        let p5 = final_.position;
        let p1 = p0 + initial.velocity * 0.2;
        let p2 = initial.acceleration * 0.05 + p1 * 2.0 - p0;
        let p4 = p5 - final_.velocity * 0.2;
        let p3 = final_.acceleration * 0.05 + p4 * 2.0 - p5;

        let c0 = p0;
        let c1 = p0 * -5.0 + p1 * 5.0;
        let c2 = p0 * 10.0 - p1 * 20.0 + p2 * 10.0;
        let c3 = p0 * -10.0 + p1 * 30.0 - p2 * 30.0 + p3 * 10.0;
        let c4 = p0 * 5.0 - p1 * 20.0 + p2 * 30.0 - p3 * 20.0 + p4 * 5.0;
        let c5 = -p0 + p1 * 5.0 - p2 * 10.0 + p3 * 10.0 - p4 * 5.0 + p5;

        let mut spline = Spline {
            c: [c0, c1, c2, c3, c4, c5],
            total_length: 0.0,
        };
        spline.total_length = spline.length(0.0, 1.0);
        spline
    }

    /// Arc length over `[0, 1]`, cached at construction time.
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Position at parameter `t`.
    pub fn eval(&self, t: f64) -> Vector2 {
        let mut acc = Vector2::ZERO;
        let mut power = 1.0;
        for coeff in self.c {
            acc = acc + coeff * power;
            power *= t;
        }
        acc
    }

    /// First derivative with respect to `t`.
    pub fn tangent(&self, t: f64) -> Vector2 {
        let mut acc = Vector2::ZERO;
        let mut power = 1.0;
        for (i, coeff) in self.c.iter().enumerate().skip(1) {
            acc = acc + *coeff * (i as f64 * power);
            power *= t;
        }
        acc
    }

    fn second_derivative(&self, t: f64) -> Vector2 {
        let mut acc = Vector2::ZERO;
        let mut power = 1.0;
        for (i, coeff) in self.c.iter().enumerate().skip(2) {
            acc = acc + *coeff * (i as f64 * (i - 1) as f64 * power);
            power *= t;
        }
        acc
    }

    /// Unit tangent at `t`. Fails if the tangent is the zero vector
    /// (degenerate waypoint data produced a stationary point).
    pub fn unit_tangent(&self, t: f64) -> Result<Vector2, PlannerError> {
        let tangent = self.tangent(t);
        let norm = tangent.norm();
        if norm < TANGENT_EPS {
            return Err(PlannerError::DegenerateTangent { t });
        }
        Ok(tangent * (1.0 / norm))
    }

    /// Unit tangent rotated -90 degrees.
    pub fn unit_normal(&self, t: f64) -> Result<Vector2, PlannerError> {
        Ok(self.unit_tangent(t)?.rotate_neg90())
    }

    /// Unsigned heading in `[0, pi]`: `arccos` of the unit tangent's dot
    /// product with the x-axis. The sign of the y-component is discarded by
    /// construction; callers that need a full `[-pi, pi]` heading should use
    /// `atan2` on the unit tangent components instead.
    pub fn heading(&self, t: f64) -> Result<f64, PlannerError> {
        let tangent = self.unit_tangent(t)?;
        Ok(tangent.x.clamp(-1.0, 1.0).acos())
    }

    fn curvature(&self, t: f64) -> f64 {
        let d1 = self.tangent(t);
        let d2 = self.second_derivative(t);
        let speed_sq = d1.dot(d1);
        if speed_sq < TANGENT_EPS {
            return 0.0;
        }
        (d1.x * d2.y - d1.y * d2.x) / speed_sq.powf(1.5)
    }

    /// Signed radius of curvature; `+infinity` for a (locally) straight
    /// segment.
    pub fn curvature_radius(&self, t: f64) -> f64 {
        let k = self.curvature(t);
        if k == 0.0 {
            f64::INFINITY
        } else {
            1.0 / k
        }
    }

    /// Arc length of the curve between `a` and `b`, by adaptive quadrature
    /// of `||tangent(t)||`.
    pub fn length(&self, a: f64, b: f64) -> f64 {
        adaptive_simpson(&|t| self.tangent(t).norm(), a, b)
    }

    /// Finds `s > t` such that `length(t, s) == ds`, clamped to `1.0` once
    /// the remaining arc length is shorter than `ds`.
    pub fn next(&self, t: f64, ds: f64) -> f64 {
        numerics::next_parameter(self, t, ds)
    }

    /// Lazy sequence of parameter values spaced `ds` apart by arc length,
    /// always ending with `1.0`.
    pub fn planning_times(&self, ds: f64) -> impl Iterator<Item = f64> + '_ {
        numerics::PlanningTimes::new(self, ds)
    }
}

impl ArcLengthCurve for Spline {
    fn total_length(&self) -> f64 {
        self.total_length
    }

    fn length(&self, a: f64, b: f64) -> f64 {
        Spline::length(self, a, b)
    }
}
