//! Small numerical helpers used by [`crate::spline`] and [`crate::path`]:
//! adaptive-quadrature arc length and a bracketed root-finder for
//! equal-arc-length resampling.
//!
//! Neither routine is exposed outside the crate; they exist purely to keep
//! `Spline::length`/`next` and `Path::length`/`next` free of duplicated
//! quadrature/bisection code.

const QUAD_TOL: f64 = 1e-10;
const ROOT_TOL: f64 = 1e-9;
const MAX_BRACKET_EXPANSIONS: u32 = 64;

/// Shared by [`crate::spline::Spline`] and [`crate::path::Path`]: anything
/// with a cached total arc length and an arc-length integral between two
/// parameter values can be resampled at a fixed `ds` the same way.
pub(crate) trait ArcLengthCurve {
    fn total_length(&self) -> f64;
    fn length(&self, a: f64, b: f64) -> f64;
}

/// Finds `s > t` such that `curve.length(t, s) == ds`, clamped to `1.0` once
/// the remaining arc length is shorter than `ds`.
pub(crate) fn next_parameter<C: ArcLengthCurve>(curve: &C, t: f64, ds: f64) -> f64 {
    if curve.length(0.0, t) + ds > curve.total_length() {
        return 1.0;
    }
    brent(|x| curve.length(t, x) - ds, t, 1.0)
}

/// Lazy, pull-based sequence of parameter values spaced `ds` apart by arc
/// length over `curve`, always ending with `1.0`. Pull-based so a caller
/// resampling at a small `ds` over a long curve never materializes the
/// whole sequence up front.
pub(crate) struct PlanningTimes<'a, C: ArcLengthCurve> {
    curve: &'a C,
    ds: f64,
    t: f64,
    finished: bool,
}

impl<'a, C: ArcLengthCurve> PlanningTimes<'a, C> {
    pub(crate) fn new(curve: &'a C, ds: f64) -> Self {
        Self {
            curve,
            ds,
            t: 0.0,
            finished: false,
        }
    }
}

impl<C: ArcLengthCurve> Iterator for PlanningTimes<'_, C> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.finished {
            return None;
        }
        if self.t < 1.0 {
            let out = self.t;
            self.t = next_parameter(self.curve, self.t, self.ds);
            Some(out)
        } else {
            self.finished = true;
            Some(1.0)
        }
    }
}

/// Adaptive Simpson's rule, recursively refining until successive estimates
/// agree to within `tol`. Mirrors the accuracy `scipy.integrate.quad` gives
/// the original implementation without pulling in an external quadrature
/// crate for a single integral.
pub(crate) fn adaptive_simpson<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> f64 {
    let fa = f(a);
    let fb = f(b);
    let m = 0.5 * (a + b);
    let fm = f(m);
    let whole = simpson(a, b, fa, fm, fb);
    adaptive_simpson_recurse(f, a, b, fa, fm, fb, whole, QUAD_TOL, 20)
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}

#[allow(clippy::too_many_arguments)]
fn adaptive_simpson_recurse<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
    tol: f64,
    depth: u32,
) -> f64 {
    let mid = 0.5 * (a + b);
    let lm = 0.5 * (a + mid);
    let rm = 0.5 * (mid + b);
    let flm = f(lm);
    let frm = f(rm);
    let left = simpson(a, mid, fa, flm, fm);
    let right = simpson(mid, b, fm, frm, fb);
    let refined = left + right;

    if depth == 0 || (refined - whole).abs() <= 15.0 * tol {
        refined + (refined - whole) / 15.0
    } else {
        adaptive_simpson_recurse(f, a, mid, fa, flm, fm, left, tol / 2.0, depth - 1)
            + adaptive_simpson_recurse(f, mid, b, fm, frm, fb, right, tol / 2.0, depth - 1)
    }
}

/// Brent's method for a root of `f` bracketed in `[lo, hi]`, assuming
/// `f(lo)` and `f(hi)` have opposite signs (or one is already ~0). Used to
/// solve `length(t, x) - ds = 0` for `x`, which is monotonically increasing
/// in `x` so the bracket from `next`'s guard always holds.
pub(crate) fn brent<F: Fn(f64) -> f64>(f: F, lo: f64, hi: f64) -> f64 {
    let mut a = lo;
    let mut b = hi;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa.abs() < ROOT_TOL {
        return a;
    }
    if fb.abs() < ROOT_TOL {
        return b;
    }

    // Defensive: if somehow not bracketed (can happen at the tail of a
    // spline due to quadrature roundoff), fall back to whichever endpoint
    // is closer to a root.
    if fa.signum() == fb.signum() {
        return if fa.abs() < fb.abs() { a } else { b };
    }

    let mut c = a;
    let mut fc = fa;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..MAX_BRACKET_EXPANSIONS {
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * ROOT_TOL;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return b;
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q);
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                let q0 = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * xm * q0 * (q0 - r) - (b - a) * (r - 1.0));
                q = (q0 - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += if xm > 0.0 { tol1 } else { -tol1 };
        }
        fb = f(b);
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
    }

    b
}
