//! Circular arc to cubic Bezier approximation.
//!
//! Each leaf arc (sweep `<= pi`) is approximated with Goldapp's tangent
//! construction: control points placed along the tangent at each endpoint,
//! scaled by `h = (4/3) * tan(dtheta/4)`.

use crate::{point, Point, PathSink, Transform};
use core::f64::consts::PI;

/// Direction a sweep is walked in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Mathematical-convention counter-clockwise, low angle to high angle.
    Forward,
    /// Mathematical-convention clockwise, high angle to low angle.
    Reverse,
}

/// Tabulated `(pi/k, err_k)` pairs, `k = 1..=11`, for the closed-form
/// per-leaf error `(2/27) * sin^6(theta/4) / cos^2(theta/4)` at radius 1.
/// `f64::sin`/`f64::cos` aren't `const fn` on stable, so the table is built
/// on first use rather than at compile time.
fn error_table() -> [(f64, f64); 11] {
    let mut table = [(0.0, 0.0); 11];
    for (k, slot) in table.iter_mut().enumerate() {
        let theta = PI / (k as f64 + 1.0);
        *slot = (theta, arc_error_at_radius_one(theta));
    }
    table
}

fn arc_error_at_radius_one(theta: f64) -> f64 {
    let s = (theta * 0.25).sin();
    let c = (theta * 0.25).cos();
    (2.0 / 27.0) * s.powi(6) / (c * c)
}

/// The largest `theta_max` (up to `pi`) whose per-leaf error at radius 1 is
/// below `max_error`, found via the tabulated `(pi/k, err_k)` pairs, then
/// refined by binary search over `pi/k` for non-tabulated values.
fn max_angle_for_error(max_error: f64) -> f64 {
    let table = error_table();

    if max_error >= table[0].1 {
        return table[0].0;
    }
    if max_error <= table[table.len() - 1].1 {
        // Binary search k in [11, 1000] for pi/k whose error is just under
        // max_error.
        let mut lo: f64 = 11.0;
        let mut hi: f64 = 1000.0;
        for _ in 0..40 {
            let mid = (lo + hi) * 0.5;
            let theta = PI / mid;
            if arc_error_at_radius_one(theta) > max_error {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        return PI / hi;
    }

    // Error falls strictly between two tabulated entries: binary search
    // the continuous k in between them.
    for w in table.windows(2) {
        let (theta_a, err_a) = w[0];
        let (theta_b, err_b) = w[1];
        if max_error <= err_a && max_error >= err_b {
            let k_a = PI / theta_a;
            let k_b = PI / theta_b;
            let mut lo = k_a;
            let mut hi = k_b;
            for _ in 0..40 {
                let mid = (lo + hi) * 0.5;
                let theta = PI / mid;
                if arc_error_at_radius_one(theta) > max_error {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            return PI / hi;
        }
    }
    table[table.len() - 1].0
}

/// Emits cubic Bezier approximations of the arc `(xc, yc, r)` swept from
/// `theta0` to `theta1` (`theta0 <= theta1`) in the given traversal
/// direction, under `transform`, accurate to `tolerance` (device-space
/// perpendicular distance). Emits an initial `line_to` connecting the
/// caller's current point to the arc's first point, followed by one
/// `curve_to` per leaf segment.
///
/// No-ops (emits nothing) if either angle is non-finite.
pub fn flatten_arc<S: PathSink>(
    xc: f64,
    yc: f64,
    r: f64,
    theta0: f64,
    theta1: f64,
    direction: Direction,
    transform: &Transform,
    tolerance: f64,
    sink: &mut S,
) -> Result<(), S::Error> {
    if !theta0.is_finite() || !theta1.is_finite() {
        return Ok(());
    }

    let major = crate::transform::major_axis(transform, r);
    let max_error = if major > 0.0 { tolerance / major } else { tolerance };
    let theta_max = max_angle_for_error(max_error);

    let mut sweep = theta1 - theta0;
    let two_pi = 2.0 * PI;
    let revolution_limit = two_pi * 65536.0;
    if sweep.abs() > revolution_limit {
        let revolutions = (sweep / two_pi).trunc();
        sweep -= revolutions * two_pi;
    }

    let first_theta = match direction {
        Direction::Forward => theta0,
        Direction::Reverse => theta0 + sweep,
    };
    let first = arc_point(xc, yc, r, first_theta, transform);
    sink.line_to(first)?;

    emit_sweep(xc, yc, r, theta0, theta0 + sweep, direction, transform, theta_max, sink)
}

fn emit_sweep<S: PathSink>(
    xc: f64,
    yc: f64,
    r: f64,
    theta0: f64,
    theta1: f64,
    direction: Direction,
    transform: &Transform,
    theta_max: f64,
    sink: &mut S,
) -> Result<(), S::Error> {
    let sweep = theta1 - theta0;
    if sweep.abs() > PI {
        let mid = theta0 + sweep * 0.5;
        match direction {
            Direction::Forward => {
                emit_sweep(xc, yc, r, theta0, mid, direction, transform, theta_max, sink)?;
                emit_sweep(xc, yc, r, mid, theta1, direction, transform, theta_max, sink)
            }
            Direction::Reverse => {
                emit_sweep(xc, yc, r, mid, theta1, direction, transform, theta_max, sink)?;
                emit_sweep(xc, yc, r, theta0, mid, direction, transform, theta_max, sink)
            }
        }
    } else {
        emit_leaf(xc, yc, r, theta0, theta1, direction, transform, theta_max, sink)
    }
}

fn emit_leaf<S: PathSink>(
    xc: f64,
    yc: f64,
    r: f64,
    theta0: f64,
    theta1: f64,
    direction: Direction,
    transform: &Transform,
    theta_max: f64,
    sink: &mut S,
) -> Result<(), S::Error> {
    let sweep = theta1 - theta0;
    let n = ((sweep.abs() / theta_max).ceil() as u32).max(1);
    let step = sweep / n as f64;

    let indices: Vec<u32> = match direction {
        Direction::Forward => (0..n).collect(),
        Direction::Reverse => (0..n).rev().collect(),
    };

    for i in indices {
        let a0 = theta0 + step * i as f64;
        let a1 = theta0 + step * (i as f64 + 1.0);
        let (_from, to, ctrl1, ctrl2) = match direction {
            Direction::Forward => goldapp_segment(xc, yc, r, a0, a1, transform),
            Direction::Reverse => {
                let (f, t, c1, c2) = goldapp_segment(xc, yc, r, a0, a1, transform);
                (t, f, c2, c1)
            }
        };
        sink.curve_to(ctrl1, ctrl2, to)?;
    }
    Ok(())
}

/// Builds one Goldapp cubic segment over `[a0, a1]` (`a1 >= a0`,
/// `a1 - a0 <= theta_max`), returning `(from, to, ctrl1, ctrl2)` in
/// forward (low-to-high angle) order.
fn goldapp_segment(
    xc: f64,
    yc: f64,
    r: f64,
    a0: f64,
    a1: f64,
    transform: &Transform,
) -> (Point<f64>, Point<f64>, Point<f64>, Point<f64>) {
    let dtheta = a1 - a0;
    let h = (4.0 / 3.0) * (dtheta * 0.25).tan();

    let (s0, c0) = a0.sin_cos();
    let (s1, c1) = a1.sin_cos();

    let from_user = point(xc + r * c0, yc + r * s0);
    let to_user = point(xc + r * c1, yc + r * s1);
    let ctrl1_user = point(from_user.x - h * r * s0, from_user.y + h * r * c0);
    let ctrl2_user = point(to_user.x + h * r * s1, to_user.y - h * r * c1);

    (
        transform.transform_point(from_user),
        transform.transform_point(to_user),
        transform.transform_point(ctrl1_user),
        transform.transform_point(ctrl2_user),
    )
}

fn arc_point(xc: f64, yc: f64, r: f64, theta: f64, transform: &Transform) -> Point<f64> {
    let (s, c) = theta.sin_cos();
    transform.transform_point(point(xc + r * c, yc + r * s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::LineSink;

    fn flatten(
        theta0: f64,
        theta1: f64,
        direction: Direction,
        tolerance: f64,
    ) -> Vec<Point<f64>> {
        let mut points = Vec::new();
        let mut sink: LineSink<_, ()> = LineSink::new(|p| {
            points.push(p);
            Ok(())
        });
        flatten_arc(
            0.0,
            0.0,
            10.0,
            theta0,
            theta1,
            direction,
            &Transform::identity(),
            tolerance,
            &mut sink,
        )
        .unwrap();
        points
    }

    #[test]
    fn endpoints_lie_on_the_circle() {
        let points = flatten(0.0, PI, Direction::Forward, 0.1);
        for p in &points {
            let radius = (p.x * p.x + p.y * p.y).sqrt();
            assert!((radius - 10.0).abs() < 1e-6);
        }
    }

    #[test]
    fn last_point_is_the_sweep_end() {
        let points = flatten(0.0, PI / 2.0, Direction::Forward, 0.1);
        let last = *points.last().unwrap();
        assert!((last.x - 0.0).abs() < 1e-6);
        assert!((last.y - 10.0).abs() < 1e-6);
    }

    #[test]
    fn reverse_direction_ends_at_the_low_angle() {
        let points = flatten(0.0, PI / 2.0, Direction::Reverse, 0.1);
        let last = *points.last().unwrap();
        assert!((last.x - 10.0).abs() < 1e-6);
        assert!((last.y - 0.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_angle_emits_nothing() {
        let points = flatten(0.0, f64::NAN, Direction::Forward, 0.1);
        assert!(points.is_empty());
    }

    #[test]
    fn tighter_tolerance_emits_more_curves() {
        // One line_to plus N curve_to's; compare counts.
        let loose = flatten(0.0, PI, Direction::Forward, 1.0).len();
        let tight = flatten(0.0, PI, Direction::Forward, 0.001).len();
        assert!(tight >= loose);
    }

    #[test]
    fn full_circle_sweep_splits_at_pi() {
        let points = flatten(0.0, 2.0 * PI, Direction::Forward, 0.1);
        // At least the line_to plus two leaves' worth of curves.
        assert!(points.len() >= 3);
    }
}
