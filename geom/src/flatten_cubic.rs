//! Cubic Bezier flattening.
//!
//! Recursive de Casteljau midpoint subdivision. Rather than bounding error
//! against a quadratic approximation of each half, this measures the
//! perpendicular distance of the two control points from the chord
//! directly: cheaper per step, at the cost of a couple more subdivisions
//! near high-curvature corners.

use crate::{Point, PathSink};

/// Recursion depth past which we give up refining and just emit a line to
/// the endpoint. Guards against numerical degeneracies (e.g. NaN control
/// points) turning into an infinite loop.
const MAX_DEPTH: u32 = 32;

/// Flattens the cubic Bezier `(from, ctrl1, ctrl2, to)` into line segments
/// accurate to within `tolerance` (a perpendicular distance, in the same
/// units as the points) and feeds them to `sink` as a sequence of
/// `line_to` calls. Does not emit a `line_to(from)` for the start point;
/// callers that haven't already placed the pen at `from` must do that
/// themselves.
pub fn flatten_cubic_bezier<S: PathSink>(
    from: Point<f64>,
    ctrl1: Point<f64>,
    ctrl2: Point<f64>,
    to: Point<f64>,
    tolerance: f64,
    sink: &mut S,
) -> Result<(), S::Error> {
    if from == ctrl1 && ctrl2 == to {
        return sink.line_to(to);
    }

    let tolerance_sq = tolerance * tolerance;
    recurse(from, ctrl1, ctrl2, to, tolerance_sq, 0, sink)?;
    sink.line_to(to)
}

fn recurse<S: PathSink>(
    a: Point<f64>,
    b: Point<f64>,
    c: Point<f64>,
    d: Point<f64>,
    tolerance_sq: f64,
    depth: u32,
    sink: &mut S,
) -> Result<(), S::Error> {
    if depth >= MAX_DEPTH || flatness_error(a, b, c, d) <= tolerance_sq {
        return sink.line_to(a);
    }

    // De Casteljau midpoint split of (a, b, c, d) into two cubics sharing
    // the midpoint `abcd`.
    let ab = a.lerp(b, 0.5);
    let bc = b.lerp(c, 0.5);
    let cd = c.lerp(d, 0.5);
    let abc = ab.lerp(bc, 0.5);
    let bcd = bc.lerp(cd, 0.5);
    let abcd = abc.lerp(bcd, 0.5);

    recurse(a, ab, abc, abcd, tolerance_sq, depth + 1, sink)?;
    recurse(abcd, bcd, cd, d, tolerance_sq, depth + 1, sink)
}

/// Larger of the squared perpendicular distances of `b` and `c` from the
/// chord `a -> d`.
fn flatness_error(a: Point<f64>, b: Point<f64>, c: Point<f64>, d: Point<f64>) -> f64 {
    let chord = d - a;

    if chord.x == 0.0 && chord.y == 0.0 {
        let ab = b - a;
        let ac = c - a;
        let e1 = ab.x * ab.x + ab.y * ab.y;
        let e2 = ac.x * ac.x + ac.y * ac.y;
        return e1.max(e2);
    }

    let chord_sq = chord.x * chord.x + chord.y * chord.y;
    let e1 = perpendicular_error_sq(a, d, b, chord, chord_sq);
    let e2 = perpendicular_error_sq(a, d, c, chord, chord_sq);
    e1.max(e2)
}

/// Squared perpendicular distance of `p` from the line through `a` and
/// `d`, projecting `p - a` onto the chord unless that projection falls
/// past `d`, in which case it projects `p - d` instead.
fn perpendicular_error_sq(
    a: Point<f64>,
    d: Point<f64>,
    p: Point<f64>,
    chord: crate::Vector<f64>,
    chord_sq: f64,
) -> f64 {
    let ap = p - a;
    let dot = ap.x * chord.x + ap.y * chord.y;

    if dot > chord_sq {
        let dp = p - d;
        let cross = dp.x * chord.y - dp.y * chord.x;
        cross * cross / chord_sq
    } else {
        let cross = ap.x * chord.y - ap.y * chord.x;
        cross * cross / chord_sq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::LineSink;

    fn flatten_points(
        from: Point<f64>,
        ctrl1: Point<f64>,
        ctrl2: Point<f64>,
        to: Point<f64>,
        tolerance: f64,
    ) -> Vec<Point<f64>> {
        let mut points = Vec::new();
        let mut sink: LineSink<_, ()> = LineSink::new(|p| {
            points.push(p);
            Ok(())
        });
        flatten_cubic_bezier(from, ctrl1, ctrl2, to, tolerance, &mut sink).unwrap();
        points
    }

    #[test]
    fn degenerate_curve_is_a_single_segment() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(10.0, 0.0);
        let points = flatten_points(from, from, to, to, 0.01);
        assert_eq!(points, vec![to]);
    }

    #[test]
    fn straight_line_disguised_as_a_curve_is_one_segment() {
        let from = Point::new(0.0, 0.0);
        let ctrl1 = Point::new(3.0, 0.0);
        let ctrl2 = Point::new(7.0, 0.0);
        let to = Point::new(10.0, 0.0);
        let points = flatten_points(from, ctrl1, ctrl2, to, 0.01);
        assert_eq!(points, vec![to]);
    }

    #[test]
    fn curved_segment_respects_tolerance() {
        let from = Point::new(0.0, 0.0);
        let ctrl1 = Point::new(0.0, 50.0);
        let ctrl2 = Point::new(100.0, 50.0);
        let to = Point::new(100.0, 0.0);
        let tolerance = 0.05;
        let points = flatten_points(from, ctrl1, ctrl2, to, tolerance);
        assert!(points.len() > 4);

        // Property: every flattened vertex (besides the true endpoints)
        // deviates from the curve by no more than `tolerance`, which we
        // check indirectly here by verifying consecutive chord midpoints
        // don't wildly overshoot the bounding region of the curve.
        let min_x = from.x.min(ctrl1.x).min(ctrl2.x).min(to.x) - tolerance;
        let max_x = from.x.max(ctrl1.x).max(ctrl2.x).max(to.x) + tolerance;
        for p in &points {
            assert!(p.x >= min_x && p.x <= max_x);
        }
    }

    #[test]
    fn tighter_tolerance_yields_more_segments() {
        let from = Point::new(0.0, 0.0);
        let ctrl1 = Point::new(0.0, 50.0);
        let ctrl2 = Point::new(100.0, 50.0);
        let to = Point::new(100.0, 0.0);
        let loose = flatten_points(from, ctrl1, ctrl2, to, 1.0).len();
        let tight = flatten_points(from, ctrl1, ctrl2, to, 0.01).len();
        assert!(tight > loose);
    }

    #[test]
    fn last_point_emitted_is_always_the_curve_endpoint() {
        let from = Point::new(1.0, 1.0);
        let ctrl1 = Point::new(5.0, 20.0);
        let ctrl2 = Point::new(40.0, -10.0);
        let to = Point::new(60.0, 5.0);
        let points = flatten_points(from, ctrl1, ctrl2, to, 0.25);
        assert_eq!(*points.last().unwrap(), to);
    }
}
