//! A single stroked segment's offset geometry: corner points, miter
//! intersection, miter-limit test, and cap emission.

use crate::options::LineCap;
use crate::pen::Pen;
use raster2d_geom::{Point, Slope, Transform, Vector, EPSILON};

/// The geometry of one stroked segment from `p0` to `p1`.
#[derive(Copy, Clone, Debug)]
pub struct Face {
    pub p0: Point<f64>,
    pub p1: Point<f64>,
    /// Device-space direction `p1 - p0`.
    pub slope: Vector<f64>,
    /// The perpendicular offset added to get the CCW ("outer" by
    /// convention) side; subtracted for the CW side.
    pub offset: Vector<f64>,
}

impl Face {
    /// Builds the face for segment `p0 -> p1` at the given stroke
    /// `thickness`, under transform `ctm`.
    pub fn new(p0: Point<f64>, p1: Point<f64>, thickness: f64, ctm: &Transform) -> Face {
        let slope = p1 - p0;
        let half_width = thickness * 0.5;

        let offset = if *ctm == Transform::identity() {
            let s = Slope::from_vector(slope).normalize();
            s.rotate_ccw().to_vector() * half_width
        } else {
            let user_slope = raster2d_geom::transform::device_to_user_distance(ctm, slope)
                .unwrap_or(slope);
            let s = Slope::from_vector(user_slope).normalize().rotate_ccw();
            let mut user_offset = s.to_vector() * half_width;
            if ctm.determinant() < 0.0 {
                user_offset = -user_offset;
            }
            ctm.transform_vector(user_offset)
        };

        Face { p0, p1, slope, offset }
    }

    pub fn p0_cw(&self) -> Point<f64> {
        self.p0 - self.offset
    }

    pub fn p0_ccw(&self) -> Point<f64> {
        self.p0 + self.offset
    }

    pub fn p1_cw(&self) -> Point<f64> {
        self.p1 - self.offset
    }

    pub fn p1_ccw(&self) -> Point<f64> {
        self.p1 + self.offset
    }

    /// A face for the reverse segment `p1 -> p0`, used so `cap_p0` can
    /// share the `cap` implementation written for `cap_p1`.
    pub fn flipped(&self) -> Face {
        Face {
            p0: self.p1,
            p1: self.p0,
            slope: -self.slope,
            offset: -self.offset,
        }
    }

    /// The outer corner for the given side at `p1`.
    pub fn p1_outer(&self, clockwise: bool) -> Point<f64> {
        if clockwise {
            self.p1_ccw()
        } else {
            self.p1_cw()
        }
    }

    pub fn p1_inner(&self, clockwise: bool) -> Point<f64> {
        if clockwise {
            self.p1_cw()
        } else {
            self.p1_ccw()
        }
    }

    pub fn p0_outer(&self, clockwise: bool) -> Point<f64> {
        if clockwise {
            self.p0_ccw()
        } else {
            self.p0_cw()
        }
    }

    pub fn p0_inner(&self, clockwise: bool) -> Point<f64> {
        if clockwise {
            self.p0_cw()
        } else {
            self.p0_ccw()
        }
    }
}

/// Intersection of two faces' offset lines on one side (outer or inner),
/// sharing corner `p1`.
///
/// Solves for `y` via the stable symmetric closed form, then picks
/// whichever face's slope has the larger-magnitude `dy` to solve for `x`
/// (dividing by the larger-magnitude denominator).
pub fn miter_intersection(inbound: Point<f64>, d_in: Vector<f64>, outbound: Point<f64>, d_out: Vector<f64>) -> Option<Point<f64>> {
    let c1 = d_in.y * inbound.x - d_in.x * inbound.y;
    let c2 = d_out.y * outbound.x - d_out.x * outbound.y;
    let det = d_in.x * d_out.y - d_in.y * d_out.x;
    if det.abs() < EPSILON {
        return None;
    }

    let y = (d_in.y * c2 - d_out.y * c1) / det;
    let x = if d_in.y.abs() >= d_out.y.abs() {
        if d_in.y.abs() < EPSILON {
            return None;
        }
        inbound.x + (y - inbound.y) * d_in.x / d_in.y
    } else {
        outbound.x + (y - outbound.y) * d_out.x / d_out.y
    };

    Some(Point::new(x, y))
}

/// Normalized-form miter-limit test: passes (use the miter) iff
/// `2 <= miter_limit^2 * (1 + in.dot(out))`, with `in`/`out` unit
/// direction vectors.
pub fn within_miter_limit(in_slope: Slope, out_slope: Slope, miter_limit: f64) -> bool {
    let a = in_slope.normalize();
    let b = out_slope.normalize();
    2.0 <= miter_limit * miter_limit * (1.0 + a.dot(b))
}

/// Appends the cap polyline from `p1_cw` to `p1_ccw` (or the reverse,
/// depending on `clockwise`) onto `out`.
pub fn emit_cap(face: &Face, cap: LineCap, pen: &Pen, clockwise: bool, out: &mut Vec<Point<f64>>) {
    let (from, to) = if clockwise {
        (face.p1_cw(), face.p1_ccw())
    } else {
        (face.p1_ccw(), face.p1_cw())
    };

    match cap {
        LineCap::Butt => {
            out.push(from);
            out.push(to);
        }
        LineCap::Square => {
            let dir = Slope::from_vector(face.slope).normalize().to_vector();
            let half_width = (face.offset.x * face.offset.x + face.offset.y * face.offset.y).sqrt();
            out.push(from + dir * half_width);
            out.push(to + dir * half_width);
        }
        LineCap::Round => {
            out.push(from);
            let tangent = Slope::from_vector(face.slope);
            let reverse = Slope::new(-tangent.dx, -tangent.dy);
            let (s_in, s_out) = if clockwise {
                (tangent, reverse)
            } else {
                (reverse, tangent)
            };
            for offset in pen.join_range(s_in, s_out, clockwise) {
                out.push(face.p1 + offset);
            }
            out.push(to);
        }
    }
}

/// `cap_p0`: flips the face so the same [`emit_cap`] logic serves both
/// ends of a segment.
pub fn emit_cap_p0(face: &Face, cap: LineCap, pen: &Pen, clockwise: bool, out: &mut Vec<Point<f64>>) {
    emit_cap(&face.flipped(), cap, pen, clockwise, out);
}
