//! The pen: a polygonal approximation of a circle of radius `thickness/2`,
//! used to build round joins and round caps.

use raster2d_geom::{transform, Slope, Transform, Vector};
use std::f64::consts::PI;

/// One vertex of the pen's polygon: its device-space offset from the
/// stroke point it's centered on, plus the tangent slopes toward its
/// clockwise and counter-clockwise neighbors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PenVertex {
    pub offset: Vector<f64>,
    pub slope_cw: Slope,
    pub slope_ccw: Slope,
}

/// A polygonal circle, built once per distinct `(thickness, tolerance,
/// transform)` triple and shared across every round join/cap in a stroke.
#[derive(Clone, Debug)]
pub struct Pen {
    vertices: Vec<PenVertex>,
}

impl Pen {
    /// Builds the pen for a stroke of the given `thickness` under
    /// `transform`, accurate to `tolerance` (device-space distance).
    pub fn new(thickness: f64, tolerance: f64, transform: &Transform) -> Pen {
        let r = thickness * 0.5;
        let major = transform::major_axis(transform, r);

        if major <= 0.0 || tolerance >= 4.0 * major {
            // The whole circle collapses within tolerance: a single
            // point suffices.
            return Pen {
                vertices: vec![PenVertex {
                    offset: transform.transform_vector(Vector::new(r, 0.0)),
                    slope_cw: Slope::new(0.0, 0.0),
                    slope_ccw: Slope::new(0.0, 0.0),
                }],
            };
        }

        let cos_step = (1.0 - tolerance / major).clamp(-1.0, 1.0);
        let step_angle = cos_step.acos();
        let mut n = (2.0 * PI / step_angle).ceil() as usize;
        if n % 2 != 0 {
            n += 1;
        }
        n = n.max(4);

        let sign = if transform.determinant() < 0.0 { -1.0 } else { 1.0 };

        let offsets: Vec<Vector<f64>> = (0..n)
            .map(|i| {
                let angle = sign * (2.0 * PI * i as f64 / n as f64);
                let (s, c) = angle.sin_cos();
                transform.transform_vector(Vector::new(r * c, r * s))
            })
            .collect();

        let vertices = (0..n)
            .map(|i| {
                let next = offsets[(i + 1) % n];
                let prev = offsets[(i + n - 1) % n];
                let here = offsets[i];
                PenVertex {
                    offset: here,
                    slope_cw: Slope::from_vector(here - prev),
                    slope_ccw: Slope::from_vector(next - here),
                }
            })
            .collect();

        Pen { vertices }
    }

    pub fn vertices(&self) -> &[PenVertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The offsets of the vertex subrange spanned by a join from inbound
    /// slope `s_in` to outbound slope `s_out`.
    ///
    /// The pen's vertex array is built in angularly sorted order, so a
    /// binary search over the slopes would find the subrange directly;
    /// this does an equivalent linear scan instead. Pens are small (tens
    /// of vertices), so this has no observable effect beyond asymptotic
    /// cost.
    pub fn join_range(&self, s_in: Slope, s_out: Slope, clockwise: bool) -> Vec<Vector<f64>> {
        let n = self.vertices.len();
        if n == 0 {
            return Vec::new();
        }

        if clockwise {
            let start = (0..n)
                .find(|&i| self.vertices[i].slope_cw.compare(s_in) != std::cmp::Ordering::Less)
                .unwrap_or(0);
            let mut end = start;
            for k in 0..n {
                let i = (start + k) % n;
                if self.vertices[i].slope_cw.compare(s_out) == std::cmp::Ordering::Greater {
                    end = i;
                    break;
                }
                end = (start + k + 1) % n;
            }
            collect_range(&self.vertices, start, end, true)
        } else {
            let start = (0..n)
                .rev()
                .find(|&i| self.vertices[i].slope_ccw.compare(s_in) != std::cmp::Ordering::Less)
                .unwrap_or(n - 1);
            let mut end = start;
            for k in 0..n {
                let i = (start + n - k) % n;
                if self.vertices[i].slope_ccw.compare(s_out) == std::cmp::Ordering::Greater {
                    end = i;
                    break;
                }
                end = (start + n - k - 1 + n) % n;
            }
            collect_range(&self.vertices, start, end, false)
        }
    }
}

fn collect_range(vertices: &[PenVertex], start: usize, end: usize, forward: bool) -> Vec<Vector<f64>> {
    let n = vertices.len();
    let mut out = Vec::new();
    let mut i = start;
    loop {
        if i == end {
            break;
        }
        out.push(vertices[i].offset);
        i = if forward { (i + 1) % n } else { (i + n - 1) % n };
        if out.len() > n {
            break;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_count_is_even_and_at_least_four() {
        let pen = Pen::new(2.0, 0.1, &Transform::identity());
        assert!(pen.len() >= 4);
        assert_eq!(pen.len() % 2, 0);
    }

    #[test]
    fn vertices_lie_at_radius_thickness_over_two() {
        let thickness = 10.0;
        let pen = Pen::new(thickness, 0.05, &Transform::identity());
        for v in pen.vertices() {
            let dist = (v.offset.x * v.offset.x + v.offset.y * v.offset.y).sqrt();
            assert!((dist - thickness / 2.0).abs() < 1e-6);
        }
    }

    #[test]
    fn coarse_tolerance_yields_degenerate_single_vertex_pen() {
        let pen = Pen::new(1.0, 100.0, &Transform::identity());
        assert_eq!(pen.len(), 1);
    }

    #[test]
    fn tighter_tolerance_yields_more_vertices() {
        let loose = Pen::new(4.0, 1.0, &Transform::identity()).len();
        let tight = Pen::new(4.0, 0.01, &Transform::identity()).len();
        assert!(tight > loose);
    }
}
