//! Edges, polygons, and the scanline edge query.

use crate::options::FillRule;
use raster2d_geom::Point;

/// A non-horizontal line segment in device (optionally supersampled)
/// space. `top < bottom`; `x_start` is the x at `top`; `x_inc` is dx per
/// unit dy; `dir` is `+1` if the original orientation went upward in y,
/// `-1` downward.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    pub top: f64,
    pub bottom: f64,
    pub x_start: f64,
    pub x_inc: f64,
    pub dir: i32,
}

impl Edge {
    /// Builds the edge for segment `a -> b`, or `None` if it's
    /// horizontal (horizontal segments are filtered at edge-creation
    /// time, never reported as an error).
    pub fn new(a: Point<f64>, b: Point<f64>) -> Option<Edge> {
        if a.y == b.y {
            return None;
        }

        // `dir` is +1 when the original a->b orientation decreased y
        // ("upward"), -1 when it increased y ("downward").
        let (top_point, bottom_point, dir) = if a.y < b.y {
            (a, b, -1)
        } else {
            (b, a, 1)
        };

        let x_inc = (bottom_point.x - top_point.x) / (bottom_point.y - top_point.y);

        Some(Edge {
            top: top_point.y,
            bottom: bottom_point.y,
            x_start: top_point.x,
            x_inc,
            dir,
        })
    }

    /// The x position of this edge at the sample center `y_center`.
    /// Caller must already have checked `top < y_center <= bottom`.
    pub fn x_at(&self, y_center: f64) -> f64 {
        (self.x_start + self.x_inc * (y_center - self.top)).round()
    }
}

/// An unordered collection of edges plus the axis-aligned extent they
/// enclose, in device (supersampled) space.
#[derive(Clone, Debug, Default)]
pub struct Polygon {
    edges: Vec<Edge>,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    /// Supersampling scale used when these edges were built from
    /// user-space points.
    pub scale: f64,
}

impl Polygon {
    pub fn new(scale: f64) -> Self {
        Polygon {
            edges: Vec::new(),
            top: f64::INFINITY,
            bottom: f64::NEG_INFINITY,
            left: f64::INFINITY,
            right: f64::NEG_INFINITY,
            scale,
        }
    }

    /// Appends an edge for `a -> b` if it is not horizontal, and grows
    /// the extent to cover both endpoints.
    pub fn add_edge(&mut self, a: Point<f64>, b: Point<f64>) {
        self.left = self.left.min(a.x).min(b.x);
        self.right = self.right.max(a.x).max(b.x);
        self.top = self.top.min(a.y).min(b.y);
        self.bottom = self.bottom.max(a.y).max(b.y);

        if let Some(edge) = Edge::new(a, b) {
            self.edges.push(edge);
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether `(x, y)`, in the same space as this polygon's extent,
    /// could possibly be inside it. A short-circuit used before doing
    /// any per-scanline work.
    pub fn in_box(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// The horizontal spans covered by this polygon at integer scanline
    /// `y`, under `fill_rule`.
    pub fn spans_at(&self, y: i64, fill_rule: FillRule) -> Vec<(f64, f64)> {
        let y_center = y as f64 + 0.5;

        let mut crossings: Vec<(f64, i32)> = self
            .edges
            .iter()
            .filter(|e| e.top < y_center && y_center <= e.bottom)
            .map(|e| (e.x_at(y_center), e.dir))
            .collect();

        crossings.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

        let mut spans = Vec::new();
        match fill_rule {
            FillRule::EvenOdd => {
                let mut it = crossings.chunks_exact(2);
                for pair in &mut it {
                    spans.push((pair[0].0, pair[1].0));
                }
            }
            FillRule::NonZero => {
                let mut winding = 0;
                let mut span_start = None;
                for (x, dir) in crossings {
                    let was_zero = winding == 0;
                    winding += dir;
                    if was_zero && winding != 0 {
                        span_start = Some(x);
                    } else if !was_zero && winding == 0 {
                        if let Some(start) = span_start.take() {
                            spans.push((start, x));
                        }
                    }
                }
            }
        }
        spans
    }
}
