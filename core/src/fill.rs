//! The fill plotter: the simpler of the two plotters. Walks the node
//! stream and emits polygon edges directly, with no offset geometry.

use crate::error::Error;
use crate::polygon::Polygon;
use raster2d_geom::flatten_cubic::flatten_cubic_bezier;
use raster2d_geom::Point;
use raster2d_path::PathNode;

/// Fills `nodes` into a [`Polygon`] accurate to `tolerance`, in the space
/// the points already live in (the caller applies `ctm`/supersampling
/// scale to the points before building the stream).
///
/// Requires the stream to be non-empty and well-formed: every subpath
/// with fewer than 3 distinct points, after flattening, is dropped as
/// degenerate rather than reported as an error.
pub fn plot_fill(nodes: &[PathNode], tolerance: f64) -> Result<Polygon, Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidPathData("empty node stream"));
    }

    let mut polygon = Polygon::new(1.0);

    let mut subpath_start: Option<Point<f64>> = None;
    let mut current: Option<Point<f64>> = None;
    let mut subpath_points: Vec<Point<f64>> = Vec::new();

    for node in nodes {
        match *node {
            PathNode::MoveTo { point } => {
                flush_subpath(&mut polygon, &subpath_points);
                subpath_start = Some(point);
                current = Some(point);
                subpath_points.clear();
                subpath_points.push(point);
            }
            PathNode::LineTo { point } => {
                let prev = current.ok_or(Error::InvalidState("LineTo before MoveTo"))?;
                if point != prev {
                    subpath_points.push(point);
                    current = Some(point);
                }
            }
            PathNode::CurveTo { p1, p2, p3 } => {
                let prev = current.ok_or(Error::InvalidState("CurveTo before MoveTo"))?;
                let mut sink = PointCollector { prev, out: &mut subpath_points };
                flatten_cubic_bezier(prev, p1, p2, p3, tolerance, &mut sink)
                    .map_err(|_| Error::OutOfMemory)?;
                current = Some(p3);
            }
            PathNode::ClosePath => {
                let start = subpath_start.ok_or(Error::InvalidState("ClosePath before MoveTo"))?;
                flush_subpath(&mut polygon, &subpath_points);
                subpath_points.clear();
                current = Some(start);
            }
        }
    }

    Ok(polygon)
}

struct PointCollector<'a> {
    prev: Point<f64>,
    out: &'a mut Vec<Point<f64>>,
}

impl<'a> raster2d_geom::PathSink for PointCollector<'a> {
    type Error = ();

    fn line_to(&mut self, p: Point<f64>) -> Result<(), ()> {
        if p != self.prev {
            self.out.push(p);
            self.prev = p;
        }
        Ok(())
    }

    fn curve_to(&mut self, _c1: Point<f64>, _c2: Point<f64>, to: Point<f64>) -> Result<(), ()> {
        self.line_to(to)
    }
}

/// Appends the closed polygon for one subpath's accumulated points,
/// dropping it if it has fewer than 3 distinct points.
fn flush_subpath(polygon: &mut Polygon, points: &[Point<f64>]) {
    if points.len() < 3 {
        return;
    }
    for w in points.windows(2) {
        polygon.add_edge(w[0], w[1]);
    }
    polygon.add_edge(points[points.len() - 1], points[0]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_geom::point;
    use raster2d_path::Path;

    #[test]
    fn triangle_has_two_non_horizontal_edges() {
        let mut b = Path::builder();
        b.move_to(point(5.0, 0.0))
            .line_to(point(10.0, 10.0))
            .line_to(point(0.0, 10.0))
            .close();
        let path = b.build();
        let polygon = plot_fill(path.nodes(), 0.1).unwrap();
        assert_eq!(polygon.edges().len(), 2);
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(plot_fill(&[], 0.1).is_err());
    }

    #[test]
    fn move_to_only_produces_no_edges() {
        let mut b = Path::builder();
        b.move_to(point(5.0, 5.0));
        let path = b.build();
        let polygon = plot_fill(path.nodes(), 0.1).unwrap();
        assert!(polygon.is_empty());
    }

    #[test]
    fn degenerate_two_point_subpath_is_dropped() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0)).line_to(point(10.0, 10.0)).close();
        let path = b.build();
        let polygon = plot_fill(path.nodes(), 0.1).unwrap();
        assert!(polygon.is_empty());
    }

    #[test]
    fn degenerate_line_to_before_real_geometry_does_not_affect_edge_count() {
        let mut a = Path::builder();
        a.move_to(point(10.0, 10.0))
            .line_to(point(10.0, 10.0))
            .line_to(point(20.0, 20.0))
            .line_to(point(10.0, 20.0))
            .close();
        let with_degenerate = a.build();

        let mut b = Path::builder();
        b.move_to(point(10.0, 10.0))
            .line_to(point(20.0, 20.0))
            .line_to(point(10.0, 20.0))
            .close();
        let without_degenerate = b.build();

        let pa = plot_fill(with_degenerate.nodes(), 0.1).unwrap();
        let pb = plot_fill(without_degenerate.nodes(), 0.1).unwrap();
        assert_eq!(pa.edges().len(), pb.edges().len());
    }
}
