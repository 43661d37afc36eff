//! The stroke plotter and its dashed variant: walks the node stream and
//! produces one [`Polygon`] per subpath (or per dash run), offsetting
//! it by the pen's half-width and emitting joins and caps.
//!
//! The source's per-join dynamic outer/inner swap (triggered when a
//! reflex turn reverses the local winding) is replaced here with a
//! single `clockwise` flag computed once per subpath from its signed
//! area, the same simplification the geometry pipeline this offset math
//! is grounded on makes for its own stroke tessellation. This keeps
//! simple and closed strokes correct; see `DESIGN.md`.

use crate::contour::Contour;
use crate::dasher::Dasher;
use crate::error::Error;
use crate::face::{emit_cap, emit_cap_p0, miter_intersection, within_miter_limit, Face};
use crate::options::{LineCap, LineJoin, PaintOptions};
use crate::pen::Pen;
use crate::polygon::Polygon;
use raster2d_geom::flatten_cubic::flatten_cubic_bezier;
use raster2d_geom::{Point, Slope, Transform, Vector};
use raster2d_path::PathNode;
use std::cmp::Ordering;

/// Whether the join at a vertex should honor the caller's configured
/// join mode, or be forced to `round` because the vertex came from
/// internal Bezier flattening (`CurveTo` handling).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum JoinKind {
    Configured,
    ForcedRound,
}

#[derive(Clone, Debug)]
struct SubpathPoints {
    points: Vec<Point<f64>>,
    join_kinds: Vec<JoinKind>,
    closed: bool,
}

/// Walks `nodes` and produces one polygon per non-degenerate subpath.
pub fn plot_stroke(
    nodes: &[PathNode],
    thickness: f64,
    ctm: &Transform,
    options: &PaintOptions,
) -> Result<Vec<Polygon>, Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidPathData("empty node stream"));
    }

    let thickness = thickness.max(PaintOptions::MINIMUM_LINE_WIDTH);
    let effective = effective_options(thickness, options);
    let subpaths = collect_subpaths(nodes, effective.tolerance)?;
    let pen = Pen::new(thickness, effective.tolerance, ctm);

    let mut polygons = Vec::new();
    for subpath in &subpaths {
        if let Some(polygon) = plot_subpath(subpath, thickness, ctm, &effective, &pen) {
            polygons.push(polygon);
        }
    }
    Ok(polygons)
}

/// Dashed variant: each segment of the flattened subpath is subdivided
/// at every dash-boundary length it crosses by a [`Dasher`]; "on" runs
/// are stroked as independent open subpaths, "off" runs are skipped. A
/// run that collapses to a single point (a zero-length "on" entry) is
/// stroked as a dot instead of being dropped.
pub fn plot_dashed_stroke(
    nodes: &[PathNode],
    thickness: f64,
    ctm: &Transform,
    options: &PaintOptions,
    dashes: &[f64],
    dash_offset: f64,
) -> Result<Vec<Polygon>, Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidPathData("empty node stream"));
    }

    let thickness = thickness.max(PaintOptions::MINIMUM_LINE_WIDTH);
    let effective = effective_options(thickness, options);
    let subpaths = collect_subpaths(nodes, effective.tolerance)?;
    let pen = Pen::new(thickness, effective.tolerance, ctm);

    let mut polygons = Vec::new();
    for subpath in &subpaths {
        let runs = split_into_dash_runs(subpath, ctm, dashes, dash_offset);
        for run in &runs {
            match run {
                DashRun::Segment(points) => {
                    if let Some(polygon) = plot_subpath(points, thickness, ctm, &effective, &pen) {
                        polygons.push(polygon);
                    }
                }
                DashRun::Dot { point, tangent } => {
                    if let Some(polygon) = plot_dash_dot(*point, *tangent, thickness, effective.line_cap, &pen) {
                        polygons.push(polygon);
                    }
                }
            }
        }
    }
    Ok(polygons)
}

/// One run produced by [`split_into_dash_runs`]: either a normal "on"
/// span with at least two points, or a zero-length "on" entry that
/// collapsed to a single point.
enum DashRun {
    Segment(SubpathPoints),
    Dot { point: Point<f64>, tangent: Vector<f64> },
}

/// Subdivides one subpath's point sequence into the "on" runs of the
/// dash pattern, each treated as an independent open subpath, cutting
/// every segment at each intermediate dash-boundary length it crosses.
/// A dash pattern with no positive entry, or one that fails to validate
/// ([`Dasher::new`]), is treated as inactive: the whole subpath passes
/// through as a single run, matching an undashed stroke.
fn split_into_dash_runs(subpath: &SubpathPoints, ctm: &Transform, dashes: &[f64], dash_offset: f64) -> Vec<DashRun> {
    if !dashes.iter().any(|&d| d > 0.0) {
        return vec![DashRun::Segment(subpath.clone())];
    }

    let mut dasher = match Dasher::new(dashes, dash_offset) {
        Some(d) => d,
        None => return vec![DashRun::Segment(subpath.clone())],
    };

    let mut runs = Vec::new();
    let mut current_points: Vec<Point<f64>> = Vec::new();
    let mut current_kinds: Vec<JoinKind> = Vec::new();

    let n = subpath.points.len();
    let segment_count = if subpath.closed { n } else { n.saturating_sub(1) };

    if dasher.on() && n > 0 {
        current_points.push(subpath.points[0]);
    }

    for i in 0..segment_count {
        let a = subpath.points[i];
        let b = subpath.points[(i + 1) % n];
        let seg_vec = b - a;
        let device_len = seg_vec.length();
        let user_len = raster2d_geom::transform::device_to_user_distance(ctm, seg_vec)
            .map(|v| v.length())
            .unwrap_or(device_len);

        if user_len <= 0.0 {
            continue;
        }

        let mut consumed = 0.0;
        let mut guard = 0;
        while consumed < user_len {
            guard += 1;
            if guard > dashes.len() * 4 + 4 {
                break;
            }

            // A zero-length dash entry fires instantly, without
            // consuming any of the segment's remaining length.
            if dasher.remain() <= 0.0 {
                let was_on = dasher.on();
                dasher.advance();
                if was_on && !dasher.on() {
                    let t = consumed / user_len;
                    flush_run(&mut runs, &mut current_points, &mut current_kinds);
                    runs.push(DashRun::Dot { point: a + seg_vec * t, tangent: seg_vec });
                }
                continue;
            }

            let remaining_in_segment = user_len - consumed;
            let was_on = dasher.on();
            let step = dasher.remain().min(remaining_in_segment);
            let reached_vertex = dasher.remain() >= remaining_in_segment;
            dasher.step(step);
            consumed += step;
            let now_on = dasher.on();

            let p = if reached_vertex { b } else { a + seg_vec * (consumed / user_len) };

            if was_on {
                current_points.push(p);
                if reached_vertex && now_on {
                    current_kinds.push(subpath.join_kinds.get(i).copied().unwrap_or(JoinKind::Configured));
                }
                if !now_on {
                    flush_run(&mut runs, &mut current_points, &mut current_kinds);
                }
            } else if now_on {
                current_points.push(p);
            }
        }
    }
    flush_run(&mut runs, &mut current_points, &mut current_kinds);
    runs
}

fn flush_run(runs: &mut Vec<DashRun>, points: &mut Vec<Point<f64>>, kinds: &mut Vec<JoinKind>) {
    if points.len() >= 2 {
        runs.push(DashRun::Segment(SubpathPoints {
            points: std::mem::take(points),
            join_kinds: std::mem::take(kinds),
            closed: false,
        }));
    } else {
        points.clear();
        kinds.clear();
    }
}

/// Builds the dot geometry for a zero-length "on" dash entry: a disc
/// under the round pen, or a 4-point square oriented along `tangent`,
/// under the square cap. Other cap modes emit nothing — there is no
/// natural dot shape for a bevel or miter join.
fn plot_dash_dot(point: Point<f64>, tangent: Vector<f64>, thickness: f64, cap: LineCap, pen: &Pen) -> Option<Polygon> {
    match cap {
        LineCap::Round => {
            let verts: Vec<Point<f64>> = pen.vertices().iter().map(|v| point + v.offset).collect();
            if verts.len() < 2 {
                return None;
            }
            let mut polygon = Polygon::new(1.0);
            for w in verts.windows(2) {
                polygon.add_edge(w[0], w[1]);
            }
            polygon.add_edge(verts[verts.len() - 1], verts[0]);
            Some(polygon)
        }
        LineCap::Square => {
            let half = thickness * 0.5;
            let dir = Slope::from_vector(tangent).normalize().to_vector();
            let perp = Slope::from_vector(dir).rotate_ccw().to_vector();
            let c0 = point + dir * half + perp * half;
            let c1 = point + dir * half - perp * half;
            let c2 = point - dir * half - perp * half;
            let c3 = point - dir * half + perp * half;
            let mut polygon = Polygon::new(1.0);
            polygon.add_edge(c0, c1);
            polygon.add_edge(c1, c2);
            polygon.add_edge(c2, c3);
            polygon.add_edge(c3, c0);
            Some(polygon)
        }
        LineCap::Butt => None,
    }
}

struct EffectiveOptions {
    line_join: LineJoin,
    line_cap: LineCap,
    miter_limit: f64,
    tolerance: f64,
}

/// Below [`PaintOptions::THIN_STROKE_THRESHOLD`], join/miter-limit/cap
/// revert to miter/10/butt to avoid hairline join artifacts, when the
/// caller has left `thin_stroke_fallback` enabled.
fn effective_options(thickness: f64, options: &PaintOptions) -> EffectiveOptions {
    if options.thin_stroke_fallback && thickness < PaintOptions::THIN_STROKE_THRESHOLD {
        EffectiveOptions {
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            miter_limit: 10.0,
            tolerance: options.tolerance,
        }
    } else {
        EffectiveOptions {
            line_join: options.line_join,
            line_cap: options.line_cap,
            miter_limit: options.miter_limit,
            tolerance: options.tolerance,
        }
    }
}

/// Walks the node stream once, flattening curves and filtering
/// degenerate `LineTo`s, and groups the result into per-subpath point
/// lists with a per-vertex join-kind tag.
fn collect_subpaths(nodes: &[PathNode], tolerance: f64) -> Result<Vec<SubpathPoints>, Error> {
    let mut subpaths = Vec::new();
    let mut points: Vec<Point<f64>> = Vec::new();
    let mut kinds: Vec<JoinKind> = Vec::new();
    let mut subpath_start: Option<Point<f64>> = None;
    let mut current: Option<Point<f64>> = None;

    for node in nodes {
        match *node {
            PathNode::MoveTo { point } => {
                if points.len() >= 2 {
                    subpaths.push(SubpathPoints { points: points.clone(), join_kinds: kinds.clone(), closed: false });
                }
                points.clear();
                kinds.clear();
                points.push(point);
                subpath_start = Some(point);
                current = Some(point);
            }
            PathNode::LineTo { point } => {
                current.ok_or(Error::InvalidState("LineTo before MoveTo"))?;
                push_point(&mut points, &mut kinds, point, JoinKind::Configured);
                current = Some(point);
            }
            PathNode::CurveTo { p1, p2, p3 } => {
                let prev = current.ok_or(Error::InvalidState("CurveTo before MoveTo"))?;
                let mut sink = StrokeCurveSink { prev, points: &mut points, kinds: &mut kinds };
                flatten_cubic_bezier(prev, p1, p2, p3, tolerance, &mut sink).map_err(|_| Error::OutOfMemory)?;
                current = Some(p3);
            }
            PathNode::ClosePath => {
                let start = subpath_start.ok_or(Error::InvalidState("ClosePath before MoveTo"))?;
                push_point(&mut points, &mut kinds, start, JoinKind::Configured);
                if points.len() >= 3 {
                    // Drop the duplicated closing point: a closed
                    // subpath's ring already wraps from the last point
                    // back to the first.
                    points.pop();
                    kinds.pop();
                    subpaths.push(SubpathPoints { points: points.clone(), join_kinds: kinds.clone(), closed: true });
                }
                points.clear();
                kinds.clear();
                current = Some(start);
            }
        }
    }

    if points.len() >= 2 {
        subpaths.push(SubpathPoints { points, join_kinds: kinds, closed: false });
    }

    Ok(subpaths)
}

fn push_point(points: &mut Vec<Point<f64>>, kinds: &mut Vec<JoinKind>, p: Point<f64>, kind: JoinKind) {
    if points.last().copied() != Some(p) {
        points.push(p);
        kinds.push(kind);
    }
}

struct StrokeCurveSink<'a> {
    prev: Point<f64>,
    points: &'a mut Vec<Point<f64>>,
    kinds: &'a mut Vec<JoinKind>,
}

impl<'a> raster2d_geom::PathSink for StrokeCurveSink<'a> {
    type Error = ();

    fn line_to(&mut self, p: Point<f64>) -> Result<(), ()> {
        if p != self.prev {
            self.points.push(p);
            self.kinds.push(JoinKind::ForcedRound);
            self.prev = p;
        }
        Ok(())
    }

    fn curve_to(&mut self, _c1: Point<f64>, _c2: Point<f64>, to: Point<f64>) -> Result<(), ()> {
        self.line_to(to)
    }
}

fn signed_area(points: &[Point<f64>]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area * 0.5
}

fn plot_subpath(
    subpath: &SubpathPoints,
    thickness: f64,
    ctm: &Transform,
    options: &EffectiveOptions,
    pen: &Pen,
) -> Option<Polygon> {
    let points = &subpath.points;
    let n = points.len();
    if n < 2 {
        return None;
    }

    let face_count = if subpath.closed { n } else { n - 1 };
    let faces: Vec<Face> = (0..face_count)
        .map(|i| Face::new(points[i], points[(i + 1) % n], thickness, ctm))
        .collect();

    let clockwise = if subpath.closed {
        signed_area(points) < 0.0
    } else {
        faces
            .windows(2)
            .find_map(|w| {
                let in_slope = Slope::from_vector(w[0].slope);
                let out_slope = Slope::from_vector(w[1].slope);
                match in_slope.compare(out_slope) {
                    Ordering::Equal => None,
                    other => Some(other == Ordering::Greater),
                }
            })
            .unwrap_or(false)
    };

    let mut outer = Contour::new();
    let mut inner = Contour::new();

    let join_count = if subpath.closed { face_count } else { face_count.saturating_sub(1) };
    for i in 0..join_count {
        let in_face = &faces[i];
        let out_face = &faces[(i + 1) % faces.len()];
        let kind = subpath.join_kinds.get(i + 1).copied().unwrap_or(JoinKind::Configured);
        emit_join(in_face, out_face, kind, options, pen, clockwise, &mut outer, &mut inner);
    }

    if subpath.closed {
        if outer.is_empty() {
            return None;
        }
        outer.concat(inner);
        let edges = outer.into_closed_edges();
        if edges.is_empty() {
            return None;
        }
        let mut polygon = Polygon::new(1.0);
        for (a, b) in edges {
            polygon.add_edge(a, b);
        }
        Some(polygon)
    } else {
        let mut ring = Vec::new();
        emit_cap_p0(&faces[0], options.line_cap, pen, clockwise, &mut ring);
        for p in outer.iter() {
            ring.push(*p);
        }
        emit_cap(&faces[faces.len() - 1], options.line_cap, pen, clockwise, &mut ring);
        for p in inner.iter() {
            ring.push(*p);
        }

        if ring.len() < 3 {
            return None;
        }

        let mut polygon = Polygon::new(1.0);
        for w in ring.windows(2) {
            polygon.add_edge(w[0], w[1]);
        }
        polygon.add_edge(ring[ring.len() - 1], ring[0]);
        Some(polygon)
    }
}

fn emit_join(
    in_face: &Face,
    out_face: &Face,
    kind: JoinKind,
    options: &EffectiveOptions,
    pen: &Pen,
    clockwise: bool,
    outer: &mut Contour,
    inner: &mut Contour,
) {
    if in_face.p0 == in_face.p1 || out_face.p0 == out_face.p1 {
        return;
    }

    let in_slope = Slope::from_vector(in_face.slope);
    let out_slope = Slope::from_vector(out_face.slope);

    if in_slope.compare(out_slope) == Ordering::Equal {
        outer.append(in_face.p1_outer(clockwise));
        inner.prepend(in_face.p1_inner(clockwise));
        return;
    }

    let join_mode = if kind == JoinKind::ForcedRound { LineJoin::Round } else { options.line_join };

    match join_mode {
        LineJoin::Miter if within_miter_limit(in_slope, out_slope, options.miter_limit) => {
            let in_pt = in_face.p1_outer(clockwise);
            let out_pt = out_face.p0_outer(clockwise);
            match miter_intersection(in_pt, in_face.slope, out_pt, out_face.slope) {
                Some(p) => outer.append(p),
                None => {
                    outer.append(in_pt);
                    outer.append(out_pt);
                }
            }
        }
        LineJoin::Round => {
            outer.append(in_face.p1_outer(clockwise));
            let (s_in, s_out) = if clockwise {
                (in_slope, out_slope)
            } else {
                (Slope::new(-in_slope.dx, -in_slope.dy), Slope::new(-out_slope.dx, -out_slope.dy))
            };
            for offset in pen.join_range(s_in, s_out, clockwise) {
                outer.append(in_face.p1 + offset);
            }
            outer.append(out_face.p0_outer(clockwise));
        }
        _ => {
            // Bevel, or a miter that exceeded its limit (falls back to
            // bevel per the SVG/CSS convention this crate follows).
            outer.append(in_face.p1_outer(clockwise));
            outer.append(out_face.p0_outer(clockwise));
        }
    }

    inner.prepend(out_face.p0_inner(clockwise));
    inner.prepend(in_face.p1);
    inner.prepend(in_face.p1_inner(clockwise));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PaintOptions;
    use raster2d_geom::point;
    use raster2d_path::Path;

    #[test]
    fn single_segment_butt_cap_produces_a_four_point_rectangle() {
        let mut b = Path::builder();
        b.move_to(point(10.0, 10.0)).line_to(point(20.0, 20.0));
        let path = b.build();
        let options = PaintOptions::default().with_line_cap(LineCap::Butt);
        let polygons = plot_stroke(path.nodes(), 2.0, &Transform::identity(), &options).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].edges().len(), 4);
    }

    #[test]
    fn empty_stream_is_rejected() {
        let options = PaintOptions::default();
        assert!(plot_stroke(&[], 1.0, &Transform::identity(), &options).is_err());
    }

    #[test]
    fn move_to_only_produces_no_polygons() {
        let mut b = Path::builder();
        b.move_to(point(5.0, 5.0));
        let path = b.build();
        let options = PaintOptions::default();
        let polygons = plot_stroke(path.nodes(), 1.0, &Transform::identity(), &options).unwrap();
        assert!(polygons.is_empty());
    }

    #[test]
    fn closed_triangle_stroke_produces_a_polygon() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0))
            .line_to(point(10.0, 0.0))
            .line_to(point(5.0, 10.0))
            .close();
        let path = b.build();
        let options = PaintOptions::default();
        let polygons = plot_stroke(path.nodes(), 2.0, &Transform::identity(), &options).unwrap();
        assert_eq!(polygons.len(), 1);
        assert!(!polygons[0].is_empty());
    }

    #[test]
    fn all_zero_dash_pattern_behaves_like_plain_stroke() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0)).line_to(point(10.0, 0.0));
        let path = b.build();
        let options = PaintOptions::default();
        let plain = plot_stroke(path.nodes(), 2.0, &Transform::identity(), &options).unwrap();
        let dashed =
            plot_dashed_stroke(path.nodes(), 2.0, &Transform::identity(), &options, &[0.0, 0.0], 0.0).unwrap();
        assert_eq!(plain.len(), dashed.len());
    }

    #[test]
    fn dashed_stroke_with_short_dash_produces_multiple_runs() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0)).line_to(point(20.0, 0.0));
        let path = b.build();
        let options = PaintOptions::default();
        let dashed =
            plot_dashed_stroke(path.nodes(), 2.0, &Transform::identity(), &options, &[4.0, 4.0], 0.0).unwrap();
        assert!(dashed.len() >= 2);
    }
}
