//! The painter: the entry point that ties the plotters, the scanline
//! query, the sparse coverage buffer and the compositor together into
//! `fill`/`stroke` operations against a destination surface.
//!
//! Exposes two scan-conversion paths, chosen by [`AntiAliasingMode`]: a
//! direct, non-AA scanline writer, and an AA one backed by the sparse
//! coverage buffer.

use crate::coverage::{SparseCoverageBuffer, SCALE};
use crate::error::Error;
use crate::fill::plot_fill;
use crate::options::{AntiAliasingMode, FillRule, PaintOptions};
use crate::polygon::Polygon;
use crate::stroke::{plot_dashed_stroke, plot_stroke};
use crate::surface::RgbaSurface;
use crate::compositor::Pattern;
use raster2d_geom::{Point, Transform};
use raster2d_path::PathNode;

/// Fills `nodes` (a well-formed, closed node stream) onto `surface`
/// sampling colors from `pattern`, under `ctm` and `options`.
pub fn fill(
    nodes: &[PathNode],
    ctm: &Transform,
    options: &PaintOptions,
    pattern: &dyn Pattern,
    surface: &mut RgbaSurface,
) -> Result<(), Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidPathData("empty node stream"));
    }
    let ends_closed = nodes.len() >= 2
        && matches!(nodes[nodes.len() - 1], PathNode::MoveTo { .. })
        && nodes[nodes.len() - 2] == PathNode::ClosePath;
    if !ends_closed {
        return Err(Error::InvalidPathData("fill stream must end with ClosePath, MoveTo"));
    }

    let scale = aa_scale(options.anti_aliasing_mode);
    let device_transform = ctm.then_scale(scale as f64, scale as f64);
    let device_nodes = transform_nodes(nodes, &device_transform);
    let polygon = plot_fill(&device_nodes, options.tolerance * scale as f64)?;

    rasterize(&[polygon], options.fill_rule, scale, pattern, surface);
    Ok(())
}

/// Strokes `nodes` at `thickness` (user-space units) onto `surface`,
/// under `ctm` and `options`. Fill rule is always `NonZero` for
/// strokes: a stroke's offset contours never encode an even-odd hole.
pub fn stroke(
    nodes: &[PathNode],
    thickness: f64,
    ctm: &Transform,
    options: &PaintOptions,
    pattern: &dyn Pattern,
    surface: &mut RgbaSurface,
) -> Result<(), Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidPathData("empty node stream"));
    }

    let thickness = thickness.max(PaintOptions::MINIMUM_LINE_WIDTH);
    let scale = aa_scale(options.anti_aliasing_mode);
    let device_transform = ctm.then_scale(scale as f64, scale as f64);
    let device_nodes = transform_nodes(nodes, &device_transform);

    let mut scaled_options = *options;
    scaled_options.tolerance *= scale as f64;
    let polygons = plot_stroke(&device_nodes, thickness, &device_transform, &scaled_options)?;

    rasterize(&polygons, FillRule::NonZero, scale, pattern, surface);
    Ok(())
}

/// Dashed variant of [`stroke`]: `dashes`/`dash_offset` are in
/// user-space path-length units, consumed by the [`crate::dasher::Dasher`]
/// before any transform is applied.
pub fn dashed_stroke(
    nodes: &[PathNode],
    thickness: f64,
    ctm: &Transform,
    options: &PaintOptions,
    dashes: &[f64],
    dash_offset: f64,
    pattern: &dyn Pattern,
    surface: &mut RgbaSurface,
) -> Result<(), Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidPathData("empty node stream"));
    }

    let thickness = thickness.max(PaintOptions::MINIMUM_LINE_WIDTH);
    let scale = aa_scale(options.anti_aliasing_mode);
    let device_transform = ctm.then_scale(scale as f64, scale as f64);
    let device_nodes = transform_nodes(nodes, &device_transform);

    let mut scaled_options = *options;
    scaled_options.tolerance *= scale as f64;
    let polygons =
        plot_dashed_stroke(&device_nodes, thickness, &device_transform, &scaled_options, dashes, dash_offset)?;

    rasterize(&polygons, FillRule::NonZero, scale, pattern, surface);
    Ok(())
}

fn aa_scale(mode: AntiAliasingMode) -> u32 {
    match mode {
        AntiAliasingMode::None => 1,
        AntiAliasingMode::Default => SCALE,
    }
}

fn transform_nodes(nodes: &[PathNode], t: &Transform) -> Vec<PathNode> {
    let map = |p: Point<f64>| t.transform_point(p);
    nodes
        .iter()
        .map(|node| match *node {
            PathNode::MoveTo { point } => PathNode::MoveTo { point: map(point) },
            PathNode::LineTo { point } => PathNode::LineTo { point: map(point) },
            PathNode::CurveTo { p1, p2, p3 } => PathNode::CurveTo { p1: map(p1), p2: map(p2), p3: map(p3) },
            PathNode::ClosePath => PathNode::ClosePath,
        })
        .collect()
}

/// Scan-converts `polygons` (already in device space, scaled by `scale`)
/// onto `surface`, via the non-AA direct writer when `scale == 1` or the
/// sparse-coverage-buffer AA path otherwise.
///
/// Coverage from multiple polygons (one per stroked subpath) is
/// accumulated additively into the same buffer rather than merged into a
/// single winding computation across all of them: subpaths essentially
/// never overlap along a shared boundary, and where they do the
/// saturating accumulation just yields full coverage, which is the
/// visually correct outcome anyway.
fn rasterize(polygons: &[Polygon], fill_rule: FillRule, scale: u32, pattern: &dyn Pattern, surface: &mut RgbaSurface) {
    if polygons.is_empty() {
        return;
    }

    let top = polygons.iter().map(|p| p.top).fold(f64::INFINITY, f64::min);
    let bottom = polygons.iter().map(|p| p.bottom).fold(f64::NEG_INFINITY, f64::max);
    if !top.is_finite() || !bottom.is_finite() {
        return;
    }

    let width = surface.width();
    let height = surface.height();

    if scale == 1 {
        let y0 = (top.floor().max(0.0)) as i64;
        let y1 = (bottom.ceil().min(height as f64)) as i64;
        for y in y0..y1 {
            for polygon in polygons {
                if (y as f64) < polygon.top || (y as f64) > polygon.bottom {
                    continue;
                }
                for (x0, x1) in polygon.spans_at(y, fill_rule) {
                    let xa = x0.max(0.0) as i64;
                    let xb = x1.min(width as f64) as i64;
                    for x in xa..xb {
                        let src = pattern.get_pixel(x as i32, y as i32);
                        surface.src_over_pixel(x as usize, y as usize, src);
                    }
                }
            }
        }
        return;
    }

    let s = scale as i64;
    let y0 = ((top / s as f64).floor().max(0.0)) as i64;
    let y1 = ((bottom / s as f64).ceil().min(height as f64)) as i64;

    let mut buffer = SparseCoverageBuffer::new(width);
    for y_out in y0..y1 {
        buffer.clear();
        for sy in 0..s {
            let device_y = y_out * s + sy;
            for polygon in polygons {
                if (device_y as f64) < polygon.top || (device_y as f64) > polygon.bottom {
                    continue;
                }
                for (x0, x1) in polygon.spans_at(device_y, fill_rule) {
                    let x_sub = x0.max(0.0) as i64;
                    let len_sub = (x1.min((width * scale as usize) as f64) - x0.max(0.0)) as i64;
                    buffer.add_span(x_sub, len_sub);
                }
            }
        }

        let mut x = 0usize;
        while x < buffer.len() {
            let (value, length) = buffer.get(x);
            if length == 0 {
                x += 1;
                continue;
            }
            let alpha = SparseCoverageBuffer::to_alpha8(value);
            if alpha > 0 {
                for px in x..(x + length as usize).min(width) {
                    let src = pattern.get_pixel(px as i32, y_out as i32);
                    surface.src_over_pixel_masked(px, y_out as usize, src, alpha);
                }
            }
            x += length as usize;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::{Rgba8, SolidColor};
    use raster2d_geom::point;
    use raster2d_path::Path;

    #[test]
    fn filling_a_square_covers_its_interior_pixel() {
        let mut b = Path::builder();
        b.move_to(point(2.0, 2.0))
            .line_to(point(8.0, 2.0))
            .line_to(point(8.0, 8.0))
            .line_to(point(2.0, 8.0))
            .close();
        let path = b.build();

        let mut surface = RgbaSurface::new(10, 10);
        let pattern = SolidColor(Rgba8::new(255, 0, 0, 255));
        let options = PaintOptions::default().with_anti_aliasing_mode(AntiAliasingMode::None);
        fill(path.nodes(), &Transform::identity(), &options, &pattern, &mut surface).unwrap();

        assert_eq!(surface.get_pixel(5, 5), Rgba8::new(255, 0, 0, 255));
        assert_eq!(surface.get_pixel(0, 0), Rgba8::TRANSPARENT);
    }

    #[test]
    fn anti_aliased_fill_produces_partial_edge_coverage() {
        let mut b = Path::builder();
        b.move_to(point(2.5, 2.5))
            .line_to(point(7.5, 2.5))
            .line_to(point(7.5, 7.5))
            .line_to(point(2.5, 7.5))
            .close();
        let path = b.build();

        let mut surface = RgbaSurface::new(10, 10);
        let pattern = SolidColor(Rgba8::new(0, 255, 0, 255));
        let options = PaintOptions::default();
        fill(path.nodes(), &Transform::identity(), &options, &pattern, &mut surface).unwrap();

        assert_eq!(surface.get_pixel(5, 5), Rgba8::new(0, 255, 0, 255));
    }

    #[test]
    fn stroke_paints_pixels_along_the_segment() {
        let mut b = Path::builder();
        b.move_to(point(1.0, 5.0)).line_to(point(9.0, 5.0));
        let path = b.build();

        let mut surface = RgbaSurface::new(10, 10);
        let pattern = SolidColor(Rgba8::new(0, 0, 255, 255));
        let options = PaintOptions::default().with_anti_aliasing_mode(AntiAliasingMode::None);
        stroke(path.nodes(), 2.0, &Transform::identity(), &options, &pattern, &mut surface).unwrap();

        assert_eq!(surface.get_pixel(5, 5), Rgba8::new(0, 0, 255, 255));
    }

    #[test]
    fn fill_requires_a_closed_stream() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0)).line_to(point(10.0, 10.0));
        let path = b.build();

        let mut surface = RgbaSurface::new(10, 10);
        let pattern = SolidColor(Rgba8::new(1, 2, 3, 255));
        let options = PaintOptions::default();
        assert!(fill(path.nodes(), &Transform::identity(), &options, &pattern, &mut surface).is_err());
    }
}
