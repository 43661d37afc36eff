//! A 2D vector rasterization core: cubic Bezier and circular-arc
//! flattening, stroke expansion with joins/caps/dashing, scanline
//! polygon rasterization with anti-aliasing, and premultiplied-alpha
//! compositing.
//!
//! This crate is a thin facade over three independently-versioned
//! members of the workspace: [`raster2d_geom`] (points, vectors,
//! curve/arc flattening), [`raster2d_path`] (the path node stream and
//! builder) and [`raster2d_core`] (stroking, rasterization,
//! compositing, the painter). Most users only need [`painter`]'s
//! `fill`/`stroke`/`dashed_stroke`; the geometry and path crates are
//! reexported for callers building their own path producers.

pub use raster2d_core as core;
pub use raster2d_geom as geom;
pub use raster2d_path as path;

pub use raster2d_core::painter;
pub use raster2d_core::{
    AntiAliasingMode, DashOptions, Edge, Error, FillRule, LineCap, LineJoin, PaintOptions, PaintResult, Pattern,
    Polygon, Rgba8, SolidColor,
};
pub use raster2d_path::{Path, PathBuilder, PathNode};
