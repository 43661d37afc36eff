//! Stroke expansion, polygon rasterization and compositing: the core of
//! a 2D vector rasterizer.
//!
//! Built on [`raster2d_geom`] for the flattener/arc approximator and
//! [`raster2d_path`] for the node stream the plotters in this crate
//! consume. No logging dependency: every fallible operation here
//! returns a typed [`error::Error`] instead.

pub mod compositor;
pub mod contour;
pub mod coverage;
pub mod dasher;
pub mod error;
pub mod face;
pub mod fill;
pub mod options;
pub mod painter;
pub mod pen;
pub mod polygon;
pub mod stroke;
pub mod surface;

pub use crate::compositor::{Pattern, Rgba8, SolidColor};
pub use crate::dasher::Dasher;
pub use crate::error::{Error, PaintResult};
pub use crate::options::{AntiAliasingMode, DashOptions, FillRule, LineCap, LineJoin, PaintOptions};
pub use crate::polygon::{Edge, Polygon};
pub use crate::surface::{AlphaSurface, RgbaSurface, MASK_SCALE};
