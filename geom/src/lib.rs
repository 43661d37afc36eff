//! 2D geometric primitives for the rasterization core: points, vectors,
//! slopes, cubic bezier flattening and circular arc approximation.
//!
//! This crate is reexported in [`raster2d`](https://docs.rs/raster2d/).
//! All coordinates are `f64`, matching the device-space math used by the
//! stroke and fill plotters; there is no generic scalar parameter because
//! the core only ever operates in device space.

pub mod arc;
pub mod flatten_cubic;
pub mod sink;
pub mod slope;
pub mod transform;

pub use crate::sink::PathSink;
pub use crate::slope::Slope;

/// Alias for `euclid::default::Point2D<f64>`.
pub use euclid::default::Point2D as Point;

/// Alias for `euclid::default::Vector2D<f64>`.
pub use euclid::default::Vector2D as Vector;

/// Alias for `euclid::default::Transform2D<f64>`.
pub type Transform = euclid::default::Transform2D<f64>;

/// Shorthand for `Point::new(x, y)`.
#[inline]
pub fn point(x: f64, y: f64) -> Point<f64> {
    Point::new(x, y)
}

/// Shorthand for `Vector::new(x, y)`.
#[inline]
pub fn vector(x: f64, y: f64) -> Vector<f64> {
    Vector::new(x, y)
}

/// Float epsilon used to snap near-equal values, e.g. in [`Slope`]
/// comparisons.
pub const EPSILON: f64 = 1e-8;

#[inline]
pub(crate) fn nearly_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}
