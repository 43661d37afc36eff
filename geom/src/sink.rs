//! The capability interface curve producers (the flattener, the arc
//! approximator) emit into.
//!
//! Source implementations of this kind of pipeline often pass a vtable of
//! line/curve callbacks around. We express it as a small trait instead:
//! two methods, both fallible, since both the flattener's caller and the
//! arc approximator's caller may be backed by an allocation that can
//! fail.

use crate::Point;

/// Receives flattened line segments and (for sinks that want raw curves)
/// cubic Bezier segments produced while walking a path.
///
/// Implementors: a `Vec<PathNode>` builder, a stroke/fill plotter's
/// point buffer, or any other consumer that only needs the endpoints.
pub trait PathSink {
    type Error;

    fn line_to(&mut self, p: Point<f64>) -> Result<(), Self::Error>;

    fn curve_to(
        &mut self,
        ctrl1: Point<f64>,
        ctrl2: Point<f64>,
        to: Point<f64>,
    ) -> Result<(), Self::Error>;
}

/// Adapts a `FnMut(Point<f64>) -> Result<(), E>` closure into a [`PathSink`]
/// that only cares about flattened line segments (the common case: the
/// flattener and arc approximator both reduce to a stream of `line_to`
/// calls once they've done their subdivision).
pub struct LineSink<F, E> {
    callback: F,
    _marker: core::marker::PhantomData<E>,
}

impl<F, E> LineSink<F, E>
where
    F: FnMut(Point<f64>) -> Result<(), E>,
{
    pub fn new(callback: F) -> Self {
        LineSink {
            callback,
            _marker: core::marker::PhantomData,
        }
    }
}

impl<F, E> PathSink for LineSink<F, E>
where
    F: FnMut(Point<f64>) -> Result<(), E>,
{
    type Error = E;

    fn line_to(&mut self, p: Point<f64>) -> Result<(), E> {
        (self.callback)(p)
    }

    fn curve_to(&mut self, _ctrl1: Point<f64>, _ctrl2: Point<f64>, to: Point<f64>) -> Result<(), E> {
        (self.callback)(to)
    }
}
