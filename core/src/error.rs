//! Error kinds. All paint operations abort and unwind on the first
//! error; nothing here is recovered locally.

use raster2d_geom::transform::Singular;

/// The result type every fill/stroke/paint entry point returns.
pub type PaintResult<T> = Result<T, Error>;

/// An error surfaced from a paint operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// An allocation failed while building a contour, polygon or coverage
    /// buffer.
    OutOfMemory,
    /// The node stream is in an impossible configuration, e.g. a `LineTo`
    /// before any `MoveTo`.
    InvalidState(&'static str),
    /// The node stream supplied to fill/stroke does not terminate with
    /// `ClosePath, MoveTo` (fill) or is empty (stroke).
    InvalidPathData(&'static str),
    /// A `deviceToUser` conversion was required but the transform is
    /// singular.
    InvalidMatrix,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::InvalidState(msg) => write!(f, "invalid node stream state: {msg}"),
            Error::InvalidPathData(msg) => write!(f, "invalid path data: {msg}"),
            Error::InvalidMatrix => write!(f, "transform matrix is singular"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Singular> for Error {
    fn from(_: Singular) -> Self {
        Error::InvalidMatrix
    }
}
