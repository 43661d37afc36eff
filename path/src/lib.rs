//! Path node streams: the tagged records a path builder produces and the
//! stroke/fill plotters consume.

use raster2d_geom::Point;

/// One record in an ordered path node stream.
///
/// A well-formed stream starts with a [`PathNode::MoveTo`]; every
/// non-`MoveTo` node is preceded, in the same subpath, by a point-producing
/// node; and every [`PathNode::ClosePath`] is immediately followed by a
/// `MoveTo` back to the subpath's initial point (the auto-move is part of
/// the stream, not synthesized later by a consumer).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathNode {
    /// Begins a new subpath at `point`.
    MoveTo { point: Point<f64> },
    /// A straight segment to `point`.
    LineTo { point: Point<f64> },
    /// A cubic Bezier from the current point through `p1`, `p2` to `p3`.
    CurveTo {
        p1: Point<f64>,
        p2: Point<f64>,
        p3: Point<f64>,
    },
    /// A straight segment back to the subpath's initial point.
    ClosePath,
}

impl PathNode {
    /// True for nodes that advance the current point (everything but a
    /// bare `MoveTo`, which instead starts a new one).
    pub fn is_edge(&self) -> bool {
        !matches!(self, PathNode::MoveTo { .. })
    }

    /// The node's destination point, where that's well defined.
    pub fn endpoint(&self) -> Option<Point<f64>> {
        match *self {
            PathNode::MoveTo { point } => Some(point),
            PathNode::LineTo { point } => Some(point),
            PathNode::CurveTo { p3, .. } => Some(p3),
            PathNode::ClosePath => None,
        }
    }
}

/// An owned, ordered path node stream plus an append-only builder.
///
/// This is a thin record of [`PathNode`]s; it performs no geometric
/// processing of its own; flattening and stroking walk it via
/// [`Path::nodes`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    nodes: Vec<PathNode>,
}

impl Path {
    pub fn new() -> Self {
        Path { nodes: Vec::new() }
    }

    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over `(subpath_start_index, nodes)` for each subpath,
    /// where `nodes` spans from that subpath's `MoveTo` up to (but not
    /// including) the next `MoveTo` that starts a new one.
    pub fn subpaths(&self) -> Subpaths<'_> {
        Subpaths {
            nodes: &self.nodes,
            pos: 0,
        }
    }
}

/// Builds a well-formed [`Path`] one node at a time.
///
/// Mirrors a typical path-builder API: `move_to`/`line_to`/`curve_to`
/// append nodes directly; `close` appends a `ClosePath` followed by the
/// auto-move back to the subpath's start, matching the node stream's
/// well-formedness rule.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    nodes: Vec<PathNode>,
    subpath_start: Option<Point<f64>>,
    current: Option<Point<f64>>,
}

impl PathBuilder {
    pub fn new() -> Self {
        PathBuilder {
            nodes: Vec::new(),
            subpath_start: None,
            current: None,
        }
    }

    pub fn move_to(&mut self, point: Point<f64>) -> &mut Self {
        self.nodes.push(PathNode::MoveTo { point });
        self.subpath_start = Some(point);
        self.current = Some(point);
        self
    }

    pub fn line_to(&mut self, point: Point<f64>) -> &mut Self {
        debug_assert!(self.current.is_some(), "line_to before move_to");
        self.nodes.push(PathNode::LineTo { point });
        self.current = Some(point);
        self
    }

    pub fn curve_to(&mut self, p1: Point<f64>, p2: Point<f64>, p3: Point<f64>) -> &mut Self {
        debug_assert!(self.current.is_some(), "curve_to before move_to");
        self.nodes.push(PathNode::CurveTo { p1, p2, p3 });
        self.current = Some(p3);
        self
    }

    /// Closes the current subpath: appends `ClosePath` then the mandatory
    /// auto-move back to the subpath's initial point.
    pub fn close(&mut self) -> &mut Self {
        if let Some(start) = self.subpath_start {
            self.nodes.push(PathNode::ClosePath);
            self.nodes.push(PathNode::MoveTo { point: start });
            self.current = Some(start);
        }
        self
    }

    pub fn build(self) -> Path {
        Path { nodes: self.nodes }
    }
}

/// Iterator over a [`Path`]'s subpaths, each a `&[PathNode]` slice
/// beginning with a `MoveTo`.
pub struct Subpaths<'a> {
    nodes: &'a [PathNode],
    pos: usize,
}

impl<'a> Iterator for Subpaths<'a> {
    type Item = &'a [PathNode];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.nodes.len() {
            return None;
        }

        let start = self.pos;
        // The first node at `start` is a MoveTo; consume it, then consume
        // until the next MoveTo or end of stream.
        let mut end = start + 1;
        while end < self.nodes.len() && !matches!(self.nodes[end], PathNode::MoveTo { .. }) {
            end += 1;
        }
        self.pos = end;
        Some(&self.nodes[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_geom::point;

    #[test]
    fn builder_produces_well_formed_stream() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0))
            .line_to(point(10.0, 0.0))
            .line_to(point(10.0, 10.0))
            .close();
        let path = b.build();

        assert_eq!(
            path.nodes(),
            &[
                PathNode::MoveTo { point: point(0.0, 0.0) },
                PathNode::LineTo { point: point(10.0, 0.0) },
                PathNode::LineTo { point: point(10.0, 10.0) },
                PathNode::ClosePath,
                PathNode::MoveTo { point: point(0.0, 0.0) },
            ]
        );
    }

    #[test]
    fn empty_path_has_no_subpaths() {
        let path = Path::new();
        assert_eq!(path.subpaths().count(), 0);
    }

    #[test]
    fn move_to_only_is_a_single_empty_subpath() {
        let mut b = Path::builder();
        b.move_to(point(5.0, 5.0));
        let path = b.build();
        let subpaths: Vec<_> = path.subpaths().collect();
        assert_eq!(subpaths.len(), 1);
        assert_eq!(subpaths[0].len(), 1);
    }

    #[test]
    fn two_subpaths_split_on_move_to() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0)).line_to(point(1.0, 1.0));
        b.move_to(point(5.0, 5.0)).line_to(point(6.0, 6.0));
        let path = b.build();
        let subpaths: Vec<_> = path.subpaths().collect();
        assert_eq!(subpaths.len(), 2);
        assert_eq!(subpaths[0].len(), 2);
        assert_eq!(subpaths[1].len(), 2);
    }

    #[test]
    fn close_emits_closepath_then_automove() {
        let mut b = Path::builder();
        b.move_to(point(0.0, 0.0)).line_to(point(1.0, 0.0)).close();
        let path = b.build();
        assert_eq!(path.nodes()[2], PathNode::ClosePath);
        assert_eq!(path.nodes()[3], PathNode::MoveTo { point: point(0.0, 0.0) });
    }
}
