//! An ordered chain of points built up during stroke plotting before
//! being converted into polygon edges. The source this is grounded on
//! uses an intrusive doubly-linked list here.
//!
//! A real doubly-linked list of heap nodes is the straightforward fit for
//! append/prepend/insert-before/splice, but a `VecDeque` gives the same
//! four operations with less allocator pressure and no per-node
//! bookkeeping; splice-by-move becomes an `extend`.

use raster2d_geom::Point;
use std::collections::VecDeque;

#[derive(Clone, Debug, Default)]
pub struct Contour {
    points: VecDeque<Point<f64>>,
}

impl Contour {
    pub fn new() -> Self {
        Contour { points: VecDeque::new() }
    }

    pub fn append(&mut self, p: Point<f64>) {
        self.points.push_back(p);
    }

    pub fn prepend(&mut self, p: Point<f64>) {
        self.points.push_front(p);
    }

    /// Inserts `p` immediately before the point currently at `index`.
    pub fn insert_before(&mut self, index: usize, p: Point<f64>) {
        self.points.insert(index, p);
    }

    /// Moves all of `other`'s points onto the end of `self`, draining
    /// `other`.
    pub fn concat(&mut self, mut other: Contour) {
        self.points.append(&mut other.points);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point<f64>> {
        self.points.iter()
    }

    pub fn last(&self) -> Option<Point<f64>> {
        self.points.back().copied()
    }

    pub fn first(&self) -> Option<Point<f64>> {
        self.points.front().copied()
    }

    /// Drains this contour's points, pairwise, as `(from, to)` segments
    /// plus a closing segment from the last point back to the first.
    /// This is how contour ownership transfers into a polygon.
    pub fn into_closed_edges(self) -> Vec<(Point<f64>, Point<f64>)> {
        let points: Vec<Point<f64>> = self.points.into_iter().collect();
        if points.len() < 2 {
            return Vec::new();
        }
        let mut edges = Vec::with_capacity(points.len());
        for w in points.windows(2) {
            edges.push((w[0], w[1]));
        }
        edges.push((points[points.len() - 1], points[0]));
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster2d_geom::point;

    #[test]
    fn append_and_prepend_preserve_order() {
        let mut c = Contour::new();
        c.append(point(1.0, 1.0));
        c.append(point(2.0, 2.0));
        c.prepend(point(0.0, 0.0));
        let points: Vec<_> = c.iter().copied().collect();
        assert_eq!(points, vec![point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)]);
    }

    #[test]
    fn concat_moves_points_to_the_tail() {
        let mut a = Contour::new();
        a.append(point(0.0, 0.0));
        let mut b = Contour::new();
        b.append(point(1.0, 1.0));
        b.append(point(2.0, 2.0));
        a.concat(b);
        let points: Vec<_> = a.iter().copied().collect();
        assert_eq!(points, vec![point(0.0, 0.0), point(1.0, 1.0), point(2.0, 2.0)]);
    }

    #[test]
    fn closed_edges_include_the_wraparound_segment() {
        let mut c = Contour::new();
        c.append(point(0.0, 0.0));
        c.append(point(10.0, 0.0));
        c.append(point(10.0, 10.0));
        let edges = c.into_closed_edges();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], (point(10.0, 10.0), point(0.0, 0.0)));
    }

    #[test]
    fn fewer_than_two_points_produces_no_edges() {
        let mut c = Contour::new();
        c.append(point(0.0, 0.0));
        assert!(c.into_closed_edges().is_empty());
    }
}
