use crate::{
    utils::{
        constants::hash_size,
        predicates::{orient_2d, pseudo_angle, Orientation},
        types::{HedgeIdx, VertexIdx},
    },
    Point2,
};

/// The advancing convex hull of a triangulation under construction.
///
/// The hull is a doubly linked ring over point indices, `next` runs counter-clockwise.
/// A point that is not (or no longer) on the hull points to itself in `next`.
///
/// `tri[v]` is the half-edge `v -> next[v]` of the hull triangle adjacent to that hull edge.
#[derive(Clone, Debug, Default)]
pub struct Hull {
    pub(crate) prev: Vec<VertexIdx>,
    pub(crate) next: Vec<VertexIdx>,
    pub(crate) tri: Vec<HedgeIdx>,
    pub(crate) start: VertexIdx,
    hash: Vec<Option<VertexIdx>>,
    center: Point2,
}

impl Hull {
    /// Create the hull of the seed triangle `[i0, i1, i2]`, given in counter-clockwise order.
    ///
    /// The seed triangle is expected to be the first triangle, i.e. hedges `0, 1, 2`.
    pub fn new(points: &[Point2], seed: [VertexIdx; 3], center: Point2) -> Self {
        let n = points.len();
        let [i0, i1, i2] = seed;

        let mut hull = Self {
            prev: (0..n).collect(),
            next: (0..n).collect(),
            tri: vec![0; n],
            start: i0,
            hash: vec![None; hash_size(n)],
            center,
        };

        hull.next[i0] = i1;
        hull.prev[i2] = i1;
        hull.next[i1] = i2;
        hull.prev[i0] = i2;
        hull.next[i2] = i0;
        hull.prev[i1] = i0;

        hull.tri[i0] = 0;
        hull.tri[i1] = 1;
        hull.tri[i2] = 2;

        for v in seed {
            hull.hash_vertex(v, points[v]);
        }

        hull
    }

    /// The hash bucket of a point, by its pseudo angle around the seed circumcenter.
    fn hash_key(&self, p: Point2) -> usize {
        let size = self.hash.len();
        let angle = pseudo_angle(p - self.center);

        ((angle * size as f64).floor() as usize) % size
    }

    pub fn hash_vertex(&mut self, v: VertexIdx, p: Point2) {
        let key = self.hash_key(p);
        self.hash[key] = Some(v);
    }

    /// Check if `v` currently lies on the hull.
    pub fn contains(&self, v: VertexIdx) -> bool {
        self.next.get(v).is_some_and(|&next| next != v)
    }

    /// Take `v` off the hull.
    ///
    /// Only `next` is reset, `prev[v]` still leads back onto the hull.
    pub fn remove(&mut self, v: VertexIdx) {
        self.next[v] = v;
    }

    /// Find a hull edge `e -> next[e]` visible from `p`.
    ///
    /// Returns the edge start and whether the search started right at it, i.e. whether
    /// hull edges before `e` might also be visible. `None` if no edge is visible,
    /// which only happens for (near) duplicates of hull points.
    pub fn find_visible_edge(&self, p: Point2, points: &[Point2]) -> Option<(VertexIdx, bool)> {
        let size = self.hash.len();
        let key = self.hash_key(p);

        let mut start = self.start;
        for j in 0..size {
            if let Some(v) = self.hash[(key + j) % size] {
                if self.contains(v) {
                    start = v;
                    break;
                }
            }
        }

        let start = self.prev[start];
        let mut e = start;

        loop {
            let q = self.next[e];
            if orient_2d(p, points[e], points[q]) == Orientation::Clockwise {
                break;
            }

            e = q;
            if e == start {
                return None;
            }
        }

        Some((e, e == start))
    }

    /// Point the hull edge currently referencing hedge `from` to hedge `to`.
    pub fn retarget_tri(&mut self, from: HedgeIdx, to: HedgeIdx) {
        let mut e = self.start;
        loop {
            if self.tri[e] == from {
                self.tri[e] = to;
                return;
            }

            e = self.prev[e];
            if e == self.start {
                log::trace!("No hull edge references hedge {from}");
                return;
            }
        }
    }

    /// The hull vertices in counter-clockwise order, beginning at `start`.
    pub fn vertices(&self) -> Vec<VertexIdx> {
        if self.next.is_empty() {
            return Vec::new();
        }

        let mut vertices = vec![self.start];
        let mut e = self.next[self.start];

        while e != self.start && vertices.len() <= self.next.len() {
            vertices.push(e);
            e = self.next[e];
        }

        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(-1.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, -1.0),
        ]
    }

    #[test]
    fn test_seed_hull() {
        let points = square();
        let hull = Hull::new(&points, [0, 2, 1], Point2::new(0.0, 0.0));

        assert_eq!(hull.vertices(), vec![0, 2, 1]);
        assert_eq!(hull.prev[0], 1);
        assert!(hull.contains(2));
        assert!(!hull.contains(3));
        assert_eq!(hull.tri[2], 1);
    }

    #[test]
    fn test_find_visible_edge() {
        let points = square();
        let hull = Hull::new(&points, [0, 2, 1], Point2::new(0.0, 0.0));

        // only the edge 0 -> 2 faces the missing corner
        assert_eq!(hull.find_visible_edge(points[3], &points), Some((0, true)));
        // points inside see nothing
        assert_eq!(
            hull.find_visible_edge(Point2::new(0.5, 0.5), &points),
            None
        );
    }

    #[test]
    fn test_remove_and_retarget() {
        let points = square();
        let mut hull = Hull::new(&points, [0, 2, 1], Point2::new(0.0, 0.0));

        hull.retarget_tri(1, 7);
        assert_eq!(hull.tri[2], 7);

        hull.remove(2);
        assert!(!hull.contains(2));
        assert_eq!(hull.prev[2], 0);
    }
}
