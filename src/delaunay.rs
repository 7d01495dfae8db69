use anyhow::{bail, Result};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    trids::{
        hedge_iterator::HedgeIterator,
        hull::Hull,
        tri_data_structure::{next_hedge, prev_hedge, TriDataStructure},
        tri_iterator::TriIterator,
    },
    utils::{
        predicates::{circumcenter, circumradius2, in_circle, orient_2d, signed_area, Orientation},
        types::{HedgeIdx, TriIdx, VertexIdx},
    },
    Point2, Point3, Projection, Triangulation,
};

/// A 2D Delaunay triangulation, built incrementally by sweeping the points outwards from a seed triangle.
///
/// Triangles are counter-clockwise. Points that (nearly) coincide with an already inserted point are skipped.
///
/// ```
/// use tridel::{Delaunay, Point2};
///
/// let points = vec![
///     Point2::new(-1.0, 1.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(1.0, -1.0),
///     Point2::new(-1.0, -1.0),
///     Point2::new(0.2, 0.1),
/// ];
///
/// let delaunay = Delaunay::new(&points).unwrap();
///
/// assert_eq!(delaunay.num_tris(), 4);
/// assert_eq!(delaunay.hull().len(), 4);
/// assert!(delaunay.is_delaunay());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Delaunay {
    points: Vec<Point2>,
    tds: TriDataStructure,
    hull: Hull,
    legalize_stack: Vec<HedgeIdx>,
}

impl Delaunay {
    /// Triangulate a set of points.
    ///
    /// Less than three points result in an empty triangulation.
    /// Fails if some point has a non-finite coordinate, or if all points are duplicates of each other or lie on one line.
    pub fn new(points: &[Point2]) -> Result<Self> {
        if let Some(i) = points.iter().position(|p| !p.x.is_finite() || !p.y.is_finite()) {
            bail!("Point {i} has a non-finite coordinate {}", points[i]);
        }

        let mut delaunay = Self {
            points: points.to_vec(),
            tds: TriDataStructure::with_capacity(points.len()),
            hull: Hull::default(),
            legalize_stack: Vec::new(),
        };

        if points.len() < 3 {
            log::debug!("Less than 3 points, the triangulation is empty");
            return Ok(delaunay);
        }

        delaunay.triangulate()?;

        Ok(delaunay)
    }

    /// Triangulate a set of 3D points, projected onto the plane given by `projection`.
    ///
    /// The dropped coordinate is not kept: [`points`](Self::points) holds the projected points. They keep the input
    /// order, so vertex `i` of the triangulation is `points[i]`, and the triangles can be used to index the 3D input.
    pub fn from_points3(points: &[Point3], projection: Projection) -> Result<Self> {
        let points: Vec<Point2> = points.iter().map(|p| p.project(projection)).collect();

        Self::new(&points)
    }

    fn triangulate(&mut self) -> Result<()> {
        let now = std::time::Instant::now();

        let [i0, i1, i2] = seed_triangle(&self.points)?;
        let center = circumcenter(self.points[i0], self.points[i1], self.points[i2])
            .ok_or_else(|| anyhow::Error::msg("Seed triangle is degenerate"))?;

        log::trace!("Seed triangle {i0} -> {i1} -> {i2}, circumcenter {center}");

        // sweep outwards from the seed circumcircle
        let dists: Vec<f64> = self.points.iter().map(|p| p.dist2(center)).collect();
        let mut ids: Vec<VertexIdx> = (0..self.points.len()).collect();
        ids.sort_by(|&a, &b| {
            dists[a]
                .total_cmp(&dists[b])
                .then(self.points[a].x.total_cmp(&self.points[b].x))
                .then(self.points[a].y.total_cmp(&self.points[b].y))
        });

        log::trace!(
            "Seed and sorting computed in {:.4} µs",
            now.elapsed().as_micros()
        );

        let now = std::time::Instant::now();

        self.hull = Hull::new(&self.points, [i0, i1, i2], center);
        self.tds.add_tri([i0, i1, i2], [None, None, None])?;

        let mut num_skipped = 0;
        let mut last: Option<Point2> = None;

        for i in ids {
            let p = self.points[i];

            if last == Some(p) {
                num_skipped += 1;
                continue;
            }
            last = Some(p);

            if i == i0 || i == i1 || i == i2 {
                continue;
            }

            if !self.insert_point(i)? {
                log::trace!("Point {i} {p} sees no hull edge, skipping");
                num_skipped += 1;
            }
        }

        self.tds.shrink_to_fit();

        log::trace!(
            "Insertion computed in {:.4} µs",
            now.elapsed().as_micros()
        );
        log::debug!(
            "Triangulated {} points into {} triangles, {} skipped",
            self.points.len() - num_skipped,
            self.num_tris(),
            num_skipped
        );

        Ok(())
    }

    /// Connect point `i` to every hull edge it sees and legalize the new triangles.
    ///
    /// Returns `false` if no hull edge is visible from the point.
    fn insert_point(&mut self, i: VertexIdx) -> Result<bool> {
        let p = self.points[i];

        let Some((mut e, walk_back)) = self.hull.find_visible_edge(p, &self.points) else {
            return Ok(false);
        };

        // first triangle from the point to the visible edge
        let t = self.tds.add_tri(
            [e, i, self.hull.next[e]],
            [None, None, Some(self.hull.tri[e])],
        )?;
        self.hull.tri[i] = self.legalize(t + 2)?;
        self.hull.tri[e] = t;

        // walk forward through the hull, adding triangles and flipping recursively
        let mut n = self.hull.next[e];
        loop {
            let q = self.hull.next[n];
            if orient_2d(p, self.points[n], self.points[q]) != Orientation::Clockwise {
                break;
            }

            let t = self.tds.add_tri(
                [n, i, q],
                [Some(self.hull.tri[i]), None, Some(self.hull.tri[n])],
            )?;
            self.hull.tri[i] = self.legalize(t + 2)?;
            self.hull.remove(n);
            n = q;
        }

        // walk backward from the other side, only needed if the search began at the visible edge
        if walk_back {
            loop {
                let q = self.hull.prev[e];
                if orient_2d(p, self.points[q], self.points[e]) != Orientation::Clockwise {
                    break;
                }

                let t = self.tds.add_tri(
                    [q, i, e],
                    [None, Some(self.hull.tri[e]), Some(self.hull.tri[q])],
                )?;
                self.legalize(t + 2)?;
                self.hull.tri[q] = t;
                self.hull.remove(e);
                e = q;
            }
        }

        self.hull.start = e;
        self.hull.prev[i] = e;
        self.hull.next[e] = i;
        self.hull.prev[n] = i;
        self.hull.next[i] = n;

        self.hull.hash_vertex(i, p);
        self.hull.hash_vertex(e, self.points[e]);

        Ok(true)
    }

    /// Restore the Delaunay property around hedge `a` by flipping illegal edges.
    ///
    /// Returns the hedge that now precedes `a` in its triangle, it is the new point's outgoing hull edge.
    fn legalize(&mut self, mut a: HedgeIdx) -> Result<HedgeIdx> {
        self.legalize_stack.clear();

        let mut ar;

        loop {
            ar = prev_hedge(a);

            let Some(b) = self.tds.halfedges[a] else {
                match self.legalize_stack.pop() {
                    Some(next) => {
                        a = next;
                        continue;
                    }
                    None => break,
                }
            };

            let al = next_hedge(a);
            let bl = prev_hedge(b);

            let [p0, pr, pl, p1] = [ar, a, al, bl].map(|e| self.points[self.tds.triangles[e]]);

            if in_circle(p0, pr, pl, p1) {
                // bl is about to become an inner edge, its hull edge moves over to `a`
                if self.tds.halfedges[bl].is_none() {
                    self.hull.retarget_tri(bl, a);
                }

                self.tds.flip_2_to_2(a)?;
                self.legalize_stack.push(next_hedge(b));
            } else if let Some(next) = self.legalize_stack.pop() {
                a = next;
            } else {
                break;
            }
        }

        Ok(ar)
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The vertex indices of all triangles, three consecutive entries per triangle.
    pub fn triangles(&self) -> &[VertexIdx] {
        &self.tds.triangles
    }

    /// The twin of every half-edge, `None` on the convex hull.
    pub fn halfedges(&self) -> &[Option<HedgeIdx>] {
        &self.tds.halfedges
    }

    pub fn num_tris(&self) -> usize {
        self.tds.num_tris()
    }

    pub fn is_empty(&self) -> bool {
        self.num_tris() == 0
    }

    /// Some vertex on the convex hull, `None` for an empty triangulation.
    pub fn hull_start(&self) -> Option<VertexIdx> {
        (!self.is_empty()).then_some(self.hull.start)
    }

    /// The hull vertex before `v` in counter-clockwise order.
    pub fn hull_prev(&self, v: VertexIdx) -> Option<VertexIdx> {
        self.is_on_hull(v).then(|| self.hull.prev[v])
    }

    /// The hull vertex after `v` in counter-clockwise order.
    pub fn hull_next(&self, v: VertexIdx) -> Option<VertexIdx> {
        self.is_on_hull(v).then(|| self.hull.next[v])
    }

    /// The half-edge `v -> hull_next(v)`.
    pub fn hull_tri(&self, v: VertexIdx) -> Option<HedgeIdx> {
        self.is_on_hull(v).then(|| self.hull.tri[v])
    }

    pub fn is_on_hull(&self, v: VertexIdx) -> bool {
        !self.is_empty() && self.hull.contains(v)
    }

    /// The convex hull as a counter-clockwise ring of vertex indices.
    pub fn hull(&self) -> Vec<VertexIdx> {
        if self.is_empty() {
            return Vec::new();
        }

        self.hull.vertices()
    }

    /// The area enclosed by the convex hull.
    pub fn hull_area(&self) -> f64 {
        let polygon: Vec<Point2> = self.hull().iter().map(|&v| self.points[v]).collect();

        signed_area(&polygon)
    }

    pub fn triangulation(&self) -> Triangulation {
        Triangulation {
            triangles: self.tds.triangles.clone(),
            halfedges: Some(self.tds.halfedges.clone()),
        }
    }

    pub fn get_hedge(&self, idx: HedgeIdx) -> Result<HedgeIterator<'_>> {
        self.tds.get_hedge(idx)
    }

    pub fn get_tri(&self, idx: TriIdx) -> Result<TriIterator<'_>> {
        self.tds.get_tri(idx)
    }

    /// Check the twin relations and that the hull is a closed counter-clockwise ring.
    pub fn is_sound(&self) -> bool {
        if !self.tds.is_sound() {
            return false;
        }

        if self.is_empty() {
            return true;
        }

        let hull = self.hull();
        let num_hull_hedges = self.halfedges().iter().filter(|h| h.is_none()).count();

        if hull.len() != num_hull_hedges {
            log::error!(
                "Hull has {} vertices, but there are {} hull hedges",
                hull.len(),
                num_hull_hedges
            );
            return false;
        }

        hull.iter().all(|&v| {
            let next = self.hull.next[v];
            let hedge = self.hull.tri[v];
            let sound = self.tds.halfedges[hedge].is_none()
                && self.tds.triangles[hedge] == v
                && self.tds.triangles[next_hedge(hedge)] == next;

            if !sound {
                log::error!("Hull edge {v} -> {next} does not match hedge {hedge}");
            }
            sound
        })
    }

    /// Counts the triangles with some point strictly inside their circumcircle.
    ///
    /// Brute force, computed in parallel using `rayon`s `into_par_iter()`.
    pub fn num_violating_tris(&self) -> usize {
        (0..self.num_tris())
            .into_par_iter()
            .filter(|&tri_idx| {
                let nodes = TriIterator::new(&self.tds, tri_idx).nodes();
                let [a, b, c] = nodes.map(|v| self.points[v]);

                self.points
                    .iter()
                    .enumerate()
                    .any(|(v, &p)| {
                        // skipped duplicates of a corner are on the circle
                        !nodes.contains(&v) && ![a, b, c].contains(&p) && in_circle(a, b, c, p)
                    })
            })
            .count()
    }

    /// Checks the empty circumcircle property of every triangle.
    pub fn is_delaunay(&self) -> bool {
        let num_violating = self.num_violating_tris();

        if num_violating > 0 {
            log::error!("{num_violating} triangles violate the Delaunay property");
        }

        num_violating == 0
    }
}

/// Pick the seed triangle: the point closest to the bounding box center, its nearest distinct neighbor
/// and the point forming the smallest circumcircle with both, in counter-clockwise order.
fn seed_triangle(points: &[Point2]) -> Result<[VertexIdx; 3]> {
    let (min, max) = points.iter().fold(
        (
            Point2::new(f64::INFINITY, f64::INFINITY),
            Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        ),
        |(min, max), p| {
            (
                Point2::new(min.x.min(p.x), min.y.min(p.y)),
                Point2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        },
    );
    let bbox_center = (min + max) / 2.0;

    let n = points.len();

    let i0 = argmin(n, |i| Some(points[i].dist2(bbox_center)))
        .ok_or_else(|| anyhow::Error::msg("No points to triangulate"))?;
    let p0 = points[i0];

    let i1 = argmin(n, |i| (points[i] != p0).then(|| p0.dist2(points[i])))
        .ok_or_else(|| anyhow::Error::msg("All points are duplicates, could not find a seed edge"))?;
    let p1 = points[i1];

    let i2 = argmin(n, |i| {
        if i == i0 || i == i1 {
            return None;
        }

        let r = circumradius2(p0, p1, points[i]);
        r.is_finite().then_some(r)
    })
    .ok_or_else(|| {
        anyhow::Error::msg("All points are aligned, could not find 3 non-aligned points")
    })?;

    if orient_2d(p0, p1, points[i2]) == Orientation::Clockwise {
        Ok([i0, i2, i1])
    } else {
        Ok([i0, i1, i2])
    }
}

// Index of the smallest key, ties keep the lower index. `None` keys are skipped.
fn argmin(n: usize, key: impl Fn(VertexIdx) -> Option<f64>) -> Option<VertexIdx> {
    let mut best: Option<(VertexIdx, f64)> = None;

    for i in 0..n {
        if let Some(k) = key(i) {
            if best.map_or(true, |(_, best_key)| k < best_key) {
                best = Some((i, k));
            }
        }
    }

    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, ConvexHull, MultiPoint};
    use tridel_test_utils::sample_vertices_2d;

    const NUM_VERTICES_LIST: [usize; 7] = [3, 5, 10, 50, 100, 500, 1000];

    fn sample_points(n: usize) -> Vec<Point2> {
        sample_vertices_2d(n, None)
            .into_iter()
            .map(Point2::from)
            .collect()
    }

    fn unit_square() -> Vec<Point2> {
        vec![
            Point2::new(-1.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, -1.0),
            Point2::new(-1.0, -1.0),
        ]
    }

    // Sign of the in-circle determinant of the counter-clockwise triangle `abc`, expanded by hand.
    fn in_circle_sign(a: Point2, b: Point2, c: Point2, p: Point2) -> f64 {
        let (dx, dy) = (a.x - p.x, a.y - p.y);
        let (ex, ey) = (b.x - p.x, b.y - p.y);
        let (fx, fy) = (c.x - p.x, c.y - p.y);

        let ap = dx * dx + dy * dy;
        let bp = ex * ex + ey * ey;
        let cp = fx * fx + fy * fy;

        (dx * (ey * cp - bp * fy) - dy * (ex * cp - bp * fx) + ap * (ex * fy - ey * fx)).signum()
    }

    // Brute force count of triangles with a point strictly inside their circumcircle.
    fn count_non_empty_circles(delaunay: &Delaunay) -> usize {
        let points = delaunay.points();

        delaunay
            .triangles()
            .chunks_exact(3)
            .filter(|tri| {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|v| points[v]);
                points
                    .iter()
                    .filter(|&&p| p != a && p != b && p != c)
                    .any(|&p| in_circle_sign(a, b, c, p) > 0.0)
            })
            .count()
    }

    fn verify_triangulation(delaunay: &Delaunay) {
        assert!(delaunay.is_sound());
        assert!(delaunay.is_delaunay());
        assert_eq!(count_non_empty_circles(delaunay), 0);

        for t in 0..delaunay.num_tris() {
            let [a, b, c] = delaunay.get_tri(t).unwrap().nodes();
            let [a, b, c] = [a, b, c].map(|v| delaunay.points()[v]);
            assert_eq!(orient_2d(a, b, c), Orientation::CounterClockwise);
        }
    }

    #[test]
    fn test_unit_square() {
        let delaunay = Delaunay::new(&unit_square()).unwrap();

        assert_eq!(delaunay.triangles(), &[0, 2, 1, 0, 3, 2]);
        assert_eq!(delaunay.num_tris(), 2);
        assert_eq!(delaunay.hull().len(), 4);
        assert_eq!(delaunay.hull_area(), 4.0);
        assert_eq!(delaunay.get_tri(0).unwrap().neighbors(), [Some(1), None, None]);
        assert_eq!(delaunay.get_tri(1).unwrap().neighbors(), [None, None, Some(0)]);
        assert!(delaunay.get_tri(2).is_err());

        // the diagonal 0 -- 2 is the only inner edge
        let inner: Vec<HedgeIdx> = (0..6)
            .filter(|&e| delaunay.halfedges()[e].is_some())
            .collect();
        assert_eq!(inner.len(), 2);
        for e in inner {
            let hedge = delaunay.get_hedge(e).unwrap();
            let mut nodes = [hedge.starting_node(), hedge.end_node()];
            nodes.sort();
            assert_eq!(nodes, [0, 2]);
        }

        verify_triangulation(&delaunay);
    }

    #[test]
    fn test_delaunay_2d() {
        let _ = env_logger::builder().is_test(true).try_init();

        for n in NUM_VERTICES_LIST {
            let points = sample_points(n);
            let delaunay = Delaunay::new(&points).unwrap();

            verify_triangulation(&delaunay);

            // Euler: a triangulation of n points with h of them on the hull has 2n - 2 - h triangles
            let h = delaunay.hull().len();
            assert_eq!(delaunay.num_tris(), 2 * n - 2 - h);
        }
    }

    #[test]
    fn test_delaunay_at_different_scales() {
        for scale in [1e-3, 1.0, 1e3] {
            for n in [10, 30, 100, 500] {
                let points: Vec<Point2> = sample_vertices_2d(n, Some(0.0..=scale))
                    .into_iter()
                    .map(Point2::from)
                    .collect();
                let delaunay = Delaunay::new(&points).unwrap();

                assert_eq!(count_non_empty_circles(&delaunay), 0, "scale {scale}, {n} points");
                verify_triangulation(&delaunay);

                let h = delaunay.hull().len();
                assert_eq!(delaunay.num_tris(), 2 * n - 2 - h, "scale {scale}, {n} points");
            }
        }
    }

    #[test]
    fn test_non_finite_points_are_rejected() {
        for bad in [
            Point2::new(f64::NAN, 0.0),
            Point2::new(0.0, f64::INFINITY),
            Point2::new(f64::NEG_INFINITY, f64::NAN),
        ] {
            let mut points = sample_points(20);
            points.insert(7, bad);

            let err = Delaunay::new(&points).unwrap_err();
            assert!(err.to_string().contains("Point 7"), "{err}");
        }

        // also with too few points to triangulate
        assert!(Delaunay::new(&[Point2::new(f64::NAN, f64::NAN)]).is_err());
    }

    #[test]
    fn test_twins_are_symmetric() {
        let delaunay = Delaunay::new(&sample_points(200)).unwrap();

        for (e, twin) in delaunay.halfedges().iter().enumerate() {
            if let Some(twin) = *twin {
                assert_eq!(delaunay.halfedges()[twin], Some(e));

                let hedge = delaunay.get_hedge(e).unwrap();
                let twin = hedge.twin().unwrap();
                assert_eq!(hedge.starting_node(), twin.end_node());
                assert_eq!(hedge.end_node(), twin.starting_node());
            }
        }
    }

    #[test]
    fn test_hull_matches_convex_hull() {
        for n in [10, 100, 1000] {
            let points = sample_points(n);
            let delaunay = Delaunay::new(&points).unwrap();

            let multi_point: MultiPoint<f64> =
                points.iter().map(|p| geo::Point::new(p.x, p.y)).collect();
            let convex_hull = multi_point.convex_hull();

            // the exterior ring of geo is closed, i.e. repeats its first point
            assert_eq!(delaunay.hull().len(), convex_hull.exterior().0.len() - 1);
            assert!((delaunay.hull_area() - convex_hull.unsigned_area()).abs() < 1e-9);

            let hull = delaunay.hull();
            for (k, &v) in hull.iter().enumerate() {
                let next = hull[(k + 1) % hull.len()];
                assert_eq!(delaunay.hull_next(v), Some(next));
                assert_eq!(delaunay.hull_prev(next), Some(v));

                let hedge = delaunay.get_hedge(delaunay.hull_tri(v).unwrap()).unwrap();
                assert!(hedge.is_hull());
                assert_eq!(hedge.starting_node(), v);
                assert_eq!(hedge.end_node(), next);
            }
        }
    }

    #[test]
    fn test_less_than_three_points() {
        let points = unit_square();

        for n in 0..3 {
            let delaunay = Delaunay::new(&points[..n]).unwrap();
            assert!(delaunay.is_empty());
            assert!(delaunay.hull().is_empty());
            assert_eq!(delaunay.hull_start(), None);
            assert_eq!(delaunay.hull_area(), 0.0);
        }
    }

    #[test]
    fn test_aligned_points() {
        let collinear: Vec<Point2> = (0..5).map(|i| Point2::new(i as f64, 2.0 * i as f64)).collect();
        assert!(Delaunay::new(&collinear).is_err());

        let duplicates = vec![Point2::new(1.0, 1.0); 4];
        assert!(Delaunay::new(&duplicates).is_err());
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let mut points = unit_square();
        points.push(Point2::new(0.2, 0.1));
        points.push(Point2::new(0.2, 0.1 + 1e-12));
        points.push(Point2::new(-1.0, 1.0));

        let delaunay = Delaunay::new(&points).unwrap();

        assert_eq!(delaunay.num_tris(), 4);
        assert_eq!(delaunay.hull().len(), 4);
        assert!(!delaunay.is_on_hull(5));
        assert!(!delaunay.is_on_hull(6));
        verify_triangulation(&delaunay);
    }

    #[test]
    fn test_projection() {
        let points: Vec<Point3> = unit_square()
            .into_iter()
            .map(|p| Point3::new(p.x, 7.0, p.y))
            .collect();

        let xz = Delaunay::from_points3(&points, Projection::Xz).unwrap();
        assert_eq!(xz.num_tris(), 2);
        assert_eq!(xz.hull_area(), 4.0);

        // the vertices index the 3D input
        for (p, p3) in xz.points().iter().zip(&points) {
            assert_eq!(*p, Point2::new(p3.x, p3.z));
        }
        for &v in xz.triangles() {
            assert_eq!(points[v].y, 7.0);
            assert_eq!(xz.points()[v], points[v].project(Projection::Xz));
        }

        // all points project onto one line in the xy plane
        assert!(Delaunay::from_points3(&points, Projection::Xy).is_err());
    }

    #[test]
    fn test_triangulation_export() {
        let points = sample_points(50);
        let delaunay = Delaunay::new(&points).unwrap();
        let triangulation = delaunay.triangulation();

        assert_eq!(triangulation.len(), delaunay.num_tris());
        assert!((triangulation.area(&points) - delaunay.hull_area()).abs() < 1e-9);
    }
}
