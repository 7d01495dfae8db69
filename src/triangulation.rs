use std::collections::HashSet;

use crate::{
    utils::{
        predicates::orient_2d_value,
        types::{HedgeIdx, TriIdx, VertexIdx},
    },
    Point2,
};

/// A triangle mesh as flat index lists, the common output of [`crate::Delaunay`] and [`crate::Dcel`].
///
/// Triangle `t` consists of the vertices `triangles[3 * t..3 * t + 3]`.
/// `halfedges` holds the twin of every half-edge, if the producer tracks adjacency.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Triangulation {
    pub triangles: Vec<VertexIdx>,
    pub halfedges: Option<Vec<Option<HedgeIdx>>>,
}

impl Triangulation {
    /// Build a triangulation from a list of triangles, without adjacency.
    pub fn from_triangles(triangles: impl IntoIterator<Item = [VertexIdx; 3]>) -> Self {
        Self {
            triangles: triangles.into_iter().flatten().collect(),
            halfedges: None,
        }
    }

    /// The number of triangles.
    pub fn len(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn triangle(&self, idx: TriIdx) -> Option<[VertexIdx; 3]> {
        let nodes = self.triangles.get(3 * idx..3 * idx + 3)?;

        Some([nodes[0], nodes[1], nodes[2]])
    }

    pub fn iter(&self) -> impl Iterator<Item = [VertexIdx; 3]> + '_ {
        self.triangles
            .chunks_exact(3)
            .map(|nodes| [nodes[0], nodes[1], nodes[2]])
    }

    /// The summed signed area of all triangles, positive for counter-clockwise triangles.
    pub fn area(&self, points: &[Point2]) -> f64 {
        self.iter()
            .map(|[a, b, c]| orient_2d_value(points[a], points[b], points[c]) / 2.0)
            .sum()
    }

    /// The number of distinct vertices referenced by any triangle.
    pub fn num_vertices_used(&self) -> usize {
        self.triangles.iter().collect::<HashSet<_>>().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_access() {
        let triangulation = Triangulation::from_triangles([[0, 1, 2], [0, 2, 3]]);

        assert_eq!(triangulation.len(), 2);
        assert!(!triangulation.is_empty());
        assert_eq!(triangulation.triangle(1), Some([0, 2, 3]));
        assert_eq!(triangulation.triangle(2), None);
        assert_eq!(triangulation.num_vertices_used(), 4);
        assert_eq!(
            triangulation.iter().collect::<Vec<_>>(),
            vec![[0, 1, 2], [0, 2, 3]]
        );
        assert!(Triangulation::default().is_empty());
    }

    #[test]
    fn test_area() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];

        let triangulation = Triangulation::from_triangles([[0, 1, 2], [0, 2, 3]]);
        assert_eq!(triangulation.area(&points), 4.0);

        let clockwise = Triangulation::from_triangles([[0, 2, 1]]);
        assert_eq!(clockwise.area(&points), -2.0);
    }
}
