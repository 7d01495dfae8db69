use anyhow::{bail, Result};
use core::fmt;

use crate::{
    utils::types::{FaceIdx, HedgeIdx, VertexIdx},
    FaceNode, Point2, Triangulation,
};

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub point: Point2,
    /// Some half-edge starting at this vertex.
    pub leaving: Option<HedgeIdx>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HalfEdge {
    pub origin: VertexIdx,
    pub twin: HedgeIdx,
    /// The following half-edge around `face`.
    pub next: HedgeIdx,
    /// The face on the left of this half-edge.
    pub face: FaceNode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    /// Some half-edge on the boundary of this face.
    pub edge: Option<HedgeIdx>,
}

/// A doubly connected edge list over a simple polygon, refined by inserting and removing diagonals.
///
/// Vertices, half-edges and bounded faces live in arenas and are addressed by their index.
/// Removed half-edges and faces leave an empty slot behind, indices are never reused.
/// The unbounded exterior is [`FaceNode::Outer`] and is not stored.
#[derive(Clone, Debug, Default)]
pub struct Dcel {
    vertices: Vec<Vertex>,
    hedges: Vec<Option<HalfEdge>>,
    faces: Vec<Option<Face>>,
}

impl Dcel {
    /// Build the mesh of a polygon given as a counter-clockwise ring of points.
    ///
    /// The result has one bounded face. Half-edge `2i` runs from vertex `i` to `i + 1` on that face,
    /// its twin `2i + 1` runs backwards on the exterior.
    ///
    /// The winding is not checked, for a clockwise ring the bounded face lies on the right.
    pub fn new(points: &[Point2]) -> Result<Self> {
        let n = points.len();
        if n < 3 {
            bail!("A polygon needs at least 3 points, got {n}");
        }

        let vertices = points
            .iter()
            .enumerate()
            .map(|(i, &point)| Vertex {
                point,
                leaving: Some(2 * i),
            })
            .collect();

        let mut hedges = Vec::with_capacity(2 * n);
        for i in 0..n {
            hedges.push(Some(HalfEdge {
                origin: i,
                twin: 2 * i + 1,
                next: 2 * ((i + 1) % n),
                face: FaceNode::Bounded(0),
            }));
            hedges.push(Some(HalfEdge {
                origin: (i + 1) % n,
                twin: 2 * i,
                next: 2 * ((i + n - 1) % n) + 1,
                face: FaceNode::Outer,
            }));
        }

        let dcel = Self {
            vertices,
            hedges,
            faces: vec![Some(Face { edge: Some(0) })],
        };

        log::debug!("Created polygon mesh with {n} vertices");

        Ok(dcel)
    }

    pub fn vertex(&self, idx: VertexIdx) -> Result<&Vertex> {
        self.vertices
            .get(idx)
            .ok_or_else(|| anyhow::Error::msg(format!("Unknown vertex V{idx}")))
    }

    pub fn hedge(&self, idx: HedgeIdx) -> Result<&HalfEdge> {
        self.hedges
            .get(idx)
            .and_then(Option::as_ref)
            .ok_or_else(|| anyhow::Error::msg(format!("Unknown half-edge E{idx}")))
    }

    fn hedge_mut(&mut self, idx: HedgeIdx) -> Result<&mut HalfEdge> {
        self.hedges
            .get_mut(idx)
            .and_then(Option::as_mut)
            .ok_or_else(|| anyhow::Error::msg(format!("Unknown half-edge E{idx}")))
    }

    pub fn face(&self, idx: FaceIdx) -> Result<&Face> {
        self.faces
            .get(idx)
            .and_then(Option::as_ref)
            .ok_or_else(|| anyhow::Error::msg(format!("Unknown face F{idx}")))
    }

    fn face_mut(&mut self, idx: FaceIdx) -> Result<&mut Face> {
        self.faces
            .get_mut(idx)
            .and_then(Option::as_mut)
            .ok_or_else(|| anyhow::Error::msg(format!("Unknown face F{idx}")))
    }

    /// The vertex a half-edge ends at.
    pub fn destination(&self, edge: HedgeIdx) -> Result<VertexIdx> {
        let next = self.hedge(edge)?.next;

        Ok(self.hedge(next)?.origin)
    }

    /// The half-edge preceding `edge` around its face.
    pub fn previous(&self, edge: HedgeIdx) -> Result<HedgeIdx> {
        let mut current = edge;

        for _ in 0..self.hedges.len() {
            let next = self.hedge(current)?.next;
            if next == edge {
                return Ok(current);
            }
            current = next;
        }

        bail!("Face cycle of E{edge} does not close")
    }

    /// The half-edges leaving `v`, in rotational order around it.
    pub fn outgoing(&self, v: VertexIdx) -> Result<Vec<HedgeIdx>> {
        let Some(leaving) = self.vertex(v)?.leaving else {
            return Ok(Vec::new());
        };

        let mut edges = vec![leaving];
        let mut current = self.hedge(self.previous(leaving)?)?.twin;

        while current != leaving {
            if edges.len() > self.hedges.len() {
                bail!("Fan around V{v} does not close");
            }

            edges.push(current);
            current = self.hedge(self.previous(current)?)?.twin;
        }

        Ok(edges)
    }

    /// The half-edge on `face` that ends at `v`.
    pub fn previous_edge(&self, v: VertexIdx, face: FaceNode) -> Result<HedgeIdx> {
        for edge in self.outgoing(v)? {
            let incoming = self.previous(edge)?;
            if self.hedge(incoming)?.face == face {
                return Ok(incoming);
            }
        }

        bail!("V{v} is not on the boundary of {face}")
    }

    /// The half-edge from `v1` to `v2`, if the two are connected.
    pub fn edge_between(&self, v1: VertexIdx, v2: VertexIdx) -> Result<Option<HedgeIdx>> {
        for edge in self.outgoing(v1)? {
            if self.destination(edge)? == v2 {
                return Ok(Some(edge));
            }
        }

        Ok(None)
    }

    /// A bounded face both `v1` and `v2` lie on.
    ///
    /// If there is none, the face of the half-edge leaving `v1` is used, given it is bounded.
    pub fn reference_face(&self, v1: VertexIdx, v2: VertexIdx) -> Result<FaceIdx> {
        let faces2: Vec<FaceNode> = self
            .outgoing(v2)?
            .into_iter()
            .map(|edge| self.hedge(edge).map(|hedge| hedge.face))
            .collect::<Result<_>>()?;

        for edge in self.outgoing(v1)? {
            let face = self.hedge(edge)?.face;
            if let FaceNode::Bounded(idx) = face {
                if faces2.contains(&face) {
                    return Ok(idx);
                }
            }
        }

        let fallback = self
            .vertex(v1)?
            .leaving
            .map(|edge| self.hedge(edge).map(|hedge| hedge.face))
            .transpose()?;

        match fallback {
            Some(FaceNode::Bounded(idx)) => {
                log::warn!("V{v1} and V{v2} share no face, falling back to F{idx}");
                Ok(idx)
            }
            _ => bail!("V{v1} and V{v2} share no bounded face"),
        }
    }

    /// Insert the diagonal `v1 -> v2` and its twin, splitting the face both vertices lie on.
    ///
    /// Returns the half-edge `v1 -> v2`.
    pub fn add_half_edges(&mut self, v1: VertexIdx, v2: VertexIdx) -> Result<HedgeIdx> {
        let face = self.reference_face(v1, v2)?;

        self.split_face(v1, v2, face)
    }

    /// Split `face` by the diagonal `v1 -> v2`.
    ///
    /// The new face lies to the left of `v1 -> v2`, i.e. it is bounded by the boundary path from `v2` to `v1`.
    /// The twin `v2 -> v1` stays on `face`. Returns the half-edge `v1 -> v2`.
    pub fn split_face(&mut self, v1: VertexIdx, v2: VertexIdx, face: FaceIdx) -> Result<HedgeIdx> {
        if v1 == v2 {
            bail!("Cannot connect V{v1} to itself");
        }
        self.face(face)?;

        let prev1 = self.previous_edge(v1, FaceNode::Bounded(face))?;
        let prev2 = self.previous_edge(v2, FaceNode::Bounded(face))?;

        let new_face = self.faces.len();
        let left = self.hedges.len();
        let right = left + 1;

        let out1 = self.hedge(prev1)?.next;
        let out2 = self.hedge(prev2)?.next;

        self.hedges.push(Some(HalfEdge {
            origin: v1,
            twin: right,
            next: out2,
            face: FaceNode::Bounded(new_face),
        }));
        self.hedges.push(Some(HalfEdge {
            origin: v2,
            twin: left,
            next: out1,
            face: FaceNode::Bounded(face),
        }));
        self.faces.push(Some(Face { edge: Some(left) }));

        self.hedge_mut(prev1)?.next = left;
        self.hedge_mut(prev2)?.next = right;
        self.face_mut(face)?.edge = Some(right);

        let mut current = out2;
        while current != left {
            let hedge = self.hedge_mut(current)?;
            hedge.face = FaceNode::Bounded(new_face);
            current = hedge.next;
        }

        log::trace!("Split F{face} by V{v1} -> V{v2} into F{new_face}");

        Ok(left)
    }

    /// Remove `edge` and its twin, merging the faces on both sides.
    ///
    /// The face of the removed bounded side is deleted; if one side is the exterior, the merged face is the exterior.
    pub fn remove_half_edges(&mut self, edge: HedgeIdx) -> Result<()> {
        let mut e = edge;
        let mut t = self.hedge(e)?.twin;

        if self.hedge(e)?.face.is_outer() {
            std::mem::swap(&mut e, &mut t);
        }

        let face_keep = self.hedge(t)?.face;
        let FaceNode::Bounded(face_remove) = self.hedge(e)?.face else {
            bail!("E{edge} has the exterior on both sides");
        };
        if face_keep == FaceNode::Bounded(face_remove) {
            bail!("E{edge} has F{face_remove} on both sides, removing it would disconnect the mesh");
        }

        let e_prev = self.previous(e)?;
        let t_prev = self.previous(t)?;
        let e_next = self.hedge(e)?.next;
        let t_next = self.hedge(t)?.next;

        self.hedge_mut(e_prev)?.next = t_next;
        self.hedge_mut(t_prev)?.next = e_next;

        if let FaceNode::Bounded(keep) = face_keep {
            self.face_mut(keep)?.edge = Some(e_next);
        }

        let mut current = e_next;
        while current != t_next {
            let hedge = self.hedge_mut(current)?;
            hedge.face = face_keep;
            current = hedge.next;
        }

        let origin_e = self.hedge(e)?.origin;
        let origin_t = self.hedge(t)?.origin;

        self.faces[face_remove] = None;
        self.hedges[e] = None;
        self.hedges[t] = None;

        if self.vertices[origin_e].leaving == Some(e) {
            self.vertices[origin_e].leaving = Some(t_next);
        }
        if self.vertices[origin_t].leaving == Some(t) {
            self.vertices[origin_t].leaving = Some(e_next);
        }

        log::trace!("Removed E{e}, merged F{face_remove} into {face_keep}");

        Ok(())
    }

    /// The half-edges around a bounded face, beginning at its reference edge.
    pub fn face_edges(&self, face: FaceIdx) -> Result<Vec<HedgeIdx>> {
        let Some(start) = self.face(face)?.edge else {
            return Ok(Vec::new());
        };

        let mut edges = vec![start];
        let mut current = self.hedge(start)?.next;

        while current != start {
            if edges.len() > self.hedges.len() {
                bail!("Boundary of F{face} does not close");
            }

            edges.push(current);
            current = self.hedge(current)?.next;
        }

        Ok(edges)
    }

    pub fn face_edge_count(&self, face: FaceIdx) -> Result<usize> {
        Ok(self.face_edges(face)?.len())
    }

    /// The vertices around a bounded face, counter-clockwise for a counter-clockwise polygon.
    pub fn face_vertices(&self, face: FaceIdx) -> Result<Vec<VertexIdx>> {
        self.face_edges(face)?
            .into_iter()
            .map(|edge| self.hedge(edge).map(|hedge| hedge.origin))
            .collect()
    }

    /// Indices of all bounded faces still present.
    pub fn bounded_faces(&self) -> Vec<FaceIdx> {
        self.faces
            .iter()
            .enumerate()
            .filter_map(|(idx, face)| face.as_ref().map(|_| idx))
            .collect()
    }

    pub fn points(&self) -> Vec<Point2> {
        self.vertices.iter().map(|v| v.point).collect()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_half_edges(&self) -> usize {
        self.hedges.iter().flatten().count()
    }

    /// The number of bounded faces.
    pub fn num_faces(&self) -> usize {
        self.faces.iter().flatten().count()
    }

    /// Drop all vertices, half-edges and faces.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.hedges.clear();
        self.faces.clear();
    }

    /// The triangular bounded faces as a [`Triangulation`], other faces are left out.
    pub fn triangulation(&self) -> Result<Triangulation> {
        let mut triangles = Vec::new();

        for face in self.bounded_faces() {
            let nodes = self.face_vertices(face)?;
            match nodes[..] {
                [a, b, c] => triangles.push([a, b, c]),
                _ => log::debug!("Skipping F{face} with {} edges", nodes.len()),
            }
        }

        Ok(Triangulation::from_triangles(triangles))
    }

    /// Check the mesh for consistency, logging every violation found.
    pub fn is_sound(&self) -> bool {
        let mut sound = true;

        let mut check = |condition: bool, error_msg: String| {
            if !condition {
                log::error!("{error_msg}");
                sound = false;
            }
        };

        for (idx, hedge) in self.hedges.iter().enumerate() {
            let Some(hedge) = hedge else { continue };

            let twin = self.hedge(hedge.twin).ok();
            check(
                twin.is_some_and(|twin| twin.twin == idx),
                format!("E{idx}: twin E{} does not point back", hedge.twin),
            );
            check(
                twin.is_some() && self.destination(hedge.twin).ok() == Some(hedge.origin),
                format!("E{idx}: twin does not end at the origin"),
            );
            check(
                self.hedge(hedge.next).is_ok_and(|next| next.face == hedge.face),
                format!("E{idx}: next E{} lies on another face", hedge.next),
            );
            check(
                hedge.face.idx().map_or(true, |face| self.face(face).is_ok()),
                format!("E{idx}: face {} was removed", hedge.face),
            );
        }

        for face in self.bounded_faces() {
            let edges = self.face_edges(face);
            check(
                edges.as_ref().is_ok_and(|edges| edges.len() >= 3),
                format!("F{face}: boundary is not a closed cycle of at least 3 edges"),
            );
            check(
                edges.is_ok_and(|edges| {
                    edges.iter().all(|&edge| {
                        self.hedge(edge)
                            .is_ok_and(|hedge| hedge.face == FaceNode::Bounded(face))
                    })
                }),
                format!("F{face}: boundary edge on another face"),
            );
        }

        for (idx, vertex) in self.vertices.iter().enumerate() {
            check(
                vertex
                    .leaving
                    .map_or(true, |edge| self.hedge(edge).is_ok_and(|hedge| hedge.origin == idx)),
                format!("V{idx}: leaving edge does not start here"),
            );
        }

        sound
    }
}

impl fmt::Display for Dcel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Vertices:")?;
        for (idx, vertex) in self.vertices.iter().enumerate() {
            match vertex.leaving {
                Some(edge) => writeln!(f, "  V{idx} {} leaving E{edge}", vertex.point)?,
                None => writeln!(f, "  V{idx} {} isolated", vertex.point)?,
            }
        }

        writeln!(f, "Faces:")?;
        for idx in self.bounded_faces() {
            let count = self.face_edge_count(idx).map_err(|_| fmt::Error)?;
            match self.faces[idx].as_ref().and_then(|face| face.edge) {
                Some(edge) => writeln!(f, "  F{idx} with {count} edges, reference E{edge}")?,
                None => writeln!(f, "  F{idx} without edges")?,
            }
        }

        writeln!(f, "Half-edges:")?;
        for (idx, hedge) in self.hedges.iter().enumerate() {
            let Some(hedge) = hedge else { continue };
            let destination = self.destination(idx).map_err(|_| fmt::Error)?;

            writeln!(
                f,
                "  E{idx}: V{} -> V{destination} on {}, next E{}, twin E{}",
                hedge.origin, hedge.face, hedge.next, hedge.twin
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_new() {
        let dcel = Dcel::new(&square()).unwrap();

        assert_eq!(dcel.num_vertices(), 4);
        assert_eq!(dcel.num_half_edges(), 8);
        assert_eq!(dcel.num_faces(), 1);
        assert_eq!(dcel.face_vertices(0).unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(dcel.face_edge_count(0).unwrap(), 4);
        assert!(dcel.is_sound());

        assert_eq!(dcel.destination(0).unwrap(), 1);
        assert_eq!(dcel.previous(0).unwrap(), 6);
        assert_eq!(dcel.hedge(1).unwrap().face, FaceNode::Outer);
        assert_eq!(dcel.edge_between(0, 1).unwrap(), Some(0));
        assert_eq!(dcel.edge_between(1, 0).unwrap(), Some(1));
        assert_eq!(dcel.edge_between(0, 2).unwrap(), None);
        assert_eq!(dcel.previous_edge(0, FaceNode::Bounded(0)).unwrap(), 6);
        assert_eq!(dcel.previous_edge(0, FaceNode::Outer).unwrap(), 1);

        assert!(Dcel::new(&square()[..2]).is_err());
        assert!(dcel.vertex(4).is_err());
        assert!(dcel.hedge(8).is_err());
    }

    #[test]
    fn test_add_and_remove_half_edges() {
        let mut dcel = Dcel::new(&square()).unwrap();

        let diagonal = dcel.add_half_edges(0, 2).unwrap();
        assert_eq!(dcel.destination(diagonal).unwrap(), 2);
        assert_eq!(dcel.num_faces(), 2);
        assert_eq!(dcel.num_half_edges(), 10);
        assert_eq!(dcel.face_vertices(1).unwrap(), vec![0, 2, 3]);
        assert_eq!(dcel.face_vertices(0).unwrap(), vec![2, 0, 1]);
        assert_eq!(dcel.reference_face(0, 2).unwrap(), 0);
        assert!(dcel.is_sound());

        dcel.remove_half_edges(diagonal).unwrap();
        assert_eq!(dcel.num_faces(), 1);
        assert_eq!(dcel.num_half_edges(), 8);
        assert_eq!(dcel.bounded_faces(), vec![0]);
        assert_eq!(dcel.face_edge_count(0).unwrap(), 4);
        assert!(dcel.hedge(diagonal).is_err());
        assert!(dcel.is_sound());
    }

    #[test]
    fn test_crossing_diagonal_is_rejected() {
        let points = vec![
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 2.0),
            Point2::new(0.0, 0.0),
            Point2::new(0.5, -2.0),
        ];
        let mut dcel = Dcel::new(&points).unwrap();

        dcel.add_half_edges(0, 2).unwrap();
        // 1 and 3 now lie on different faces
        assert!(dcel.add_half_edges(1, 3).is_err());

        assert_eq!(dcel.num_faces(), 2);
        assert_eq!(dcel.num_half_edges(), 10);
        assert!(dcel.is_sound());
    }

    #[test]
    fn test_remove_boundary_edge() {
        let mut dcel = Dcel::new(&square()).unwrap();

        // works from either side
        dcel.remove_half_edges(1).unwrap();

        assert_eq!(dcel.num_faces(), 0);
        assert_eq!(dcel.num_half_edges(), 6);
        assert_eq!(dcel.vertex(0).unwrap().leaving, Some(7));
        assert!(dcel.is_sound());
    }

    #[test]
    fn test_display_and_clear() {
        let mut dcel = Dcel::new(&square()).unwrap();
        dcel.add_half_edges(1, 3).unwrap();

        let dump = dcel.to_string();
        assert!(dump.contains("V0 (0, 0) leaving E0"));
        assert!(dump.contains("F1 with 3 edges, reference E8"));
        assert!(dump.contains("E8: V1 -> V3 on F1, next E6, twin E9"));
        assert!(dump.contains("on F-1 (Exterior)"));

        dcel.clear();
        assert_eq!(dcel.num_vertices(), 0);
        assert_eq!(dcel.num_half_edges(), 0);
        assert_eq!(dcel.num_faces(), 0);
    }
}
