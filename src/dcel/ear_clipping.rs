use anyhow::{bail, Result};

use super::mesh::Dcel;
use crate::{
    utils::{
        convexity::{is_convex, triangle_contains},
        types::FaceIdx,
    },
    Point2,
};

impl Dcel {
    /// Triangulate every bounded face by ear clipping.
    ///
    /// Returns the indices of all triangular faces afterwards.
    pub fn triangulate(&mut self) -> Result<Vec<FaceIdx>> {
        let now = std::time::Instant::now();

        let mut triangles = Vec::new();
        for face in self.bounded_faces() {
            if self.face_edge_count(face)? > 3 {
                triangles.extend(self.triangulate_face(face)?);
            } else {
                triangles.push(face);
            }
        }

        log::trace!(
            "Ear clipping computed in {:.4} µs",
            now.elapsed().as_micros()
        );

        Ok(triangles)
    }

    /// Triangulate a simple counter-clockwise face by repeatedly clipping its first ear.
    ///
    /// Each ear becomes a new face, the remaining triangle keeps the index `face`.
    /// Fails if no ear is found, e.g. for a clockwise or self-intersecting boundary,
    /// the ears clipped until then stay in the mesh.
    pub fn triangulate_face(&mut self, face: FaceIdx) -> Result<Vec<FaceIdx>> {
        let mut ring = self.face_vertices(face)?;
        let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));

        while ring.len() > 3 {
            let points = ring
                .iter()
                .map(|&v| self.vertex(v).map(|vertex| vertex.point))
                .collect::<Result<Vec<_>>>()?;

            let Some(k) = (0..ring.len()).find(|&k| is_ear(&points, k)) else {
                log::error!("No ear found on F{face}, remaining ring {ring:?}");
                bail!("F{face} is not a simple counter-clockwise polygon, no ear found");
            };

            let n = ring.len();
            let (a, b, c) = (ring[(k + n - 1) % n], ring[k], ring[(k + 1) % n]);

            // the face left of c -> a is the ear
            let diagonal = self.split_face(c, a, face)?;
            let ear = self
                .hedge(diagonal)?
                .face
                .idx()
                .ok_or_else(|| anyhow::Error::msg("Ear on the exterior"))?;

            log::debug!("Clipped ear V{a} V{b} V{c} as F{ear}");

            triangles.push(ear);
            ring.remove(k);
        }

        triangles.push(face);

        Ok(triangles)
    }
}

/// `ring[k]` is an ear tip: its corner is convex and no other ring vertex lies in the ear.
fn is_ear(points: &[Point2], k: usize) -> bool {
    let n = points.len();
    let (a, c) = ((k + n - 1) % n, (k + 1) % n);

    if !is_convex(points[a], points[k], points[c]) {
        return false;
    }

    (0..n)
        .filter(|&j| j != a && j != k && j != c)
        .all(|j| !triangle_contains(points[a], points[k], points[c], points[j]))
}
