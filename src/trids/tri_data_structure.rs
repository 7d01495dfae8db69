use anyhow::Result;
use core::cmp::Ordering;

use super::{hedge_iterator::HedgeIterator, tri_iterator::TriIterator};
use crate::utils::types::{HedgeIdx, TriIdx, VertexIdx};

/// Index of the half-edge following `e` in its triangle.
pub const fn next_hedge(e: HedgeIdx) -> HedgeIdx {
    if e % 3 == 2 {
        e - 2
    } else {
        e + 1
    }
}

/// Index of the half-edge preceding `e` in its triangle.
pub const fn prev_hedge(e: HedgeIdx) -> HedgeIdx {
    if e % 3 == 0 {
        e + 2
    } else {
        e - 1
    }
}

/// A flat, index based 2D triangulation data structure.
///
/// ```ignore
/// i   --> hedge0 \
/// |        |       \
/// v        v        |
/// i+1 --> hedge1 ---|-->  triangle i / 3
/// |        |        |
/// v        v       /
/// i+2 --> hedge2 /
/// ```
//
// where `triangles[i]` is the node `hedge i` starts at and `halfedges[i]` its twin,
// `None` for hedges on the convex hull.
#[derive(Clone, Debug, Default)]
pub struct TriDataStructure {
    pub(crate) triangles: Vec<VertexIdx>,
    pub(crate) halfedges: Vec<Option<HedgeIdx>>,
}

impl TriDataStructure {
    pub const fn new() -> Self {
        Self {
            triangles: Vec::new(),
            halfedges: Vec::new(),
        }
    }

    /// Reserve space for the at most `2n - 5` triangles of `n` points.
    pub fn with_capacity(num_vertices: usize) -> Self {
        let max_tris = if num_vertices > 2 {
            2 * num_vertices - 5
        } else {
            0
        };

        Self {
            triangles: Vec::with_capacity(max_tris * 3),
            halfedges: Vec::with_capacity(max_tris * 3),
        }
    }

    /// Add a triangle `v0 -> v1 -> v2` and link its hedges to the given twins.
    ///
    /// Returns the index of the first hedge, i.e. `v0 -> v1`.
    pub fn add_tri(
        &mut self,
        nodes: [VertexIdx; 3],
        twins: [Option<HedgeIdx>; 3],
    ) -> Result<HedgeIdx> {
        let hedge_idx0 = self.triangles.len();

        self.triangles.extend_from_slice(&nodes);

        for (k, twin) in twins.into_iter().enumerate() {
            self.link(hedge_idx0 + k, twin)?;
        }

        Ok(hedge_idx0)
    }

    /// Make `a` and `b` twins of each other, or mark `a` as a hull hedge if `b` is `None`.
    ///
    /// A hedge index may be at most one past the current end, in which case the twin list grows.
    pub fn link(&mut self, a: HedgeIdx, b: Option<HedgeIdx>) -> Result<()> {
        self.set_twin(a, b)?;

        if let Some(b) = b {
            self.set_twin(b, Some(a))?;
        }

        Ok(())
    }

    fn set_twin(&mut self, hedge: HedgeIdx, twin: Option<HedgeIdx>) -> Result<()> {
        match hedge.cmp(&self.halfedges.len()) {
            Ordering::Less => self.halfedges[hedge] = twin,
            Ordering::Equal => self.halfedges.push(twin),
            Ordering::Greater => {
                return Err(anyhow::Error::msg(format!(
                    "Invalid link: hedge {hedge} out of range ({} hedges)",
                    self.halfedges.len()
                )))
            }
        }

        Ok(())
    }

    /// Flips the edge `a` shared by two triangles, such that it connects their two opposite nodes.
    ///
    /// ```text
    ///           pl                    pl
    ///          /||\                  /  \
    ///       al/ || \bl            al/    \a
    ///        /  ||  \              /      \
    ///       /  a||b  \    flip    /___ar___\
    ///     p0\   ||   /p1   =>   p0\---bl---/p1
    ///        \  ||  /              \      /
    ///       ar\ || /br             b\    /br
    ///          \||/                  \  /
    ///           pr                    pr
    /// ```
    ///
    /// The triangles keep their indices, `a` becomes `p1 -> pl` and `b` becomes `p0 -> pr`.
    pub fn flip_2_to_2(&mut self, a: HedgeIdx) -> Result<()> {
        let b = self.halfedges[a]
            .ok_or_else(|| anyhow::Error::msg(format!("Cannot flip hull hedge {a}")))?;

        let ar = prev_hedge(a);
        let bl = prev_hedge(b);

        let p0 = self.triangles[ar];
        let p1 = self.triangles[bl];

        let hbl = self.halfedges[bl];
        let har = self.halfedges[ar];

        self.triangles[a] = p1;
        self.triangles[b] = p0;

        self.link(a, hbl)?;
        self.link(b, har)?;
        self.link(ar, Some(bl))?;

        Ok(())
    }

    /// Retrieve a half-edge iterator by index.
    pub fn get_hedge(&self, idx: HedgeIdx) -> Result<HedgeIterator<'_>> {
        if idx >= self.triangles.len() {
            return Err(anyhow::Error::msg("Hedge index out of bounds"));
        }

        Ok(HedgeIterator::new(self, idx))
    }

    /// Retrieve a triangle iterator by index.
    pub fn get_tri(&self, idx: TriIdx) -> Result<TriIterator<'_>> {
        if idx >= self.num_tris() {
            return Err(anyhow::Error::msg("Tri index out of bounds!"));
        }

        Ok(TriIterator::new(self, idx))
    }

    /// Get the number of triangles.
    pub fn num_tris(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Check if the data structure is sound, i.e. every twin relation is symmetric and runs in the opposite direction.
    pub fn is_sound(&self) -> bool {
        if self.triangles.len() != self.halfedges.len() || self.triangles.len() % 3 != 0 {
            log::error!(
                "Inconsistent lengths: {} nodes, {} twins",
                self.triangles.len(),
                self.halfedges.len()
            );
            return false;
        }

        (0..self.triangles.len()).all(|idx| HedgeIterator::new(self, idx).is_sound())
    }

    /// Release unused capacity once construction is done.
    pub fn shrink_to_fit(&mut self) {
        self.triangles.shrink_to_fit();
        self.halfedges.shrink_to_fit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_prev_hedge() {
        assert_eq!(next_hedge(0), 1);
        assert_eq!(next_hedge(2), 0);
        assert_eq!(next_hedge(5), 3);
        assert_eq!(prev_hedge(0), 2);
        assert_eq!(prev_hedge(4), 3);
        assert_eq!(prev_hedge(3), 5);
    }

    #[test]
    fn test_link_out_of_range() {
        let mut tds = TriDataStructure::new();
        assert!(tds.link(1, None).is_err());
        assert!(tds.link(0, None).is_ok());
        assert!(tds.link(0, Some(2)).is_err());
    }

    #[test]
    fn test_add_tri_and_flip() {
        // two triangles sharing the edge 0 -- 2 of a quad 0, 1, 2, 3
        let mut tds = TriDataStructure::new();
        let t0 = tds.add_tri([0, 1, 2], [None, None, None]).unwrap();
        let t1 = tds.add_tri([0, 2, 3], [Some(t0 + 2), None, None]).unwrap();

        assert_eq!(tds.num_tris(), 2);
        assert_eq!(tds.halfedges[t0 + 2], Some(t1));
        assert!(tds.is_sound());

        tds.flip_2_to_2(t1).unwrap();
        assert!(tds.is_sound());

        // the shared edge now connects 1 and 3
        let shared: Vec<[VertexIdx; 2]> = (0..6)
            .filter(|&e| tds.halfedges[e].is_some())
            .map(|e| [tds.triangles[e], tds.triangles[next_hedge(e)]])
            .collect();
        assert_eq!(shared.len(), 2);
        for [a, b] in shared {
            assert!((a == 1 && b == 3) || (a == 3 && b == 1));
        }

        assert!(tds.flip_2_to_2(t0).is_err());
    }
}
