use core::fmt;

use super::{
    tri_data_structure::{next_hedge, prev_hedge, TriDataStructure},
    tri_iterator::TriIterator,
};
use crate::utils::types::{HedgeIdx, VertexIdx};

/// An iterator over the half-edges of a triangulation data structure.
#[derive(Clone, Copy)]
pub struct HedgeIterator<'a> {
    pub tds: &'a TriDataStructure,
    /// The hedge idx of this iterator
    pub idx: HedgeIdx,
}

impl<'a> HedgeIterator<'a> {
    pub const fn new(tds: &'a TriDataStructure, idx: HedgeIdx) -> Self {
        Self { tds, idx }
    }

    /// Retrieve the node this hedge originates from.
    pub fn starting_node(&self) -> VertexIdx {
        self.tds.triangles[self.idx]
    }

    /// Retrieve the node this hedge ends at.
    pub fn end_node(&self) -> VertexIdx {
        self.tds.triangles[next_hedge(self.idx)]
    }

    /// Check if the hedge lies on the convex hull, i.e. has no twin.
    pub fn is_hull(&self) -> bool {
        self.tds.halfedges[self.idx].is_none()
    }

    /// Check if the hedge is sound, i.e. its `twin` points back and runs in the opposite direction.
    pub fn is_sound(&self) -> bool {
        let Some(twin) = self.twin() else {
            return true;
        };

        let mut sound = true;

        let mut check = |condition: bool, error_msg: &str| {
            if !condition {
                log::error!("{self}: {error_msg}");
                sound = false;
            }
        };

        check(
            self.tds.halfedges.get(twin.idx) == Some(&Some(self.idx)),
            "Twin does not point back",
        );
        check(
            twin.starting_node() == self.end_node() && twin.end_node() == self.starting_node(),
            "Wrong twin hedge",
        );
        check(twin.tri().idx() != self.tri().idx(), "Twin in the same triangle");

        sound
    }

    /// Retrieve the `next` half-edge belonging to the same triangle.
    pub const fn next(&self) -> HedgeIterator<'a> {
        Self::new(self.tds, next_hedge(self.idx))
    }

    /// Retrieve the `previous` half-edge belonging to the same triangle.
    pub const fn prev(&self) -> HedgeIterator<'a> {
        Self::new(self.tds, prev_hedge(self.idx))
    }

    /// Retrieve the `twin` (aka opposite) half-edge in the adjacent triangle, `None` on the convex hull.
    ///
    /// This is the hedge that goes in the opposite direction,
    ///
    /// i.e. `self.starting_node() == self.twin().end_node()` and the other way around.
    pub fn twin(&self) -> Option<HedgeIterator<'a>> {
        self.tds.halfedges[self.idx]
            .filter(|&twin| twin < self.tds.triangles.len())
            .map(|twin| Self::new(self.tds, twin))
    }

    /// Retrieve the triangle this half-edge belongs to.
    pub const fn tri(&self) -> TriIterator<'a> {
        TriIterator::new(self.tds, self.idx / 3)
    }
}

impl fmt::Display for HedgeIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Edge {}: {} -> {}",
            self.idx,
            self.starting_node(),
            self.end_node()
        )
    }
}
