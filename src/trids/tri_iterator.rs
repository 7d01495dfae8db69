use core::fmt;

use super::{hedge_iterator::HedgeIterator, tri_data_structure::TriDataStructure};
use crate::utils::types::{TriIdx, VertexIdx};

pub struct TriIterator<'a> {
    pub tds: &'a TriDataStructure,
    pub idx: TriIdx,
}

impl<'a> TriIterator<'a> {
    pub const fn new(tds: &'a TriDataStructure, idx: TriIdx) -> Self {
        Self { tds, idx }
    }

    /// Returns the index of this.
    pub const fn idx(&self) -> TriIdx {
        self.idx
    }

    /// Get the hedges of this triangle.
    // s. self.nodes() for a small explanation of the index calculation
    pub const fn hedges(&self) -> [HedgeIterator<'a>; 3] {
        [
            HedgeIterator::new(self.tds, self.idx * 3),
            HedgeIterator::new(self.tds, self.idx * 3 + 1),
            HedgeIterator::new(self.tds, self.idx * 3 + 2),
        ]
    }

    /// Get the nodes of this triangle, in counter-clockwise order.
    // Since the hedges and nodes are stored index-wise like this in the tds:
    //
    //  tri0                  tri1
    //    |                     |
    //    v                     v
    // [node0, node1, node2, node3, node4, node5, ... ]
    // [hedge0, hedge1, hedge2, hedge3, hedge4, hedge5, ... ]
    //
    // the indices of the nodes can be retrieved by multiplying the triangle index by 3
    pub fn nodes(&self) -> [VertexIdx; 3] {
        [
            self.tds.triangles[self.idx * 3],
            self.tds.triangles[self.idx * 3 + 1],
            self.tds.triangles[self.idx * 3 + 2],
        ]
    }

    /// Get the triangles across each of the three hedges, `None` on the convex hull.
    pub fn neighbors(&self) -> [Option<TriIdx>; 3] {
        self.hedges()
            .map(|hedge| hedge.twin().map(|twin| twin.tri().idx()))
    }

    /// Check if one of the hedges lies on the convex hull.
    pub fn is_hull(&self) -> bool {
        self.hedges().iter().any(HedgeIterator::is_hull)
    }
}

impl fmt::Display for TriIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [n0, n1, n2] = self.nodes();
        write!(f, "Triangle {}: {} -> {} -> {}", self.idx(), n0, n1, n2)
    }
}
