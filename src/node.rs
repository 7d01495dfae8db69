use crate::utils::types::FaceIdx;
use core::fmt;

/// The face on the left of a dcel half-edge.
///
/// A `bounded face` has an index into the face arena of the mesh.
///
/// The `outer face` is the unbounded exterior; it is not stored in the arena.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum FaceNode {
    Bounded(FaceIdx),
    Outer,
}

impl FaceNode {
    /// Get the index of the face.
    pub const fn idx(&self) -> Option<FaceIdx> {
        match self {
            FaceNode::Bounded(idx) => Some(*idx),
            FaceNode::Outer => None,
        }
    }

    /// Check if the face is the unbounded exterior.
    pub const fn is_outer(&self) -> bool {
        matches!(self, FaceNode::Outer)
    }
}

impl fmt::Display for FaceNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceNode::Bounded(f_idx) => write!(f, "F{f_idx}"),
            FaceNode::Outer => write!(f, "F-1 (Exterior)"),
        }
    }
}
