// Type aliases for data indices.
// This is to know, when a function accepts or returns a usize, what it is for.
pub type VertexIdx = usize;
pub type HedgeIdx = usize;
pub type TriIdx = usize;
pub type FaceIdx = usize;
