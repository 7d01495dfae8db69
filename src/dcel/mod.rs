//! A half-edge mesh over simple polygons, with ear clipping triangulation.

pub mod ear_clipping;
pub mod mesh;

pub use mesh::{Dcel, Face, HalfEdge, Vertex};
