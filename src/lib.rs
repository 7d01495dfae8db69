//! # tridel
//!
//! 2D triangulations of point sets and polygons:
//!
//! - [`Delaunay`], an incremental Delaunay triangulation that sweeps the points outwards from a seed triangle,
//! - [`Dcel`], a half-edge mesh over a simple polygon, triangulated by ear clipping,
//! - [`art_gallery`], guard placement by 3-coloring a polygon triangulation.
//!
//! Both triangulations export a [`Triangulation`] with counter-clockwise triangles.
//! All geometric predicates use plain floating point arithmetic with a dead band of [`EPSILON`](utils::constants::EPSILON)
//! relative to the magnitude of their inputs.
#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::all, clippy::missing_const_for_fn)]

pub use dcel::Dcel;
pub use delaunay::Delaunay;
pub use node::FaceNode;
pub use point::{Point2, Point3, Projection};
pub use triangulation::Triangulation;

pub mod art_gallery;
pub mod dcel;
pub mod delaunay;
pub mod io;
pub mod node;
pub mod point;
pub mod triangulation;
pub mod trids;
pub mod utils;
