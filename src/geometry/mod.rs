//! Engine-independent shape geometry.
//!
//! Everything here is pure: parameters in, fresh vertex data out. Physics and
//! rendering adapters consume the results but never feed state back.

pub mod polygon;
pub mod superellipse;

pub use polygon::regular_polygon;
pub use superellipse::{generate_vertex_loop, RenderStyle, ShapeError, ShapeParams, VertexLoop};
