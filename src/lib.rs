pub mod app;
pub mod core;
pub mod debug;
pub mod gameplay;
pub mod geometry;
pub mod interaction;
pub mod physics;
pub mod rendering;

// Curated re-exports
pub use crate::app::game::BeanDropPlugin;
pub use crate::core::config::{GameConfig, WindowConfig};
pub use crate::geometry::{generate_vertex_loop, ShapeError, ShapeParams, VertexLoop};
pub use crate::physics::body::{build_body, BodyDescriptor, BodyFactory, BodyLabel, ConstructionFailure};
