pub mod bodies;
pub mod camera;

pub use bodies::{polygon_fill_mesh, BodyRenderPlugin};
pub use camera::CameraPlugin;
