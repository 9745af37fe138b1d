pub mod drag;
pub mod viewport;

pub use drag::{ActiveDrag, DragPlugin, PointerState};
pub use viewport::{sync_viewport, ViewportPlugin};
