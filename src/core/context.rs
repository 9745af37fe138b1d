//! Simulation context: the viewport the world is laid out for and the wall
//! entities currently bounding it.
//!
//! All viewport-dependent recomputation funnels through
//! [`SimulationContext::on_viewport_change`]; callers apply the returned
//! [`WallPlan`] (despawn `stale`, spawn `walls`) and hand the new entities back
//! with [`SimulationContext::set_walls`].

use bevy::prelude::*;

/// Logical viewport size (world units == logical pixels) plus device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn half_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

/// One static boundary box, centered at `center`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSpec {
    pub name: &'static str,
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// Floor, left and right walls sitting just outside the visible area.
/// The world origin is the viewport center with `+y` up.
pub fn wall_layout(viewport: &Viewport, thickness: f32) -> [WallSpec; 3] {
    let half = viewport.half_size();
    let t = thickness * 0.5;
    [
        WallSpec {
            name: "WallFloor",
            center: Vec2::new(0.0, -half.y - t),
            half_extents: Vec2::new(half.x, t),
        },
        WallSpec {
            name: "WallLeft",
            center: Vec2::new(-half.x - t, 0.0),
            half_extents: Vec2::new(t, half.y),
        },
        WallSpec {
            name: "WallRight",
            center: Vec2::new(half.x + t, 0.0),
            half_extents: Vec2::new(t, half.y),
        },
    ]
}

/// Walls to remove and walls to build after a viewport change.
#[derive(Debug, Clone, PartialEq)]
pub struct WallPlan {
    pub stale: Vec<Entity>,
    pub walls: [WallSpec; 3],
}

#[derive(Resource, Debug, Clone)]
pub struct SimulationContext {
    viewport: Option<Viewport>,
    walls: Vec<Entity>,
    wall_thickness: f32,
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl SimulationContext {
    pub fn new(wall_thickness: f32) -> Self {
        Self {
            viewport: None,
            walls: Vec::new(),
            wall_thickness,
        }
    }

    /// None until the host reports a first size.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.viewport.map_or(1.0, |v| v.pixel_ratio)
    }

    pub fn walls(&self) -> &[Entity] {
        &self.walls
    }

    /// Record a new viewport. Returns `None` when nothing changed; otherwise the
    /// current wall set moves into the plan's `stale` list.
    pub fn on_viewport_change(
        &mut self,
        width: f32,
        height: f32,
        pixel_ratio: f32,
    ) -> Option<WallPlan> {
        let next = Viewport::new(width, height, pixel_ratio);
        if self.viewport == Some(next) {
            return None;
        }
        self.viewport = Some(next);
        Some(WallPlan {
            stale: std::mem::take(&mut self.walls),
            walls: wall_layout(&next, self.wall_thickness),
        })
    }

    pub fn set_walls(&mut self, walls: Vec<Entity>) {
        self.walls = walls;
    }
}
