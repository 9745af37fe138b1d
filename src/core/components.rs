use bevy::prelude::*;

/// Marker for every dynamic body the spawn driver drops (beans and balls).
#[derive(Component)]
pub struct Body;

/// Radius of the circle enclosing the collider; used for pointer picking.
#[derive(Component, Debug, Deref, DerefMut, Copy, Clone)]
pub struct BoundingRadius(pub f32);

/// Marker for the static boundary colliders rebuilt on viewport change.
#[derive(Component)]
pub struct Wall;

/// Outline drawn on top of a body's fill, in body-local coordinates.
#[derive(Component, Debug, Clone)]
pub struct Outline {
    pub points: Vec<Vec2>,
    pub color: Color,
}

/// Tag component for the visual child of a body.
#[derive(Component)]
pub struct BodyVisual;

/// What the renderer should attach to a freshly spawned body.
#[derive(Component, Debug, Clone, PartialEq)]
pub enum Appearance {
    /// Filled polygon in body-local coordinates.
    Polygon { points: Vec<Vec2>, fill: Color },
    Circle { radius: f32, color: Color },
    /// Sprite scaled to the collider diameter.
    Textured { radius: f32, texture: String },
}
