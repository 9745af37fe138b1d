use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

use crate::core::components::Wall;
use crate::core::context::{SimulationContext, WallSpec};
use crate::core::system::system_order::PrePhysicsSet;

pub struct ViewportPlugin;

impl Plugin for ViewportPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, sync_viewport.before(PrePhysicsSet));
    }
}

/// Tracks the primary window and rebuilds the boundary walls whenever its
/// logical size or scale factor changes. The first run builds the initial set.
pub fn sync_viewport(
    mut commands: Commands,
    windows_q: Query<&Window, With<PrimaryWindow>>,
    mut ctx: ResMut<SimulationContext>,
) {
    let Ok(window) = windows_q.single() else {
        return;
    };
    let (w, h) = (window.width(), window.height());
    if w <= 0.0 || h <= 0.0 {
        // minimized
        return;
    }
    let Some(plan) = ctx.on_viewport_change(w, h, window.scale_factor()) else {
        return;
    };

    for e in &plan.stale {
        commands.entity(*e).despawn();
    }
    let walls = plan
        .walls
        .iter()
        .map(|wall| spawn_wall(&mut commands, wall))
        .collect();
    ctx.set_walls(walls);
    info!(
        target: "viewport",
        "viewport {w}x{h} @{}x; rebuilt walls (retired {})",
        window.scale_factor(),
        plan.stale.len()
    );
}

fn spawn_wall(commands: &mut Commands, wall: &WallSpec) -> Entity {
    commands
        .spawn((
            Name::new(wall.name),
            Wall,
            RigidBody::Fixed,
            Collider::cuboid(wall.half_extents.x, wall.half_extents.y),
            Transform::from_translation(wall.center.extend(0.0)),
        ))
        .id()
}
