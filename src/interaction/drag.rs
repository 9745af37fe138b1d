use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

use crate::core::components::{Body, BoundingRadius};
use crate::core::config::{DragConfig, GameConfig};
use crate::core::system::system_order::PrePhysicsSet;

pub struct DragPlugin;

impl Plugin for DragPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveDrag>()
            .init_resource::<PointerState>()
            .add_systems(
                Update,
                (track_pointer, begin_or_end_drag, apply_drag_velocity)
                    .chain()
                    .in_set(PrePhysicsSet),
            );
    }
}

/// Pointer (mouse or first touch) in world coordinates; `None` while it is
/// outside the window or no camera can project it.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PointerState {
    pub world: Option<Vec2>,
}

#[derive(Resource, Default, Debug)]
pub struct ActiveDrag {
    pub entity: Option<Entity>,
    /// Grab point relative to the body center, in the body's local frame.
    pub local_anchor: Vec2,
    /// Last resolved pointer position; the body keeps steering here while
    /// the pointer is lost.
    pub last_pointer: Option<Vec2>,
}

/// Nearest body whose center lies within its bounding radius (plus `slack`)
/// of `pointer`.
pub fn pick_body<I>(pointer: Vec2, candidates: I, slack: f32) -> Option<Entity>
where
    I: IntoIterator<Item = (Entity, Vec2, f32)>,
{
    let mut nearest: Option<(Entity, f32)> = None;
    for (e, pos, radius) in candidates {
        let d2 = pos.distance_squared(pointer);
        let grab_r = radius + slack.max(0.0);
        if d2 > grab_r * grab_r {
            continue;
        }
        if nearest.is_none_or(|(_, best)| d2 < best) {
            nearest = Some((e, d2));
        }
    }
    nearest.map(|(e, _)| e)
}

/// Velocity that closes `stiffness` of the anchor-to-pointer gap every
/// 60 Hz step, capped at `max_speed` (0 = uncapped).
pub fn drag_velocity(anchor: Vec2, pointer: Vec2, cfg: &DragConfig) -> Vec2 {
    let v = (pointer - anchor) * cfg.stiffness.clamp(0.0, 1.0) * 60.0;
    if cfg.max_speed > 0.0 {
        v.clamp_length_max(cfg.max_speed)
    } else {
        v
    }
}

/// Window cursor (logical pixels, top-left origin) to world coordinates.
fn cursor_world_pos(camera_q: &Query<(&Camera, &GlobalTransform)>, screen_pos: Vec2) -> Option<Vec2> {
    let (camera, cam_tf) = camera_q.iter().next()?; // single camera assumption
    camera.viewport_to_world_2d(cam_tf, screen_pos).ok()
}

/// Unified pointer (mouse or first touch) world position.
fn primary_pointer_world_pos(
    window: &Window,
    touches: &Touches,
    camera_q: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    if let Some(touch) = touches.iter().next() {
        return cursor_world_pos(camera_q, touch.position());
    }
    let cursor = window.cursor_position()?;
    cursor_world_pos(camera_q, cursor)
}

fn track_pointer(
    touches: Res<Touches>,
    windows_q: Query<&Window, With<PrimaryWindow>>,
    camera_q: Query<(&Camera, &GlobalTransform)>,
    mut pointer: ResMut<PointerState>,
) {
    let world = windows_q
        .single()
        .ok()
        .and_then(|window| primary_pointer_world_pos(window, &touches, &camera_q));
    if pointer.world != world {
        pointer.world = world;
    }
}

fn begin_or_end_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    pointer: Res<PointerState>,
    mut active: ResMut<ActiveDrag>,
    q: Query<(Entity, &Transform, &BoundingRadius), With<Body>>,
    cfg: Res<GameConfig>,
) {
    if !cfg.drag.enabled {
        return;
    }
    let released =
        buttons.just_released(MouseButton::Left) || touches.iter_just_released().next().is_some();
    if released {
        if let Some(e) = active.entity.take() {
            debug!(target: "drag", "released {e:?}");
        }
        active.last_pointer = None;
    }

    let pressed =
        buttons.just_pressed(MouseButton::Left) || touches.iter_just_pressed().next().is_some();
    if active.entity.is_some() || !pressed {
        return;
    }
    let Some(world_pos) = pointer.world else {
        return;
    };
    let candidates = q
        .iter()
        .map(|(e, tf, r)| (e, tf.translation.truncate(), r.0));
    if let Some(e) = pick_body(world_pos, candidates, cfg.drag.grab_radius) {
        if let Ok((_, tf, _)) = q.get(e) {
            let offset = world_pos - tf.translation.truncate();
            active.local_anchor = (tf.rotation.inverse() * offset.extend(0.0)).truncate();
        }
        active.entity = Some(e);
        active.last_pointer = Some(world_pos);
        debug!(target: "drag", "grabbed {e:?} at {world_pos:?}");
    }
}

fn apply_drag_velocity(
    pointer: Res<PointerState>,
    mut active: ResMut<ActiveDrag>,
    mut q: Query<(&Transform, &mut Velocity), With<Body>>,
    cfg: Res<GameConfig>,
) {
    let Some(active_entity) = active.entity else {
        return;
    };
    if pointer.world.is_some() {
        active.last_pointer = pointer.world;
    }
    let Some(target) = active.last_pointer else {
        return;
    };

    if let Ok((tf, mut vel)) = q.get_mut(active_entity) {
        let anchor = tf.translation.truncate()
            + (tf.rotation * active.local_anchor.extend(0.0)).truncate();
        vel.linvel = drag_velocity(anchor, target, &cfg.drag);
        vel.angvel *= 1.0 - cfg.drag.angular_stiffness.clamp(0.0, 1.0);
    } else {
        // body despawned mid-drag
        active.entity = None;
        active.last_pointer = None;
    }
}
