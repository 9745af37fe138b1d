use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::core::config::GameConfig;
use crate::geometry::{regular_polygon, RenderStyle, VertexLoop};
use crate::physics::body::{BodyFactory, ConstructionFailure, PhysicalProps};

pub struct PhysicsSetupPlugin; // our wrapper to configure Rapier

impl Plugin for PhysicsSetupPlugin {
    fn build(&self, app: &mut App) {
        let (ppm, debug) = app
            .world()
            .get_resource::<GameConfig>()
            .map(|c| (c.physics.pixels_per_meter, c.rapier_debug))
            .unwrap_or((50.0, false));
        app.add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(ppm))
            .add_systems(Startup, configure_gravity);
        if debug {
            app.add_plugins(RapierDebugRenderPlugin::default());
        }
    }
}

fn configure_gravity(mut rapier_q: Query<&mut RapierConfiguration>, game_cfg: Res<GameConfig>) {
    let Ok(mut rapier_cfg) = rapier_q.single_mut() else {
        warn!(target: "physics", "no RapierConfiguration found; gravity left at engine default");
        return;
    };
    rapier_cfg.gravity = Vect::new(0.0, game_cfg.gravity.y);
    info!(target: "physics", "gravity set to {:?}", rapier_cfg.gravity);
}

/// Per-second damping equivalent to losing `air_friction` of the velocity every
/// 60 Hz step: `(1 - a)^60 == exp(-d)`.
pub fn air_friction_to_damping(air_friction: f32) -> f32 {
    let a = air_friction.clamp(0.0, 0.999);
    -(1.0 - a).ln() * 60.0
}

/// Everything Rapier needs for one dynamic body.
#[derive(Bundle, Clone)]
pub struct RapierBody {
    pub transform: Transform,
    pub rigid_body: RigidBody,
    pub collider: Collider,
    pub restitution: Restitution,
    pub friction: Friction,
    pub damping: Damping,
    pub velocity: Velocity,
}

impl RapierBody {
    pub fn new(position: Vec2, collider: Collider, props: &PhysicalProps) -> Self {
        let damping = air_friction_to_damping(props.air_friction);
        Self {
            transform: Transform::from_translation(position.extend(0.0)),
            rigid_body: RigidBody::Dynamic,
            collider,
            restitution: Restitution::coefficient(props.restitution),
            friction: Friction::coefficient(props.friction),
            damping: Damping {
                linear_damping: damping,
                angular_damping: damping,
            },
            velocity: Velocity::zero(),
        }
    }
}

/// [`BodyFactory`] backed by Rapier colliders.
#[derive(Debug, Default, Clone, Copy)]
pub struct RapierBodyFactory;

impl RapierBodyFactory {
    pub fn circle(&self, position: Vec2, radius: f32, props: &PhysicalProps) -> RapierBody {
        RapierBody::new(position, Collider::ball(radius), props)
    }
}

impl BodyFactory for RapierBodyFactory {
    type Handle = RapierBody;

    fn create_convex_body(
        &self,
        position: Vec2,
        vertices: &VertexLoop,
        props: &PhysicalProps,
        _style: &RenderStyle,
    ) -> Result<RapierBody, ConstructionFailure> {
        // Rapier would silently hull a concave loop; refuse it instead.
        if !vertices.is_convex() {
            return Err(ConstructionFailure::NotConvex);
        }
        let collider = Collider::convex_hull(vertices.points()).ok_or_else(|| {
            ConstructionFailure::Degenerate(format!("{} vertices rejected by hull", vertices.len()))
        })?;
        Ok(RapierBody::new(position, collider, props))
    }

    fn create_regular_polygon_body(
        &self,
        position: Vec2,
        sides: usize,
        radius: f32,
        props: &PhysicalProps,
        _style: &RenderStyle,
    ) -> RapierBody {
        let collider = Collider::convex_hull(regular_polygon(sides, radius).points())
            .unwrap_or_else(|| Collider::ball(radius));
        RapierBody::new(position, collider, props)
    }
}
