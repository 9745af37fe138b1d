pub mod rapier_physics;

pub use rapier_physics::{air_friction_to_damping, PhysicsSetupPlugin, RapierBody, RapierBodyFactory};
