pub mod spawn;

pub use spawn::{spawn_initial_bodies, SpawnDriver, SpawnKind, SpawnPlugin, SpawnRequest};
