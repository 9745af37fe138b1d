use bevy::prelude::*;

/// Seed for the spawn driver's generator. Same seed, same layout.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RngSeed(pub u64);

/// Running totals of what the spawn driver produced.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnStats {
    pub spawned: usize,
    pub fallbacks: usize,
    pub rejected: usize,
}

/// Config warnings gathered before logging is up; drained at startup.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConfigWarnings(pub Vec<String>);
