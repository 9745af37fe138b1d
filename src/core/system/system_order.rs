//! System ordering labels for the per-frame update.
//! 1. viewport sync (walls follow the window)
//! 2. PrePhysics (drag steering writes velocities before Rapier steps)
//! 3. Rapier (handled by plugin)
//! 4. PostPhysicsAdjust (stats and other read-only observers)
use bevy::prelude::*;

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PrePhysicsSet; // velocity edits before the physics step

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub struct PostPhysicsAdjustSet; // observers after physics
