use bevy::prelude::*;

use crate::core::config::GameConfig;
use crate::core::context::SimulationContext;
use crate::core::resources::ConfigWarnings;
use crate::core::system::system_order::{PostPhysicsAdjustSet, PrePhysicsSet};
#[cfg(feature = "debug")]
use crate::debug::DebugPlugin;
use crate::gameplay::spawn::SpawnPlugin;
use crate::interaction::drag::DragPlugin;
use crate::interaction::viewport::ViewportPlugin;
use crate::physics::rapier::PhysicsSetupPlugin;
use crate::rendering::bodies::BodyRenderPlugin;
use crate::rendering::camera::CameraPlugin;

/// Everything except the window/render backend. Insert [`GameConfig`] first;
/// physics reads its pixel scale while the plugin is built.
pub struct BeanDropPlugin;

impl Plugin for BeanDropPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<GameConfig>() {
            app.insert_resource(GameConfig::default());
        }
        let thickness = app.world().resource::<GameConfig>().walls.thickness;

        app.configure_sets(
            Update,
            (PrePhysicsSet, PostPhysicsAdjustSet.after(PrePhysicsSet)),
        )
        .insert_resource(SimulationContext::new(thickness))
        .init_resource::<ConfigWarnings>()
        .add_systems(Startup, log_config_warnings)
        .add_plugins((
            CameraPlugin,
            PhysicsSetupPlugin,
            ViewportPlugin,
            SpawnPlugin,
            DragPlugin,
            BodyRenderPlugin,
            #[cfg(feature = "debug")]
            DebugPlugin,
        ));
    }
}

fn log_config_warnings(mut warnings: ResMut<ConfigWarnings>, cfg: Res<GameConfig>) {
    for w in warnings.0.drain(..) {
        warn!(target: "config", "CONFIG WARNING: {w}");
    }
    info!(target: "config", window = ?cfg.window, "Window config");
    info!(
        target: "config",
        demo = ?cfg.spawn.demo,
        count = cfg.spawn.effective_count(),
        drag = cfg.drag.enabled,
        rapier_debug = cfg.rapier_debug,
        "Runtime summary"
    );
}
