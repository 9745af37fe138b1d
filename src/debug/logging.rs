use bevy::prelude::*;

use crate::core::components::Body;
use crate::core::context::SimulationContext;
use crate::physics::body::BodyLabel;

#[derive(Resource, Debug)]
pub struct DebugState {
    pub frame_counter: u64,
    pub time_accum: f32,
    pub log_interval: f32,
}

impl Default for DebugState {
    fn default() -> Self {
        Self {
            frame_counter: 0,
            time_accum: 0.0,
            log_interval: 2.0,
        }
    }
}

#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct DebugStats {
    pub body_count: usize,
    pub fallback_count: usize,
    pub fps: f32,
    pub viewport: Option<(f32, f32)>,
}

pub fn debug_stats_collect_system(
    time: Res<Time>,
    mut state: ResMut<DebugState>,
    mut stats: ResMut<DebugStats>,
    bodies: Query<Option<&BodyLabel>, With<Body>>,
    ctx: Option<Res<SimulationContext>>,
) {
    state.frame_counter += 1;
    stats.body_count = bodies.iter().count();
    stats.fallback_count = bodies
        .iter()
        .filter(|l| l.is_some_and(|l| l.is_fallback()))
        .count();
    let dt = time.delta_secs();
    if dt > 0.0 {
        stats.fps = 1.0 / dt;
    }
    stats.viewport = ctx
        .and_then(|c| c.viewport())
        .map(|v| (v.width, v.height));
}

pub fn debug_logging_system(time: Res<Time>, mut state: ResMut<DebugState>, stats: Res<DebugStats>) {
    state.time_accum += time.delta_secs();
    if state.time_accum >= state.log_interval {
        state.time_accum = 0.0;
        info!(
            target: "debug",
            "SIM frame={} t={:.3}s fps={:.1} bodies={} fallbacks={} viewport={:?}",
            state.frame_counter,
            time.elapsed_secs(),
            stats.fps,
            stats.body_count,
            stats.fallback_count,
            stats.viewport
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_bodies_and_fallbacks() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<DebugState>()
            .init_resource::<DebugStats>()
            .add_systems(Update, debug_stats_collect_system);
        app.world_mut().spawn((Body, BodyLabel::Bean));
        app.world_mut().spawn((Body, BodyLabel::BeanFallback));
        app.world_mut().spawn(Body);
        app.update();

        let stats = app.world().resource::<DebugStats>();
        assert_eq!(stats.body_count, 3);
        assert_eq!(stats.fallback_count, 1);
        assert_eq!(stats.viewport, None);
        assert_eq!(app.world().resource::<DebugState>().frame_counter, 1);
    }

    #[test]
    fn logs_once_per_interval() {
        use bevy::time::TimeUpdateStrategy;
        use std::time::Duration;

        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .insert_resource(DebugState {
                log_interval: 0.15,
                ..Default::default()
            })
            .init_resource::<DebugStats>()
            .add_systems(Update, debug_logging_system);

        // first frame has no delta
        app.update();
        app.update();
        let accum = app.world().resource::<DebugState>().time_accum;
        assert!((accum - 0.1).abs() < 1e-4, "{accum}");
        app.update();
        assert_eq!(app.world().resource::<DebugState>().time_accum, 0.0);
    }
}
