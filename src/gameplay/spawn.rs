//! Initial body drop.
//!
//! [`SpawnDriver`] turns a seeded generator plus the current viewport into a
//! list of [`SpawnRequest`]s; `spawn_initial_bodies` realizes them once the
//! first viewport is known. Body `i` starts `offset + i * spacing` above the
//! top edge so the pile rains in over the first seconds.

use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::core::components::{Appearance, Body, BoundingRadius, Outline};
use crate::core::config::{parse_hex_color, DemoKind, GameConfig, SpawnConfig, SpawnRange};
use crate::core::context::{SimulationContext, Viewport};
use crate::core::resources::{RngSeed, SpawnStats};
use crate::geometry::{RenderStyle, ShapeParams};
use crate::physics::body::{build_body, PhysicalProps};
use crate::physics::rapier::RapierBodyFactory;

#[derive(Debug, Clone, PartialEq)]
pub enum SpawnKind {
    Ball { radius: f32 },
    TexturedBall { radius: f32 },
    Bean(ShapeParams),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub index: usize,
    pub position: Vec2,
    pub kind: SpawnKind,
}

fn sample<R: Rng>(rng: &mut R, range: &SpawnRange<f32>) -> f32 {
    if range.max > range.min {
        rng.gen_range(range.min..range.max)
    } else {
        range.min
    }
}

pub struct SpawnDriver<R: Rng> {
    rng: R,
    cfg: SpawnConfig,
    style: RenderStyle,
}

impl SpawnDriver<StdRng> {
    pub fn seeded(seed: u64, cfg: &SpawnConfig) -> Self {
        Self::new(StdRng::seed_from_u64(seed), cfg)
    }
}

impl<R: Rng> SpawnDriver<R> {
    pub fn new(rng: R, cfg: &SpawnConfig) -> Self {
        Self {
            rng,
            style: cfg.bean.style(),
            cfg: cfg.clone(),
        }
    }

    /// Horizontal position uniform between the margins; collapses to the left
    /// margin when the viewport is narrower than both margins together.
    fn spawn_position(&mut self, index: usize, viewport: &Viewport) -> Vec2 {
        let m = self.cfg.margin;
        let usable = (viewport.width - 2.0 * m).max(0.0);
        let u: f32 = self.rng.gen();
        let x = m + u * usable - viewport.width * 0.5;
        let y = viewport.height * 0.5 + self.cfg.offset + index as f32 * self.cfg.spacing;
        Vec2::new(x, y)
    }

    pub fn next(&mut self, index: usize, viewport: &Viewport) -> SpawnRequest {
        let kind = match self.cfg.demo {
            DemoKind::Balls => SpawnKind::Ball {
                radius: sample(&mut self.rng, &self.cfg.ball_radius),
            },
            DemoKind::TexturedBalls => SpawnKind::TexturedBall {
                radius: sample(&mut self.rng, &self.cfg.textured_radius),
            },
            DemoKind::Beans => {
                let base = sample(&mut self.rng, &self.cfg.bean_base);
                let bean = &self.cfg.bean;
                SpawnKind::Bean(ShapeParams {
                    rx: base * bean.rx_factor,
                    ry: base * bean.ry_factor,
                    nx: bean.nx,
                    ny: bean.ny,
                    segments: bean.segments,
                    style: self.style,
                })
            }
        };
        let position = self.spawn_position(index, viewport);
        SpawnRequest {
            index,
            position,
            kind,
        }
    }

    pub fn requests(&mut self, viewport: &Viewport) -> Vec<SpawnRequest> {
        (0..self.cfg.effective_count())
            .map(|i| self.next(i, viewport))
            .collect()
    }
}

pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnStats>()
            .add_systems(Update, spawn_initial_bodies);
    }
}

/// Spawns the whole batch once, on the first frame a viewport is known.
pub fn spawn_initial_bodies(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    ctx: Res<SimulationContext>,
    rng_seed: Option<Res<RngSeed>>,
    mut stats: ResMut<SpawnStats>,
    mut done: Local<bool>,
) {
    if *done {
        return;
    }
    let Some(viewport) = ctx.viewport() else {
        return;
    };
    *done = true;

    let seed = rng_seed.map(|s| s.0).unwrap_or_else(rand::random);
    let props = cfg.material.props();
    let ball_color = parse_hex_color(&cfg.spawn.ball_color)
        .unwrap_or(Color::srgb_u8(0xc4, 0x4d, 0x58));
    let mut driver = SpawnDriver::seeded(seed, &cfg.spawn);
    let requests = driver.requests(&viewport);

    for req in &requests {
        spawn_request(&mut commands, req, &props, ball_color, &cfg.spawn.texture, &mut stats);
    }
    info!(
        target: "spawn",
        "demo={:?} seed={seed} spawned={} fallbacks={} rejected={} viewport={}x{}",
        cfg.spawn.demo,
        stats.spawned,
        stats.fallbacks,
        stats.rejected,
        viewport.width,
        viewport.height
    );
}

fn spawn_request(
    commands: &mut Commands,
    req: &SpawnRequest,
    props: &PhysicalProps,
    ball_color: Color,
    texture: &str,
    stats: &mut SpawnStats,
) {
    let factory = RapierBodyFactory;
    match &req.kind {
        SpawnKind::Ball { radius } => {
            commands.spawn((
                Name::new(format!("Ball{}", req.index)),
                Body,
                BoundingRadius(*radius),
                factory.circle(req.position, *radius, props),
                Appearance::Circle {
                    radius: *radius,
                    color: ball_color,
                },
            ));
        }
        SpawnKind::TexturedBall { radius } => {
            commands.spawn((
                Name::new(format!("TexturedBall{}", req.index)),
                Body,
                BoundingRadius(*radius),
                factory.circle(req.position, *radius, props),
                Appearance::Textured {
                    radius: *radius,
                    texture: texture.to_string(),
                },
            ));
        }
        SpawnKind::Bean(params) => match build_body(&factory, req.position, params, props) {
            Ok(desc) => {
                if desc.label.is_fallback() {
                    stats.fallbacks += 1;
                }
                let outline = desc.shape.outline().into_points();
                commands.spawn((
                    Name::new(format!("{}{}", desc.label.as_str(), req.index)),
                    Body,
                    desc.label,
                    BoundingRadius(desc.shape.bounding_radius()),
                    desc.handle,
                    Outline {
                        points: outline.clone(),
                        color: desc.style.stroke,
                    },
                    Appearance::Polygon {
                        points: outline,
                        fill: desc.style.fill,
                    },
                ));
            }
            Err(e) => {
                stats.rejected += 1;
                warn!(target: "spawn", "bean {} rejected: {e}", req.index);
                return;
            }
        },
    }
    stats.spawned += 1;
}
