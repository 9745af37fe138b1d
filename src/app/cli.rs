use std::path::PathBuf;

use clap::Parser;

use crate::core::config::{DemoKind, GameConfig};

pub const DEFAULT_CONFIG_LAYERS: [&str; 2] =
    ["assets/config/game.ron", "assets/config/game.local.ron"];

#[derive(Parser, Debug, Default)]
#[command(name = "bean_drop", about = "Drop a pile of superellipse beans and push them around")]
pub struct Args {
    /// Config layers, later ones override earlier ones. Replaces the default
    /// `assets/config/game.ron` + `game.local.ron` pair when given.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Vec<PathBuf>,
    /// balls | textured-balls | beans
    #[arg(long)]
    pub demo: Option<DemoKind>,
    #[arg(long)]
    pub count: Option<usize>,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Draw Rapier collider outlines.
    #[arg(long)]
    pub rapier_debug: bool,
}

impl Args {
    pub fn explicit_config(&self) -> bool {
        !self.config.is_empty()
    }

    pub fn config_layers(&self) -> Vec<PathBuf> {
        if self.explicit_config() {
            self.config.clone()
        } else {
            DEFAULT_CONFIG_LAYERS.iter().map(PathBuf::from).collect()
        }
    }

    /// Command line wins over every config layer.
    pub fn apply(&self, cfg: &mut GameConfig) {
        if let Some(demo) = self.demo {
            cfg.spawn.demo = demo;
        }
        if let Some(count) = self.count {
            cfg.spawn.count = Some(count);
        }
        if let Some(seed) = self.seed {
            cfg.spawn.seed = Some(seed);
        }
        if self.rapier_debug {
            cfg.rapier_debug = true;
        }
    }
}
