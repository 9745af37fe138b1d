use bevy::prelude::*;

use bean_drop::core::config::GameConfig;
use bean_drop::core::resources::{ConfigWarnings, RngSeed};
use bean_drop::BeanDropPlugin;

// ---------------- Config Loading ----------------

#[cfg(target_arch = "wasm32")]
fn load_config() -> anyhow::Result<(GameConfig, Vec<String>)> {
    // Embed base config (no layered local override on wasm).
    const RAW: &str = include_str!("../assets/config/game.ron");
    match ron::from_str(RAW) {
        Ok(cfg) => Ok((cfg, Vec::new())),
        Err(e) => Ok((
            GameConfig::default(),
            vec![format!("embedded config parse failure: {e}; using defaults")],
        )),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> anyhow::Result<(GameConfig, Vec<String>)> {
    use bean_drop::app::cli::Args;
    use clap::Parser;

    let args = Args::parse();
    let (mut cfg, used, errors) = GameConfig::load_layered(args.config_layers());
    // Layers named on the command line must exist; the default pair is optional.
    if args.explicit_config() && !errors.is_empty() {
        anyhow::bail!("config: {}", errors.join("; "));
    }
    let mut notes: Vec<String> = errors
        .into_iter()
        .filter(|e| !e.contains("game.local.ron"))
        .map(|e| format!("load issue: {e}"))
        .collect();
    if used.is_empty() {
        notes.push("no config layers found; using defaults".into());
    }
    args.apply(&mut cfg);
    Ok((cfg, notes))
}

// ---------------- Main ----------------

fn main() -> anyhow::Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        // Better panic messages on wasm
        console_error_panic_hook::set_once();
    }

    let (cfg, mut warnings) = load_config()?;
    warnings.extend(cfg.validate());
    let seed = cfg.spawn.seed.unwrap_or_else(rand::random);

    let mut app = App::new();
    app.insert_resource(cfg.clone())
        .insert_resource(RngSeed(seed))
        .insert_resource(ConfigWarnings(warnings))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: cfg.window.title.clone(),
                resolution: (cfg.window.width, cfg.window.height).into(),
                resizable: true,
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(BeanDropPlugin);
    app.run();
    Ok(())
}
