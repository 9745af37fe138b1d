use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path, str::FromStr};

use crate::geometry::RenderStyle;
use crate::physics::body::PhysicalProps;

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            title: "Bean Drop".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GravityConfig {
    /// Pixels per second squared; negative is down.
    pub y: f32,
}
impl Default for GravityConfig {
    fn default() -> Self {
        Self { y: -1000.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub pixels_per_meter: f32,
}
impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 50.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WallConfig {
    pub thickness: f32,
}
impl Default for WallConfig {
    fn default() -> Self {
        Self { thickness: 100.0 }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MaterialConfig {
    pub restitution: f32,
    pub friction: f32,
    pub air_friction: f32,
}
impl Default for MaterialConfig {
    fn default() -> Self {
        let p = PhysicalProps::default();
        Self {
            restitution: p.restitution,
            friction: p.friction,
            air_friction: p.air_friction,
        }
    }
}
impl MaterialConfig {
    pub fn props(&self) -> PhysicalProps {
        PhysicalProps {
            restitution: self.restitution,
            friction: self.friction,
            air_friction: self.air_friction,
        }
    }
}

/// Which body kind a run drops into the world.
///
/// Written as a string in RON (`demo: "beans"`) so layered merging, which goes
/// through `ron::Value`, round-trips it.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String")]
pub enum DemoKind {
    /// Plain circles.
    Balls,
    /// Circles drawn with a bean sprite.
    TexturedBalls,
    /// Superellipse bean polygons.
    #[default]
    Beans,
}
impl FromStr for DemoKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "balls" => Ok(DemoKind::Balls),
            "textured_balls" => Ok(DemoKind::TexturedBalls),
            "beans" => Ok(DemoKind::Beans),
            other => Err(format!(
                "unknown demo '{other}' (expected balls, textured_balls or beans)"
            )),
        }
    }
}
impl TryFrom<String> for DemoKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
impl DemoKind {
    pub fn default_count(self) -> usize {
        match self {
            DemoKind::Balls => 200,
            DemoKind::TexturedBalls | DemoKind::Beans => 70,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnRange<T> {
    pub min: T,
    pub max: T,
}
impl<T: Default> Default for SpawnRange<T> {
    fn default() -> Self {
        Self {
            min: Default::default(),
            max: Default::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BeanShapeConfig {
    /// rx = base * rx_factor
    pub rx_factor: f32,
    /// ry = base * ry_factor
    pub ry_factor: f32,
    pub nx: f32,
    pub ny: f32,
    pub segments: usize,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
}
impl Default for BeanShapeConfig {
    fn default() -> Self {
        Self {
            rx_factor: 1.4,
            ry_factor: 1.05,
            nx: 2.7,
            ny: 2.0,
            segments: 84,
            fill: "#F7A".into(),
            stroke: "#111".into(),
            stroke_width: 1.0,
        }
    }
}
impl BeanShapeConfig {
    /// Parsed render style; unparsable colors fall back to the defaults
    /// (`validate` reports them).
    pub fn style(&self) -> RenderStyle {
        let d = RenderStyle::default();
        RenderStyle {
            fill: parse_hex_color(&self.fill).unwrap_or(d.fill),
            stroke: parse_hex_color(&self.stroke).unwrap_or(d.stroke),
            stroke_width: self.stroke_width,
        }
    }
}

pub fn parse_hex_color(s: &str) -> Option<Color> {
    Srgba::hex(s.trim()).ok().map(Color::from)
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SpawnConfig {
    pub demo: DemoKind,
    /// None = the demo's own default count.
    pub count: Option<usize>,
    /// None = fresh entropy every run.
    pub seed: Option<u64>,
    /// Horizontal keep-out from each side wall.
    pub margin: f32,
    /// Vertical gap between consecutive spawns above the viewport.
    pub spacing: f32,
    /// Distance of the first spawn above the top edge.
    pub offset: f32,
    pub ball_radius: SpawnRange<f32>,
    pub textured_radius: SpawnRange<f32>,
    pub bean_base: SpawnRange<f32>,
    pub bean: BeanShapeConfig,
    pub ball_color: String,
    /// Asset path of the bean sprite used by `TexturedBalls`.
    pub texture: String,
}
impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            count: None,
            seed: None,
            margin: 60.0,
            spacing: 40.0,
            offset: 60.0,
            ball_radius: SpawnRange { min: 20.0, max: 35.0 },
            textured_radius: SpawnRange { min: 20.0, max: 25.0 },
            bean_base: SpawnRange { min: 20.0, max: 25.0 },
            bean: BeanShapeConfig::default(),
            ball_color: "#C44D58".into(),
            texture: "textures/coffee-bean01.png".into(),
        }
    }
}
impl SpawnConfig {
    pub fn effective_count(&self) -> usize {
        self.count.unwrap_or_else(|| self.demo.default_count())
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DragConfig {
    pub enabled: bool,
    /// Fraction of the pointer offset closed per 60 Hz step.
    pub stiffness: f32,
    /// Fraction of spin removed per 60 Hz step while held.
    pub angular_stiffness: f32,
    /// Extra pick slack around a body's bounding radius (0 = exact radius).
    pub grab_radius: f32,
    /// 0 disables the cap.
    pub max_speed: f32,
}
impl Default for DragConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stiffness: 0.2,
            angular_stiffness: 0.2,
            grab_radius: 0.0,
            max_speed: 3000.0,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub gravity: GravityConfig,
    pub physics: PhysicsConfig,
    pub walls: WallConfig,
    pub material: MaterialConfig,
    pub spawn: SpawnConfig,
    pub drag: DragConfig,
    pub rapier_debug: bool,
}
impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: Default::default(),
            gravity: Default::default(),
            physics: Default::default(),
            walls: Default::default(),
            material: Default::default(),
            spawn: Default::default(),
            drag: Default::default(),
            rapier_debug: false,
        }
    }
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(&path).map_err(|e| format!("read config: {e}"))?;
        ron::from_str(&data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load multiple config layers, later files overriding earlier ones (deep merge).
    /// Missing files are reported and skipped; returns (config, layer_paths_used, errors).
    pub fn load_layered<P, I>(paths: I) -> (Self, Vec<String>, Vec<String>)
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        use ron::value::Value;
        let mut merged: Option<Value> = None;
        let mut used = Vec::new();
        let mut errors = Vec::new();

        fn merge_value(base: &mut Value, overlay: Value) {
            match (base, overlay) {
                (Value::Map(bm), Value::Map(om)) => {
                    for (k, v) in om.into_iter() {
                        let mut incoming = Some(v);
                        for (ek, ev) in bm.iter_mut() {
                            if *ek == k {
                                if let Some(val) = incoming.take() {
                                    merge_value(ev, val);
                                }
                                break;
                            }
                        }
                        if let Some(val) = incoming {
                            bm.insert(k, val);
                        }
                    }
                }
                (b, o) => *b = o,
            }
        }

        for p in paths {
            let path_ref = p.as_ref();
            match fs::read_to_string(path_ref) {
                Ok(txt) => match ron::from_str::<Value>(&txt) {
                    Ok(val) => {
                        if let Some(cur) = &mut merged {
                            merge_value(cur, val);
                        } else {
                            merged = Some(val);
                        }
                        used.push(path_ref.as_os_str().to_string_lossy().to_string());
                    }
                    Err(e) => errors.push(format!("{}: parse error: {e}", path_ref.display())),
                },
                Err(e) => errors.push(format!("{}: read error: {e}", path_ref.display())),
            }
        }

        let Some(val) = merged else {
            return (GameConfig::default(), used, errors);
        };
        match val.into_rust::<GameConfig>() {
            Ok(cfg) => (cfg, used, errors),
            Err(e) => {
                errors.push(format!(
                    "failed to deserialize merged config; using defaults: {e}"
                ));
                (GameConfig::default(), used, errors)
            }
        }
    }

    /// Validate the configuration returning a list of human-readable warning strings.
    /// These represent suspicious / potentially unintended values but are not hard errors.
    /// Call at startup and log each warning with `warn!`.
    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            w.push("window dimensions must be > 0".into());
        }
        if self.gravity.y.abs() < 1e-4 {
            w.push("gravity.y magnitude near zero; bodies will float".into());
        }
        if self.gravity.y > 0.0 {
            w.push(format!(
                "gravity.y is positive ({}); bodies fall upward out of view",
                self.gravity.y
            ));
        }
        if self.physics.pixels_per_meter <= 0.0 {
            w.push("physics.pixels_per_meter must be > 0".into());
        }
        if self.walls.thickness <= 0.0 {
            w.push("walls.thickness must be > 0".into());
        }
        let m = &self.material;
        if !(0.0..=1.0).contains(&m.restitution) {
            w.push(format!("material.restitution {} outside 0..1", m.restitution));
        }
        if m.friction < 0.0 {
            w.push("material.friction negative".into());
        }
        if !(0.0..1.0).contains(&m.air_friction) {
            w.push(format!(
                "material.air_friction {} outside 0..1 (1 stops bodies dead)",
                m.air_friction
            ));
        }

        let s = &self.spawn;
        if s.effective_count() == 0 {
            w.push("spawn.count is 0; nothing will spawn".into());
        }
        if s.margin < 0.0 {
            w.push("spawn.margin negative".into());
        }
        if s.spacing <= 0.0 {
            w.push("spawn.spacing must be > 0 or spawns overlap".into());
        }
        fn check_range_f32(w: &mut Vec<String>, label: &str, r: &SpawnRange<f32>) {
            if r.min > r.max {
                w.push(format!("{label} min ({}) greater than max ({})", r.min, r.max));
            }
            if r.min <= 0.0 {
                w.push(format!("{label}.min must be > 0"));
            }
        }
        match s.demo {
            DemoKind::Balls => check_range_f32(&mut w, "spawn.ball_radius", &s.ball_radius),
            DemoKind::TexturedBalls => {
                check_range_f32(&mut w, "spawn.textured_radius", &s.textured_radius);
                if s.texture.trim().is_empty() {
                    w.push("spawn.texture empty; textured balls will be invisible".into());
                }
            }
            DemoKind::Beans => {
                check_range_f32(&mut w, "spawn.bean_base", &s.bean_base);
                let b = &s.bean;
                if b.rx_factor <= 0.0 || b.ry_factor <= 0.0 {
                    w.push("spawn.bean rx_factor/ry_factor must be > 0".into());
                }
                if b.nx < 1.0 || b.ny < 1.0 {
                    w.push(format!(
                        "spawn.bean exponents ({}, {}) below 1 give concave outlines; expect fallback bodies",
                        b.nx, b.ny
                    ));
                }
                if b.segments < 3 {
                    w.push(format!("spawn.bean.segments {} must be >= 3", b.segments));
                }
                for (label, c) in [("fill", &b.fill), ("stroke", &b.stroke)] {
                    if parse_hex_color(c).is_none() {
                        w.push(format!("spawn.bean.{label} '{c}' is not a hex color"));
                    }
                }
            }
        }
        if parse_hex_color(&s.ball_color).is_none() {
            w.push(format!("spawn.ball_color '{}' is not a hex color", s.ball_color));
        }

        if self.drag.enabled {
            let d = &self.drag;
            if !(0.0..=1.0).contains(&d.stiffness) || d.stiffness == 0.0 {
                w.push(format!("drag.stiffness {} outside (0, 1]", d.stiffness));
            }
            if !(0.0..=1.0).contains(&d.angular_stiffness) {
                w.push(format!(
                    "drag.angular_stiffness {} outside 0..1",
                    d.angular_stiffness
                ));
            }
            if d.grab_radius < 0.0 {
                w.push("drag.grab_radius negative".into());
            }
            if d.max_speed < 0.0 {
                w.push("drag.max_speed negative".into());
            }
        }
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_reproduce_bean_demo() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.spawn.demo, DemoKind::Beans);
        assert_eq!(cfg.spawn.effective_count(), 70);
        assert_eq!(cfg.material.props(), crate::physics::body::BEAN_MATERIAL);
        assert_eq!(cfg.walls.thickness, 100.0);
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    }

    #[test]
    fn parse_sample_config() {
        let sample = r##"(
            window: (width: 800.0, height: 600.0, title: "Beans"),
            gravity: (y: -900.0),
            material: (restitution: 0.2),
            spawn: (
                demo: "balls",
                count: Some(12),
                seed: Some(7),
                ball_radius: (min: 10.0, max: 15.0),
                bean: (nx: 3.0, fill: "#336699"),
            ),
            drag: (stiffness: 0.5),
        )"##;
        let mut file = tempfile::NamedTempFile::new().expect("tmp file");
        file.write_all(sample.as_bytes()).unwrap();
        let cfg = GameConfig::load_from_file(file.path()).expect("parse config");
        assert_eq!(cfg.window.width, 800.0);
        assert_eq!(cfg.spawn.demo, DemoKind::Balls);
        assert_eq!(cfg.spawn.effective_count(), 12);
        assert_eq!(cfg.spawn.seed, Some(7));
        assert_eq!(cfg.spawn.bean.nx, 3.0);
        assert_eq!(cfg.spawn.bean.segments, 84);
        assert_eq!(cfg.material.restitution, 0.2);
        assert_eq!(cfg.material.friction, 0.05);
        assert_eq!(cfg.drag.stiffness, 0.5);
        assert_eq!(
            cfg.spawn.bean.style().fill,
            Color::srgb_u8(0x33, 0x66, 0x99)
        );
        assert!(cfg.validate().is_empty(), "{:?}", cfg.validate());
    }

    #[test]
    fn short_hex_colors_parse() {
        let style = BeanShapeConfig::default().style();
        assert_eq!(style.fill, Color::srgb_u8(0xff, 0x77, 0xaa));
        assert_eq!(style.stroke, Color::srgb_u8(0x11, 0x11, 0x11));
        assert_eq!(style.stroke_width, 1.0);
    }

    #[test]
    fn demo_names_parse() {
        assert_eq!("Beans".parse::<DemoKind>(), Ok(DemoKind::Beans));
        assert_eq!("textured-balls".parse::<DemoKind>(), Ok(DemoKind::TexturedBalls));
        assert!("cubes".parse::<DemoKind>().is_err());
    }

    #[test]
    fn validate_detects_warnings() {
        let mut bad = GameConfig::default();
        bad.window.width = -1.0;
        bad.gravity.y = 5.0;
        bad.material.restitution = 1.5;
        bad.material.air_friction = 1.0;
        bad.spawn.count = Some(0);
        bad.spawn.bean_base = SpawnRange { min: 0.0, max: -2.0 };
        bad.spawn.bean.nx = 0.5;
        bad.spawn.bean.segments = 2;
        bad.spawn.bean.fill = "pink".into();
        bad.drag.stiffness = 0.0;
        bad.drag.max_speed = -1.0;

        let warnings = bad.validate();
        let joined = warnings.join(" | ");
        assert!(joined.contains("window dimensions must be > 0"));
        assert!(joined.contains("gravity.y is positive"));
        assert!(joined.contains("material.restitution"));
        assert!(joined.contains("material.air_friction"));
        assert!(joined.contains("spawn.count is 0"));
        assert!(joined.contains("spawn.bean_base min (0) greater than max (-2)"));
        assert!(joined.contains("spawn.bean_base.min must be > 0"));
        assert!(joined.contains("below 1 give concave outlines"));
        assert!(joined.contains("spawn.bean.segments 2"));
        assert!(joined.contains("spawn.bean.fill 'pink'"));
        assert!(joined.contains("drag.stiffness"));
        assert!(joined.contains("drag.max_speed negative"));
        assert!(warnings.len() >= 12, "got {}: {joined}", warnings.len());
    }

    #[test]
    fn load_or_default_missing_file() {
        let (cfg, err) = GameConfig::load_or_default("this/file/does/not/exist.ron");
        assert!(err.is_some());
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn layered_merge_overrides() {
        let base = r#"(
            window: (width: 900.0),
            spawn: (demo: "textured-balls", margin: 30.0),
        )"#;
        let overlay = r#"(
            window: (title: "Local"),
            spawn: (margin: 80.0),
        )"#;
        let mut f1 = tempfile::NamedTempFile::new().unwrap();
        let mut f2 = tempfile::NamedTempFile::new().unwrap();
        f1.write_all(base.as_bytes()).unwrap();
        f2.write_all(overlay.as_bytes()).unwrap();
        let (cfg, used, errors) = GameConfig::load_layered([f1.path(), f2.path()]);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 2);
        assert_eq!(cfg.window.width, 900.0);
        assert_eq!(cfg.window.title, "Local");
        assert_eq!(cfg.spawn.demo, DemoKind::TexturedBalls);
        assert_eq!(cfg.spawn.margin, 80.0);
        assert_eq!(cfg.window.height, WindowConfig::default().height);
    }

    #[test]
    fn third_layer_overrides_key_added_by_second() {
        let layers = [
            "(window: (width: 900.0))",
            "(window: (title: \"Mid\"), drag: (stiffness: 0.4))",
            "(window: (title: \"Top\"))",
        ];
        let files: Vec<_> = layers
            .iter()
            .map(|txt| {
                let mut f = tempfile::NamedTempFile::new().unwrap();
                f.write_all(txt.as_bytes()).unwrap();
                f
            })
            .collect();
        let (cfg, used, errors) = GameConfig::load_layered(files.iter().map(|f| f.path()));
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert_eq!(used.len(), 3);
        assert_eq!(cfg.window.width, 900.0);
        assert_eq!(cfg.window.title, "Top");
        assert_eq!(cfg.drag.stiffness, 0.4);
    }

    #[test]
    fn layered_skips_missing_layer() {
        let mut f1 = tempfile::NamedTempFile::new().unwrap();
        f1.write_all(b"(gravity: (y: -700.0))").unwrap();
        let (cfg, used, errors) =
            GameConfig::load_layered([f1.path(), Path::new("missing/game.local.ron")]);
        assert_eq!(used.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("read error"));
        assert_eq!(cfg.gravity.y, -700.0);
    }
}
