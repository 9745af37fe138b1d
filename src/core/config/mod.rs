pub mod config;

pub use config::{
    parse_hex_color, BeanShapeConfig, DemoKind, DragConfig, GameConfig, GravityConfig,
    MaterialConfig, PhysicsConfig, SpawnConfig, SpawnRange, WallConfig, WindowConfig,
};
