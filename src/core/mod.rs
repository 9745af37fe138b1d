pub mod components;
pub mod config;
pub mod context;
pub mod resources;
pub mod system;
