pub mod cli;
pub mod game;

pub use game::BeanDropPlugin;
