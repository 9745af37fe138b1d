pub mod body;
pub mod rapier;
