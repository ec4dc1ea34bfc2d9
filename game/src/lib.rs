pub mod components;
pub mod config;
pub mod constants;
pub mod enemies;
pub mod messages;
pub mod plugin;
pub mod resources;
pub mod systems;
pub mod waves;

pub use plugin::SimPlugin;
