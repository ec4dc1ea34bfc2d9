pub mod collision;
pub mod combat;
pub mod components;
pub mod constants;
pub mod geometry;
pub mod markers;
pub mod net;
pub mod projectiles;
pub mod protocol;
pub mod weapons;
