pub mod bodies;
pub mod helpers;
pub mod sweep;

pub use bodies::{Axis, Contact, Obstacle, apply_gravity, apply_knockback, integrate_horizontal, resolve_axis_collision};
pub use sweep::{Sweep, sweep_segment_vs_aabb};
