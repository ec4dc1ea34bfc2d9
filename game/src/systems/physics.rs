use bevy_ecs::prelude::*;
use bevy_time::Time;

use common::{
    collision::{Axis, Contact, apply_gravity, resolve_axis_collision},
    components::Body,
    markers::{ChargeMarker, Mirrored},
};

use super::tick_dt;
use crate::resources::MapLayout;

// ============================================================================
// Physics Systems
// ============================================================================

// Snapshot every locally simulated body before anything moves it this tick.
pub fn begin_tick_system(mut bodies: Query<&mut Body, Without<Mirrored>>) {
    for mut body in &mut bodies {
        body.begin_tick();
    }
}

// Horizontal movement was already integrated by the controlling system. Resolve it, then
// fall and resolve vertically. Charges run their own bouncing step.
pub fn physics_system(
    time: Res<Time>,
    map: Res<MapLayout>,
    mut bodies: Query<&mut Body, (Without<Mirrored>, Without<ChargeMarker>)>,
) {
    let dt = tick_dt(&time);

    for mut body in &mut bodies {
        resolve_axis_collision(&mut body, &map.obstacles, Axis::Horizontal);
        apply_gravity(&mut body, dt);
        let vertical = resolve_axis_collision(&mut body, &map.obstacles, Axis::Vertical);
        body.grounded = vertical == Some(Contact::Floor);
        if body.grounded {
            body.acceleration.y = 0.0;
        }
    }
}
