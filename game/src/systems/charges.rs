use bevy_ecs::prelude::*;
use bevy_time::Time;
use tracing::debug;

use common::{components::Body, markers::ChargeMarker, projectiles::Charge};

use super::{now_ms, tick_dt};
use crate::{messages::DetonationRequested, resources::MapLayout};

// ============================================================================
// Charge System
// ============================================================================

// Thrown grenades and molotovs: bounce through the map until the fuse runs out or, for
// shattering charges, until the first contact.
pub fn charge_system(
    mut commands: Commands,
    time: Res<Time>,
    map: Res<MapLayout>,
    mut charges: Query<(Entity, &mut Charge, &mut Body), With<ChargeMarker>>,
    mut detonations: MessageWriter<DetonationRequested>,
) {
    let now = now_ms(&time);
    let dt = tick_dt(&time);

    for (entity, mut charge, mut body) in &mut charges {
        let contact = charge.step(&mut body, &map.obstacles, dt);
        if !charge.should_detonate(contact, now) {
            continue;
        }
        if let Some(detonation) = charge.detonate(&body) {
            debug!("{:?} went off after {} bounces", charge.stats.kind, charge.bounces);
            detonations.write(DetonationRequested {
                owner: charge.owner,
                detonation,
                thrown: Some(charge.stats.kind),
            });
        }
        commands.entity(entity).despawn();
    }
}
