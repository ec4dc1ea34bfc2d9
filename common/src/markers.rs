use bevy_ecs::prelude::*;

// Marker components to disambiguate entity archetypes across host and guest.
#[derive(Component, Debug, Default)]
pub struct PlayerMarker;

#[derive(Component, Debug, Default)]
pub struct EnemyMarker;

#[derive(Component, Debug, Default)]
pub struct BulletMarker;

#[derive(Component, Debug, Default)]
pub struct ChargeMarker;

// Entity whose state is written by the remote peer rather than local logic.
#[derive(Component, Debug, Default)]
pub struct Mirrored;
