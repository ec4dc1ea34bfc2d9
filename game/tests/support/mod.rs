#![allow(dead_code)]

use bevy_app::App;
use bevy_ecs::prelude::*;
use bevy_time::Time;
use std::time::Duration;

use common::{
    combat::Vitals,
    components::{Body, Facing},
    markers::{EnemyMarker, Mirrored, PlayerMarker},
    protocol::NetId,
};
use game::{
    SimPlugin,
    components::{Player, PlayerInput},
    enemies::{Enemy, EnemyKind, EnemyStats},
    resources::{EnemyMap, NetIds, PeerLink, PeerRole, SimRng, SimSettings, WaveProgress},
    systems::now_ms,
};

pub const TICK: Duration = Duration::from_micros(16_667);

pub fn app(role: PeerRole, settings: SimSettings, progress: WaveProgress) -> App {
    let mut app = App::new();
    app.insert_resource(role)
        .insert_resource(settings)
        .insert_resource(SimRng::seeded(7))
        .insert_resource(progress)
        .add_plugins(SimPlugin);
    // Startup: spawn the local players.
    app.update();
    app
}

pub fn solo(progress: WaveProgress) -> App {
    app(
        PeerRole::Solo,
        SimSettings {
            players: 1,
            autopilot: false,
            wave_limit: Some(1),
        },
        progress,
    )
}

pub fn linked(role: PeerRole, link: PeerLink) -> App {
    let mut app = App::new();
    app.insert_resource(role)
        .insert_resource(SimSettings {
            players: 1,
            autopilot: false,
            wave_limit: Some(0),
        })
        .insert_resource(SimRng::seeded(11))
        .insert_resource(link)
        .add_plugins(SimPlugin);
    app.update();
    app
}

pub fn step(app: &mut App) {
    app.world_mut().resource_mut::<Time>().advance_by(TICK);
    app.update();
}

pub fn step_n(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        step(app);
    }
}

pub fn now(app: &App) -> u64 {
    now_ms(app.world().resource::<Time>())
}

pub fn spawn_enemy_at(app: &mut App, kind: EnemyKind, stats: EnemyStats, center_x: f32) -> NetId {
    let now = now(app);
    let world = app.world_mut();
    let id = world.resource_mut::<NetIds>().allocate();
    let enemy = Enemy::new(kind, stats, center_x, now);
    let body = enemy.body_at(center_x);
    let entity = world
        .spawn((
            EnemyMarker,
            id,
            Vitals::new(stats.health, stats.headshot_multiplier),
            body,
            Facing::Left,
            enemy,
        ))
        .id();
    world.resource_mut::<EnemyMap>().0.insert(id, entity);
    id
}

pub fn local_player(app: &mut App) -> (Entity, NetId) {
    let mut query = app
        .world_mut()
        .query_filtered::<(Entity, &NetId), (With<PlayerMarker>, Without<Mirrored>)>();
    let (entity, id) = query.single(app.world()).expect("one local player");
    (entity, *id)
}

pub fn input_mut(app: &mut App, player: Entity) -> Mut<'_, PlayerInput> {
    app.world_mut().get_mut::<PlayerInput>(player).expect("player input")
}

pub fn player(app: &App, player: Entity) -> &Player {
    app.world().get::<Player>(player).expect("player")
}

pub fn body(app: &App, entity: Entity) -> &Body {
    app.world().get::<Body>(entity).expect("body")
}

pub fn enemy_entity(app: &App, id: NetId) -> Option<Entity> {
    app.world().resource::<EnemyMap>().0.get(&id).copied()
}
