mod support;

use bevy_app::App;
use bevy_ecs::entity::Entity;
use bevy_math::Vec2;
use rand::{SeedableRng, rngs::StdRng};

use common::{
    combat::Vitals,
    constants::GROUND_Y,
    projectiles::BurnZone,
    weapons::{Loadout, ThrowableKind, Weapon, WeaponKind},
};
use game::{
    enemies::{DroppedHelmet, Enemy, EnemyKind, EnemyStats, head_rect},
    resources::{BulletMap, WaveProgress},
    waves::{EnemyTemplate, WaveBook, WaveDirector, WaveTemplate},
};
use support::*;

// A one-enemy wave the test places by hand instead of letting the director roll a spot.
fn scripted_wave(kind: EnemyKind) -> WaveProgress {
    let template = WaveTemplate {
        enemies: vec![EnemyTemplate {
            kind,
            count: 1,
            spawn_chance_multiplier: 1.0,
            max_alive: 1,
        }],
        spawn_timer_ms: 1000,
        timed_spawn_count: 1,
        money_multiplier: 1.0,
        boss: false,
    };
    let mut director = WaveDirector::new(0, template);
    director.start();
    let orders = director.update(0, &mut StdRng::seed_from_u64(1));
    assert_eq!(orders.len(), 1);

    WaveProgress {
        current: Some(director),
        next_index: 1,
        ..WaveProgress::with_book(WaveBook::builtin())
    }
}

fn place(app: &mut App, kind: EnemyKind, stats: EnemyStats, center_x: f32) -> Entity {
    let id = spawn_enemy_at(app, kind, stats, center_x);
    app.world_mut()
        .resource_mut::<WaveProgress>()
        .current
        .as_mut()
        .expect("scripted wave")
        .on_spawned(kind, id, false);
    enemy_entity(app, id).expect("enemy registered")
}

fn head_center(app: &App, enemy: Entity) -> Vec2 {
    let stats = app.world().get::<Enemy>(enemy).expect("enemy").stats;
    head_rect(&body(app, enemy).rect, &stats).center()
}

// Pull the trigger at `aim` for one tick, then let the round fly out.
fn shoot_at(app: &mut App, shooter: Entity, aim: Vec2) {
    {
        let mut input = input_mut(app, shooter);
        input.aim = Some(aim);
        input.trigger = true;
    }
    step(app);
    input_mut(app, shooter).trigger = false;
    for _ in 0..60 {
        if app.world().resource::<BulletMap>().entities.is_empty() {
            break;
        }
        step(app);
    }
    assert!(app.world().resource::<BulletMap>().entities.is_empty(), "round still flying");
}

#[test]
fn headshot_kill_pays_out_after_fade_and_wave_end() {
    let mut app = solo(scripted_wave(EnemyKind::Walker));
    let (shooter, shooter_id) = local_player(&mut app);

    let mut stats = EnemyKind::Walker.stats();
    stats.health = 40.0; // one pistol headshot
    let walker = place(&mut app, EnemyKind::Walker, stats, 1750.0);

    let aim = head_center(&app, walker);
    shoot_at(&mut app, shooter, aim);

    let vitals = app.world().get::<Vitals>(walker).expect("walker still fading");
    assert!(vitals.dying);
    assert_eq!(vitals.health, 0.0);
    assert_eq!(vitals.killer, Some(shooter_id));
    assert!(vitals.headshot_kill);
    assert!(app.world().get::<Enemy>(walker).is_some_and(Enemy::is_dying));

    // Nothing is paid until the fade finishes and the wave closes.
    assert_eq!(player(&app, shooter).score, 0);

    for _ in 0..600 {
        if app.world().resource::<WaveProgress>().run_over {
            break;
        }
        step(&mut app);
    }
    assert!(app.world().get_entity(walker).is_err());

    let progress = app.world().resource::<WaveProgress>();
    assert!(progress.run_over);
    assert_eq!(progress.history.len(), 1);
    let result = progress.history[0][0];
    assert_eq!(result.kills, 1);
    assert_eq!(result.headshot_kills, 1);
    assert_eq!(result.score, 15);
    assert_eq!(result.money, 3);
    assert_eq!(result.bullets_fired, 1);
    assert_eq!(result.bullets_hit, 1);

    let paid = player(&app, shooter);
    assert_eq!(paid.score, 15);
    assert_eq!(paid.money, 3);
}

#[test]
fn helmet_soaks_headshots_until_it_breaks_and_drops() {
    let mut app = solo(scripted_wave(EnemyKind::Helmeted));
    let (shooter, _) = local_player(&mut app);
    let stats = EnemyKind::Helmeted.stats();
    let target = place(&mut app, EnemyKind::Helmeted, stats, 1750.0);

    for _ in 0..2 {
        let aim = head_center(&app, target);
        shoot_at(&mut app, shooter, aim);
        step_n(&mut app, 10); // past the pistol's cooldown
    }

    let vitals = app.world().get::<Vitals>(target).expect("helmeted");
    assert_eq!(vitals.health, stats.health);
    let enemy = app.world().get::<Enemy>(target).expect("helmeted");
    assert!(enemy.helmet().is_some_and(|helmet| !helmet.intact()));

    let mut dropped = app.world_mut().query::<&DroppedHelmet>();
    assert_eq!(dropped.iter(app.world()).count(), 1);

    // With the helmet gone the head takes the full multiplier.
    let aim = head_center(&app, target);
    shoot_at(&mut app, shooter, aim);
    let vitals = app.world().get::<Vitals>(target).expect("helmeted");
    let expected = stats.health - 25.0 * stats.headshot_multiplier;
    assert!((vitals.health - expected).abs() < 1e-3, "health {}", vitals.health);
}

fn equipped_kind(app: &App, shooter: Entity) -> Option<WeaponKind> {
    app.world().get::<Loadout>(shooter).and_then(Loadout::equipped).map(Weapon::kind)
}

fn health(app: &App, enemy: Entity) -> f32 {
    app.world().get::<Vitals>(enemy).expect("vitals").health
}

#[test]
fn rocket_splash_reaches_the_pack_behind_the_first_target() {
    let mut app = solo(scripted_wave(EnemyKind::Walker));
    let (shooter, _) = local_player(&mut app);

    input_mut(&mut app, shooter).switch_to = Some(5);
    step_n(&mut app, 30); // past the switch delay
    assert_eq!(equipped_kind(&app, shooter), Some(WeaponKind::RocketLauncher));

    let mut stats = EnemyKind::Walker.stats();
    stats.health = 1000.0;
    stats.movement_speed = 0.0;
    stats.attack_range = 0.0;
    let pack: Vec<Entity> = [1900.0, 1950.0, 2000.0]
        .into_iter()
        .map(|x| place(&mut app, EnemyKind::Walker, stats, x))
        .collect();

    let aim = body(&app, pack[0]).rect.center();
    shoot_at(&mut app, shooter, aim);

    for enemy in &pack {
        assert!(health(&app, *enemy) < stats.health, "enemy at {:?} untouched", body(&app, *enemy).rect);
    }
    // The direct hit lands on top of the splash.
    assert!(health(&app, pack[0]) < health(&app, pack[2]));
}

#[test]
fn molotov_fire_burns_over_time() {
    let mut app = solo(scripted_wave(EnemyKind::Walker));
    let (thrower, thrower_id) = local_player(&mut app);

    let mut stats = EnemyKind::Walker.stats();
    stats.health = 1000.0;
    stats.movement_speed = 0.0;
    stats.attack_range = 0.0;
    let walker = place(&mut app, EnemyKind::Walker, stats, 1560.0);

    // Ready the molotov and drop it at the thrower's feet.
    let feet = body(&app, thrower).center() + Vec2::new(10.0, 0.0);
    {
        let mut input = input_mut(&mut app, thrower);
        input.switch_throwable = Some(1);
        input.aim = Some(Vec2::new(feet.x, GROUND_Y + 200.0));
        input.throw = true;
    }
    for _ in 0..60 {
        let mut zones = app.world_mut().query::<&BurnZone>();
        if zones.iter(app.world()).next().is_some() {
            break;
        }
        step(&mut app);
    }
    let mut zones = app.world_mut().query::<&BurnZone>();
    let zone = zones.iter(app.world()).next().cloned().expect("molotov caught fire");
    assert_eq!(zone.owner, thrower_id);
    assert_eq!(zone.rect.bottom(), GROUND_Y);

    let loadout = app.world().get::<Loadout>(thrower).expect("loadout");
    assert_eq!(loadout.throwable().map(|t| t.stats.kind), Some(ThrowableKind::Molotov));
    assert_eq!(loadout.throwable().map(|t| t.count), Some(1));
    assert_eq!(loadout.throwables[0].count, 4);

    // One pulse lands as the fire starts, then one per interval.
    let Some(burn) = ThrowableKind::Molotov.stats().burn else {
        panic!("molotov burns");
    };
    let first = health(&app, walker);
    assert!(first < stats.health);
    step_n(&mut app, 61);
    let later = health(&app, walker);
    assert!(
        first - later >= 3.0 * burn.damage_per_tick,
        "only {} more burn damage after a second",
        first - later
    );
}
