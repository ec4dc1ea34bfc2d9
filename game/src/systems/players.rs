use bevy_ecs::prelude::*;
use bevy_math::Vec2;
use bevy_time::Time;
use tracing::{debug, info};

use common::{
    collision::{
        apply_knockback,
        helpers::{angle_between, direction_from_angle},
        integrate_horizontal,
    },
    combat::Vitals,
    components::{Body, Facing},
    constants::{
        GROUND_Y, PLAYER_ACCELERATION, PLAYER_HEIGHT, PLAYER_JUMP_VELOCITY, PLAYER_MAX_HEALTH, PLAYER_MAX_STAMINA,
        PLAYER_WIDTH, STAMINA_REGEN_PER_TICK, THROW_SPEED,
    },
    geometry::Aabb,
    markers::{BulletMarker, ChargeMarker, Mirrored, PlayerMarker},
    projectiles::{Bullet, Charge},
    protocol::{AnimFlags, NetId, PlayerSlot},
    weapons::{Loadout, WeaponOutput},
};

use super::{now_ms, tick_dt};
use crate::{
    components::{Player, PlayerInput, hand_position},
    constants::{PLAYER_FRICTION, PLAYER_SPAWN_X},
    messages::{DetonationRequested, EnemyAttack, MeleeSwing, ShotFired},
    resources::{BulletMap, NetIds, PeerRole, PlayerMap, SimRng, SimSettings},
};

// ============================================================================
// Player Setup
// ============================================================================

// Slots simulated on this peer. A host and a guest each own one; a solo game owns all.
#[must_use]
pub fn local_slots(role: PeerRole, players: u8) -> Vec<PlayerSlot> {
    match role {
        PeerRole::Solo => (0..players.clamp(1, 2)).map(PlayerSlot).collect(),
        PeerRole::Host => vec![PlayerSlot(0)],
        PeerRole::Guest => vec![PlayerSlot(1)],
    }
}

#[must_use]
pub fn player_body(slot: PlayerSlot) -> Body {
    let center_x = PLAYER_SPAWN_X[usize::from(slot.0.min(1))];
    Body::new(Aabb::new(
        center_x - PLAYER_WIDTH / 2.0,
        GROUND_Y - PLAYER_HEIGHT,
        PLAYER_WIDTH,
        PLAYER_HEIGHT,
    ))
}

pub fn setup_players_system(
    mut commands: Commands,
    role: Res<PeerRole>,
    settings: Res<SimSettings>,
    mut ids: ResMut<NetIds>,
    mut players: ResMut<PlayerMap>,
) {
    for slot in local_slots(*role, settings.players) {
        let id = ids.allocate();
        let entity = commands
            .spawn((
                PlayerMarker,
                id,
                Player::new(slot),
                player_body(slot),
                Facing::Right,
                Vitals::new(PLAYER_MAX_HEALTH, 1.0),
                Loadout::arsenal(),
                PlayerInput::default(),
            ))
            .id();
        players.0.insert(id, entity);
        info!("player {:?} joined as slot {}", id, slot.0);
    }
}

// ============================================================================
// Player Control System
// ============================================================================

pub fn player_control_system(
    time: Res<Time>,
    mut query: Query<(&mut Player, &mut Body, &mut Facing, &Vitals, &mut PlayerInput), Without<Mirrored>>,
) {
    let dt = tick_dt(&time);

    for (mut player, mut body, mut facing, vitals, mut input) in &mut query {
        if player.downed || vitals.dying {
            integrate_horizontal(&mut body, 0.0, PLAYER_FRICTION, dt);
            player.flags = AnimFlags::default();
            continue;
        }

        let hand = hand_position(&body, *facing);
        if let Some(aim) = input.aim {
            player.aim_angle = angle_between(hand, aim);
        }

        // Face the aim point; only flag a turn when the side actually changes.
        let turned = input
            .aim
            .and_then(|aim| Facing::toward(aim.x - body.center().x))
            .filter(|toward| toward != &*facing);
        if let Some(toward) = turned {
            *facing = toward;
        }

        let axis = input.move_axis.clamp(-1.0, 1.0);
        integrate_horizontal(&mut body, axis * PLAYER_ACCELERATION, PLAYER_FRICTION, dt);

        let jumped = std::mem::take(&mut input.jump) && body.grounded;
        if jumped {
            body.velocity.y = PLAYER_JUMP_VELOCITY;
            body.grounded = false;
        }

        player.stamina = STAMINA_REGEN_PER_TICK.mul_add(dt, player.stamina).min(PLAYER_MAX_STAMINA);
        player.flags.turning_direction = turned.is_some();
        player.flags.running = axis != 0.0 && body.grounded;
        player.flags.jumping = jumped || (!body.grounded && body.velocity.y < 0.0);
        player.flags.falling = !body.grounded && body.velocity.y > 0.0;
    }
}

// ============================================================================
// Player Weapon System
// ============================================================================

// Reach rectangle of a melee swing: `reach` out from the body center on the facing side,
// vertically centered on the body.
#[must_use]
pub fn melee_rect(body: &Aabb, facing: Facing, reach: f32, height: f32) -> Aabb {
    let center = body.center();
    let x = match facing {
        Facing::Right => center.x,
        Facing::Left => center.x - reach,
    };
    Aabb::new(x, center.y - height / 2.0, reach, height)
}

pub fn player_weapon_system(
    mut commands: Commands,
    time: Res<Time>,
    mut rng: ResMut<SimRng>,
    mut ids: ResMut<NetIds>,
    mut bullets: ResMut<BulletMap>,
    mut query: Query<
        (&NetId, &mut Player, &mut Loadout, &Body, &Facing, &Vitals, &mut PlayerInput),
        Without<Mirrored>,
    >,
    mut shots: MessageWriter<ShotFired>,
    mut swings: MessageWriter<MeleeSwing>,
) {
    let now = now_ms(&time);

    for (id, mut player, mut loadout, body, facing, vitals, mut input) in &mut query {
        let player = &mut *player;
        player.flags.firing = false;
        if player.downed || vitals.dying {
            continue;
        }

        if let Some(index) = input.switch_to.take()
            && loadout.switch_to(index, now)
        {
            debug!("{:?} switched to weapon {}", id, index);
        }

        let Some((weapon, backpack)) = loadout.weapon_and_backpack() else {
            continue;
        };
        if std::mem::take(&mut input.reload) && weapon.start_reload(now, backpack) {
            debug!("{:?} reloading {:?}", id, weapon.kind());
        }

        let mut outputs = Vec::new();
        if input.trigger {
            if !weapon.trigger_held {
                outputs.extend(weapon.pull_trigger(now, &mut player.stamina, &mut rng.0));
            }
        } else {
            weapon.release_trigger();
        }
        outputs.extend(weapon.tick(now, backpack, &mut player.stamina, &mut rng.0));

        let stats = weapon.stats;
        for output in outputs {
            match output {
                WeaponOutput::Volley(volley) => {
                    let muzzle = hand_position(body, *facing);
                    for offset in &volley.angle_offsets {
                        let bullet_id = ids.allocate();
                        let bullet = Bullet::fired(*id, &stats, muzzle, player.aim_angle + offset);
                        let entity = commands.spawn((BulletMarker, bullet_id, bullet)).id();
                        bullets.entities.insert(bullet_id, entity);
                    }
                    shots.write(ShotFired {
                        shooter: *id,
                        rounds: volley.angle_offsets.len() as u32,
                    });
                    player.flags.firing = true;
                }
                WeaponOutput::Strike(strike) => {
                    swings.write(MeleeSwing {
                        owner: *id,
                        rect: melee_rect(&body.rect, *facing, strike.reach_w, strike.reach_h),
                        damage: strike.damage,
                        knockback: strike.knockback * facing.sign(),
                    });
                    player.flags.firing = true;
                }
                WeaponOutput::EmptyClick => debug!("{:?} dry fire", id),
            }
        }
    }
}

// ============================================================================
// Player Throw System
// ============================================================================

pub fn player_throw_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(&NetId, &Player, &mut Loadout, &Body, &Facing, &mut PlayerInput), Without<Mirrored>>,
    mut detonations: MessageWriter<DetonationRequested>,
) {
    let now = now_ms(&time);

    for (id, player, mut loadout, body, facing, mut input) in &mut query {
        if player.downed {
            continue;
        }
        if let Some(index) = input.switch_throwable.take()
            && loadout.switch_throwable(index)
        {
            debug!("{:?} readied throwable {}", id, index);
        }
        let Some(throwable) = loadout.throwable_mut() else {
            continue;
        };
        if std::mem::take(&mut input.cook) {
            throwable.begin_cook(now);
        }
        if std::mem::take(&mut input.throw) {
            throwable.throw(now);
        }

        let Some(release) = throwable.tick(now) else {
            continue;
        };
        let hand = hand_position(body, *facing);
        let velocity = direction_from_angle(player.aim_angle) * THROW_SPEED + Vec2::new(body.velocity.x, 0.0);
        let mut charge = Charge::thrown(*id, &release, now);
        let charge_body = Charge::body(hand, velocity);

        if release.detonate_immediately {
            info!("{:?} held a {:?} too long", id, release.stats.kind);
            if let Some(detonation) = charge.detonate(&charge_body) {
                detonations.write(DetonationRequested {
                    owner: *id,
                    detonation,
                    thrown: Some(release.stats.kind),
                });
            }
            continue;
        }
        commands.spawn((ChargeMarker, charge, charge_body));
    }
}

// ============================================================================
// Player Damage System
// ============================================================================

// Each peer resolves strikes against the players it simulates.
pub fn player_damage_system(
    mut attacks: MessageReader<EnemyAttack>,
    mut query: Query<(&NetId, &mut Player, &mut Body, &mut Vitals), (With<PlayerMarker>, Without<Mirrored>)>,
) {
    for attack in attacks.read() {
        for (id, mut player, mut body, mut vitals) in &mut query {
            if player.downed || !attack.strike.rect.overlaps(&body.rect) {
                continue;
            }
            let outcome = vitals.apply_damage(attack.strike.damage, Some(attack.attacker), false);
            apply_knockback(&mut body, attack.strike.knockback);
            debug!("{:?} hit by {:?} for {:.1}", id, attack.attacker, outcome.applied);
            if outcome.killed {
                player.downed = true;
                info!("player {:?} is down", id);
            }
        }
    }
}
