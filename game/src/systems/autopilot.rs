use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use common::{
    components::Body,
    markers::{EnemyMarker, Mirrored, PlayerMarker},
    weapons::{Loadout, ThrowableKind, WeaponKind},
};

use crate::{
    components::{Player, PlayerInput},
    constants::{
        AUTOPILOT_ENGAGE, AUTOPILOT_GRENADE_CROWD, AUTOPILOT_GRENADE_RADIUS, AUTOPILOT_KEEP_AWAY,
        AUTOPILOT_SHOTGUN_RANGE,
    },
    enemies::Enemy,
};

// ============================================================================
// Autopilot System
// ============================================================================

// Scripted input for headless runs: keep a working distance from the nearest enemy, aim at
// its head, pick a weapon for the range, fire, reload, and throw into crowds.
pub fn autopilot_system(
    enemies: Query<(&Body, &Enemy), With<EnemyMarker>>,
    mut players: Query<
        (&Player, &Body, &Loadout, &mut PlayerInput),
        (With<PlayerMarker>, Without<Mirrored>, Without<EnemyMarker>),
    >,
) {
    let living: Vec<&Body> = enemies
        .iter()
        .filter(|(_, enemy)| !enemy.is_dying())
        .map(|(body, _)| body)
        .collect();

    for (player, body, loadout, mut input) in &mut players {
        if player.downed {
            *input = PlayerInput::default();
            continue;
        }
        let center = body.center();
        let Some(target) = living
            .iter()
            .min_by(|a, b| a.center().distance_squared(center).total_cmp(&b.center().distance_squared(center)))
        else {
            input.move_axis = 0.0;
            input.trigger = false;
            continue;
        };

        let head = Vec2::new(target.center().x, target.rect.h.mul_add(0.15, target.rect.top()));
        let dx = target.center().x - center.x;
        input.aim = Some(head);
        input.move_axis = if dx.abs() < AUTOPILOT_KEEP_AWAY {
            -dx.signum()
        } else if dx.abs() > AUTOPILOT_ENGAGE {
            dx.signum()
        } else {
            0.0
        };

        let crowd = living
            .iter()
            .filter(|enemy| enemy.center().distance(center) < AUTOPILOT_GRENADE_RADIUS)
            .count();
        let crowded = crowd >= AUTOPILOT_GRENADE_CROWD;

        let preference: &[WeaponKind] = if dx.abs() < AUTOPILOT_SHOTGUN_RANGE {
            &[WeaponKind::Shotgun, WeaponKind::AssaultRifle, WeaponKind::Pistol]
        } else if crowded {
            &[WeaponKind::RocketLauncher, WeaponKind::BurstRifle, WeaponKind::AssaultRifle]
        } else {
            &[WeaponKind::AssaultRifle, WeaponKind::BurstRifle, WeaponKind::Pistol]
        };
        let out_of_ammo = |kind: WeaponKind| {
            loadout.weapons.iter().find(|w| w.kind() == kind).is_some_and(|w| {
                w.magazine == 0 && w.stats.ammo.is_some_and(|ammo| loadout.backpack.reserve(ammo) == 0)
            })
        };
        let wanted = preference
            .iter()
            .chain(&[WeaponKind::Pistol, WeaponKind::Shotgun, WeaponKind::Knife])
            .find(|kind| !out_of_ammo(**kind))
            .and_then(|kind| loadout.weapons.iter().position(|w| w.kind() == *kind));
        if let Some(index) = wanted
            && index != loadout.equipped
        {
            input.switch_to = Some(index);
        }

        if let Some(weapon) = loadout.equipped() {
            if weapon.magazine == 0 && weapon.stats.ammo.is_some() {
                input.reload = true;
                input.trigger = false;
            } else {
                // Alternate so semi-automatic weapons see a fresh trigger pull.
                input.trigger = !input.trigger;
            }
        }

        // Fire for crowds, grenades once the molotovs run out.
        if crowded && loadout.throwable().is_some_and(|t| !t.is_busy()) {
            let stocked = [ThrowableKind::Molotov, ThrowableKind::Grenade]
                .into_iter()
                .filter_map(|kind| loadout.throwable_index(kind))
                .find(|index| loadout.throwables[*index].count > 0);
            match stocked {
                Some(index) if index == loadout.equipped_throwable => input.throw = true,
                Some(index) => input.switch_throwable = Some(index),
                None => {}
            }
        }
    }
}
