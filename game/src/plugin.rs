use bevy_app::{App, Plugin, Startup, Update};
use bevy_ecs::prelude::*;
use bevy_time::Time;

use crate::{
    messages::{
        BossSummonDue, BulletHit, DetonationRequested, EnemyAttack, EnemyFinalized, HelmetBroke, MeleeSwing,
        ShotFired,
    },
    resources::{
        BulletMap, EnemyAssets, EnemyMap, MapLayout, NetIds, PeerInbox, PeerOutbox, PeerRole, PlayerMap, SimRng,
        SimSettings, TickCount, WaveProgress,
    },
    systems::{
        autopilot::autopilot_system,
        autopilot_enabled,
        charges::charge_system,
        enemies::{
            dropped_helmet_fade_system, enemy_ai_system, enemy_lifecycle_system, helmet_drop_system, melee_hit_system,
            mirrored_enemy_strike_system,
        },
        is_authority, is_guest,
        network::{
            forward_attacks_system, mirror_bullets_system, mirror_enemies_system, mirror_players_system,
            mirror_wave_results_system, network_receive_system, network_send_system, peer_attacks_system,
        },
        physics::{begin_tick_system, physics_system},
        players::{
            player_control_system, player_damage_system, player_throw_system, player_weapon_system,
            setup_players_system,
        },
        projectiles::{blast_system, bullet_system, burn_system, detonation_system},
        waves::{wave_accounting_system, wave_director_system},
    },
};

// ============================================================================
// Simulation Plugin
// ============================================================================

// The whole simulation as one ordered pass per `Update`. Resources already inserted by the
// caller (seed, role, settings, wave book, peer link) are kept.
pub struct SimPlugin;

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Time>()
            .init_resource::<PeerRole>()
            .init_resource::<SimSettings>()
            .init_resource::<SimRng>()
            .init_resource::<MapLayout>()
            .init_resource::<PlayerMap>()
            .init_resource::<EnemyMap>()
            .init_resource::<BulletMap>()
            .init_resource::<TickCount>()
            .init_resource::<WaveProgress>()
            .init_resource::<EnemyAssets>()
            .init_resource::<PeerInbox>()
            .init_resource::<PeerOutbox>()
            .add_message::<EnemyAttack>()
            .add_message::<MeleeSwing>()
            .add_message::<DetonationRequested>()
            .add_message::<ShotFired>()
            .add_message::<BulletHit>()
            .add_message::<HelmetBroke>()
            .add_message::<EnemyFinalized>()
            .add_message::<BossSummonDue>();

        // Ids depend on the role, so they are allocated once the role is known.
        if !app.world().contains_resource::<NetIds>() {
            let role = *app.world().resource::<PeerRole>();
            app.insert_resource(NetIds::for_role(role));
        }

        app.add_systems(Startup, setup_players_system).add_systems(
            Update,
            (
                // 1. Input and the peer's state
                (
                    autopilot_system.run_if(autopilot_enabled),
                    network_receive_system,
                    mirror_players_system,
                    mirror_bullets_system,
                    (mirror_enemies_system, mirror_wave_results_system).chain().run_if(is_guest),
                    ApplyDeferred,
                )
                    .chain(),
                // 2. Players act
                (
                    begin_tick_system,
                    player_control_system,
                    player_weapon_system,
                    player_throw_system,
                )
                    .chain(),
                // 3. Waves spawn, enemies think
                (
                    (wave_director_system, enemy_ai_system).chain().run_if(is_authority),
                    mirrored_enemy_strike_system.run_if(is_guest),
                    player_damage_system,
                    (peer_attacks_system, melee_hit_system).chain().run_if(is_authority),
                    ApplyDeferred,
                )
                    .chain(),
                // 4. Projectiles, charges, explosions and fire
                (
                    bullet_system,
                    charge_system,
                    detonation_system,
                    ApplyDeferred,
                    blast_system,
                    burn_system,
                    helmet_drop_system,
                )
                    .chain(),
                // 5. Physics, removals and accounting
                (
                    physics_system,
                    (enemy_lifecycle_system, wave_accounting_system).chain().run_if(is_authority),
                    dropped_helmet_fade_system,
                    forward_attacks_system.run_if(is_guest),
                    network_send_system,
                )
                    .chain(),
            )
                .chain(),
        );
    }
}
