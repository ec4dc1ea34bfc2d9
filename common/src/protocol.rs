#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

use anyhow::Result;
use bevy_ecs::component::Component;
use bevy_math::Vec2;

use crate::geometry::Aabb;

// Macro to reduce boilerplate for structs
macro_rules! message {
    ($(#[$meta:meta])* struct $name:ident $body:tt) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "bincode", derive(Encode, Decode))]
        pub struct $name $body
    };
}

// ============================================================================
// Common Data Types
// ============================================================================

// Network identity of any simulated entity; unique per session on the authoring peer.
// Also the key for "already hit" bookkeeping on projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Component)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct NetId(pub u32);

// Which of the (at most two) players an entity represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Component)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct PlayerSlot(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct NetVec {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for NetVec {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<NetVec> for Vec2 {
    fn from(v: NetVec) -> Self {
        Self::new(v.x, v.y)
    }
}

// Animation-state flags a peer needs to mirror a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub struct AnimFlags {
    pub falling: bool,
    pub running: bool,
    pub jumping: bool,
    pub turning_direction: bool,
    pub firing: bool,
}

// ============================================================================
// Per-Tick Frames
// ============================================================================

message! {
// One player's authoritative state, sent by the peer that controls it.
struct PlayerFrame {
    pub id: NetId,
    pub slot: PlayerSlot,
    pub rect: Aabb,
    pub previous_rect: Aabb,
    pub velocity: NetVec,
    pub acceleration: NetVec,
    pub health: f32,
    pub aim_angle: f32,
    pub flags: AnimFlags,
}
}

message! {
// A live bullet owned by the sending peer.
struct BulletFrame {
    pub id: NetId,
    pub owner: NetId,
    pub angle: f32,
    pub rect: Aabb,
    pub speed: f32,
    pub damage: f32,
    pub traveled: f32,
    pub kind_tag: u8,
    pub weapon_tag: u8,
}
}

message! {
// A live enemy (host to guest only).
struct EnemyFrame {
    pub id: NetId,
    pub kind_tag: u8,
    pub rect: Aabb,
    pub health: f32,
    pub velocity: NetVec,
    pub acceleration: NetVec,
    pub direction: i8,
    pub running: bool,
    pub attacking: bool,
    pub grounded: bool,
    pub dying: bool,
}
}

message! {
// Per-player tally of a finished wave (host to guest only).
struct WaveResultFrame {
    pub wave_index: u32,
    pub slot: PlayerSlot,
    pub score: u32,
    pub money: u32,
    pub kills: u32,
    pub headshot_kills: u32,
    pub bullets_fired: u32,
    pub bullets_hit: u32,
}
}

message! {
// A melee swing by the sender's player (guest to host only).
struct SwingFrame {
    pub owner: NetId,
    pub rect: Aabb,
    pub damage: f32,
    pub knockback: f32,
}
}

message! {
// A grenade or molotov that went off on the sender's side (guest to host only). `at` is the
// blast center, or the ground point a fire sits on.
struct DetonationFrame {
    pub owner: NetId,
    pub throwable_tag: u8,
    pub at: NetVec,
}
}

message! {
// Everything one peer sends the other once per send interval.
struct PeerSnapshot {
    pub tick: u64,
    pub player: PlayerFrame,
    pub bullets: Vec<BulletFrame>,
    pub enemies: Option<Vec<EnemyFrame>>,
    pub wave_results: Vec<WaveResultFrame>,
    pub swings: Vec<SwingFrame>,
    pub detonations: Vec<DetonationFrame>,
}
}

// ============================================================================
// Encoding
// ============================================================================

#[cfg(feature = "bincode")]
pub fn encode_snapshot(snapshot: &PeerSnapshot) -> Result<Vec<u8>> {
    Ok(bincode::encode_to_vec(snapshot, bincode::config::standard())?)
}

#[cfg(feature = "bincode")]
pub fn decode_snapshot(data: &[u8]) -> Result<PeerSnapshot> {
    Ok(bincode::decode_from_slice(data, bincode::config::standard())?.0)
}

#[cfg(all(feature = "json", not(feature = "bincode")))]
pub fn encode_snapshot(snapshot: &PeerSnapshot) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(snapshot)?)
}

#[cfg(all(feature = "json", not(feature = "bincode")))]
pub fn decode_snapshot(data: &[u8]) -> Result<PeerSnapshot> {
    Ok(serde_json::from_slice(data)?)
}

#[cfg(all(test, any(feature = "bincode", feature = "json")))]
mod tests {
    use super::*;

    #[test]
    fn snapshot_with_unknown_enemy_tag_still_decodes() {
        let snapshot = PeerSnapshot {
            tick: 42,
            player: PlayerFrame {
                id: NetId(1),
                slot: PlayerSlot(0),
                rect: Aabb::new(10.0, 20.0, 40.0, 90.0),
                previous_rect: Aabb::new(9.0, 20.0, 40.0, 90.0),
                velocity: NetVec { x: 1.0, y: 0.0 },
                acceleration: NetVec::default(),
                health: 88.0,
                aim_angle: 0.3,
                flags: AnimFlags {
                    running: true,
                    ..AnimFlags::default()
                },
            },
            bullets: vec![],
            enemies: Some(vec![EnemyFrame {
                id: NetId(9),
                kind_tag: 250,
                rect: Aabb::new(0.0, 0.0, 1.0, 1.0),
                health: 5.0,
                velocity: NetVec::default(),
                acceleration: NetVec::default(),
                direction: -1,
                running: false,
                attacking: false,
                grounded: true,
                dying: false,
            }]),
            wave_results: vec![],
            swings: vec![],
            detonations: vec![DetonationFrame {
                owner: NetId(1),
                throwable_tag: 1,
                at: NetVec { x: 400.0, y: 760.0 },
            }],
        };

        let bytes = encode_snapshot(&snapshot).expect("encode");
        let decoded = decode_snapshot(&bytes).expect("decode");
        assert_eq!(decoded.enemies.as_ref().map(Vec::len), Some(1));
        assert_eq!(decoded.enemies.expect("enemies")[0].kind_tag, 250);
        assert_eq!(decoded.player.health, 88.0);
        assert_eq!(decoded.detonations, snapshot.detonations);
    }
}
