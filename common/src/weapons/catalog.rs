#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

// ============================================================================
// Weapon Archetypes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum WeaponKind {
    Pistol,
    BurstRifle,
    AssaultRifle,
    Shotgun,
    Knife,
    RocketLauncher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "bincode", derive(Encode, Decode))]
pub enum ThrowableKind {
    Grenade,
    Molotov,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireMode {
    Semi,
    Burst,
    FullAuto,
    Pump,
    Melee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadType {
    Magazine,
    SingleBullet,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmmoType {
    Light,
    Rifle,
    Shell,
    Rocket,
}

// Bullet type tag carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulletKind {
    Standard,
    Pellet,
    Rocket,
}

impl BulletKind {
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Pellet => 1,
            Self::Rocket => 2,
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Standard),
            1 => Some(Self::Pellet),
            2 => Some(Self::Rocket),
            _ => None,
        }
    }
}

// ============================================================================
// Stat Blocks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionStats {
    pub min_radius: f32,
    pub max_radius: f32,
    pub knockback: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurnStats {
    pub damage_per_tick: f32,
    pub interval_ms: u64,
    pub duration_ms: u64,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeStats {
    pub reach_w: f32,
    pub reach_h: f32,
    pub hit_delay_ms: u64,
    pub swing_ms: u64,
    pub stamina_cost: f32,
    pub knockback: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStats {
    pub kind: WeaponKind,
    pub fire_mode: FireMode,
    pub reload_type: ReloadType,
    pub ammo: Option<AmmoType>,
    pub bullet_kind: BulletKind,
    pub damage: f32,
    pub fire_rate: f32,       // rounds per minute; between bursts for burst weapons
    pub burst_fire_rate: f32, // rounds per minute inside a burst
    pub burst_size: u32,
    pub magazine_size: u32,
    pub reload_duration_ms: u64, // per magazine, or per round for single-bullet reloads
    pub pump_duration_ms: u64,
    pub bullet_speed: f32,
    pub min_range: f32,
    pub max_range: f32,
    pub pellets: u32,
    pub spread: f32, // half-angle in radians
    pub max_pierce_targets: u32,
    pub pierce_damage_multiplier: f32,
    pub explosion: Option<ExplosionStats>,
    pub melee: Option<MeleeStats>,
}

impl WeaponKind {
    pub const ALL: [Self; 6] = [
        Self::Pistol,
        Self::BurstRifle,
        Self::AssaultRifle,
        Self::Shotgun,
        Self::Knife,
        Self::RocketLauncher,
    ];

    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Pistol => 0,
            Self::BurstRifle => 1,
            Self::AssaultRifle => 2,
            Self::Shotgun => 3,
            Self::Knife => 4,
            Self::RocketLauncher => 5,
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Pistol),
            1 => Some(Self::BurstRifle),
            2 => Some(Self::AssaultRifle),
            3 => Some(Self::Shotgun),
            4 => Some(Self::Knife),
            5 => Some(Self::RocketLauncher),
            _ => None,
        }
    }

    #[must_use]
    pub const fn stats(self) -> WeaponStats {
        let base = WeaponStats {
            kind: self,
            fire_mode: FireMode::Semi,
            reload_type: ReloadType::Magazine,
            ammo: Some(AmmoType::Light),
            bullet_kind: BulletKind::Standard,
            damage: 25.0,
            fire_rate: 400.0,
            burst_fire_rate: 0.0,
            burst_size: 1,
            magazine_size: 12,
            reload_duration_ms: 1200,
            pump_duration_ms: 0,
            bullet_speed: 28.0,
            min_range: 300.0,
            max_range: 900.0,
            pellets: 1,
            spread: 0.0,
            max_pierce_targets: 1,
            pierce_damage_multiplier: 1.0,
            explosion: None,
            melee: None,
        };

        match self {
            Self::Pistol => base,
            Self::BurstRifle => WeaponStats {
                fire_mode: FireMode::Burst,
                ammo: Some(AmmoType::Rifle),
                damage: 22.0,
                fire_rate: 240.0,
                burst_fire_rate: 900.0,
                burst_size: 3,
                magazine_size: 24,
                reload_duration_ms: 1800,
                bullet_speed: 34.0,
                min_range: 400.0,
                max_range: 1200.0,
                max_pierce_targets: 2,
                pierce_damage_multiplier: 0.6,
                ..base
            },
            Self::AssaultRifle => WeaponStats {
                fire_mode: FireMode::FullAuto,
                ammo: Some(AmmoType::Rifle),
                damage: 18.0,
                fire_rate: 600.0,
                magazine_size: 30,
                reload_duration_ms: 2000,
                bullet_speed: 34.0,
                min_range: 350.0,
                max_range: 1100.0,
                ..base
            },
            Self::Shotgun => WeaponStats {
                fire_mode: FireMode::Pump,
                reload_type: ReloadType::SingleBullet,
                ammo: Some(AmmoType::Shell),
                bullet_kind: BulletKind::Pellet,
                damage: 14.0,
                fire_rate: 70.0,
                magazine_size: 6,
                reload_duration_ms: 450,
                pump_duration_ms: 500,
                bullet_speed: 26.0,
                min_range: 120.0,
                max_range: 450.0,
                pellets: 7,
                spread: 0.18,
                ..base
            },
            Self::Knife => WeaponStats {
                fire_mode: FireMode::Melee,
                reload_type: ReloadType::None,
                ammo: None,
                damage: 40.0,
                fire_rate: 120.0,
                magazine_size: 0,
                reload_duration_ms: 0,
                bullet_speed: 0.0,
                min_range: 0.0,
                max_range: 0.0,
                pellets: 0,
                melee: Some(MeleeStats {
                    reach_w: 70.0,
                    reach_h: 60.0,
                    hit_delay_ms: 120,
                    swing_ms: 350,
                    stamina_cost: 20.0,
                    knockback: 3.0,
                }),
                ..base
            },
            Self::RocketLauncher => WeaponStats {
                ammo: Some(AmmoType::Rocket),
                bullet_kind: BulletKind::Rocket,
                damage: 120.0,
                fire_rate: 50.0,
                magazine_size: 1,
                reload_duration_ms: 2500,
                bullet_speed: 16.0,
                min_range: 2000.0,
                max_range: 2400.0,
                explosion: Some(ExplosionStats {
                    min_radius: 40.0,
                    max_radius: 160.0,
                    knockback: 10.0,
                }),
                ..base
            },
        }
    }
}

// ============================================================================
// Throwables
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowableStats {
    pub kind: ThrowableKind,
    pub damage: f32,
    pub fuse_ms: u64,
    pub cookable: bool,
    pub shatter_on_impact: bool,
    pub explosion: Option<ExplosionStats>,
    pub burn: Option<BurnStats>,
}

impl ThrowableKind {
    pub const ALL: [Self; 2] = [Self::Grenade, Self::Molotov];

    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Grenade => 0,
            Self::Molotov => 1,
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Grenade),
            1 => Some(Self::Molotov),
            _ => None,
        }
    }

    #[must_use]
    pub const fn stats(self) -> ThrowableStats {
        match self {
            Self::Grenade => ThrowableStats {
                kind: self,
                damage: 150.0,
                fuse_ms: 2200,
                cookable: true,
                shatter_on_impact: false,
                explosion: Some(ExplosionStats {
                    min_radius: 50.0,
                    max_radius: 180.0,
                    knockback: 12.0,
                }),
                burn: None,
            },
            Self::Molotov => ThrowableStats {
                kind: self,
                damage: 0.0,
                fuse_ms: 5000,
                cookable: false,
                shatter_on_impact: true,
                explosion: None,
                burn: Some(BurnStats {
                    damage_per_tick: 8.0,
                    interval_ms: 250,
                    duration_ms: 4000,
                    width: 220.0,
                    height: 60.0,
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_round_trip() {
        for kind in WeaponKind::ALL {
            assert_eq!(WeaponKind::from_tag(kind.tag()), Some(kind));
            assert_eq!(kind.stats().kind, kind);
        }
        for kind in ThrowableKind::ALL {
            assert_eq!(ThrowableKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(WeaponKind::from_tag(99), None);
        assert_eq!(ThrowableKind::from_tag(99), None);
    }
}
