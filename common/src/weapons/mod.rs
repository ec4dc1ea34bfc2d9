pub mod backpack;
pub mod catalog;
pub mod firearm;
pub mod loadout;
pub mod throwable;

pub use backpack::Backpack;
pub use catalog::{
    AmmoType, BulletKind, BurnStats, ExplosionStats, FireMode, MeleeStats, ReloadType, ThrowableKind, ThrowableStats,
    WeaponKind, WeaponStats,
};
pub use firearm::{MeleeStrike, Readiness, Volley, Weapon, WeaponOutput, WeaponPhase};
pub use loadout::Loadout;
pub use throwable::{Release, ThrowPhase, Throwable};
