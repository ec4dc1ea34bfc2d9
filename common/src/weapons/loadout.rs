use bevy_ecs::prelude::*;

use super::{
    backpack::Backpack,
    catalog::{AmmoType, ThrowableKind, WeaponKind},
    firearm::Weapon,
    throwable::Throwable,
};

// Everything a player carries.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Loadout {
    pub weapons: Vec<Weapon>,
    pub equipped: usize,
    pub throwables: Vec<Throwable>,
    pub equipped_throwable: usize,
    pub backpack: Backpack,
}

impl Loadout {
    // The full catalogue with a starting stock of reserve ammo.
    #[must_use]
    pub fn arsenal() -> Self {
        Self {
            weapons: WeaponKind::ALL.into_iter().map(Weapon::new).collect(),
            equipped: 0,
            throwables: vec![
                Throwable::new(ThrowableKind::Grenade, 4),
                Throwable::new(ThrowableKind::Molotov, 2),
            ],
            equipped_throwable: 0,
            backpack: Backpack::default()
                .with(AmmoType::Light, 120)
                .with(AmmoType::Rifle, 180)
                .with(AmmoType::Shell, 36)
                .with(AmmoType::Rocket, 6),
        }
    }

    #[must_use]
    pub fn equipped(&self) -> Option<&Weapon> {
        self.weapons.get(self.equipped)
    }

    pub fn switch_to(&mut self, index: usize, now_ms: u64) -> bool {
        if index == self.equipped || index >= self.weapons.len() {
            return false;
        }
        if let Some(current) = self.weapons.get_mut(self.equipped) {
            current.release_trigger();
        }
        self.equipped = index;
        self.weapons[index].equip(now_ms);
        true
    }

    #[must_use]
    pub fn throwable(&self) -> Option<&Throwable> {
        self.throwables.get(self.equipped_throwable)
    }

    pub fn throwable_mut(&mut self) -> Option<&mut Throwable> {
        self.throwables.get_mut(self.equipped_throwable)
    }

    #[must_use]
    pub fn throwable_index(&self, kind: ThrowableKind) -> Option<usize> {
        self.throwables.iter().position(|t| t.stats.kind == kind)
    }

    // A throwable already cooking or winding up stays in hand.
    pub fn switch_throwable(&mut self, index: usize) -> bool {
        if index == self.equipped_throwable
            || index >= self.throwables.len()
            || self.throwable().is_some_and(Throwable::is_busy)
        {
            return false;
        }
        self.equipped_throwable = index;
        true
    }

    // Split borrow so the weapon can draw from the backpack while it ticks.
    pub fn weapon_and_backpack(&mut self) -> Option<(&mut Weapon, &mut Backpack)> {
        let weapon = self.weapons.get_mut(self.equipped)?;
        Some((weapon, &mut self.backpack))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::{firearm::WeaponPhase, throwable::ThrowPhase};

    #[test]
    fn switching_weapon_starts_switch_phase() {
        let mut loadout = Loadout::arsenal();
        assert!(loadout.switch_to(3, 500));
        assert_eq!(loadout.equipped().map(Weapon::kind), Some(WeaponKind::Shotgun));
        assert_eq!(loadout.weapons[3].phase, WeaponPhase::Switching);

        assert!(!loadout.switch_to(3, 600));
        assert!(!loadout.switch_to(9, 600));
    }

    #[test]
    fn arsenal_carries_every_weapon_and_both_throwables() {
        let loadout = Loadout::arsenal();
        let kinds: Vec<WeaponKind> = loadout.weapons.iter().map(Weapon::kind).collect();
        assert_eq!(kinds, WeaponKind::ALL.to_vec());
        assert_eq!(loadout.throwable().map(|t| t.stats.kind), Some(ThrowableKind::Grenade));
        assert_eq!(loadout.throwable_index(ThrowableKind::Molotov), Some(1));
    }

    #[test]
    fn throwable_in_hand_cannot_be_swapped_mid_throw() {
        let mut loadout = Loadout::arsenal();
        let Some(grenade) = loadout.throwable_mut() else {
            panic!("grenade equipped");
        };
        assert!(grenade.begin_cook(0));
        assert!(!loadout.switch_throwable(1));

        loadout.throwables[0].phase = ThrowPhase::Idle;
        assert!(loadout.switch_throwable(1));
        assert_eq!(loadout.throwable().map(|t| t.stats.kind), Some(ThrowableKind::Molotov));
        assert!(!loadout.switch_throwable(5));
    }
}
