use std::collections::HashMap;

use super::catalog::AmmoType;

// Reserve ammo, shared by every weapon that uses the same ammo type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backpack {
    reserves: HashMap<AmmoType, u32>,
}

impl Backpack {
    #[must_use]
    pub fn with(mut self, ammo: AmmoType, rounds: u32) -> Self {
        self.add(ammo, rounds);
        self
    }

    #[must_use]
    pub fn reserve(&self, ammo: AmmoType) -> u32 {
        self.reserves.get(&ammo).copied().unwrap_or(0)
    }

    pub fn add(&mut self, ammo: AmmoType, rounds: u32) {
        *self.reserves.entry(ammo).or_insert(0) += rounds;
    }

    // Take up to `wanted` rounds; returns how many were actually taken.
    pub fn take(&mut self, ammo: AmmoType, wanted: u32) -> u32 {
        let reserve = self.reserves.entry(ammo).or_insert(0);
        let taken = wanted.min(*reserve);
        *reserve -= taken;
        taken
    }
}
