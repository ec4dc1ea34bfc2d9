use rand::Rng;

use super::{
    backpack::Backpack,
    catalog::{BulletKind, FireMode, ReloadType, WeaponKind, WeaponStats},
};
use crate::constants::{FIRE_RATE_RATIO, MELEE_SWING_VARIANTS, WEAPON_SWITCH_MS};

// ============================================================================
// Weapon State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponPhase {
    Idle,
    Firing,
    Reloading,
    Pumping,
    Switching,
}

// Why the weapon can or cannot shoot right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Empty,
    Reloading,
    Pumping,
    Switching,
    Cooldown,
    Exhausted,
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Volley {
    pub kind: WeaponKind,
    pub bullet_kind: BulletKind,
    pub damage: f32,
    pub speed: f32,
    pub angle_offsets: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeStrike {
    pub variant: u8,
    pub damage: f32,
    pub reach_w: f32,
    pub reach_h: f32,
    pub knockback: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeaponOutput {
    Volley(Volley),
    Strike(MeleeStrike),
    EmptyClick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swing {
    pub started_ms: u64,
    pub variant: u8,
    pub hit_done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub stats: WeaponStats,
    pub magazine: u32,
    pub phase: WeaponPhase,
    pub trigger_held: bool,
    pub last_shot_ms: Option<u64>,
    pub last_burst_end_ms: Option<u64>,
    pub burst_remaining: u32,
    pub reload_start_ms: u64,
    pub pump_start_ms: u64,
    pub switch_start_ms: u64,
    pub swing: Option<Swing>,
}

impl Weapon {
    #[must_use]
    pub fn new(kind: WeaponKind) -> Self {
        let stats = kind.stats();
        Self {
            stats,
            magazine: stats.magazine_size,
            phase: WeaponPhase::Idle,
            trigger_held: false,
            last_shot_ms: None,
            last_burst_end_ms: None,
            burst_remaining: 0,
            reload_start_ms: 0,
            pump_start_ms: 0,
            switch_start_ms: 0,
            swing: None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> WeaponKind {
        self.stats.kind
    }

    fn round_cooldown_ms(&self) -> u64 {
        cooldown_ms(self.stats.fire_rate)
    }

    fn burst_cooldown_ms(&self) -> u64 {
        cooldown_ms(self.stats.burst_fire_rate)
    }

    fn in_burst(&self) -> bool {
        self.stats.fire_mode == FireMode::Burst && self.burst_remaining > 0
    }

    // Becoming the active weapon: blocks shooting for the switch duration and drops any pending action.
    pub fn equip(&mut self, now_ms: u64) {
        self.phase = WeaponPhase::Switching;
        self.switch_start_ms = now_ms;
        self.trigger_held = false;
        self.burst_remaining = 0;
        self.swing = None;
    }

    #[must_use]
    pub fn can_shoot(&self, now_ms: u64, stamina: f32) -> Readiness {
        match self.phase {
            WeaponPhase::Switching if now_ms.saturating_sub(self.switch_start_ms) < WEAPON_SWITCH_MS => {
                return Readiness::Switching;
            }
            WeaponPhase::Reloading => return Readiness::Reloading,
            WeaponPhase::Pumping => return Readiness::Pumping,
            _ => {}
        }
        if self.in_burst() || self.swing.is_some() {
            return Readiness::Busy;
        }

        if let Some(melee) = self.stats.melee {
            if stamina < melee.stamina_cost {
                return Readiness::Exhausted;
            }
        } else if self.magazine == 0 {
            return Readiness::Empty;
        }

        let since = |stamp: Option<u64>| stamp.map(|t| now_ms.saturating_sub(t));
        let elapsed = if self.stats.fire_mode == FireMode::Burst {
            since(self.last_burst_end_ms)
        } else {
            since(self.last_shot_ms)
        };
        match elapsed {
            Some(elapsed) if elapsed < self.round_cooldown_ms() => Readiness::Cooldown,
            _ => Readiness::Ready,
        }
    }

    pub fn pull_trigger(&mut self, now_ms: u64, stamina: &mut f32, rng: &mut impl Rng) -> Option<WeaponOutput> {
        self.trigger_held = true;
        self.try_fire(now_ms, stamina, rng)
    }

    pub fn release_trigger(&mut self) {
        self.trigger_held = false;
        if self.phase == WeaponPhase::Firing && !self.in_burst() && self.swing.is_none() {
            self.phase = WeaponPhase::Idle;
        }
    }

    fn try_fire(&mut self, now_ms: u64, stamina: &mut f32, rng: &mut impl Rng) -> Option<WeaponOutput> {
        match self.can_shoot(now_ms, *stamina) {
            Readiness::Ready => {}
            Readiness::Empty => {
                self.trigger_held = false;
                return Some(WeaponOutput::EmptyClick);
            }
            _ => return None,
        }

        match (self.stats.fire_mode, self.stats.melee) {
            (FireMode::Melee, Some(melee)) => {
                *stamina -= melee.stamina_cost;
                self.last_shot_ms = Some(now_ms);
                self.phase = WeaponPhase::Firing;
                self.swing = Some(Swing {
                    started_ms: now_ms,
                    variant: rng.random_range(0..MELEE_SWING_VARIANTS),
                    hit_done: false,
                });
                None
            }
            (FireMode::Burst, _) => {
                self.burst_remaining = self.stats.burst_size;
                Some(self.fire_round(now_ms, rng))
            }
            _ => Some(self.fire_round(now_ms, rng)),
        }
    }

    // The round leaves the magazine and the shot is stamped before anything is spawned.
    fn fire_round(&mut self, now_ms: u64, rng: &mut impl Rng) -> WeaponOutput {
        self.magazine = self.magazine.saturating_sub(1);
        self.last_shot_ms = Some(now_ms);

        match self.stats.fire_mode {
            FireMode::Burst => {
                self.burst_remaining = self.burst_remaining.saturating_sub(1);
                if self.burst_remaining == 0 || self.magazine == 0 {
                    self.burst_remaining = 0;
                    self.last_burst_end_ms = Some(now_ms);
                    self.phase = WeaponPhase::Idle;
                } else {
                    self.phase = WeaponPhase::Firing;
                }
            }
            FireMode::Pump if self.magazine > 0 => {
                self.phase = WeaponPhase::Pumping;
                self.pump_start_ms = now_ms;
            }
            FireMode::FullAuto if self.trigger_held => self.phase = WeaponPhase::Firing,
            _ => self.phase = WeaponPhase::Idle,
        }

        WeaponOutput::Volley(Volley {
            kind: self.stats.kind,
            bullet_kind: self.stats.bullet_kind,
            damage: self.stats.damage,
            speed: self.stats.bullet_speed,
            angle_offsets: self.pellet_offsets(rng),
        })
    }

    fn pellet_offsets(&self, rng: &mut impl Rng) -> Vec<f32> {
        let pellets = self.stats.pellets.max(1);
        let spread = self.stats.spread;
        if pellets == 1 || spread <= 0.0 {
            return vec![0.0; pellets as usize];
        }

        let step = 2.0 * spread / (pellets - 1) as f32;
        let jitter = step * 0.25;
        (0..pellets)
            .map(|i| -spread + step * i as f32 + rng.random_range(-jitter..=jitter))
            .collect()
    }

    // ========================================================================
    // Reloading
    // ========================================================================

    pub fn start_reload(&mut self, now_ms: u64, backpack: &mut Backpack) -> bool {
        if !matches!(self.phase, WeaponPhase::Idle | WeaponPhase::Firing) || self.in_burst() {
            return false;
        }
        let Some(ammo) = self.stats.ammo else {
            return false;
        };
        if self.magazine >= self.stats.magazine_size {
            return false;
        }

        match self.stats.reload_type {
            ReloadType::None => false,
            ReloadType::Magazine => {
                // Ammo moves from the backpack at reload start.
                let taken = backpack.take(ammo, self.stats.magazine_size - self.magazine);
                if taken == 0 {
                    return false;
                }
                self.magazine += taken;
                self.begin_reload(now_ms);
                true
            }
            ReloadType::SingleBullet => {
                if backpack.reserve(ammo) == 0 {
                    return false;
                }
                self.begin_reload(now_ms);
                true
            }
        }
    }

    fn begin_reload(&mut self, now_ms: u64) {
        self.phase = WeaponPhase::Reloading;
        self.reload_start_ms = now_ms;
        self.trigger_held = false;
    }

    fn advance_reload(&mut self, now_ms: u64, backpack: &mut Backpack) {
        if now_ms.saturating_sub(self.reload_start_ms) < self.stats.reload_duration_ms {
            return;
        }
        match (self.stats.reload_type, self.stats.ammo) {
            (ReloadType::SingleBullet, Some(ammo)) => {
                self.magazine += backpack.take(ammo, 1);
                if self.magazine >= self.stats.magazine_size || backpack.reserve(ammo) == 0 {
                    self.phase = WeaponPhase::Pumping;
                    self.pump_start_ms = now_ms;
                } else {
                    self.reload_start_ms = now_ms;
                }
            }
            _ => self.phase = WeaponPhase::Idle,
        }
    }

    // ========================================================================
    // Per-Tick Advance
    // ========================================================================

    pub fn tick(
        &mut self,
        now_ms: u64,
        backpack: &mut Backpack,
        stamina: &mut f32,
        rng: &mut impl Rng,
    ) -> Option<WeaponOutput> {
        match self.phase {
            WeaponPhase::Switching => {
                if now_ms.saturating_sub(self.switch_start_ms) < WEAPON_SWITCH_MS {
                    return None;
                }
                self.phase = WeaponPhase::Idle;
            }
            WeaponPhase::Reloading => {
                self.advance_reload(now_ms, backpack);
                return None;
            }
            WeaponPhase::Pumping => {
                if now_ms.saturating_sub(self.pump_start_ms) < self.stats.pump_duration_ms {
                    return None;
                }
                self.phase = WeaponPhase::Idle;
            }
            WeaponPhase::Idle | WeaponPhase::Firing => {}
        }

        if let (Some(swing), Some(melee)) = (self.swing.as_mut(), self.stats.melee) {
            let elapsed = now_ms.saturating_sub(swing.started_ms);
            let mut output = None;
            if !swing.hit_done && elapsed >= melee.hit_delay_ms {
                swing.hit_done = true;
                output = Some(WeaponOutput::Strike(MeleeStrike {
                    variant: swing.variant,
                    damage: self.stats.damage,
                    reach_w: melee.reach_w,
                    reach_h: melee.reach_h,
                    knockback: melee.knockback,
                }));
            }
            if elapsed >= melee.swing_ms {
                self.swing = None;
                self.phase = WeaponPhase::Idle;
            }
            return output;
        }

        if self.in_burst() {
            let since = self.last_shot_ms.map_or(u64::MAX, |t| now_ms.saturating_sub(t));
            if since >= self.burst_cooldown_ms() {
                return Some(self.fire_round(now_ms, rng));
            }
            return None;
        }

        if self.stats.fire_mode == FireMode::FullAuto && self.trigger_held {
            return self.try_fire(now_ms, stamina, rng);
        }
        None
    }
}

fn cooldown_ms(rounds_per_minute: f32) -> u64 {
    if rounds_per_minute <= 0.0 {
        return 0;
    }
    (FIRE_RATE_RATIO / rounds_per_minute).round() as u64
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::weapons::catalog::AmmoType;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn ready(kind: WeaponKind) -> Weapon {
        let mut weapon = Weapon::new(kind);
        weapon.phase = WeaponPhase::Idle;
        weapon
    }

    #[test]
    fn semi_auto_fires_once_per_cooldown() {
        let mut rng = rng();
        let mut stamina = 100.0;
        let mut pistol = ready(WeaponKind::Pistol);
        let cooldown = cooldown_ms(pistol.stats.fire_rate);

        let first = pistol.pull_trigger(1000, &mut stamina, &mut rng);
        assert!(matches!(first, Some(WeaponOutput::Volley(_))));
        assert_eq!(pistol.magazine, 11);
        assert_eq!(pistol.last_shot_ms, Some(1000));

        pistol.release_trigger();
        assert_eq!(pistol.pull_trigger(1000 + cooldown - 1, &mut stamina, &mut rng), None);
        pistol.release_trigger();
        assert!(pistol.pull_trigger(1000 + cooldown, &mut stamina, &mut rng).is_some());
        assert_eq!(pistol.magazine, 10);
    }

    #[test]
    fn empty_magazine_clicks_and_cancels_hold() {
        let mut rng = rng();
        let mut stamina = 100.0;
        let mut pistol = ready(WeaponKind::Pistol);
        pistol.magazine = 0;

        assert_eq!(pistol.pull_trigger(0, &mut stamina, &mut rng), Some(WeaponOutput::EmptyClick));
        assert!(!pistol.trigger_held);
    }

    #[test]
    fn magazine_reload_moves_ammo_at_start() {
        let mut rng = rng();
        let mut stamina = 100.0;
        let mut backpack = Backpack::default().with(AmmoType::Light, 5);
        let mut pistol = ready(WeaponKind::Pistol);
        pistol.magazine = 4;

        assert!(pistol.start_reload(0, &mut backpack));
        assert_eq!(pistol.magazine, 9);
        assert_eq!(backpack.reserve(AmmoType::Light), 0);
        assert_eq!(pistol.can_shoot(100, stamina), Readiness::Reloading);

        pistol.tick(pistol.stats.reload_duration_ms, &mut backpack, &mut stamina, &mut rng);
        assert_eq!(pistol.phase, WeaponPhase::Idle);
        assert_eq!(pistol.can_shoot(pistol.stats.reload_duration_ms, stamina), Readiness::Ready);

        // Nothing left to load.
        pistol.magazine = 0;
        assert!(!pistol.start_reload(5000, &mut backpack));
    }

    #[test]
    fn burst_cooldown_runs_from_burst_completion() {
        let mut rng = rng();
        let mut stamina = 100.0;
        let mut backpack = Backpack::default();
        let mut rifle = ready(WeaponKind::BurstRifle);
        let inner = cooldown_ms(rifle.stats.burst_fire_rate);
        let outer = cooldown_ms(rifle.stats.fire_rate);

        assert!(rifle.pull_trigger(0, &mut stamina, &mut rng).is_some());
        rifle.release_trigger();
        assert_eq!(rifle.tick(inner - 1, &mut backpack, &mut stamina, &mut rng), None);
        assert!(rifle.tick(inner, &mut backpack, &mut stamina, &mut rng).is_some());
        assert!(rifle.tick(2 * inner, &mut backpack, &mut stamina, &mut rng).is_some());
        assert_eq!(rifle.magazine, 21);
        assert_eq!(rifle.last_burst_end_ms, Some(2 * inner));

        let end = 2 * inner;
        assert_eq!(rifle.can_shoot(outer, stamina), Readiness::Cooldown);
        assert_eq!(rifle.can_shoot(end + outer - 1, stamina), Readiness::Cooldown);
        assert_eq!(rifle.can_shoot(end + outer, stamina), Readiness::Ready);
    }

    #[test]
    fn full_auto_keeps_firing_while_held() {
        let mut rng = rng();
        let mut stamina = 100.0;
        let mut backpack = Backpack::default();
        let mut rifle = ready(WeaponKind::AssaultRifle);
        let cooldown = cooldown_ms(rifle.stats.fire_rate);

        assert!(rifle.pull_trigger(0, &mut stamina, &mut rng).is_some());
        assert_eq!(rifle.tick(cooldown / 2, &mut backpack, &mut stamina, &mut rng), None);
        assert!(rifle.tick(cooldown, &mut backpack, &mut stamina, &mut rng).is_some());
        rifle.release_trigger();
        assert_eq!(rifle.tick(3 * cooldown, &mut backpack, &mut stamina, &mut rng), None);
        assert_eq!(rifle.magazine, 28);
    }

    #[test]
    fn shotgun_pumps_after_each_shot_and_loads_shells_one_at_a_time() {
        let mut rng = rng();
        let mut stamina = 100.0;
        let mut backpack = Backpack::default().with(AmmoType::Shell, 1);
        let mut shotgun = ready(WeaponKind::Shotgun);

        let Some(WeaponOutput::Volley(volley)) = shotgun.pull_trigger(0, &mut stamina, &mut rng) else {
            panic!("expected a volley");
        };
        assert_eq!(volley.angle_offsets.len(), 7);
        assert_eq!(shotgun.phase, WeaponPhase::Pumping);
        assert_eq!(shotgun.can_shoot(100, stamina), Readiness::Pumping);

        let pump = shotgun.stats.pump_duration_ms;
        shotgun.tick(pump, &mut backpack, &mut stamina, &mut rng);
        assert_eq!(shotgun.phase, WeaponPhase::Idle);

        assert!(shotgun.start_reload(pump, &mut backpack));
        let per_shell = shotgun.stats.reload_duration_ms;
        shotgun.tick(pump + per_shell, &mut backpack, &mut stamina, &mut rng);
        assert_eq!(shotgun.magazine, 6);
        // Reserve exhausted, so the reload ends in a pump.
        assert_eq!(shotgun.phase, WeaponPhase::Pumping);
    }

    #[test]
    fn knife_needs_stamina_and_strikes_once_after_delay() {
        let mut rng = rng();
        let mut backpack = Backpack::default();
        let mut knife = ready(WeaponKind::Knife);
        let Some(melee) = knife.stats.melee else {
            panic!("knife has melee stats");
        };

        let mut stamina = melee.stamina_cost - 1.0;
        assert_eq!(knife.can_shoot(0, stamina), Readiness::Exhausted);

        stamina = 100.0;
        assert_eq!(knife.pull_trigger(0, &mut stamina, &mut rng), None);
        assert_eq!(stamina, 100.0 - melee.stamina_cost);
        assert!(knife.swing.is_some_and(|s| s.variant < MELEE_SWING_VARIANTS));

        assert_eq!(knife.tick(melee.hit_delay_ms - 1, &mut backpack, &mut stamina, &mut rng), None);
        assert!(matches!(
            knife.tick(melee.hit_delay_ms, &mut backpack, &mut stamina, &mut rng),
            Some(WeaponOutput::Strike(_))
        ));
        assert_eq!(knife.tick(melee.hit_delay_ms + 10, &mut backpack, &mut stamina, &mut rng), None);
        knife.tick(melee.swing_ms, &mut backpack, &mut stamina, &mut rng);
        assert!(knife.swing.is_none());
    }

    #[test]
    fn switching_blocks_shooting() {
        let mut stamina = 100.0;
        let mut backpack = Backpack::default();
        let mut pistol = Weapon::new(WeaponKind::Pistol);
        pistol.equip(0);

        assert_eq!(pistol.can_shoot(WEAPON_SWITCH_MS - 1, stamina), Readiness::Switching);
        pistol.tick(WEAPON_SWITCH_MS, &mut backpack, &mut stamina, &mut rng());
        assert_eq!(pistol.can_shoot(WEAPON_SWITCH_MS, stamina), Readiness::Ready);
    }
}
