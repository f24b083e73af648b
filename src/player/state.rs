//! Player components and resources.
//!
//! All ECS components and Bevy resources that describe player state live here.
//! Systems that mutate this state are in the sibling modules:
//! - [`super::control`]: input + movement
//! - [`super::combat`]: firing, charged shot, incoming damage
//! - [`super::drone`]: the drone companion

use crate::bullet::BulletMods;
use crate::constants::{
    MAX_WEAPON_MODS, PLAYER_ATTACK_PER_LEVEL, PLAYER_BASE_ATTACK, PLAYER_BASE_SPEED,
    PLAYER_DEFENSE_PER_LEVEL, PLAYER_FIRE_INTERVAL, PLAYER_FIRE_INTERVAL_PER_LEVEL,
    PLAYER_MAX_LIVES, PLAYER_SPEED_PER_LEVEL, SLOW_MO_FACTOR, UPGRADE_COSTS_ATTACK,
    UPGRADE_COSTS_DEFENSE, UPGRADE_COSTS_FIRE_RATE, UPGRADE_COSTS_SPEED, UPGRADE_MAX_LEVEL,
};
use bevy::prelude::*;
use std::collections::VecDeque;

// ── Components ─────────────────────────────────────────────────────────────────

/// Marker component for the player ship entity.
#[derive(Component)]
pub struct Player;

// ── Upgradeable stats ──────────────────────────────────────────────────────────

/// One of the four shop-upgradeable ship stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Attack,
    Defense,
    Speed,
    FireRate,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Attack, Stat::Defense, Stat::Speed, Stat::FireRate];

    pub fn label(self) -> &'static str {
        match self {
            Stat::Attack => "ATK",
            Stat::Defense => "DEF",
            Stat::Speed => "SPD",
            Stat::FireRate => "FIRE RATE",
        }
    }

    /// Monotonic cost table; entry `n` buys level `n + 1`.
    pub fn costs(self) -> &'static [u32; 5] {
        match self {
            Stat::Attack => &UPGRADE_COSTS_ATTACK,
            Stat::Defense => &UPGRADE_COSTS_DEFENSE,
            Stat::Speed => &UPGRADE_COSTS_SPEED,
            Stat::FireRate => &UPGRADE_COSTS_FIRE_RATE,
        }
    }
}

/// Upgrade levels (0–5) bought in the shop and the stats derived from them.
///
/// | Stat      | Formula                  |
/// |-----------|--------------------------|
/// | attack    | `10 + 5·lvl`             |
/// | defense   | `10·lvl` (% reduction)   |
/// | speed     | `360 + 60·lvl` px/s      |
/// | interval  | `0.2 − 0.03·lvl` s       |
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub attack_level: u8,
    pub defense_level: u8,
    pub speed_level: u8,
    pub fire_rate_level: u8,
}

impl PlayerStats {
    pub const MAX: u8 = UPGRADE_MAX_LEVEL;

    pub fn level(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Attack => self.attack_level,
            Stat::Defense => self.defense_level,
            Stat::Speed => self.speed_level,
            Stat::FireRate => self.fire_rate_level,
        }
    }

    fn level_mut(&mut self, stat: Stat) -> &mut u8 {
        match stat {
            Stat::Attack => &mut self.attack_level,
            Stat::Defense => &mut self.defense_level,
            Stat::Speed => &mut self.speed_level,
            Stat::FireRate => &mut self.fire_rate_level,
        }
    }

    #[inline]
    pub fn attack(&self) -> f32 {
        PLAYER_BASE_ATTACK + PLAYER_ATTACK_PER_LEVEL * self.attack_level as f32
    }

    /// Damage reduction percentage.
    #[inline]
    pub fn defense(&self) -> f32 {
        PLAYER_DEFENSE_PER_LEVEL * self.defense_level as f32
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        PLAYER_BASE_SPEED + PLAYER_SPEED_PER_LEVEL * self.speed_level as f32
    }

    /// Seconds between volleys, before Rapid Fire.
    #[inline]
    pub fn fire_interval(&self) -> f32 {
        PLAYER_FIRE_INTERVAL - PLAYER_FIRE_INTERVAL_PER_LEVEL * self.fire_rate_level as f32
    }

    #[inline]
    pub fn is_maxed(&self, stat: Stat) -> bool {
        self.level(stat) >= Self::MAX
    }

    /// Coin cost of the next level of `stat`.
    /// Returns `None` when already at max level.
    pub fn cost_for_next_level(&self, stat: Stat) -> Option<u32> {
        stat.costs().get(self.level(stat) as usize).copied()
    }

    /// Returns `true` when `coins` cover the next level of `stat`.
    #[inline]
    pub fn can_afford_next(&self, stat: Stat, coins: u32) -> bool {
        self.cost_for_next_level(stat)
            .is_some_and(|cost| coins >= cost)
    }

    /// Spend coins and increment the level.  Returns the amount spent, or
    /// `None` (leaving everything untouched) if maxed-out or unaffordable.
    pub fn try_upgrade(&mut self, stat: Stat, coins: &mut u32) -> Option<u32> {
        let cost = self.cost_for_next_level(stat)?;
        if *coins < cost {
            return None;
        }
        *coins -= cost;
        *self.level_mut(stat) += 1;
        Some(cost)
    }
}

// ── Lives / score ──────────────────────────────────────────────────────────────

/// Lives left and the post-hit invincibility window.
#[derive(Resource, Debug, Clone)]
pub struct PlayerLives {
    pub remaining: u32,
    /// Cap for extra-life pickups.
    pub max: u32,
    /// Seconds of invincibility remaining; decremented each frame.
    pub inv_timer: f32,
}

impl Default for PlayerLives {
    fn default() -> Self {
        Self {
            remaining: PLAYER_MAX_LIVES,
            max: PLAYER_MAX_LIVES,
            inv_timer: 0.0,
        }
    }
}

impl PlayerLives {
    pub fn with_max(max: u32) -> Self {
        Self {
            remaining: max,
            max,
            inv_timer: 0.0,
        }
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.inv_timer > 0.0
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.remaining == 0
    }
}

/// Score and coin purse.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerScore {
    pub points: u32,
    pub coins: u32,
}

// ── Weapon modifiers ───────────────────────────────────────────────────────────

/// Permanent-until-death firing upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponMod {
    SpreadShot,
    Piercing,
    Homing,
    Ricochet,
    Drone,
    RearGun,
}

impl WeaponMod {
    pub fn label(self) -> &'static str {
        match self {
            WeaponMod::SpreadShot => "Spread Shot",
            WeaponMod::Piercing => "Piercing",
            WeaponMod::Homing => "Homing",
            WeaponMod::Ricochet => "Ricochet",
            WeaponMod::Drone => "Drone",
            WeaponMod::RearGun => "Rear Gun",
        }
    }
}

/// Held weapon modifiers, oldest first.  Never holds more than
/// [`MAX_WEAPON_MODS`] entries.
#[derive(Resource, Debug, Clone, Default)]
pub struct WeaponLoadout {
    mods: VecDeque<WeaponMod>,
}

impl WeaponLoadout {
    /// Add a modifier, evicting the oldest one on overflow.  Returns the
    /// evicted modifier, if any.
    ///
    /// Picking up a modifier that is already held refreshes it to the newest
    /// slot without evicting anything.
    pub fn add(&mut self, m: WeaponMod) -> Option<WeaponMod> {
        if let Some(idx) = self.mods.iter().position(|held| *held == m) {
            self.mods.remove(idx);
            self.mods.push_back(m);
            return None;
        }
        let evicted = if self.mods.len() >= MAX_WEAPON_MODS {
            self.mods.pop_front()
        } else {
            None
        };
        self.mods.push_back(m);
        evicted
    }

    #[inline]
    pub fn has(&self, m: WeaponMod) -> bool {
        self.mods.contains(&m)
    }

    pub fn clear(&mut self) {
        self.mods.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mods.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = WeaponMod> + '_ {
        self.mods.iter().copied()
    }

    /// Bullet flags implied by the held modifiers.
    pub fn bullet_mods(&self) -> BulletMods {
        BulletMods {
            piercing: self.has(WeaponMod::Piercing),
            homing: self.has(WeaponMod::Homing),
            ricochet: self.has(WeaponMod::Ricochet),
            plasma: false,
        }
    }
}

// ── Timed buffs ────────────────────────────────────────────────────────────────

/// Temporary effects.  Timers count down in seconds; the shield counts hits.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveBuffs {
    pub rapid_fire_secs: f32,
    pub magnet_secs: f32,
    pub slow_mo_secs: f32,
    pub shield_hits: u32,
}

impl ActiveBuffs {
    pub fn tick(&mut self, dt: f32) {
        self.rapid_fire_secs = (self.rapid_fire_secs - dt).max(0.0);
        self.magnet_secs = (self.magnet_secs - dt).max(0.0);
        self.slow_mo_secs = (self.slow_mo_secs - dt).max(0.0);
    }

    #[inline]
    pub fn rapid_fire(&self) -> bool {
        self.rapid_fire_secs > 0.0
    }

    #[inline]
    pub fn magnet(&self) -> bool {
        self.magnet_secs > 0.0
    }

    #[inline]
    pub fn slow_mo(&self) -> bool {
        self.slow_mo_secs > 0.0
    }

    /// Factor applied to enemy, boss and enemy-bullet time.
    #[inline]
    pub fn hostile_time_scale(&self) -> f32 {
        if self.slow_mo() {
            SLOW_MO_FACTOR
        } else {
            1.0
        }
    }

    /// Spend one shield hit if a shield is up.
    pub fn absorb_hit(&mut self) -> bool {
        if self.shield_hits > 0 {
            self.shield_hits -= 1;
            true
        } else {
            false
        }
    }

    /// Names of the running buffs, for the HUD.
    pub fn labels(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.rapid_fire() {
            out.push(format!("RAPID {:.0}s", self.rapid_fire_secs.ceil()));
        }
        if self.shield_hits > 0 {
            out.push(format!("SHIELD x{}", self.shield_hits));
        }
        if self.magnet() {
            out.push(format!("MAGNET {:.0}s", self.magnet_secs.ceil()));
        }
        if self.slow_mo() {
            out.push(format!("SLOW {:.0}s", self.slow_mo_secs.ceil()));
        }
        out
    }
}

// ── Firing state ───────────────────────────────────────────────────────────────

/// Volley cooldown and charged-shot meter.
#[derive(Resource, Debug, Clone, Default)]
pub struct FireControl {
    /// Remaining cooldown in seconds; decremented each frame, clamped to 0.
    pub cooldown: f32,
    /// Accumulated charge in seconds of fire cadence.
    pub charge: f32,
}

// ── Input Abstraction ──────────────────────────────────────────────────────────

/// Aggregated player intent for the current frame, derived from all input sources.
///
/// Input systems write to this resource each frame after it is cleared.
/// Gameplay and mode systems only ever read it, so tests can populate it
/// directly to drive the ship without a real input device.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq)]
pub struct PlayerIntent {
    /// Desired movement direction in playfield space (y down); not normalised.
    pub movement: Vec2,
    pub firing: bool,
    /// Confirm / continue (mode screens).
    pub confirm: bool,
    /// Shop purchase request for this frame.
    pub purchase: Option<Stat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_costs_follow_table_and_stop_at_max() {
        let mut stats = PlayerStats::default();
        let mut coins = 10_000;
        let mut spent = Vec::new();
        while let Some(cost) = stats.try_upgrade(Stat::Speed, &mut coins) {
            spent.push(cost);
        }
        assert_eq!(spent, vec![30, 60, 120, 240, 480]);
        assert_eq!(stats.speed_level, PlayerStats::MAX);
        assert!(stats.is_maxed(Stat::Speed));
        assert_eq!(coins, 10_000 - 930);
        assert!(stats.cost_for_next_level(Stat::Speed).is_none());
    }

    #[test]
    fn unaffordable_upgrade_is_a_no_op() {
        let mut stats = PlayerStats::default();
        let mut coins = 49;
        assert!(!stats.can_afford_next(Stat::Attack, coins));
        assert_eq!(stats.try_upgrade(Stat::Attack, &mut coins), None);
        assert_eq!(coins, 49);
        assert_eq!(stats, PlayerStats::default());
    }

    #[test]
    fn derived_stats_scale_with_levels() {
        let stats = PlayerStats {
            attack_level: 2,
            defense_level: 3,
            speed_level: 1,
            fire_rate_level: 5,
        };
        assert_eq!(stats.attack(), 20.0);
        assert_eq!(stats.defense(), 30.0);
        assert_eq!(stats.speed(), 420.0);
        assert!((stats.fire_interval() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn loadout_is_fifo_capped_at_two() {
        let mut loadout = WeaponLoadout::default();
        assert_eq!(loadout.add(WeaponMod::Homing), None);
        assert_eq!(loadout.add(WeaponMod::SpreadShot), None);
        assert_eq!(loadout.add(WeaponMod::RearGun), Some(WeaponMod::Homing));
        assert_eq!(loadout.len(), 2);
        assert!(!loadout.has(WeaponMod::Homing));
        assert_eq!(
            loadout.iter().collect::<Vec<_>>(),
            vec![WeaponMod::SpreadShot, WeaponMod::RearGun]
        );
    }

    #[test]
    fn repeated_pickup_refreshes_instead_of_evicting() {
        let mut loadout = WeaponLoadout::default();
        loadout.add(WeaponMod::Piercing);
        loadout.add(WeaponMod::Ricochet);
        assert_eq!(loadout.add(WeaponMod::Piercing), None);
        assert_eq!(
            loadout.iter().collect::<Vec<_>>(),
            vec![WeaponMod::Ricochet, WeaponMod::Piercing]
        );
        // Piercing is now newest, so Ricochet goes first.
        assert_eq!(loadout.add(WeaponMod::Drone), Some(WeaponMod::Ricochet));
    }

    #[test]
    fn buffs_expire_and_shield_counts_hits() {
        let mut buffs = ActiveBuffs {
            slow_mo_secs: 1.0,
            shield_hits: 1,
            ..Default::default()
        };
        assert_eq!(buffs.hostile_time_scale(), SLOW_MO_FACTOR);
        buffs.tick(1.5);
        assert!(!buffs.slow_mo());
        assert_eq!(buffs.hostile_time_scale(), 1.0);

        assert!(buffs.absorb_hit());
        assert!(!buffs.absorb_hit());
    }
}
