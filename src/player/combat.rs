//! Player firing, the charged plasma shot, timed buffs and incoming damage.
//!
//! ## Volley layout
//!
//! | Source     | Bullets                                      |
//! |------------|----------------------------------------------|
//! | base       | one shot straight up from the nose           |
//! | SpreadShot | two more at ±0.2 rad                         |
//! | RearGun    | one shot straight down from the tail         |
//! | charge     | one plasma bolt once the meter reaches 2 s   |
//!
//! Piercing, Homing and Ricochet do not add bullets; they are flags carried
//! by every bullet of the volley.
//!
//! ## Damage resolution
//!
//! [`apply_player_damage`] is the single place where the ship loses lives.
//! It is a plain function over the player resources so the collision pass can
//! call it for bullets and for rams, and tests can call it directly.

use super::state::{ActiveBuffs, FireControl, Player, PlayerIntent, PlayerLives, PlayerStats, WeaponLoadout, WeaponMod};
use crate::audio::AudioCue;
use crate::bullet::{spawn_bullet, Bullet, BulletMods};
use crate::constants::{
    PLASMA_ATTACK_MULTIPLIER, PLASMA_CHARGE_THRESHOLD, PLAYER_FIRE_INTERVAL, SPREAD_SHOT_ANGLE,
};
use crate::geometry::Body;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

// ── Firing ────────────────────────────────────────────────────────────────────

/// Bullets (and their spawn centres) for one volley from a ship at `ship`.
///
/// `plasma` appends the charged bolt.  The caller owns cadence and charge;
/// this function only lays out the shots.
pub fn plan_volley(
    ship: &Body,
    stats: &PlayerStats,
    loadout: &WeaponLoadout,
    plasma: bool,
) -> Vec<(Bullet, Vec2)> {
    let nose = Vec2::new(ship.center().x, ship.pos.y);
    let tail = Vec2::new(ship.center().x, ship.pos.y + ship.size.y);
    let attack = stats.attack();
    let mods = loadout.bullet_mods();
    let up = -FRAC_PI_2;

    let mut volley = vec![(Bullet::player(up, attack, mods), nose)];

    if loadout.has(WeaponMod::SpreadShot) {
        volley.push((Bullet::player(up - SPREAD_SHOT_ANGLE, attack, mods), nose));
        volley.push((Bullet::player(up + SPREAD_SHOT_ANGLE, attack, mods), nose));
    }

    if loadout.has(WeaponMod::RearGun) {
        volley.push((Bullet::player(FRAC_PI_2, attack, mods), tail));
    }

    if plasma {
        let plasma_mods = BulletMods {
            plasma: true,
            piercing: true,
            ..BulletMods::default()
        };
        volley.push((
            Bullet::player(up, attack * PLASMA_ATTACK_MULTIPLIER, plasma_mods),
            nose,
        ));
    }

    volley
}

/// Fire a volley whenever the fire button is held and the cooldown allows.
///
/// Every volley adds the base fire interval to the charge meter; reaching
/// [`PLASMA_CHARGE_THRESHOLD`] appends a plasma bolt and empties the meter.
/// The meter drains at real-time rate while the button is released.
pub fn player_fire_system(
    mut commands: Commands,
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    stats: Res<PlayerStats>,
    loadout: Res<WeaponLoadout>,
    buffs: Res<ActiveBuffs>,
    mut fire: ResMut<FireControl>,
    mut audio: MessageWriter<AudioCue>,
    q_player: Query<&Body, With<Player>>,
) {
    let dt = time.delta_secs();
    fire.cooldown = (fire.cooldown - dt).max(0.0);

    if !intent.firing {
        fire.charge = (fire.charge - dt).max(0.0);
        return;
    }
    if fire.cooldown > 0.0 {
        return;
    }
    let Ok(ship) = q_player.single() else {
        return;
    };

    let interval = if buffs.rapid_fire() {
        stats.fire_interval() / 2.0
    } else {
        stats.fire_interval()
    };
    fire.cooldown = interval;

    fire.charge += PLAYER_FIRE_INTERVAL;
    let plasma = fire.charge >= PLASMA_CHARGE_THRESHOLD;
    if plasma {
        fire.charge = 0.0;
        audio.write(AudioCue::Explosion);
    }

    for (bullet, origin) in plan_volley(ship, &stats, &loadout, plasma) {
        spawn_bullet(&mut commands, bullet, origin);
    }
    audio.write(AudioCue::Laser);
}

// ── Timers ────────────────────────────────────────────────────────────────────

/// Count down buff timers and the post-hit invincibility window.
pub fn player_timers_system(
    time: Res<Time>,
    mut buffs: ResMut<ActiveBuffs>,
    mut lives: ResMut<PlayerLives>,
) {
    let dt = time.delta_secs();
    buffs.tick(dt);
    lives.inv_timer = (lives.inv_timer - dt).max(0.0);
}

// ── Incoming damage ───────────────────────────────────────────────────────────

/// Inputs to [`apply_player_damage`] that do not change during a frame.
#[derive(Debug, Clone, Copy)]
pub struct DamageRules {
    /// Difficulty damage multiplier.
    pub damage_mult: f32,
    /// Defense stat (percent reduction).
    pub defense: f32,
    /// Invincibility granted after a life is lost (s).
    pub invincibility_secs: f32,
}

/// What a hit on the ship did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// The ship was invincible.
    Ignored,
    /// A shield hit was spent.
    Shielded,
    /// One life was lost.  `shown` is the damage number displayed to the
    /// player; `game_over` is set when that was the last life.
    LifeLost { shown: u32, game_over: bool },
}

impl DamageOutcome {
    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self, DamageOutcome::LifeLost { game_over: true, .. })
    }
}

/// Apply `raw` damage to the player.
///
/// Any unshielded hit costs exactly one life regardless of its size; the
/// damage figure only feeds the floating `−N` text.  Losing the last life
/// empties the weapon loadout.
pub fn apply_player_damage(
    raw: f32,
    rules: &DamageRules,
    lives: &mut PlayerLives,
    buffs: &mut ActiveBuffs,
    loadout: &mut WeaponLoadout,
) -> DamageOutcome {
    if lives.is_invincible() {
        return DamageOutcome::Ignored;
    }
    if buffs.absorb_hit() {
        return DamageOutcome::Shielded;
    }

    let actual = (raw * rules.damage_mult * (1.0 - rules.defense / 100.0)).max(1.0);
    lives.remaining = lives.remaining.saturating_sub(1);
    lives.inv_timer = rules.invincibility_secs;

    let game_over = lives.is_dead();
    if game_over {
        loadout.clear();
    }
    DamageOutcome::LifeLost {
        shown: actual.round() as u32,
        game_over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PLAYER_HEIGHT, PLAYER_WIDTH};
    use std::time::Duration;

    fn rules() -> DamageRules {
        DamageRules {
            damage_mult: 1.0,
            defense: 0.0,
            invincibility_secs: 2.0,
        }
    }

    fn ship() -> Body {
        Body::new(380.0, 500.0, PLAYER_WIDTH, PLAYER_HEIGHT)
    }

    #[test]
    fn unshielded_hit_costs_one_life_and_grants_invincibility() {
        let mut lives = PlayerLives::default();
        let mut buffs = ActiveBuffs::default();
        let mut loadout = WeaponLoadout::default();

        let outcome = apply_player_damage(20.0, &rules(), &mut lives, &mut buffs, &mut loadout);
        assert_eq!(
            outcome,
            DamageOutcome::LifeLost {
                shown: 20,
                game_over: false
            }
        );
        assert_eq!(lives.remaining, 2);
        assert!(lives.is_invincible());

        let again = apply_player_damage(20.0, &rules(), &mut lives, &mut buffs, &mut loadout);
        assert_eq!(again, DamageOutcome::Ignored);
        assert_eq!(lives.remaining, 2);
    }

    #[test]
    fn shield_absorbs_before_lives() {
        let mut lives = PlayerLives::default();
        let mut buffs = ActiveBuffs {
            shield_hits: 1,
            ..Default::default()
        };
        let mut loadout = WeaponLoadout::default();
        let outcome = apply_player_damage(10.0, &rules(), &mut lives, &mut buffs, &mut loadout);
        assert_eq!(outcome, DamageOutcome::Shielded);
        assert_eq!(lives.remaining, 3);
        assert!(!lives.is_invincible());
    }

    #[test]
    fn defense_and_difficulty_shape_displayed_damage() {
        let mut lives = PlayerLives::default();
        let mut buffs = ActiveBuffs::default();
        let mut loadout = WeaponLoadout::default();
        let r = DamageRules {
            damage_mult: 0.5,
            defense: 50.0,
            invincibility_secs: 2.0,
        };
        match apply_player_damage(20.0, &r, &mut lives, &mut buffs, &mut loadout) {
            DamageOutcome::LifeLost { shown, .. } => assert_eq!(shown, 5),
            other => panic!("expected a lost life, got {other:?}"),
        }

        // Tiny hits still show at least 1.
        lives.inv_timer = 0.0;
        match apply_player_damage(0.1, &r, &mut lives, &mut buffs, &mut loadout) {
            DamageOutcome::LifeLost { shown, .. } => assert_eq!(shown, 1),
            other => panic!("expected a lost life, got {other:?}"),
        }
    }

    #[test]
    fn last_life_clears_weapon_mods() {
        let mut lives = PlayerLives::with_max(1);
        let mut buffs = ActiveBuffs::default();
        let mut loadout = WeaponLoadout::default();
        loadout.add(WeaponMod::Homing);
        loadout.add(WeaponMod::Drone);

        let outcome = apply_player_damage(10.0, &rules(), &mut lives, &mut buffs, &mut loadout);
        assert!(outcome.is_game_over());
        assert!(loadout.is_empty());
    }

    #[test]
    fn volley_layout_follows_mods() {
        let stats = PlayerStats::default();
        let mut loadout = WeaponLoadout::default();
        assert_eq!(plan_volley(&ship(), &stats, &loadout, false).len(), 1);

        loadout.add(WeaponMod::SpreadShot);
        loadout.add(WeaponMod::RearGun);
        let volley = plan_volley(&ship(), &stats, &loadout, false);
        assert_eq!(volley.len(), 4);
        let rear = volley
            .iter()
            .find(|(b, _)| b.angle > 0.0)
            .expect("rear shot");
        assert_eq!(rear.1.y, ship().pos.y + PLAYER_HEIGHT);
    }

    #[test]
    fn plasma_bolt_is_five_times_attack_then_doubled() {
        let stats = PlayerStats::default();
        let loadout = WeaponLoadout::default();
        let volley = plan_volley(&ship(), &stats, &loadout, true);
        let (plasma, _) = volley.last().expect("plasma bolt");
        assert!(plasma.mods.plasma && plasma.mods.piercing);
        assert_eq!(plasma.damage, 10.0 * 5.0 * 2.0);
    }

    #[test]
    fn charge_fills_on_the_tenth_volley_and_drains_when_idle() {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(250));
        world.insert_resource(time);
        world.insert_resource(PlayerIntent {
            firing: true,
            ..Default::default()
        });
        world.insert_resource(PlayerStats::default());
        world.insert_resource(WeaponLoadout::default());
        world.insert_resource(ActiveBuffs::default());
        world.insert_resource(FireControl::default());
        world.init_resource::<Messages<AudioCue>>();
        world.spawn((Player, ship()));

        let mut schedule = Schedule::default();
        schedule.add_systems(player_fire_system);

        for _ in 0..9 {
            schedule.run(&mut world);
        }
        let charge = world.resource::<FireControl>().charge;
        assert!((charge - 1.8).abs() < 1e-4, "charge = {charge}");
        let plasma_count = |world: &mut World| {
            world
                .query::<&Bullet>()
                .iter(world)
                .filter(|b| b.mods.plasma)
                .count()
        };
        assert_eq!(plasma_count(&mut world), 0);

        schedule.run(&mut world);
        assert_eq!(plasma_count(&mut world), 1);
        assert_eq!(world.resource::<FireControl>().charge, 0.0);

        // Release: charge drains instead of building.
        world.resource_mut::<FireControl>().charge = 1.0;
        world.resource_mut::<PlayerIntent>().firing = false;
        schedule.run(&mut world);
        assert!((world.resource::<FireControl>().charge - 0.75).abs() < 1e-4);
    }
}
