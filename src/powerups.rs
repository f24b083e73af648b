//! Power-up pickups: the eleven-kind catalog, the drop roll, falling motion
//! and the effect of collecting one.
//!
//! | Kind        | Effect                                   |
//! |-------------|------------------------------------------|
//! | Rapid Fire  | halves the volley interval for 15 s      |
//! | Extra Life  | +1 life, or bonus score at the cap       |
//! | Shield      | absorbs the next 3 hits                  |
//! | Magnet      | pulls nearby coins for 20 s              |
//! | Slow-Mo     | hostile time at half speed for 10 s      |
//! | weapon mods | held until death; at most two, FIFO      |

use crate::constants::{
    MAGNET_SECS, PLAYFIELD_HEIGHT, POWERUP_FALL_SPEED, POWERUP_SIZE, RAPID_FIRE_SECS,
    SHIELD_HITS, SLOW_MO_SECS,
};
use crate::game::{FrameSet, GameState};
use crate::geometry::Body;
use crate::player::{ActiveBuffs, PlayerLives, PlayerScore, WeaponLoadout, WeaponMod};
use crate::pool::{sweep_inactive, Pooled};
use crate::rng::GameRng;
use bevy::prelude::*;

const POWERUP_EXIT_MARGIN: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    RapidFire,
    Life,
    Shield,
    Magnet,
    SlowMo,
    SpreadShot,
    Piercing,
    Homing,
    Ricochet,
    Drone,
    RearGun,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 11] = [
        PowerUpKind::RapidFire,
        PowerUpKind::Life,
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
        PowerUpKind::SlowMo,
        PowerUpKind::SpreadShot,
        PowerUpKind::Piercing,
        PowerUpKind::Homing,
        PowerUpKind::Ricochet,
        PowerUpKind::Drone,
        PowerUpKind::RearGun,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::Life => "Extra Life",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::Magnet => "Magnet",
            PowerUpKind::SlowMo => "Slow-Mo",
            other => other.weapon_mod().map_or("", WeaponMod::label),
        }
    }

    /// Body colour (sRGB).
    pub fn color(self) -> [f32; 3] {
        match self {
            PowerUpKind::RapidFire => [0.0, 0.75, 1.0],
            PowerUpKind::Life => [1.0, 0.28, 0.34],
            PowerUpKind::Shield => [1.0, 0.84, 0.0],
            PowerUpKind::Magnet => [0.85, 0.44, 0.84],
            PowerUpKind::SlowMo => [0.53, 0.81, 0.92],
            PowerUpKind::SpreadShot => [1.0, 0.27, 0.0],
            PowerUpKind::Piercing => [0.0, 1.0, 0.0],
            PowerUpKind::Homing => [1.0, 0.08, 0.58],
            PowerUpKind::Ricochet => [0.5, 1.0, 0.0],
            PowerUpKind::Drone => [0.12, 0.56, 1.0],
            PowerUpKind::RearGun => [1.0, 0.55, 0.0],
        }
    }

    /// The weapon modifier this pickup grants, if it is one.
    pub fn weapon_mod(self) -> Option<WeaponMod> {
        match self {
            PowerUpKind::SpreadShot => Some(WeaponMod::SpreadShot),
            PowerUpKind::Piercing => Some(WeaponMod::Piercing),
            PowerUpKind::Homing => Some(WeaponMod::Homing),
            PowerUpKind::Ricochet => Some(WeaponMod::Ricochet),
            PowerUpKind::Drone => Some(WeaponMod::Drone),
            PowerUpKind::RearGun => Some(WeaponMod::RearGun),
            _ => None,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub active: bool,
}

impl Pooled for PowerUp {
    fn is_active(&self) -> bool {
        self.active
    }
}

/// What collecting a power-up did, for the pickup label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    Buff(PowerUpKind),
    ExtraLife,
    /// Lives were already full; this much score was awarded instead.
    LifeBonus(u32),
    WeaponMod {
        added: WeaponMod,
        evicted: Option<WeaponMod>,
    },
}

impl PickupOutcome {
    pub fn label(&self) -> String {
        match self {
            PickupOutcome::Buff(kind) => kind.label().to_uppercase(),
            PickupOutcome::ExtraLife => "+1 LIFE".to_string(),
            PickupOutcome::LifeBonus(points) => format!("+{points}"),
            PickupOutcome::WeaponMod { added, .. } => added.label().to_uppercase(),
        }
    }
}

/// Player state a pickup can change.
pub struct PickupTarget<'a> {
    pub lives: &'a mut PlayerLives,
    pub buffs: &'a mut ActiveBuffs,
    pub loadout: &'a mut WeaponLoadout,
    pub score: &'a mut PlayerScore,
    pub life_bonus: u32,
}

/// Apply `kind` to the player.  Timed buffs restart their full duration.
pub fn apply_power_up(kind: PowerUpKind, target: &mut PickupTarget) -> PickupOutcome {
    if let Some(m) = kind.weapon_mod() {
        let evicted = target.loadout.add(m);
        if let Some(old) = evicted {
            debug!("{} replaced {}", m.label(), old.label());
        }
        return PickupOutcome::WeaponMod { added: m, evicted };
    }

    match kind {
        PowerUpKind::RapidFire => target.buffs.rapid_fire_secs = RAPID_FIRE_SECS,
        PowerUpKind::Magnet => target.buffs.magnet_secs = MAGNET_SECS,
        PowerUpKind::SlowMo => target.buffs.slow_mo_secs = SLOW_MO_SECS,
        PowerUpKind::Shield => target.buffs.shield_hits = SHIELD_HITS,
        PowerUpKind::Life => {
            if target.lives.remaining < target.lives.max {
                target.lives.remaining += 1;
                return PickupOutcome::ExtraLife;
            }
            target.score.points += target.life_bonus;
            return PickupOutcome::LifeBonus(target.life_bonus);
        }
        _ => {}
    }
    PickupOutcome::Buff(kind)
}

/// Roll the drop for one destroyed enemy: `chance` of a uniformly random kind.
pub fn roll_drop(rng: &mut GameRng, chance: f64) -> Option<PowerUpKind> {
    if rng.chance(chance) {
        Some(rng.pick(&PowerUpKind::ALL))
    } else {
        None
    }
}

pub fn spawn_powerup(commands: &mut Commands, kind: PowerUpKind, center: Vec2) -> Entity {
    commands
        .spawn((
            PowerUp { kind, active: true },
            Body::centered(center, Vec2::splat(POWERUP_SIZE)),
            Transform::default(),
            Visibility::default(),
        ))
        .id()
}

pub struct PowerUpPlugin;

impl Plugin for PowerUpPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            powerup_fall_system
                .in_set(FrameSet::Simulate)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            sweep_inactive::<PowerUp>
                .in_set(FrameSet::Sweep)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

pub fn powerup_fall_system(time: Res<Time>, mut query: Query<(&mut PowerUp, &mut Body)>) {
    let dt = time.delta_secs();
    for (mut powerup, mut body) in query.iter_mut() {
        body.pos.y += POWERUP_FALL_SPEED * dt;
        if body.pos.y > PLAYFIELD_HEIGHT + POWERUP_EXIT_MARGIN {
            powerup.active = false;
        }
    }
}
