//! Bullets: player shots with combinable modifiers and plain enemy shots.
//!
//! ## Per-frame pipeline
//!
//! | System                  | Purpose                                           |
//! |-------------------------|---------------------------------------------------|
//! | `bullet_homing_system`  | Steer homing player bullets toward nearby enemies |
//! | `bullet_movement_system`| Advance, ricochet, and retire off-screen bullets  |
//! | `sweep_inactive::<Bullet>` | Despawn bullets retired this frame             |
//!
//! Enemy bullets run on hostile time, so Slow-Mo slows them down together
//! with enemies and bosses.

use crate::constants::{
    BULLET_HEIGHT, BULLET_OFFSCREEN_MARGIN, BULLET_WIDTH, ENEMY_BULLET_SPEED, HOMING_RANGE,
    HOMING_TURN_RATE, HUD_STRIP_HEIGHT, PLASMA_DAMAGE_MULTIPLIER, PLASMA_HEIGHT,
    PLASMA_SPEED_MULTIPLIER, PLASMA_WIDTH, PLAYER_BULLET_SPEED, PLAYFIELD_HEIGHT,
    PLAYFIELD_WIDTH, RICOCHET_BOUNCES,
};
use crate::enemy::Enemy;
use crate::game::{FrameSet, GameState};
use crate::geometry::{angle_to, heading, normalize_angle, Body};
use crate::player::ActiveBuffs;
use crate::pool::{sweep_inactive, Pooled};
use bevy::prelude::*;
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Independently combinable player-bullet modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulletMods {
    /// Survives hits instead of deactivating.
    pub piercing: bool,
    /// Turns toward the nearest enemy within [`HOMING_RANGE`].
    pub homing: bool,
    /// Reflects off the playfield walls up to [`RICOCHET_BOUNCES`] times.
    pub ricochet: bool,
    /// Heavy charged bolt: bigger, slower, harder-hitting.
    pub plasma: bool,
}

#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub owner: BulletOwner,
    /// Travel direction (rad, y-down).
    pub angle: f32,
    /// Speed (px/s).
    pub speed: f32,
    pub damage: f32,
    pub mods: BulletMods,
    pub bounces_left: u8,
    pub active: bool,
}

impl Pooled for Bullet {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Bullet {
    pub fn player(angle: f32, damage: f32, mods: BulletMods) -> Self {
        let (damage, speed) = if mods.plasma {
            (
                damage * PLASMA_DAMAGE_MULTIPLIER,
                PLAYER_BULLET_SPEED * PLASMA_SPEED_MULTIPLIER,
            )
        } else {
            (damage, PLAYER_BULLET_SPEED)
        };
        Self {
            owner: BulletOwner::Player,
            angle,
            speed,
            damage,
            mods,
            bounces_left: if mods.ricochet { RICOCHET_BOUNCES } else { 0 },
            active: true,
        }
    }

    pub fn enemy(angle: f32, damage: f32) -> Self {
        Self {
            owner: BulletOwner::Enemy,
            angle,
            speed: ENEMY_BULLET_SPEED,
            damage,
            mods: BulletMods::default(),
            bounces_left: 0,
            active: true,
        }
    }

    /// Hitbox size for this bullet.
    pub fn size(&self) -> Vec2 {
        if self.mods.plasma {
            Vec2::new(PLASMA_WIDTH, PLASMA_HEIGHT)
        } else {
            Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        self.owner == BulletOwner::Player
    }

    /// Called after the bullet damages something.
    pub fn on_hit(&mut self) {
        if !self.mods.piercing {
            self.active = false;
        }
    }

    /// Turn toward `target` by at most `HOMING_TURN_RATE · dt` radians.
    pub fn steer_toward(&mut self, from: Vec2, target: Vec2, dt: f32) {
        let diff = normalize_angle(angle_to(from, target) - self.angle);
        let max_turn = HOMING_TURN_RATE * dt;
        self.angle += diff.clamp(-max_turn, max_turn);
    }

    /// Move by `dt` seconds and resolve walls.
    ///
    /// A ricochet bullet reflects the horizontal component on the side walls
    /// and the vertical component on the HUD edge / floor, spending one bounce
    /// per reflection.  A ricochet bullet that meets a wall with no bounces
    /// left is retired on the spot; every other bullet is retired once its
    /// centre is more than [`BULLET_OFFSCREEN_MARGIN`] past the playfield.
    pub fn advance(&mut self, body: &mut Body, dt: f32) {
        let mut c = body.center() + heading(self.angle) * self.speed * dt;

        if self.mods.ricochet {
            if c.x <= 0.0 || c.x >= PLAYFIELD_WIDTH {
                if !self.spend_bounce() {
                    body.set_center(c);
                    return;
                }
                self.angle = PI - self.angle;
                c.x = c.x.clamp(1.0, PLAYFIELD_WIDTH - 1.0);
            }
            if c.y <= HUD_STRIP_HEIGHT || c.y >= PLAYFIELD_HEIGHT {
                if !self.spend_bounce() {
                    body.set_center(c);
                    return;
                }
                self.angle = -self.angle;
                c.y = c.y.clamp(HUD_STRIP_HEIGHT + 1.0, PLAYFIELD_HEIGHT - 1.0);
            }
        } else if c.x < -BULLET_OFFSCREEN_MARGIN
            || c.x > PLAYFIELD_WIDTH + BULLET_OFFSCREEN_MARGIN
            || c.y < -BULLET_OFFSCREEN_MARGIN
            || c.y > PLAYFIELD_HEIGHT + BULLET_OFFSCREEN_MARGIN
        {
            self.active = false;
        }
        body.set_center(c);
    }

    fn spend_bounce(&mut self) -> bool {
        if self.bounces_left == 0 {
            self.active = false;
            return false;
        }
        self.bounces_left -= 1;
        true
    }
}

/// Spawn a bullet centred on `origin`.
pub fn spawn_bullet(commands: &mut Commands, bullet: Bullet, origin: Vec2) -> Entity {
    let body = Body::centered(origin, bullet.size());
    commands
        .spawn((bullet, body, Transform::default(), Visibility::default()))
        .id()
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct BulletPlugin;

impl Plugin for BulletPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (bullet_homing_system, bullet_movement_system)
                .chain()
                .in_set(FrameSet::Simulate)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            sweep_inactive::<Bullet>
                .in_set(FrameSet::Sweep)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Steer every homing player bullet toward the nearest live enemy, but only
/// while one is within range.
pub fn bullet_homing_system(
    time: Res<Time>,
    q_enemies: Query<(&Enemy, &Body), Without<Bullet>>,
    mut q_bullets: Query<(&mut Bullet, &Body)>,
) {
    let dt = time.delta_secs();
    for (mut bullet, body) in q_bullets.iter_mut() {
        if !bullet.active || !bullet.is_player() || !bullet.mods.homing {
            continue;
        }
        let from = body.center();
        let nearest = q_enemies
            .iter()
            .filter(|(enemy, _)| enemy.active)
            .map(|(_, enemy_body)| enemy_body.center())
            .min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)));

        if let Some(target) = nearest {
            if from.distance(target) < HOMING_RANGE {
                bullet.steer_toward(from, target, dt);
            }
        }
    }
}

pub fn bullet_movement_system(
    time: Res<Time>,
    buffs: Res<ActiveBuffs>,
    mut query: Query<(&mut Bullet, &mut Body)>,
) {
    let dt = time.delta_secs();
    let hostile_dt = dt * buffs.hostile_time_scale();
    for (mut bullet, mut body) in query.iter_mut() {
        if !bullet.active {
            continue;
        }
        let step = if bullet.is_player() { dt } else { hostile_dt };
        bullet.advance(&mut body, step);
    }
}
