//! Regular enemies: the five-kind catalog, per-frame movement, recycling and
//! the split-on-death rule.
//!
//! ## Catalog
//!
//! | Kind      | Size  | Speed | HP | Points | Coins | Split |
//! |-----------|-------|-------|----|--------|-------|-------|
//! | Drifter   | 35×35 | 120   | 20 | 100    | 1     | –     |
//! | Stitcher  | 30×30 | 90    | 15 | 150    | 2     | –     |
//! | Wraith    | 40×40 | 240   | 30 | 200    | 3     | –     |
//! | Harvester | 50×50 | 60    | 60 | 300    | 5     | –     |
//! | Splitter  | 40×40 | 150   | 25 | 50     | 1     | 2     |
//!
//! Health and speed are scaled by the active difficulty when an enemy is
//! built; the profile table itself never changes.

use crate::config::DifficultyMultipliers;
use crate::constants::{
    ENEMY_HIT_FLASH_SECS, ENEMY_MAX_SPEED, ENEMY_RECYCLE_MARGIN, PLAYFIELD_HEIGHT,
    PLAYFIELD_WIDTH, SPLIT_CHILD_OFFSET, SPLIT_CHILD_SIZE,
};
use crate::game::GameState;
use crate::geometry::Body;
use crate::player::ActiveBuffs;
use crate::pool::{sweep_inactive, Pooled};
use crate::rng::GameRng;
use bevy::prelude::*;
use std::f32::consts::TAU;

// ── Catalog ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Drifter,
    Stitcher,
    Wraith,
    Harvester,
    Splitter,
}

/// Static tuning record for one [`EnemyKind`].
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub name: &'static str,
    pub size: Vec2,
    /// Base speed (px/s) before difficulty scaling.
    pub speed: f32,
    pub health: f32,
    pub points: u32,
    pub coins: u32,
    pub split_into: u8,
    /// Body colour (sRGB).
    pub color: [f32; 3],
}

const ENEMY_PROFILES: [EnemyProfile; 5] = [
    EnemyProfile {
        name: "Drifter",
        size: Vec2::new(35.0, 35.0),
        speed: 120.0,
        health: 20.0,
        points: 100,
        coins: 1,
        split_into: 0,
        color: [0.55, 0.36, 0.96],
    },
    EnemyProfile {
        name: "Stitcher",
        size: Vec2::new(30.0, 30.0),
        speed: 90.0,
        health: 15.0,
        points: 150,
        coins: 2,
        split_into: 0,
        color: [0.20, 0.85, 0.60],
    },
    EnemyProfile {
        name: "Wraith",
        size: Vec2::new(40.0, 40.0),
        speed: 240.0,
        health: 30.0,
        points: 200,
        coins: 3,
        split_into: 0,
        color: [0.45, 0.75, 1.00],
    },
    EnemyProfile {
        name: "Harvester",
        size: Vec2::new(50.0, 50.0),
        speed: 60.0,
        health: 60.0,
        points: 300,
        coins: 5,
        split_into: 0,
        color: [1.00, 0.75, 0.20],
    },
    EnemyProfile {
        name: "Splitter",
        size: Vec2::new(40.0, 40.0),
        speed: 150.0,
        health: 25.0,
        points: 50,
        coins: 1,
        split_into: 2,
        color: [1.00, 0.35, 0.45],
    },
];

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Drifter,
        EnemyKind::Stitcher,
        EnemyKind::Wraith,
        EnemyKind::Harvester,
        EnemyKind::Splitter,
    ];

    #[inline]
    pub fn profile(self) -> &'static EnemyProfile {
        &ENEMY_PROFILES[self as usize]
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementPattern {
    /// Straight down.
    Dive,
    /// Downward drift with a smooth lateral sway.
    Sine,
    /// Slower descent with hard left/right switches.
    Zigzag,
    /// Elliptical loop around a fixed point in the upper playfield.
    Orbit,
}

impl MovementPattern {
    /// Patterns rolled for newly spawned and recycled enemies.
    pub const ENTRY: [MovementPattern; 3] = [
        MovementPattern::Dive,
        MovementPattern::Sine,
        MovementPattern::Zigzag,
    ];
}

const SINE_PERIOD_SECS: f32 = 0.5;
const SINE_SWAY_SPEED: f32 = 120.0;
const ZIGZAG_PERIOD_SECS: f32 = 0.3;
const ZIGZAG_DESCENT: f32 = 0.7;
const ORBIT_CENTER: Vec2 = Vec2::new(PLAYFIELD_WIDTH / 2.0, 200.0);
const ORBIT_RADIUS: f32 = 150.0;

// ── Component ─────────────────────────────────────────────────────────────────

/// Live enemy state.
///
/// `health <= max_health` always holds; once `health <= 0` the enemy is
/// inactive and ignores any further damage until it is swept.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub health: f32,
    pub max_health: f32,
    /// Difficulty-scaled speed (px/s).
    pub speed: f32,
    pub points: u32,
    pub coins: u32,
    pub split_into: u8,
    pub pattern: MovementPattern,
    /// Seconds since the pattern clock started.
    pub pattern_time: f32,
    /// Random phase offset for the sway patterns (rad).
    pub phase: f32,
    /// Remaining hit-flash time (s).
    pub flash_secs: f32,
    pub active: bool,
}

impl Pooled for Enemy {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Enemy {
    pub fn new(
        kind: EnemyKind,
        multipliers: &DifficultyMultipliers,
        pattern: MovementPattern,
        phase: f32,
    ) -> Self {
        let profile = kind.profile();
        let health = profile.health * multipliers.hp;
        Self {
            kind,
            health,
            max_health: health,
            speed: (profile.speed * multipliers.speed).min(ENEMY_MAX_SPEED),
            points: profile.points,
            coins: profile.coins,
            split_into: profile.split_into,
            pattern,
            pattern_time: 0.0,
            phase,
            flash_secs: 0.0,
            active: true,
        }
    }

    /// Apply `amount` damage.  Returns `true` iff this hit killed the enemy.
    ///
    /// A dead enemy is already inactive, so repeated hits return `false` and
    /// leave health untouched.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.active {
            return false;
        }
        self.health -= amount;
        self.flash_secs = ENEMY_HIT_FLASH_SECS;
        if self.health <= 0.0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Advance movement by `dt` seconds, then recycle and wrap.
    pub fn step(&mut self, body: &mut Body, dt: f32, rng: &mut GameRng) {
        self.pattern_time += dt;
        if self.flash_secs > 0.0 {
            self.flash_secs = (self.flash_secs - dt).max(0.0);
        }

        match self.pattern {
            MovementPattern::Dive => {
                body.pos.y += self.speed * dt;
            }
            MovementPattern::Sine => {
                body.pos.y += self.speed * dt;
                body.pos.x +=
                    (self.pattern_time / SINE_PERIOD_SECS + self.phase).sin() * SINE_SWAY_SPEED * dt;
            }
            MovementPattern::Zigzag => {
                body.pos.y += self.speed * ZIGZAG_DESCENT * dt;
                let dir = if (self.pattern_time / ZIGZAG_PERIOD_SECS).sin() > 0.0 {
                    1.0
                } else {
                    -1.0
                };
                body.pos.x += dir * self.speed * dt;
            }
            MovementPattern::Orbit => {
                let a = self.pattern_time + self.phase;
                body.pos.x = ORBIT_CENTER.x + a.cos() * ORBIT_RADIUS;
                body.pos.y = ORBIT_CENTER.y + a.sin() * ORBIT_RADIUS * 0.5;
            }
        }

        // Off the bottom: re-enter from the top with a fresh pattern.  The
        // enemy keeps counting as alive, so only kills advance the wave.
        if body.pos.y > PLAYFIELD_HEIGHT + ENEMY_RECYCLE_MARGIN {
            body.pos.y = -ENEMY_RECYCLE_MARGIN;
            body.pos.x = rng.range(50.0, PLAYFIELD_WIDTH - 50.0 - body.size.x);
            self.pattern = rng.pick(&MovementPattern::ENTRY);
            self.phase = rng.range(0.0, TAU);
        }

        if body.pos.x < -body.size.x {
            body.pos.x = PLAYFIELD_WIDTH;
        } else if body.pos.x > PLAYFIELD_WIDTH {
            body.pos.x = -body.size.x;
        }
    }
}

/// Children released by a dying splitter: `split_into` small drifters at the
/// parent's last position, offset left then right.
pub fn split_children(
    parent: &Enemy,
    parent_body: &Body,
    multipliers: &DifficultyMultipliers,
) -> Vec<(Enemy, Body)> {
    (0..parent.split_into)
        .map(|i| {
            let offset = if i == 0 {
                -SPLIT_CHILD_OFFSET
            } else {
                SPLIT_CHILD_OFFSET
            };
            let mut child = Enemy::new(
                EnemyKind::Drifter,
                multipliers,
                MovementPattern::Zigzag,
                0.0,
            );
            child.health = EnemyKind::Drifter.profile().health * multipliers.hp * 0.5;
            child.max_health = child.health;
            let body = Body::new(
                parent_body.pos.x + offset,
                parent_body.pos.y,
                SPLIT_CHILD_SIZE,
                SPLIT_CHILD_SIZE,
            );
            (child, body)
        })
        .collect()
}

/// Spawn an enemy entity.  Rendering attaches its mesh on the next frame.
pub fn spawn_enemy(commands: &mut Commands, enemy: Enemy, body: Body) -> Entity {
    commands
        .spawn((enemy, body, Transform::default(), Visibility::default()))
        .id()
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            enemy_movement_system
                .in_set(crate::game::FrameSet::Simulate)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            sweep_inactive::<Enemy>
                .in_set(crate::game::FrameSet::Sweep)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Move every live enemy.  Slow-Mo scales hostile time.
pub fn enemy_movement_system(
    time: Res<Time>,
    buffs: Res<ActiveBuffs>,
    mut rng: ResMut<GameRng>,
    mut query: Query<(&mut Enemy, &mut Body)>,
) {
    let dt = time.delta_secs() * buffs.hostile_time_scale();
    for (mut enemy, mut body) in query.iter_mut() {
        if !enemy.active {
            continue;
        }
        enemy.step(&mut body, dt, &mut rng);
    }
}
