//! Bosses: the phase state machine, movement, and the per-frame boss system.
//!
//! ## Stages
//!
//! ```text
//! Entering ──(reached target y)──► Fighting ◄──(2 s elapsed)── PhaseTransition
//!                                     │  ▲                            ▲
//!                                     │  └────────────────────────────┘
//!                                     │      (health crossed a third)
//!                                     ▼
//!                                  Defeated
//! ```
//!
//! The phase counter starts at `max_phase` and only ever falls; it is
//! recomputed from the health fraction on every accepted hit.  Hits landing
//! while the boss is entering or mid-transition are ignored outright.
//!
//! Sub-modules: [`kinds`] holds the catalog, [`attacks`] the bullet patterns.

pub mod attacks;
pub mod kinds;

pub use attacks::{Shot, TimeRift};
pub use kinds::{AttackStyle, BossKind, BossMovement, BossProfile};

use crate::audio::{AudioCue, MusicTrack};
use crate::bullet::{spawn_bullet, Bullet};
use crate::config::{DifficultyMultipliers, GameConfig};
use crate::constants::{
    BOSS_HEIGHT, BOSS_MAX_PHASE, BOSS_PHASE_TRANSITION_SECS, BOSS_WIDTH, ENEMY_BULLET_DAMAGE,
    ENEMY_HIT_FLASH_SECS, PLAYFIELD_WIDTH,
};
use crate::game::{FrameSet, GameState};
use crate::geometry::Body;
use crate::player::{ActiveBuffs, Player};
use crate::rng::GameRng;
use crate::waves::WaveScheduler;
use bevy::prelude::*;

/// Spawn height: well above the visible playfield.
const BOSS_SPAWN_Y: f32 = -150.0;
/// Damage multiplier while the Sunkeeper's rotating shield is up.
const SUNKEEPER_SHIELD_FACTOR: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BossStage {
    Entering,
    Fighting,
    /// Invulnerable; `remaining` seconds until fighting resumes.
    PhaseTransition { remaining: f32 },
    Defeated,
}

#[derive(Component, Debug, Clone)]
pub struct Boss {
    pub kind: BossKind,
    pub health: f32,
    pub max_health: f32,
    pub phase: u8,
    pub max_phase: u8,
    pub stage: BossStage,
    /// Movement clock (rad).
    pub move_time: f32,
    /// Seconds since the last volley.
    pub attack_timer: f32,
    /// Rotating angle for rings, vents and the shield (rad).
    pub spin: f32,
    pub flash_secs: f32,
    /// Sunkeeper only: rotating shield, dropped when phase 2 begins.
    pub shield_up: bool,
    pub rifts: Vec<TimeRift>,
}

impl Boss {
    /// Build `kind` with its base health scaled (and floored) by the
    /// difficulty HP multiplier.
    pub fn new(kind: BossKind, multipliers: &DifficultyMultipliers) -> Self {
        let health = (kind.profile().health * multipliers.hp).floor();
        Self {
            kind,
            health,
            max_health: health,
            phase: BOSS_MAX_PHASE,
            max_phase: BOSS_MAX_PHASE,
            stage: BossStage::Entering,
            move_time: 0.0,
            attack_timer: 0.0,
            spin: 0.0,
            flash_secs: 0.0,
            shield_up: kind == BossKind::Sunkeeper,
            rifts: Vec::new(),
        }
    }

    #[inline]
    pub fn profile(&self) -> &'static BossProfile {
        self.kind.profile()
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.stage == BossStage::Defeated
    }

    /// `true` while hits are ignored.
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        matches!(
            self.stage,
            BossStage::Entering | BossStage::PhaseTransition { .. } | BossStage::Defeated
        )
    }

    /// Factor applied to incoming damage in the current phase.
    pub fn damage_multiplier(&self) -> f32 {
        if self.shield_up && self.phase == 3 {
            SUNKEEPER_SHIELD_FACTOR
        } else {
            1.0
        }
    }

    /// Phase implied by the current health: `ceil(health / (max / max_phase))`
    /// clamped to `1..=max_phase`.
    pub fn phase_for_health(&self) -> u8 {
        let per_phase = self.max_health / self.max_phase as f32;
        let raw = (self.health / per_phase).ceil();
        raw.clamp(1.0, self.max_phase as f32) as u8
    }

    /// Apply a hit.  Returns `true` iff this hit defeated the boss.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_invulnerable() {
            return false;
        }

        self.health -= amount * self.damage_multiplier();
        self.flash_secs = ENEMY_HIT_FLASH_SECS;

        let new_phase = self.phase_for_health();
        if new_phase < self.phase && self.phase > 1 {
            self.phase = new_phase;
            self.stage = BossStage::PhaseTransition {
                remaining: BOSS_PHASE_TRANSITION_SECS,
            };
            info!(
                "{} enters phase {} ({})",
                self.profile().name,
                self.phase,
                self.phase_name()
            );
        }

        if self.health <= 0.0 {
            self.stage = BossStage::Defeated;
            return true;
        }
        false
    }

    pub fn phase_name(&self) -> &'static str {
        let idx = (self.phase.max(1) - 1) as usize;
        self.profile().phase_names[idx.min(2)]
    }

    /// Advance the boss by `dt` seconds of hostile time and return the shots
    /// it fires this frame.
    pub fn update(
        &mut self,
        body: &mut Body,
        dt: f32,
        player: Vec2,
        rng: &mut GameRng,
    ) -> Vec<Shot> {
        match self.stage {
            BossStage::Defeated => return Vec::new(),
            BossStage::Entering => {
                let target_y = self.profile().target_y;
                body.pos.y += self.profile().entry_speed * dt;
                if body.pos.y >= target_y {
                    body.pos.y = target_y;
                    self.stage = BossStage::Fighting;
                }
                return Vec::new();
            }
            BossStage::PhaseTransition { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.stage = BossStage::Fighting;
                    if self.phase <= 2 {
                        self.shield_up = false;
                    }
                } else {
                    self.stage = BossStage::PhaseTransition { remaining };
                }
                return Vec::new();
            }
            BossStage::Fighting => {}
        }

        self.flash_secs = (self.flash_secs - dt).max(0.0);
        self.move_time += self.profile().move_rate * dt;
        if self.kind != BossKind::Sunkeeper || self.shield_up {
            self.spin += attacks::spin_rate(self.profile().attack) * dt;
        }
        self.apply_movement(body, dt);

        let mut shots = attacks::update_rifts(&mut self.rifts, dt, player);

        let style = self.profile().attack;
        self.attack_timer += dt;
        if self.attack_timer >= attacks::attack_interval(style, self.phase) {
            self.attack_timer = 0.0;
            let ctx = attacks::AttackContext {
                center: body.center(),
                muzzle: Vec2::new(body.center().x, body.pos.y + body.size.y),
                player,
                phase: self.phase,
                max_phase: self.max_phase,
                spin: self.spin,
                move_time: self.move_time,
            };
            shots.extend(attacks::fire_volley(style, &ctx, rng, &mut self.rifts));
        }
        shots
    }

    fn apply_movement(&mut self, body: &mut Body, dt: f32) {
        let profile = self.profile();
        let home_x = PLAYFIELD_WIDTH / 2.0 - body.size.x / 2.0;
        let t = self.move_time;
        match profile.movement {
            BossMovement::Sway => {
                body.pos.x = home_x + t.sin() * 150.0;
            }
            BossMovement::FigureEight => {
                body.pos.x = home_x + t.sin() * 180.0;
                body.pos.y = profile.target_y + (t * 2.0).sin() * 30.0;
            }
            BossMovement::Bounce => {
                body.pos.x += (t * 2.0).sin() * 120.0 * dt;
                body.pos.y = profile.target_y + t.sin().abs() * 50.0;
            }
            BossMovement::Drift => {
                let target = Vec2::new(
                    PLAYFIELD_WIDTH / 2.0 + (t * 2.0).sin() * 200.0 - body.size.x / 2.0,
                    profile.target_y + (t * 3.0).sin() * 40.0,
                );
                // 5 % of the gap per 60 Hz frame.
                let k = 1.0 - 0.95_f32.powf(dt * 60.0);
                body.pos += (target - body.pos) * k;
            }
        }
    }
}

/// Spawn `kind` above the playfield, centred horizontally.
pub fn spawn_boss(
    commands: &mut Commands,
    kind: BossKind,
    multipliers: &DifficultyMultipliers,
) -> Entity {
    let boss = Boss::new(kind, multipliers);
    info!(
        "Boss spawned: {} ({} HP)",
        kind.profile().name,
        boss.max_health
    );
    let body = Body::new(
        PLAYFIELD_WIDTH / 2.0 - BOSS_WIDTH / 2.0,
        BOSS_SPAWN_Y,
        BOSS_WIDTH,
        BOSS_HEIGHT,
    );
    commands
        .spawn((boss, body, Transform::default(), Visibility::default()))
        .id()
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (boss_spawn_system, boss_update_system)
                .chain()
                .in_set(FrameSet::Simulate)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Spawn the boss the wave scheduler has queued, if any.
pub fn boss_spawn_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut scheduler: ResMut<WaveScheduler>,
    mut audio: MessageWriter<AudioCue>,
) {
    if let Some(kind) = scheduler.take_pending_boss() {
        spawn_boss(&mut commands, kind, &config.multipliers());
        audio.write(AudioCue::Music(MusicTrack::Boss));
    }
}

/// Move the boss, run its attack routine and fire the resulting shots.
pub fn boss_update_system(
    mut commands: Commands,
    time: Res<Time>,
    buffs: Res<ActiveBuffs>,
    mut rng: ResMut<GameRng>,
    q_player: Query<&Body, (With<Player>, Without<Boss>)>,
    mut q_boss: Query<(&mut Boss, &mut Body)>,
) {
    let Ok(ship) = q_player.single() else {
        return;
    };
    let dt = time.delta_secs() * buffs.hostile_time_scale();

    for (mut boss, mut body) in q_boss.iter_mut() {
        for shot in boss.update(&mut body, dt, ship.center(), &mut rng) {
            spawn_bullet(
                &mut commands,
                Bullet::enemy(shot.angle, ENEMY_BULLET_DAMAGE),
                shot.origin,
            );
        }
    }
}
