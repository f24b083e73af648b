//! Centralised gameplay constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//!
//! ## Units
//!
//! The playfield is a fixed 800 × 600 rectangle with its origin at the
//! top-left corner and **y growing downward**.  Speeds are in playfield
//! pixels per second and timers in seconds.  [`crate::config::GameConfig`]
//! mirrors the subset of these values that may be overridden at runtime.

// ── Playfield ─────────────────────────────────────────────────────────────────

/// Width of the playfield (px).
pub const PLAYFIELD_WIDTH: f32 = 800.0;

/// Height of the playfield (px).
pub const PLAYFIELD_HEIGHT: f32 = 600.0;

/// Height of the HUD strip at the top of the playfield.
///
/// The player cannot fly into it and ricochet bullets bounce off its lower edge.
pub const HUD_STRIP_HEIGHT: f32 = 50.0;

/// Total number of chapters in a full run.
pub const CHAPTER_COUNT: u32 = 12;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 50.0;

/// Base ship speed before SPD upgrades (px/s).
pub const PLAYER_BASE_SPEED: f32 = 360.0;

/// Speed gained per SPD upgrade level (px/s).
pub const PLAYER_SPEED_PER_LEVEL: f32 = 60.0;

/// Base attack (damage per bullet) before ATK upgrades.
pub const PLAYER_BASE_ATTACK: f32 = 10.0;
pub const PLAYER_ATTACK_PER_LEVEL: f32 = 5.0;

/// Damage reduction percentage gained per DEF upgrade level.
pub const PLAYER_DEFENSE_PER_LEVEL: f32 = 10.0;

/// Base interval between volleys (s).
pub const PLAYER_FIRE_INTERVAL: f32 = 0.2;

/// Interval reduction per FIRE RATE upgrade level (s).
pub const PLAYER_FIRE_INTERVAL_PER_LEVEL: f32 = 0.03;

/// Lives at the start of a run; also the cap for extra-life pickups.
pub const PLAYER_MAX_LIVES: u32 = 3;

/// Seconds of invincibility after losing a life.
pub const PLAYER_INVINCIBILITY_SECS: f32 = 2.0;

/// Highest purchasable level for each stat.
pub const UPGRADE_MAX_LEVEL: u8 = 5;

/// ATK and DEF share one cost table.
pub const UPGRADE_COSTS_ATTACK: [u32; 5] = [50, 100, 200, 400, 800];
pub const UPGRADE_COSTS_DEFENSE: [u32; 5] = [50, 100, 200, 400, 800];
pub const UPGRADE_COSTS_SPEED: [u32; 5] = [30, 60, 120, 240, 480];
pub const UPGRADE_COSTS_FIRE_RATE: [u32; 5] = [40, 80, 160, 320, 640];

/// Raw damage of an enemy bullet hitting the ship.
pub const ENEMY_BULLET_DAMAGE: f32 = 10.0;

/// Raw damage of an enemy ramming the ship.
pub const ENEMY_CONTACT_DAMAGE: f32 = 20.0;

// ── Charged (plasma) shot ─────────────────────────────────────────────────────

/// Charge needed before a plasma bolt fires (s of accumulated fire cadence).
pub const PLASMA_CHARGE_THRESHOLD: f32 = 2.0;

/// Attack multiplier applied by the ship when it releases a plasma bolt.
pub const PLASMA_ATTACK_MULTIPLIER: f32 = 5.0;

/// Extra damage multiplier intrinsic to the plasma bullet itself.
pub const PLASMA_DAMAGE_MULTIPLIER: f32 = 2.0;
pub const PLASMA_SPEED_MULTIPLIER: f32 = 0.8;
pub const PLASMA_WIDTH: f32 = 40.0;
pub const PLASMA_HEIGHT: f32 = 80.0;

// ── Bullets ───────────────────────────────────────────────────────────────────

pub const BULLET_WIDTH: f32 = 6.0;
pub const BULLET_HEIGHT: f32 = 15.0;

/// Player bullet speed (px/s).
pub const PLAYER_BULLET_SPEED: f32 = 720.0;

/// Enemy and boss bullet speed (px/s).
pub const ENEMY_BULLET_SPEED: f32 = 360.0;

/// Lateral angle offset of the two extra Spread Shot bullets (rad).
pub const SPREAD_SHOT_ANGLE: f32 = 0.2;

/// Homing bullets only steer toward enemies closer than this (px).
pub const HOMING_RANGE: f32 = 300.0;

/// Maximum homing turn rate (rad/s).
pub const HOMING_TURN_RATE: f32 = 6.0;

/// Reflections a ricochet bullet may perform before it is spent.
pub const RICOCHET_BOUNCES: u8 = 3;

/// Distance past the playfield edge at which a bullet is discarded.
pub const BULLET_OFFSCREEN_MARGIN: f32 = 20.0;

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Enemies leaving the bottom edge by this much are recycled to the top.
pub const ENEMY_RECYCLE_MARGIN: f32 = 50.0;

/// Upper bound on difficulty-scaled enemy speed (px/s).
pub const ENEMY_MAX_SPEED: f32 = 600.0;

/// Lateral offset of split children relative to the parent (px).
pub const SPLIT_CHILD_OFFSET: f32 = 20.0;
pub const SPLIT_CHILD_SIZE: f32 = 20.0;

/// Seconds an enemy flashes white after being hit.
pub const ENEMY_HIT_FLASH_SECS: f32 = 0.1;

/// Damage above this is shown as a critical hit.
pub const CRITICAL_HIT_THRESHOLD: f32 = 15.0;

// ── Bosses ────────────────────────────────────────────────────────────────────

pub const BOSS_WIDTH: f32 = 120.0;
pub const BOSS_HEIGHT: f32 = 100.0;
pub const BOSS_MAX_PHASE: u8 = 3;

/// Invulnerability window while a boss changes phase (s).
pub const BOSS_PHASE_TRANSITION_SECS: f32 = 2.0;

/// Score awarded per chapter number on boss defeat.
pub const BOSS_SCORE_PER_CHAPTER: u32 = 10_000;

/// Coins credited directly on boss defeat.
pub const BOSS_COIN_BONUS: u32 = 100;

/// Coin pickups scattered around a defeated boss.
pub const BOSS_COIN_DROPS: u32 = 20;
pub const BOSS_COIN_DROP_VALUE: u32 = 3;

// ── Waves ─────────────────────────────────────────────────────────────────────

/// Waves per chapter, the last of which is the boss wave.
pub const WAVES_PER_CHAPTER: u32 = 10;

/// Pause between a cleared wave and the next one (s).
pub const WAVE_DELAY_SECS: f32 = 3.0;

/// Per-chapter unit-count growth used by the procedural wave template.
pub const PROCEDURAL_COUNT_GROWTH: f64 = 0.15;

/// How long a wave banner stays on the HUD (s).
pub const WAVE_BANNER_SECS: f32 = 3.0;

// ── Pickups ───────────────────────────────────────────────────────────────────

/// Probability a destroyed enemy drops a power-up.
pub const POWERUP_DROP_CHANCE: f64 = 0.20;
pub const POWERUP_SIZE: f32 = 30.0;
pub const POWERUP_FALL_SPEED: f32 = 90.0;

/// Maximum weapon modifiers held at once.
pub const MAX_WEAPON_MODS: usize = 2;

pub const RAPID_FIRE_SECS: f32 = 15.0;
pub const MAGNET_SECS: f32 = 20.0;
pub const SLOW_MO_SECS: f32 = 10.0;
pub const SHIELD_HITS: u32 = 3;

/// Hostile time scale while Slow-Mo is active.
pub const SLOW_MO_FACTOR: f32 = 0.5;

/// Score granted by a life pickup when lives are already at the cap.
pub const LIFE_BONUS_SCORE: u32 = 500;

pub const COIN_SIZE: f32 = 15.0;
pub const COIN_FALL_SPEED: f32 = 60.0;
pub const COIN_MAGNET_SPEED: f32 = 480.0;
pub const COIN_MAGNET_RANGE: f32 = 200.0;

/// Random scatter applied to each spawned coin (px).
pub const COIN_SCATTER: f32 = 20.0;

// ── Drone ─────────────────────────────────────────────────────────────────────

pub const DRONE_ORBIT_RADIUS: f32 = 60.0;
pub const DRONE_ORBIT_RATE: f32 = 2.0;
pub const DRONE_FIRE_INTERVAL: f32 = 0.5;
pub const DRONE_RANGE: f32 = 400.0;
pub const DRONE_DAMAGE: f32 = 5.0;

// ── Effects ───────────────────────────────────────────────────────────────────

/// Soft cap on live particles; trails are skipped above 80 % of it.
pub const PARTICLE_CAP: usize = 500;

/// Floating combat text lifetime (s).
pub const FLOATING_TEXT_SECS: f32 = 0.8;

/// Downward acceleration applied to floating text (px/s²).
pub const FLOATING_TEXT_GRAVITY: f32 = 360.0;

// ── Mode transitions ──────────────────────────────────────────────────────────

/// Collection window after a boss dies before the chapter-complete screen.
pub const BOSS_VICTORY_DELAY_SECS: f32 = 4.0;

/// Input lock on the chapter-complete screen.
pub const CHAPTER_COMPLETE_INPUT_DELAY_SECS: f32 = 1.5;

/// How long the chapter intro card stays up before play begins.
pub const INTRO_SECS: f32 = 3.0;

/// Input lock on the game-over and victory screens.
pub const GAME_OVER_INPUT_DELAY_SECS: f32 = 1.0;
