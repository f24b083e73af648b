//! Runtime gameplay configuration loaded from `assets/game.toml`.
//!
//! [`GameConfig`] is a Bevy [`Resource`] that mirrors the tunable subset of
//! [`crate::constants`].  At startup, [`load_game_config`] reads
//! `assets/game.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the values you care about:
//!
//! ```toml
//! difficulty = "hard"
//! rng_seed = 42
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `GameConfig::default()`.

use crate::constants::*;
use crate::error::{validate_chapter, validate_drop_chance, validate_positive, GameResult};
use bevy::prelude::*;
use serde::Deserialize;

/// Difficulty setting chosen before a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
    Expert,
    Nightmare,
}

/// Scaling factors a [`Difficulty`] applies to hostile stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyMultipliers {
    /// Enemy and boss health.
    pub hp: f32,
    /// Raw damage dealt to the player (affects the displayed damage number).
    pub damage: f32,
    /// Enemy movement speed, before the [`ENEMY_MAX_SPEED`] cap.
    pub speed: f32,
}

impl Difficulty {
    /// Multiplier table.
    ///
    /// | Difficulty | HP   | Damage | Speed |
    /// |------------|------|--------|-------|
    /// | Easy       | 0.5  | 0.5    | 0.7   |
    /// | Normal     | 0.75 | 0.75   | 0.85  |
    /// | Hard       | 1.0  | 1.0    | 1.0   |
    /// | Expert     | 2.0  | 2.0    | 1.3   |
    /// | Nightmare  | 3.0  | 3.0    | 1.6   |
    pub fn multipliers(self) -> DifficultyMultipliers {
        let (hp, damage, speed) = match self {
            Difficulty::Easy => (0.5, 0.5, 0.7),
            Difficulty::Normal => (0.75, 0.75, 0.85),
            Difficulty::Hard => (1.0, 1.0, 1.0),
            Difficulty::Expert => (2.0, 2.0, 1.3),
            Difficulty::Nightmare => (3.0, 3.0, 1.6),
        };
        DifficultyMultipliers { hp, damage, speed }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
            Difficulty::Expert => "EXPERT",
            Difficulty::Nightmare => "NIGHTMARE",
        }
    }
}

/// Runtime-tunable gameplay configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/game.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Run setup ────────────────────────────────────────────────────────────
    pub difficulty: Difficulty,
    /// Seed for [`crate::rng::GameRng`]; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
    pub starting_chapter: u32,

    // ── Waves ────────────────────────────────────────────────────────────────
    pub wave_delay_secs: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub max_lives: u32,
    pub invincibility_secs: f32,

    // ── Economy ──────────────────────────────────────────────────────────────
    pub powerup_drop_chance: f64,
    pub life_bonus_score: u32,

    // ── Effects ──────────────────────────────────────────────────────────────
    pub particle_cap: usize,

    // ── Mode transitions ─────────────────────────────────────────────────────
    pub boss_victory_delay_secs: f32,
    pub chapter_complete_input_delay_secs: f32,
    pub intro_secs: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            rng_seed: None,
            starting_chapter: 1,
            wave_delay_secs: WAVE_DELAY_SECS,
            max_lives: PLAYER_MAX_LIVES,
            invincibility_secs: PLAYER_INVINCIBILITY_SECS,
            powerup_drop_chance: POWERUP_DROP_CHANCE,
            life_bonus_score: LIFE_BONUS_SCORE,
            particle_cap: PARTICLE_CAP,
            boss_victory_delay_secs: BOSS_VICTORY_DELAY_SECS,
            chapter_complete_input_delay_secs: CHAPTER_COMPLETE_INPUT_DELAY_SECS,
            intro_secs: INTRO_SECS,
        }
    }
}

impl GameConfig {
    /// Shorthand for the active difficulty's multiplier table.
    #[inline]
    pub fn multipliers(&self) -> DifficultyMultipliers {
        self.difficulty.multipliers()
    }

    /// Parse a TOML document and validate every range-checked field.
    pub fn from_toml_str(contents: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> GameResult<()> {
        validate_chapter(self.starting_chapter)?;
        validate_drop_chance(self.powerup_drop_chance)?;
        validate_positive("wave_delay_secs", self.wave_delay_secs)?;
        validate_positive("invincibility_secs", self.invincibility_secs)?;
        validate_positive("max_lives", self.max_lives as f32)?;
        Ok(())
    }
}

/// Startup system: attempt to load `assets/game.toml` and overwrite the
/// `GameConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  Parse or validation errors
/// are logged but do not abort the game.  A missing file is not an error
/// (defaults are already in place from `insert_resource`).
pub fn load_game_config(mut config: ResMut<GameConfig>) {
    let path = "assets/game.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match GameConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                info!("✓ Loaded game config from {path}");
            }
            Err(e) => {
                warn!("⚠ Rejected {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            info!("ℹ No {path} found; using compiled defaults");
        }
    }
}
