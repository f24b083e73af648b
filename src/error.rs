//! Game-specific error types.
//!
//! Almost nothing in the frame loop can fail: catalog lookups are total
//! functions over closed enums and a declined shop purchase is a no-op.  The
//! errors here cover the one genuinely fallible boundary, loading and
//! validating runtime configuration, plus lookups keyed by raw chapter/wave
//! numbers coming from that configuration.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crate::error::{validate_chapter, GameResult};
//!
//! fn pick_start(chapter: u32) -> GameResult<u32> {
//!     validate_chapter(chapter)?;
//!     Ok(chapter)
//! }
//! ```

use crate::constants::CHAPTER_COUNT;
use thiserror::Error;

/// Top-level error enum for Chrono-Splinter.
#[derive(Error, Debug)]
pub enum GameError {
    /// `assets/game.toml` exists but is not valid TOML for [`crate::config::GameConfig`].
    #[error("failed to parse game config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A configuration value is outside the range the simulation accepts.
    #[error("config value '{name}' = {value} is outside accepted range {accepted}")]
    ConfigRange {
        name: &'static str,
        value: f64,
        accepted: &'static str,
    },

    /// A chapter number outside `1..=CHAPTER_COUNT`.
    #[error("unknown chapter {0} (expected 1..=12)")]
    UnknownChapter(u32),

    /// A wave number that the chapter's plan does not contain.
    #[error("chapter {chapter} has no wave {wave}")]
    UnknownWave { chapter: u32, wave: u32 },
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `chapter` names one of the campaign chapters.
pub fn validate_chapter(chapter: u32) -> GameResult<()> {
    if (1..=CHAPTER_COUNT).contains(&chapter) {
        Ok(())
    } else {
        Err(GameError::UnknownChapter(chapter))
    }
}

/// Returns an error unless `value` is a probability in `[0, 1]`.
pub fn validate_drop_chance(value: f64) -> GameResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GameError::ConfigRange {
            name: "powerup_drop_chance",
            value,
            accepted: "[0.0, 1.0]",
        })
    }
}

/// Returns an error if `value` is not strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> GameResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(GameError::ConfigRange {
            name,
            value: value as f64,
            accepted: "(0.0, ∞)",
        })
    }
}
