//! Top-level mode machine and chapter bookkeeping.

use crate::constants::CHAPTER_COUNT;
use bevy::prelude::*;

/// Top-level application state machine.
///
/// ```text
/// WaitingForInput ─► Intro ─► Playing ─► ChapterComplete ─► Shop ─┐
///                      ▲         │                                │
///                      │         ▼                                │
///                      ├──── GameOver                             │
///                      ├──── Victory ◄──── (after chapter 12) ────┤
///                      └──────────────────────────────────────────┘
/// ```
///
/// Every simulation system runs under `.run_if(in_state(GameState::Playing))`,
/// so the world is frozen behind the mode screens.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Title screen; waits for the first confirm.
    #[default]
    WaitingForInput,
    /// Chapter title card.
    Intro,
    /// Active gameplay.
    Playing,
    /// Boss beaten; results screen with a short input lock.
    ChapterComplete,
    /// Upgrade shop between chapters.
    Shop,
    /// Last life lost.
    GameOver,
    /// All chapters cleared.
    Victory,
}

pub const CHAPTER_NAMES: [&str; CHAPTER_COUNT as usize] = [
    "Mercury",
    "Venus",
    "Earth Orbit",
    "The Moon",
    "Mars",
    "Asteroid Belt",
    "Jupiter",
    "Europa",
    "Saturn",
    "Uranus",
    "Neptune",
    "The Edge",
];

/// Where the run is and how long the current screen has been up.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ChapterProgress {
    /// Current chapter, 1-based.
    pub chapter: u32,
    /// Seconds since the current mode screen was entered.
    pub screen_secs: f32,
    /// Counts down the coin-collection window after a boss falls.
    pub victory_secs: Option<f32>,
}

impl Default for ChapterProgress {
    fn default() -> Self {
        Self {
            chapter: 1,
            screen_secs: 0.0,
            victory_secs: None,
        }
    }
}

impl ChapterProgress {
    pub fn chapter_name(&self) -> &'static str {
        let idx = self.chapter.clamp(1, CHAPTER_COUNT) as usize - 1;
        CHAPTER_NAMES[idx]
    }

    #[inline]
    pub fn is_final_chapter(&self) -> bool {
        self.chapter >= CHAPTER_COUNT
    }
}
