//! Seeded randomness shared by every gameplay system.
//!
//! Wave formations, movement-pattern rolls, power-up drops and boss rifts all
//! draw from the single [`GameRng`] resource, so a fixed `rng_seed` in
//! `assets/game.toml` (or in a test) replays a run exactly.  Cosmetic jitter
//! in [`crate::particles`] uses `thread_rng` instead and never feeds back into
//! gameplay.

use crate::config::GameConfig;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Resource)]
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Uniform `f32` in `[lo, hi)`; returns `lo` for an empty range.
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            lo
        } else {
            self.0.gen_range(lo..hi)
        }
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniformly pick one element of a non-empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.0.gen_range(0..items.len())]
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

/// Startup system: reseed [`GameRng`] from the loaded configuration.
pub fn seed_game_rng(config: Res<GameConfig>, mut rng: ResMut<GameRng>) {
    if let Some(seed) = config.rng_seed {
        *rng = GameRng::seeded(seed);
        info!("RNG seeded with {seed}");
    }
}
