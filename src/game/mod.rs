//! Game orchestration: the mode machine, frame ordering and the plugin that
//! wires every headless gameplay plugin together.
//!
//! ## Frame order
//!
//! Within `Update`, gameplay systems are grouped into [`FrameSet`]s that run
//! strictly in sequence:
//!
//! | Set        | Work                                                      |
//! |------------|-----------------------------------------------------------|
//! | `Input`    | Keyboard → `PlayerIntent` (every state)                   |
//! | `Simulate` | Timers, ship, spawns, enemies, boss, bullets, pickups     |
//! | `Collide`  | The single collision pass                                 |
//! | `Sweep`    | Despawn entities retired this frame                       |
//! | `Progress` | Wave bookkeeping, chapter outcome, mode screens           |
//!
//! Rendering lives in [`crate::rendering::RenderingPlugin`] and is added
//! separately, so [`GamePlugin`] runs under `MinimalPlugins` in tests.

pub mod flow;
pub mod state;

pub use flow::{boss_bounty, FlowPlugin};
pub use state::{ChapterProgress, GameState, CHAPTER_NAMES};

use crate::audio::AudioCuePlugin;
use crate::boss::BossPlugin;
use crate::bullet::BulletPlugin;
use crate::coins::CoinPlugin;
use crate::collision::CollisionPlugin;
use crate::config::{load_game_config, GameConfig};
use crate::enemy::EnemyPlugin;
use crate::floating_text::FloatingTextPlugin;
use crate::particles::ParticlesPlugin;
use crate::player::PlayerPlugin;
use crate::powerups::PowerUpPlugin;
use crate::rng::{seed_game_rng, GameRng};
use crate::waves::WavePlugin;
use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Simulate,
    Collide,
    Sweep,
    Progress,
}

/// Registers the state machine, shared resources and every gameplay plugin.
///
/// `GameState` is initialised here, before any plugin that calls
/// `.run_if(in_state(..))`.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .insert_resource(GameConfig::default())
            .init_resource::<GameRng>()
            .init_resource::<ChapterProgress>()
            .configure_sets(
                Update,
                (
                    FrameSet::Input,
                    FrameSet::Simulate,
                    FrameSet::Collide,
                    FrameSet::Sweep,
                    FrameSet::Progress,
                )
                    .chain(),
            )
            // Config must be final before any Startup system reads it.
            .add_systems(PreStartup, (load_game_config, seed_game_rng).chain())
            .add_plugins((
                AudioCuePlugin,
                PlayerPlugin,
                EnemyPlugin,
                BossPlugin,
                BulletPlugin,
                WavePlugin,
                CollisionPlugin,
                CoinPlugin,
                PowerUpPlugin,
                ParticlesPlugin,
                FloatingTextPlugin,
                FlowPlugin,
            ));
    }
}
