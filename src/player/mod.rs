//! Player module: ship entity, input handling, firing, damage and the drone.
//!
//! ## Sub-module layout
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`state`] | `Player` marker and resources (`PlayerStats`, `PlayerLives`, `PlayerScore`, `WeaponLoadout`, `ActiveBuffs`, `FireControl`, `PlayerIntent`) |
//! | [`control`] | Input pipeline: clear intent, keyboard → intent, intent → ship movement |
//! | [`combat`] | Volley planning, charged shot, buff/invincibility timers, incoming damage |
//! | [`drone`] | Drone companion that follows the `Drone` weapon modifier |
//!
//! All public items are re-exported at this level so that the rest of the crate
//! can use flat `crate::player::*` imports without knowing the sub-module layout.

pub mod combat;
pub mod control;
pub mod drone;
pub mod state;

// ── Flat re-exports ───────────────────────────────────────────────────────────

pub use combat::{
    apply_player_damage, plan_volley, player_fire_system, player_timers_system, DamageOutcome,
    DamageRules,
};
pub use control::{
    apply_player_intent_system, keyboard_to_intent_system, player_intent_clear_system,
};
pub use drone::{drone_sync_system, drone_update_system, Drone};
pub use state::{
    ActiveBuffs, FireControl, Player, PlayerIntent, PlayerLives, PlayerScore, PlayerStats, Stat,
    WeaponLoadout, WeaponMod,
};

use crate::config::GameConfig;
use crate::constants::{PLAYER_HEIGHT, PLAYER_WIDTH, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::game::{FrameSet, GameState};
use crate::geometry::Body;
use bevy::prelude::*;

/// Where the ship sits at the start of every chapter (centre).
pub fn player_start_position() -> Vec2 {
    Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT - 100.0)
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerStats>()
            .init_resource::<PlayerLives>()
            .init_resource::<PlayerScore>()
            .init_resource::<WeaponLoadout>()
            .init_resource::<ActiveBuffs>()
            .init_resource::<FireControl>()
            .init_resource::<PlayerIntent>()
            .add_systems(Startup, spawn_player)
            .add_systems(
                Update,
                (player_intent_clear_system, keyboard_to_intent_system)
                    .chain()
                    .in_set(FrameSet::Input),
            )
            .add_systems(
                Update,
                (
                    player_timers_system,
                    apply_player_intent_system,
                    player_fire_system,
                    drone_sync_system,
                    drone_update_system,
                )
                    .chain()
                    .in_set(FrameSet::Simulate)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ── Ship spawn ─────────────────────────────────────────────────────────────────

/// Spawn the player's ship at its chapter start position.
///
/// The ship entity lives for the whole session; chapter starts and restarts
/// only move it back and reset the player resources.
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Player,
        Body::centered(
            player_start_position(),
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        ),
        Transform::default(),
        Visibility::default(),
    ));
    commands.insert_resource(PlayerLives::with_max(config.max_lives));

    info!("✓ Player ship spawned");
}

/// Return every player resource to its fresh-run value.
///
/// Used when a run restarts after game over or victory.
pub fn reset_player_resources(config: &GameConfig, commands: &mut Commands) {
    commands.insert_resource(PlayerStats::default());
    commands.insert_resource(PlayerLives::with_max(config.max_lives));
    commands.insert_resource(PlayerScore::default());
    commands.insert_resource(WeaponLoadout::default());
    commands.insert_resource(ActiveBuffs::default());
    commands.insert_resource(FireControl::default());
}
