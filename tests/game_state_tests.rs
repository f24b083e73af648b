//! Headless tests for the [`GameState`] mode machine driven through the full
//! [`GamePlugin`].
//!
//! These tests use [`MinimalPlugins`] with no window and no rendering, and
//! feed the keyboard through a bare `ButtonInput<KeyCode>` resource, so they
//! run fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Default initial state is `WaitingForInput`.
//! 2. Enter on the title screen opens the chapter 1 intro.
//! 3. Enter on the intro starts play, spawns the ship and queues wave 1.
//! 4. `insert_state` can force-start directly in `Playing`.
//! 5. Losing the last life ends the run, and Enter after the lock restarts it.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use chrono_splinter::bullet::Bullet;
use chrono_splinter::constants::ENEMY_BULLET_DAMAGE;
use chrono_splinter::game::{ChapterProgress, GamePlugin, GameState};
use chrono_splinter::geometry::Body;
use chrono_splinter::player::{Player, PlayerLives, PlayerScore};
use chrono_splinter::waves::WaveScheduler;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with the whole game registered.
///
/// `StatesPlugin` adds the `StateTransition` schedule needed by `init_state`.
/// Each frame advances the clock by a fixed 100 ms.
fn game_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_resource::<ButtonInput<KeyCode>>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
            100,
        )))
        .add_plugins(GamePlugin);
    app.update();
    app
}

fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

/// Tap a key for one frame, then let one more frame apply the transition.
fn tap(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
    app.update();
    let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keys.release(key);
    keys.clear();
    app.update();
}

fn start_playing(app: &mut App) {
    tap(app, KeyCode::Enter);
    tap(app, KeyCode::Enter);
    assert_eq!(state(app), GameState::Playing);
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn default_state_is_waiting_for_input() {
    let app = game_app();
    assert_eq!(
        state(&app),
        GameState::WaitingForInput,
        "initial state must be the title screen"
    );
}

#[test]
fn enter_on_title_opens_chapter_one_intro() {
    let mut app = game_app();
    tap(&mut app, KeyCode::Enter);

    assert_eq!(state(&app), GameState::Intro);
    assert_eq!(app.world().resource::<ChapterProgress>().chapter, 1);
}

#[test]
fn enter_on_intro_starts_wave_one() {
    let mut app = game_app();
    start_playing(&mut app);

    let scheduler = app.world().resource::<WaveScheduler>();
    assert_eq!(scheduler.wave, 1);
    assert_eq!(scheduler.banner, "WAVE 1 - INCOMING!");

    let ships = app
        .world_mut()
        .query_filtered::<Entity, With<Player>>()
        .iter(app.world())
        .count();
    assert_eq!(ships, 1, "exactly one ship must exist during play");
}

#[test]
fn insert_state_starts_in_playing() {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_resource::<ButtonInput<KeyCode>>()
        // Inserted first so GamePlugin's `init_state` leaves it alone.
        .insert_state(GameState::Playing)
        .add_plugins(GamePlugin);
    app.update();

    assert_eq!(state(&app), GameState::Playing);
    assert_eq!(app.world().resource::<WaveScheduler>().wave, 1);
}

#[test]
fn last_life_lost_ends_the_run_and_enter_restarts_it() {
    let mut app = game_app();
    start_playing(&mut app);

    {
        let mut lives = app.world_mut().resource_mut::<PlayerLives>();
        lives.remaining = 1;
        lives.inv_timer = 0.0;
    }
    app.world_mut().resource_mut::<PlayerScore>().points = 1234;

    let ship = *app
        .world_mut()
        .query_filtered::<&Body, With<Player>>()
        .single(app.world())
        .expect("ship");
    app.world_mut().spawn((
        Bullet::enemy(FRAC_PI_2, ENEMY_BULLET_DAMAGE),
        // Oversized so the shot still overlaps after one frame of travel.
        Body::centered(ship.center(), Vec2::splat(120.0)),
    ));

    app.update();
    app.update();
    assert_eq!(state(&app), GameState::GameOver);

    // Enter during the input lock is ignored.
    tap(&mut app, KeyCode::Enter);
    assert_eq!(state(&app), GameState::GameOver);

    for _ in 0..10 {
        app.update();
    }
    tap(&mut app, KeyCode::Enter);
    assert_eq!(state(&app), GameState::Intro);
    assert_eq!(app.world().resource::<PlayerScore>().points, 0);
    assert_eq!(app.world().resource::<PlayerLives>().remaining, 3);
}
