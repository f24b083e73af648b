//! Headless tests for the wave → collision → progress loop running inside
//! the full [`GamePlugin`].
//!
//! Each app starts directly in `Playing` on chapter 1 with a fixed 50 ms
//! frame, so wave clocks and victory countdowns advance deterministically.

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;
use chrono_splinter::boss::{Boss, BossKind, BossStage};
use chrono_splinter::bullet::{Bullet, BulletMods};
use chrono_splinter::config::Difficulty;
use chrono_splinter::constants::WAVES_PER_CHAPTER;
use chrono_splinter::enemy::{spawn_enemy, Enemy, EnemyKind, MovementPattern};
use chrono_splinter::game::{GamePlugin, GameState};
use chrono_splinter::geometry::Body;
use chrono_splinter::player::PlayerScore;
use chrono_splinter::rng::GameRng;
use chrono_splinter::waves::{WavePhase, WaveScheduler};
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(50);

// ── Helpers ───────────────────────────────────────────────────────────────────

fn playing_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin))
        .init_resource::<ButtonInput<KeyCode>>()
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME))
        .insert_state(GameState::Playing)
        .add_plugins(GamePlugin)
        .insert_resource(GameRng::seeded(11));
    app.update();
    app
}

fn frames(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

fn live_enemies(app: &mut App) -> usize {
    app.world_mut()
        .query::<&Enemy>()
        .iter(app.world())
        .filter(|e| e.active)
        .count()
}

/// A shot large enough to still overlap its target after a frame of travel.
fn spawn_big_shot(app: &mut App, center: Vec2) {
    app.world_mut().spawn((
        Bullet::player(-FRAC_PI_2, 1_000_000.0, BulletMods::default()),
        Body::centered(center, Vec2::splat(200.0)),
    ));
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn wave_one_units_arrive_on_their_schedule() {
    let mut app = playing_app();
    let total = app.world().resource::<WaveScheduler>().queue.len();
    assert_eq!(total, 32);

    frames(&mut app, 10);

    let queued = app.world().resource::<WaveScheduler>().queue.len();
    let live = live_enemies(&mut app);
    assert!(live > 0, "some units must have entered after half a second");
    assert!(queued < total);
    assert_eq!(live + queued, total, "no unit may be lost before it is killed");
}

#[test]
fn killing_the_last_unit_breaks_then_starts_wave_two() {
    let mut app = playing_app();
    {
        let mut scheduler = app.world_mut().resource_mut::<WaveScheduler>();
        scheduler.queue.clear();
        scheduler.remaining = 1;
    }

    let center = Vec2::new(200.0, 200.0);
    let enemy = Enemy::new(
        EnemyKind::Drifter,
        &Difficulty::Hard.multipliers(),
        MovementPattern::Dive,
        0.0,
    );
    let mut queue = bevy::ecs::world::CommandQueue::default();
    let mut commands = Commands::new(&mut queue, app.world());
    spawn_enemy(&mut commands, enemy, Body::centered(center, Vec2::splat(35.0)));
    queue.apply(app.world_mut());
    spawn_big_shot(&mut app, center);

    app.update();
    let scheduler = app.world().resource::<WaveScheduler>();
    assert_eq!(scheduler.remaining, 0);
    assert!(matches!(scheduler.phase, WavePhase::Break { .. }));
    assert!(app.world().resource::<PlayerScore>().points >= 100);

    // The default inter-wave break is three seconds.
    frames(&mut app, 62);
    let scheduler = app.world().resource::<WaveScheduler>();
    assert_eq!(scheduler.wave, 2);
    assert_eq!(scheduler.phase, WavePhase::Active);
}

#[test]
fn boss_defeat_pays_out_and_completes_the_chapter() {
    let mut app = playing_app();
    app.world_mut()
        .resource_scope(|world, mut rng: Mut<GameRng>| {
            world
                .resource_mut::<WaveScheduler>()
                .start_wave(1, WAVES_PER_CHAPTER, &mut rng)
        })
        .expect("boss wave");
    app.update();

    let (kind, center) = {
        let world = app.world_mut();
        let mut bosses = world.query::<(&mut Boss, &mut Body)>();
        let (mut boss, mut body) = bosses.single_mut(world).expect("boss spawned");
        boss.stage = BossStage::Fighting;
        boss.health = 1.0;
        body.set_center(Vec2::new(400.0, 150.0));
        (boss.kind, body.center())
    };
    assert_eq!(Some(kind), BossKind::for_chapter(1).ok());

    let before = app.world().resource::<PlayerScore>().points;
    spawn_big_shot(&mut app, center);
    app.update();

    let score = *app.world().resource::<PlayerScore>();
    assert!(score.points >= before + 10_000);
    assert!(score.coins >= 100);
    assert!(app.world_mut().query::<&Boss>().iter(app.world()).next().is_none());
    assert!(app.world().resource::<WaveScheduler>().is_boss_wave());
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::Playing,
        "coins stay collectable for a while after the boss falls"
    );

    frames(&mut app, 85);
    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::ChapterComplete
    );
}
