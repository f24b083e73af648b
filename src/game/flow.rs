//! Mode transitions: title, chapter intro, play, results, shop, game over
//! and victory.
//!
//! ## Systems (registered by `FlowPlugin`)
//!
//! | System                    | Schedule                          | Purpose                                   |
//! |---------------------------|-----------------------------------|-------------------------------------------|
//! | `title_screen_system`     | `Update / WaitingForInput`        | First confirm starts the run              |
//! | `enter_intro_system`      | `OnEnter(Intro)`                  | Reset the screen clock, intro music       |
//! | `intro_system`            | `Update / Intro`                  | Timer or confirm → `Playing`              |
//! | `begin_chapter_system`    | `OnEnter(Playing)`                | Clear the field, start wave 1             |
//! | `chapter_outcome_system`  | `Update / Playing / Progress`     | Game over, boss bounty, victory countdown |
//! | `chapter_complete_system` | `Update / ChapterComplete`        | Input lock, then confirm → `Shop`         |
//! | `shop_system`             | `Update / Shop`                   | Buy upgrades, confirm → next chapter      |
//! | `restart_screen_system`   | `Update / GameOver or Victory`    | Input lock, then confirm → fresh run      |

use super::state::{ChapterProgress, GameState};
use super::FrameSet;
use crate::audio::{AudioCue, MusicTrack};
use crate::boss::Boss;
use crate::bullet::Bullet;
use crate::coins::{spawn_coins, Coin};
use crate::collision::CollisionReport;
use crate::config::GameConfig;
use crate::constants::{
    BOSS_COIN_BONUS, BOSS_COIN_DROPS, BOSS_COIN_DROP_VALUE, BOSS_SCORE_PER_CHAPTER,
    GAME_OVER_INPUT_DELAY_SECS,
};
use crate::enemy::Enemy;
use crate::floating_text::FloatingText;
use crate::geometry::Body;
use crate::particles::{spawn_explosion, ParticleBudget};
use crate::player::{
    player_start_position, reset_player_resources, Player, PlayerIntent, PlayerScore, PlayerStats,
};
use crate::pool::despawn_all;
use crate::powerups::PowerUp;
use crate::rng::GameRng;
use crate::waves::WaveScheduler;
use bevy::prelude::*;

/// Scatter of the boss's coin drops around its centre.
const BOSS_COIN_SCATTER: f32 = 50.0;
const BOSS_EXPLOSION_PARTICLES: u32 = 50;

/// Everything that belongs to a single chapter and is cleared when one begins.
type ChapterScoped = Or<(
    With<Enemy>,
    With<Boss>,
    With<Bullet>,
    With<Coin>,
    With<PowerUp>,
    With<FloatingText>,
)>;

pub struct FlowPlugin;

impl Plugin for FlowPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Intro), enter_intro_system)
            .add_systems(OnEnter(GameState::Playing), begin_chapter_system)
            .add_systems(OnEnter(GameState::ChapterComplete), reset_screen_clock)
            .add_systems(OnEnter(GameState::Shop), reset_screen_clock)
            .add_systems(OnEnter(GameState::GameOver), enter_game_over_system)
            .add_systems(OnEnter(GameState::Victory), enter_victory_system)
            .add_systems(
                Update,
                (
                    title_screen_system.run_if(in_state(GameState::WaitingForInput)),
                    intro_system.run_if(in_state(GameState::Intro)),
                    chapter_outcome_system.run_if(in_state(GameState::Playing)),
                    chapter_complete_system.run_if(in_state(GameState::ChapterComplete)),
                    shop_system.run_if(in_state(GameState::Shop)),
                    restart_screen_system
                        .run_if(in_state(GameState::GameOver).or(in_state(GameState::Victory))),
                )
                    .in_set(FrameSet::Progress),
            );
    }
}

/// Points and coins awarded for beating the boss of `chapter`.
pub fn boss_bounty(chapter: u32) -> (u32, u32) {
    (BOSS_SCORE_PER_CHAPTER * chapter, BOSS_COIN_BONUS)
}

fn reset_screen_clock(mut progress: ResMut<ChapterProgress>) {
    progress.screen_secs = 0.0;
}

// ── Title & intro ─────────────────────────────────────────────────────────────

pub fn title_screen_system(
    config: Res<GameConfig>,
    intent: Res<PlayerIntent>,
    mut progress: ResMut<ChapterProgress>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if intent.confirm {
        progress.chapter = config.starting_chapter;
        next_state.set(GameState::Intro);
        info!("✓ Run started ({} difficulty)", config.difficulty.label());
    }
}

fn enter_intro_system(mut progress: ResMut<ChapterProgress>, mut audio: MessageWriter<AudioCue>) {
    progress.screen_secs = 0.0;
    audio.write(AudioCue::Music(MusicTrack::Intro));
}

pub fn intro_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    intent: Res<PlayerIntent>,
    mut progress: ResMut<ChapterProgress>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    progress.screen_secs += time.delta_secs();
    if progress.screen_secs >= config.intro_secs || intent.confirm {
        next_state.set(GameState::Playing);
    }
}

// ── Playing ───────────────────────────────────────────────────────────────────

/// Clear the previous chapter's entities, move the ship home and start
/// wave 1.
pub fn begin_chapter_system(
    mut commands: Commands,
    mut rng: ResMut<GameRng>,
    mut scheduler: ResMut<WaveScheduler>,
    mut progress: ResMut<ChapterProgress>,
    mut audio: MessageWriter<AudioCue>,
    q_scoped: Query<Entity, ChapterScoped>,
    mut q_ship: Query<&mut Body, With<Player>>,
) {
    despawn_all(&mut commands, &q_scoped);
    if let Ok(mut ship) = q_ship.single_mut() {
        ship.set_center(player_start_position());
    }

    progress.victory_secs = None;
    scheduler.reset();
    if let Err(e) = scheduler.start_wave(progress.chapter, 1, &mut rng) {
        warn!("⚠ Chapter {} could not start: {e}", progress.chapter);
    }
    audio.write(AudioCue::Music(MusicTrack::Chapter));
    info!(
        "✓ Chapter {}: {}",
        progress.chapter,
        progress.chapter_name()
    );
}

/// React to the frame's collision report: end the run on game over, pay out
/// a beaten boss, and count down the collection window that follows.
#[allow(clippy::too_many_arguments)]
pub fn chapter_outcome_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut progress: ResMut<ChapterProgress>,
    mut score: ResMut<PlayerScore>,
    mut budget: ResMut<ParticleBudget>,
    mut reports: MessageReader<CollisionReport>,
    mut audio: MessageWriter<AudioCue>,
    mut next_state: ResMut<NextState<GameState>>,
    q_boss: Query<(Entity, &Boss, &Body)>,
) {
    let mut boss_down = false;
    for report in reports.read() {
        if report.game_over {
            next_state.set(GameState::GameOver);
            return;
        }
        boss_down |= report.boss_defeated;
    }

    if boss_down {
        for (entity, boss, body) in q_boss.iter().filter(|(_, b, _)| b.is_defeated()) {
            let (points, coins) = boss_bounty(progress.chapter);
            score.points += points;
            score.coins += coins;

            let center = body.center();
            for _ in 0..BOSS_COIN_DROPS {
                let offset = Vec2::new(
                    rng.range(-BOSS_COIN_SCATTER, BOSS_COIN_SCATTER),
                    rng.range(-BOSS_COIN_SCATTER, BOSS_COIN_SCATTER),
                );
                spawn_coins(&mut commands, &mut rng, center + offset, BOSS_COIN_DROP_VALUE);
            }
            spawn_explosion(
                &mut commands,
                &mut budget,
                center,
                boss.profile().color,
                BOSS_EXPLOSION_PARTICLES,
            );
            commands.entity(entity).despawn();
            info!("✓ Boss bounty: +{points} points, +{coins} coins");
        }
        audio.write(AudioCue::Explosion);
        audio.write(AudioCue::Music(MusicTrack::Intro));
        progress.victory_secs = Some(config.boss_victory_delay_secs);
    }

    if let Some(left) = progress.victory_secs {
        let left = left - time.delta_secs();
        if left > 0.0 {
            progress.victory_secs = Some(left);
        } else {
            progress.victory_secs = None;
            next_state.set(GameState::ChapterComplete);
            info!("✓ Chapter {} complete", progress.chapter);
        }
    }
}

// ── Between chapters ──────────────────────────────────────────────────────────

pub fn chapter_complete_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    intent: Res<PlayerIntent>,
    mut progress: ResMut<ChapterProgress>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    progress.screen_secs += time.delta_secs();
    if progress.screen_secs >= config.chapter_complete_input_delay_secs && intent.confirm {
        next_state.set(GameState::Shop);
    }
}

/// Keys 1–4 buy a level of ATK/DEF/SPD/FIRE RATE; confirm leaves for the next
/// chapter, or the victory screen after the last one.
pub fn shop_system(
    intent: Res<PlayerIntent>,
    mut stats: ResMut<PlayerStats>,
    mut score: ResMut<PlayerScore>,
    mut progress: ResMut<ChapterProgress>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if let Some(stat) = intent.purchase {
        match stats.try_upgrade(stat, &mut score.coins) {
            Some(cost) => info!(
                "✓ {} upgraded to level {} for {cost} coins",
                stat.label(),
                stats.level(stat)
            ),
            None => debug!("{} upgrade unavailable", stat.label()),
        }
    }

    if intent.confirm {
        if progress.is_final_chapter() {
            next_state.set(GameState::Victory);
        } else {
            progress.chapter += 1;
            next_state.set(GameState::Intro);
        }
    }
}

// ── End of run ────────────────────────────────────────────────────────────────

fn enter_game_over_system(score: Res<PlayerScore>, mut progress: ResMut<ChapterProgress>) {
    progress.screen_secs = 0.0;
    info!(
        "✓ Game over in chapter {} with {} points",
        progress.chapter, score.points
    );
}

fn enter_victory_system(
    score: Res<PlayerScore>,
    mut progress: ResMut<ChapterProgress>,
    mut audio: MessageWriter<AudioCue>,
) {
    progress.screen_secs = 0.0;
    audio.write(AudioCue::Music(MusicTrack::Victory));
    info!("✓ All chapters cleared with {} points", score.points);
}

/// Game over and victory both wait out a short lock, then restart the run
/// with a fresh ship.
pub fn restart_screen_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    intent: Res<PlayerIntent>,
    mut progress: ResMut<ChapterProgress>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    progress.screen_secs += time.delta_secs();
    if progress.screen_secs < GAME_OVER_INPUT_DELAY_SECS || !intent.confirm {
        return;
    }
    reset_player_resources(&config, &mut commands);
    progress.chapter = config.starting_chapter;
    next_state.set(GameState::Intro);
    info!("✓ Run restarted");
}
