//! Wave plans and the per-chapter wave scheduler.
//!
//! A chapter is ten waves: nine enemy waves and a closing boss wave.
//! Chapters 1–3 are hand-authored; later chapters reuse one nine-wave template
//! whose unit counts grow by 15 % per chapter.
//!
//! Starting a wave expands its spawn groups into a time-ordered
//! [`WaveScheduler::queue`] of pending spawns.  [`wave_spawn_system`] pops due
//! entries each frame, so clearing the queue (chapter change, restart) is all
//! it takes to cancel a wave's outstanding spawns.
//!
//! A wave is complete only when its kill counter has reached zero, its queue
//! has drained **and** no live enemy remains.  Enemies that leave the bottom
//! edge recycle rather than despawn, so they hold the wave open until shot.

use crate::boss::{Boss, BossKind};
use crate::collision::CollisionReport;
use crate::config::GameConfig;
use crate::constants::{
    PLAYFIELD_WIDTH, PROCEDURAL_COUNT_GROWTH, WAVES_PER_CHAPTER, WAVE_BANNER_SECS,
};
use crate::enemy::{spawn_enemy, Enemy, EnemyKind, MovementPattern};
use crate::error::{validate_chapter, GameError, GameResult};
use crate::game::{ChapterProgress, FrameSet, GameState};
use crate::geometry::Body;
use crate::rng::GameRng;
use bevy::prelude::*;
use std::collections::VecDeque;
use std::f32::consts::TAU;

// ── Plans ─────────────────────────────────────────────────────────────────────

/// Spatial rule placing the units of one spawn group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    /// Evenly spaced across the width, staggered upward.
    Line,
    /// Symmetric around the centre line, deeper toward the wings.
    V,
    /// Anywhere in a band just above the screen.
    Scattered,
    /// Random x within the left third.
    Left,
    /// Random x within the right third.
    Right,
    /// Random x within the middle third.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnGroup {
    pub kind: EnemyKind,
    pub count: u32,
    pub formation: Formation,
    /// Added to the running spawn clock before each unit (s).
    pub delay_secs: f32,
}

const fn g(kind: EnemyKind, count: u32, formation: Formation, delay_secs: f32) -> SpawnGroup {
    SpawnGroup {
        kind,
        count,
        formation,
        delay_secs,
    }
}

/// One resolved wave.
#[derive(Debug, Clone, PartialEq)]
pub struct WavePlan {
    pub message: String,
    pub groups: Vec<SpawnGroup>,
    /// Set on the boss wave, which has no enemy groups.
    pub boss: Option<BossKind>,
}

impl WavePlan {
    pub fn unit_count(&self) -> u32 {
        self.groups.iter().map(|g| g.count).sum()
    }
}

struct ScriptedWave {
    message: &'static str,
    groups: &'static [SpawnGroup],
}

use EnemyKind::{Drifter as D, Harvester as H, Splitter as Sp, Stitcher as S, Wraith as W};
use Formation::{Center, Left, Line, Right, Scattered, V};

#[rustfmt::skip]
const MERCURY: [ScriptedWave; 9] = [
    ScriptedWave { message: "WAVE 1 - INCOMING!", groups: &[g(D, 16, Line, 0.2), g(D, 16, V, 0.15)] },
    ScriptedWave { message: "WAVE 2", groups: &[g(D, 20, V, 0.125), g(D, 20, Scattered, 0.1)] },
    ScriptedWave { message: "WAVE 3 - STITCHERS DETECTED", groups: &[g(D, 24, Scattered, 0.075), g(S, 8, Center, 0.25)] },
    ScriptedWave { message: "WAVE 4", groups: &[g(D, 16, Left, 0.1), g(D, 16, Right, 0.1), g(S, 8, Center, 0.2)] },
    ScriptedWave { message: "WAVE 5 - WRAITHS INCOMING", groups: &[g(W, 12, Scattered, 0.25), g(D, 24, Line, 0.1)] },
    ScriptedWave { message: "WAVE 6 - HARVESTERS!", groups: &[g(H, 8, Center, 0.3), g(D, 24, Scattered, 0.075)] },
    ScriptedWave { message: "WAVE 7 - SPLITTERS", groups: &[g(Sp, 16, Line, 0.2), g(S, 8, Center, 0.3)] },
    ScriptedWave { message: "WAVE 8 - HEAVY ASSAULT", groups: &[g(D, 24, Scattered, 0.05), g(W, 12, Scattered, 0.15), g(S, 8, Center, 0.25)] },
    ScriptedWave { message: "WAVE 9 - FINAL WAVE", groups: &[g(H, 8, Line, 0.25), g(Sp, 12, Scattered, 0.15), g(W, 12, Scattered, 0.2), g(D, 16, V, 0.075)] },
];

#[rustfmt::skip]
const VENUS: [ScriptedWave; 9] = [
    ScriptedWave { message: "WAVE 1 - ENTERING ATMOSPHERE", groups: &[g(D, 20, Scattered, 0.1)] },
    ScriptedWave { message: "WAVE 2", groups: &[g(S, 8, Line, 0.3), g(D, 16, Scattered, 0.1)] },
    ScriptedWave { message: "WAVE 3 - STORM FORMATION", groups: &[g(W, 10, Scattered, 0.2), g(D, 20, V, 0.1)] },
    ScriptedWave { message: "WAVE 4", groups: &[g(H, 6, Center, 0.4), g(S, 8, Scattered, 0.2), g(D, 12, Left, 0.1)] },
    ScriptedWave { message: "WAVE 5 - SPLITTER SWARM", groups: &[g(Sp, 12, Line, 0.2), g(W, 8, Scattered, 0.25)] },
    ScriptedWave { message: "WAVE 6 - AMBUSH!", groups: &[g(D, 16, Left, 0.075), g(D, 16, Right, 0.075), g(S, 6, Center, 0.3)] },
    ScriptedWave { message: "WAVE 7 - ELITE FORCES", groups: &[g(H, 8, Scattered, 0.3), g(Sp, 10, V, 0.2)] },
    ScriptedWave { message: "WAVE 8 - STORM SURGE", groups: &[g(W, 16, Scattered, 0.15), g(S, 8, Center, 0.25), g(D, 20, Scattered, 0.05)] },
    ScriptedWave { message: "WAVE 9 - FINAL DEFENSE", groups: &[g(H, 6, Line, 0.3), g(Sp, 10, Scattered, 0.15), g(W, 10, Scattered, 0.2), g(S, 6, Center, 0.3)] },
];

#[rustfmt::skip]
const EARTH_ORBIT: [ScriptedWave; 9] = [
    ScriptedWave { message: "WAVE 1 - ENTERING EARTH ORBIT", groups: &[g(D, 24, Scattered, 0.075), g(S, 10, Line, 0.2)] },
    ScriptedWave { message: "WAVE 2 - TEMPORAL SCOUTS", groups: &[g(W, 14, Scattered, 0.15), g(D, 20, V, 0.1)] },
    ScriptedWave { message: "WAVE 3 - HEAVY INFANTRY", groups: &[g(H, 10, Center, 0.25), g(Sp, 14, Scattered, 0.15), g(D, 16, Left, 0.075)] },
    ScriptedWave { message: "WAVE 4 - PINCER ATTACK", groups: &[g(S, 8, Left, 0.2), g(S, 8, Right, 0.2), g(W, 12, Center, 0.15)] },
    ScriptedWave { message: "WAVE 5 - SPLITTER STORM", groups: &[g(Sp, 20, Line, 0.1), g(D, 24, Scattered, 0.05)] },
    ScriptedWave { message: "WAVE 6 - ELITE GUARD", groups: &[g(H, 8, Line, 0.3), g(W, 16, Scattered, 0.1), g(S, 10, Center, 0.2)] },
    ScriptedWave { message: "WAVE 7 - TEMPORAL BARRAGE", groups: &[g(D, 20, Left, 0.05), g(D, 20, Right, 0.05), g(Sp, 12, Center, 0.15)] },
    ScriptedWave { message: "WAVE 8 - ALL-OUT ASSAULT", groups: &[g(H, 6, Scattered, 0.25), g(W, 14, Scattered, 0.125), g(S, 10, Line, 0.175), g(D, 20, V, 0.05)] },
    ScriptedWave { message: "WAVE 9 - LAST STAND", groups: &[g(Sp, 16, Scattered, 0.1), g(H, 10, Line, 0.2), g(W, 14, Scattered, 0.125), g(S, 8, Center, 0.225)] },
];

/// Base counts for chapters 4 onward; scaled by [`procedural_count`].
#[rustfmt::skip]
const PROCEDURAL: [ScriptedWave; 9] = [
    ScriptedWave { message: "WAVE 1", groups: &[g(D, 15, Scattered, 0.1), g(S, 5, Center, 0.3)] },
    ScriptedWave { message: "WAVE 2", groups: &[g(H, 4, Line, 0.4), g(D, 20, Scattered, 0.05)] },
    ScriptedWave { message: "WAVE 3", groups: &[g(W, 12, V, 0.15), g(Sp, 8, Scattered, 0.2)] },
    ScriptedWave { message: "WAVE 4", groups: &[g(H, 6, Center, 0.3), g(S, 8, Line, 0.2)] },
    ScriptedWave { message: "WAVE 5", groups: &[g(D, 30, Scattered, 0.05), g(Sp, 10, Scattered, 0.1)] },
    ScriptedWave { message: "WAVE 6", groups: &[g(W, 15, Left, 0.1), g(W, 15, Right, 0.1), g(H, 5, Center, 0.4)] },
    ScriptedWave { message: "WAVE 7", groups: &[g(D, 20, Scattered, 0.075), g(S, 10, Line, 0.2), g(Sp, 8, V, 0.15)] },
    ScriptedWave { message: "WAVE 8", groups: &[g(Sp, 15, Scattered, 0.1), g(W, 10, Scattered, 0.15)] },
    ScriptedWave { message: "WAVE 9 - FINAL DEFENSE", groups: &[g(H, 8, Line, 0.25), g(W, 12, V, 0.15), g(S, 8, Center, 0.3)] },
];

/// `floor(base · (1 + (chapter − 1) · 0.15))`.
pub fn procedural_count(base: u32, chapter: u32) -> u32 {
    let scale = 1.0 + chapter.saturating_sub(1) as f64 * PROCEDURAL_COUNT_GROWTH;
    (base as f64 * scale).floor() as u32
}

/// Resolve wave `wave` (1-based) of `chapter`.
pub fn wave_plan(chapter: u32, wave: u32) -> GameResult<WavePlan> {
    validate_chapter(chapter)?;
    if wave == 0 || wave > WAVES_PER_CHAPTER {
        return Err(GameError::UnknownWave { chapter, wave });
    }

    if wave == WAVES_PER_CHAPTER {
        let boss = BossKind::for_chapter(chapter)?;
        return Ok(WavePlan {
            message: boss.warning().to_string(),
            groups: Vec::new(),
            boss: Some(boss),
        });
    }

    let idx = (wave - 1) as usize;
    let plan = match chapter {
        1 => scripted(&MERCURY[idx]),
        2 => scripted(&VENUS[idx]),
        3 => scripted(&EARTH_ORBIT[idx]),
        _ => {
            let template = &PROCEDURAL[idx];
            let message = if idx == 0 {
                format!("WAVE 1 - CHAPTER {chapter}")
            } else {
                template.message.to_string()
            };
            WavePlan {
                message,
                groups: template
                    .groups
                    .iter()
                    .map(|group| SpawnGroup {
                        count: procedural_count(group.count, chapter),
                        ..*group
                    })
                    .collect(),
                boss: None,
            }
        }
    };
    Ok(plan)
}

fn scripted(wave: &ScriptedWave) -> WavePlan {
    WavePlan {
        message: wave.message.to_string(),
        groups: wave.groups.to_vec(),
        boss: None,
    }
}

/// Top-left spawn position of unit `index` of `total` for a `width`-wide
/// enemy.
pub fn place(formation: Formation, index: u32, total: u32, width: f32, rng: &mut GameRng) -> Vec2 {
    let third = PLAYFIELD_WIDTH / 3.0;
    let i = index as f32;
    match formation {
        Formation::Line => Vec2::new(
            PLAYFIELD_WIDTH / (total + 1) as f32 * (i + 1.0) - width / 2.0,
            -50.0 - i * 20.0,
        ),
        Formation::V => {
            let offset = i - (total / 2) as f32;
            Vec2::new(
                PLAYFIELD_WIDTH / 2.0 + offset * 40.0 - width / 2.0,
                -50.0 - offset.abs() * 30.0,
            )
        }
        Formation::Scattered => Vec2::new(
            rng.range(50.0, PLAYFIELD_WIDTH - 50.0 - width),
            rng.range(-100.0, -50.0),
        ),
        Formation::Left => Vec2::new(rng.range(50.0, third), -50.0 - i * 30.0),
        Formation::Right => Vec2::new(
            rng.range(third * 2.0, PLAYFIELD_WIDTH - 50.0 - width),
            -50.0 - i * 30.0,
        ),
        Formation::Center => Vec2::new(rng.range(third, third * 2.0 - width), -50.0 - i * 40.0),
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WavePhase {
    #[default]
    Idle,
    /// Spawning and/or waiting for the wave to be cleared.
    Active,
    /// Pause before the next wave starts.
    Break { remaining: f32 },
    /// The boss wave; only boss defeat ends it.
    BossFight,
}

/// One queued enemy spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingSpawn {
    /// Wave clock time at which the unit enters (s).
    pub at: f32,
    pub kind: EnemyKind,
    pub pos: Vec2,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct WaveScheduler {
    pub phase: WavePhase,
    /// Current wave, 1-based; 0 before the first wave.
    pub wave: u32,
    /// Seconds since the current wave started.
    pub elapsed: f32,
    pub queue: VecDeque<PendingSpawn>,
    /// Units still to be killed before the wave may complete.
    pub remaining: u32,
    pub banner: String,
    pub banner_secs: f32,
    pending_boss: Option<BossKind>,
}

impl WaveScheduler {
    /// Drop all pending work and return to idle.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Load wave `wave` of `chapter` and queue its spawns.
    pub fn start_wave(&mut self, chapter: u32, wave: u32, rng: &mut GameRng) -> GameResult<()> {
        let plan = wave_plan(chapter, wave)?;
        self.queue.clear();
        self.elapsed = 0.0;
        self.wave = wave;
        self.banner = plan.message.clone();
        self.banner_secs = WAVE_BANNER_SECS;

        if let Some(boss) = plan.boss {
            self.remaining = 0;
            self.pending_boss = Some(boss);
            self.phase = WavePhase::BossFight;
            info!("⚠ Chapter {chapter} wave {wave}: {}", plan.message);
            return Ok(());
        }

        let mut clock = 0.0;
        for group in &plan.groups {
            let width = group.kind.profile().size.x;
            for i in 0..group.count {
                clock += group.delay_secs;
                self.queue.push_back(PendingSpawn {
                    at: clock,
                    kind: group.kind,
                    pos: place(group.formation, i, group.count, width, rng),
                });
            }
        }
        self.remaining = plan.unit_count();
        self.phase = WavePhase::Active;
        info!(
            "Chapter {chapter} wave {wave}: {} ({} units)",
            plan.message, self.remaining
        );
        Ok(())
    }

    /// Pop every spawn due at the current wave clock.
    pub fn drain_due(&mut self) -> Vec<PendingSpawn> {
        let mut due = Vec::new();
        while self.queue.front().is_some_and(|s| s.at <= self.elapsed) {
            if let Some(spawn) = self.queue.pop_front() {
                due.push(spawn);
            }
        }
        due
    }

    pub fn record_kills(&mut self, kills: u32) {
        self.remaining = self.remaining.saturating_sub(kills);
    }

    /// Completion test for an active wave given the live enemy count.
    pub fn is_wave_clear(&self, live_enemies: usize) -> bool {
        self.phase == WavePhase::Active
            && self.remaining == 0
            && self.queue.is_empty()
            && live_enemies == 0
    }

    /// Hand over the boss queued by the boss wave, at most once.
    pub fn take_pending_boss(&mut self) -> Option<BossKind> {
        self.pending_boss.take()
    }

    pub fn is_boss_wave(&self) -> bool {
        self.phase == WavePhase::BossFight
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct WavePlugin;

impl Plugin for WavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WaveScheduler>()
            .add_systems(
                Update,
                wave_spawn_system
                    .in_set(FrameSet::Simulate)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                Update,
                wave_progress_system
                    .in_set(FrameSet::Progress)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// Advance the wave clock and spawn every queued unit that has fallen due.
pub fn wave_spawn_system(
    mut commands: Commands,
    time: Res<Time>,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut scheduler: ResMut<WaveScheduler>,
) {
    if scheduler.phase != WavePhase::Active {
        return;
    }
    scheduler.elapsed += time.delta_secs();

    let multipliers = config.multipliers();
    for spawn in scheduler.drain_due() {
        let pattern = rng.pick(&MovementPattern::ENTRY);
        let phase = rng.range(0.0, TAU);
        let enemy = Enemy::new(spawn.kind, &multipliers, pattern, phase);
        let size = spawn.kind.profile().size;
        spawn_enemy(
            &mut commands,
            enemy,
            Body::new(spawn.pos.x, spawn.pos.y, size.x, size.y),
        );
    }
}

/// Apply this frame's kills, detect wave completion and run the inter-wave
/// break.
pub fn wave_progress_system(
    time: Res<Time>,
    config: Res<GameConfig>,
    progress: Res<ChapterProgress>,
    mut rng: ResMut<GameRng>,
    mut reports: MessageReader<CollisionReport>,
    mut scheduler: ResMut<WaveScheduler>,
    q_enemies: Query<&Enemy>,
    q_boss: Query<&Boss>,
) {
    let kills: u32 = reports.read().map(|r| r.enemies_killed).sum();
    scheduler.record_kills(kills);

    let dt = time.delta_secs();
    scheduler.banner_secs = (scheduler.banner_secs - dt).max(0.0);

    if q_boss.iter().any(|boss| !boss.is_defeated()) {
        return;
    }

    match scheduler.phase {
        WavePhase::Active => {
            let live = q_enemies.iter().filter(|e| e.active).count();
            if scheduler.is_wave_clear(live) {
                info!("✓ Wave {} cleared", scheduler.wave);
                scheduler.phase = WavePhase::Break {
                    remaining: config.wave_delay_secs,
                };
            }
        }
        WavePhase::Break { remaining } => {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                scheduler.phase = WavePhase::Break { remaining };
                return;
            }
            let next = scheduler.wave + 1;
            if let Err(e) = scheduler.start_wave(progress.chapter, next, &mut rng) {
                warn!("⚠ Could not start wave {next}: {e}");
                scheduler.phase = WavePhase::Idle;
            }
        }
        WavePhase::Idle | WavePhase::BossFight => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Difficulty;
    use std::time::Duration;

    #[test]
    fn chapter_one_opens_with_two_drifter_groups() {
        let plan = wave_plan(1, 1).expect("wave 1");
        assert_eq!(plan.message, "WAVE 1 - INCOMING!");
        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.unit_count(), 32);
        assert!(plan.boss.is_none());
    }

    #[test]
    fn last_wave_of_each_chapter_is_its_boss() {
        for chapter in 1..=12 {
            let plan = wave_plan(chapter, WAVES_PER_CHAPTER).expect("boss wave");
            assert_eq!(plan.boss, BossKind::for_chapter(chapter).ok());
            assert!(plan.groups.is_empty());
            assert!(plan.message.starts_with("WARNING"));
        }
    }

    #[test]
    fn out_of_range_waves_and_chapters_are_errors() {
        assert!(matches!(wave_plan(0, 1), Err(GameError::UnknownChapter(0))));
        assert!(matches!(wave_plan(13, 1), Err(GameError::UnknownChapter(13))));
        assert!(matches!(
            wave_plan(1, 11),
            Err(GameError::UnknownWave { chapter: 1, wave: 11 })
        ));
        assert!(wave_plan(1, 0).is_err());
    }

    #[test]
    fn procedural_chapters_scale_counts() {
        assert_eq!(procedural_count(15, 4), 21);
        assert_eq!(procedural_count(15, 5), 24);
        assert_eq!(procedural_count(5, 5), 8);
        assert_eq!(procedural_count(30, 12), 79);

        let plan = wave_plan(5, 1).expect("chapter 5 wave 1");
        assert_eq!(plan.message, "WAVE 1 - CHAPTER 5");
        assert_eq!(plan.groups[0].count, 24);
        assert_eq!(plan.groups[1].count, 8);
    }

    #[test]
    fn line_and_v_formations_are_deterministic() {
        let mut rng = GameRng::seeded(1);
        let first = place(Formation::Line, 0, 3, 40.0, &mut rng);
        assert_eq!(first, Vec2::new(180.0, -50.0));
        let third = place(Formation::Line, 2, 3, 40.0, &mut rng);
        assert_eq!(third, Vec2::new(580.0, -90.0));

        // Unit 2 of 5 sits on the centre line, at the tip of the V.
        let tip = place(Formation::V, 2, 5, 40.0, &mut rng);
        assert_eq!(tip, Vec2::new(380.0, -50.0));
        let wing = place(Formation::V, 0, 5, 40.0, &mut rng);
        assert_eq!(wing, Vec2::new(300.0, -110.0));
    }

    #[test]
    fn random_formations_stay_in_their_band() {
        let mut rng = GameRng::seeded(9);
        for i in 0..50 {
            let left = place(Formation::Left, i, 50, 35.0, &mut rng);
            assert!(left.x >= 50.0 && left.x < PLAYFIELD_WIDTH / 3.0);
            let right = place(Formation::Right, i, 50, 35.0, &mut rng);
            assert!(right.x >= PLAYFIELD_WIDTH * 2.0 / 3.0 && right.x < 715.0);
            let center = place(Formation::Center, i, 50, 35.0, &mut rng);
            assert!(center.x >= PLAYFIELD_WIDTH / 3.0);
            let scattered = place(Formation::Scattered, i, 50, 35.0, &mut rng);
            assert!((-100.0..-50.0).contains(&scattered.y));
        }
    }

    #[test]
    fn spawn_clock_accumulates_across_groups() {
        let mut rng = GameRng::seeded(2);
        let mut scheduler = WaveScheduler::default();
        scheduler.start_wave(1, 1, &mut rng).expect("start");
        assert_eq!(scheduler.queue.len(), 32);
        assert_eq!(scheduler.remaining, 32);
        assert!((scheduler.queue[0].at - 0.2).abs() < 1e-5);
        assert!((scheduler.queue[15].at - 3.2).abs() < 1e-4);
        assert!((scheduler.queue[16].at - 3.35).abs() < 1e-4);

        scheduler.elapsed = 0.45;
        assert_eq!(scheduler.drain_due().len(), 2);
        assert_eq!(scheduler.queue.len(), 30);
    }

    #[test]
    fn remaining_never_underflows() {
        let mut scheduler = WaveScheduler {
            remaining: 2,
            ..Default::default()
        };
        scheduler.record_kills(5);
        assert_eq!(scheduler.remaining, 0);
    }

    #[test]
    fn boss_wave_hands_over_its_boss_once() {
        let mut rng = GameRng::seeded(2);
        let mut scheduler = WaveScheduler::default();
        scheduler.start_wave(2, 10, &mut rng).expect("boss wave");
        assert!(scheduler.is_boss_wave());
        assert!(scheduler.queue.is_empty());
        assert_eq!(scheduler.take_pending_boss(), Some(BossKind::Stormweaver));
        assert_eq!(scheduler.take_pending_boss(), None);
    }

    fn progress_world() -> World {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(100));
        world.insert_resource(time);
        world.insert_resource(GameConfig {
            difficulty: Difficulty::Hard,
            ..Default::default()
        });
        world.insert_resource(ChapterProgress::default());
        world.insert_resource(GameRng::seeded(4));
        world.init_resource::<Messages<CollisionReport>>();
        world.insert_resource(WaveScheduler {
            phase: WavePhase::Active,
            wave: 1,
            remaining: 1,
            ..Default::default()
        });
        world
    }

    #[test]
    fn wave_waits_for_kills_and_empty_field() {
        let mut world = progress_world();
        let straggler = world
            .spawn((
                Enemy::new(
                    EnemyKind::Drifter,
                    &Difficulty::Hard.multipliers(),
                    MovementPattern::Dive,
                    0.0,
                ),
                Body::new(100.0, 100.0, 35.0, 35.0),
            ))
            .id();
        let mut schedule = Schedule::default();
        schedule.add_systems(wave_progress_system);

        world
            .resource_mut::<Messages<CollisionReport>>()
            .write(CollisionReport {
                enemies_killed: 1,
                ..Default::default()
            });
        schedule.run(&mut world);
        let scheduler = world.resource::<WaveScheduler>();
        assert_eq!(scheduler.remaining, 0);
        assert_eq!(scheduler.phase, WavePhase::Active, "a live enemy holds the wave open");

        world.despawn(straggler);
        schedule.run(&mut world);
        assert!(matches!(
            world.resource::<WaveScheduler>().phase,
            WavePhase::Break { .. }
        ));
    }

    #[test]
    fn break_elapses_into_next_wave() {
        let mut world = progress_world();
        world.resource_mut::<WaveScheduler>().phase = WavePhase::Break { remaining: 0.05 };
        let mut schedule = Schedule::default();
        schedule.add_systems(wave_progress_system);
        schedule.run(&mut world);

        let scheduler = world.resource::<WaveScheduler>();
        assert_eq!(scheduler.wave, 2);
        assert_eq!(scheduler.phase, WavePhase::Active);
        assert_eq!(scheduler.remaining, 40);
        assert_eq!(scheduler.banner, "WAVE 2");
    }

    #[test]
    fn spawn_system_releases_due_units() {
        let mut world = progress_world();
        {
            let mut rng = GameRng::seeded(3);
            let mut scheduler = world.resource_mut::<WaveScheduler>();
            scheduler.start_wave(1, 1, &mut rng).expect("start");
        }
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(500));
        world.insert_resource(time);

        let mut schedule = Schedule::default();
        schedule.add_systems(wave_spawn_system);
        schedule.run(&mut world);

        // Due at 0.2 and 0.4 s.
        assert_eq!(world.query::<&Enemy>().iter(&world).count(), 2);
        assert_eq!(world.resource::<WaveScheduler>().queue.len(), 30);
    }
}
