//! Boss attack routines.
//!
//! Routines never touch the ECS; they return [`Shot`] orders (origin +
//! heading) that the boss system turns into enemy bullets.  This keeps every
//! pattern testable as a pure function of boss state.
//!
//! | Style        | Phase 3                      | Phase 2                        | Phase 1                    |
//! |--------------|------------------------------|--------------------------------|----------------------------|
//! | Sunkeeper    | 2 aimed vent shots / 2.5 s   | 3-way spread down / 1.8 s      | 2 aimed shots / 1.2 s      |
//! | Stormweaver  | 8-ring / 2 s                 | aimed triple / 1.5 s           | 12-ring / 0.8 s            |
//! | ChronoWeaver | rift + 12-ring / 3 s         | 5-shot burst (+40 % rift) / 1.5 s | double 16-spiral / 0.8 s |
//! | generic      | intensity 1 / 1.5 s          | intensity 2 / 1.5 s            | intensity 3 / 1.5 s        |

use super::kinds::AttackStyle;
use crate::constants::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::geometry::angle_to;
use crate::rng::GameRng;
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// One enemy bullet to fire.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
    pub angle: f32,
}

/// A tear in space opened by the Chrono-Weaver that fires aimed shots on its
/// own until its ammunition runs out.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRift {
    pub pos: Vec2,
    /// Seconds until the next shot.
    pub timer: f32,
    pub shots: u8,
    /// Cosmetic spin (rad).
    pub spin: f32,
}

const RIFT_FIRST_SHOT_SECS: f32 = 0.5;
const RIFT_SHOT_INTERVAL_SECS: f32 = 0.8;
const RIFT_SPIN_RATE: f32 = 1.0 / 0.3;
const SUNKEEPER_VENT_ANGLES: [f32; 2] = [PI * 0.7, PI * 0.3];
const SUNKEEPER_VENT_RADIUS: f32 = 70.0;

impl TimeRift {
    fn open(rng: &mut GameRng, shots: u8) -> Self {
        Self {
            pos: Vec2::new(
                rng.range(100.0, PLAYFIELD_WIDTH - 100.0),
                rng.range(100.0, PLAYFIELD_HEIGHT / 2.0),
            ),
            timer: RIFT_FIRST_SHOT_SECS,
            shots,
            spin: 0.0,
        }
    }
}

/// Boss state an attack routine reads.
#[derive(Debug, Clone, Copy)]
pub struct AttackContext {
    pub center: Vec2,
    /// Bottom-centre of the boss body (muzzle for downward attacks).
    pub muzzle: Vec2,
    pub player: Vec2,
    pub phase: u8,
    pub max_phase: u8,
    /// Rotating angle driving rings and vents (rad).
    pub spin: f32,
    /// Movement clock (rad).
    pub move_time: f32,
}

// ── Pattern primitives ────────────────────────────────────────────────────────

/// `count` bullets evenly spaced around a full circle, rotated by `offset`.
pub fn ring(origin: Vec2, count: u32, offset: f32) -> impl Iterator<Item = Shot> {
    (0..count).map(move |i| Shot {
        origin,
        angle: offset + i as f32 / count as f32 * TAU,
    })
}

/// Seconds between volleys for `style` in `phase`.
pub fn attack_interval(style: AttackStyle, phase: u8) -> f32 {
    match (style, phase) {
        (AttackStyle::Sunkeeper, 3) => 2.5,
        (AttackStyle::Sunkeeper, 2) => 1.8,
        (AttackStyle::Sunkeeper, _) => 1.2,
        (AttackStyle::Stormweaver, 3) => 2.0,
        (AttackStyle::Stormweaver, 2) => 1.5,
        (AttackStyle::Stormweaver, _) => 0.8,
        (AttackStyle::ChronoWeaver, 3) => 3.0,
        (AttackStyle::ChronoWeaver, 2) => 1.5,
        (AttackStyle::ChronoWeaver, _) => 0.8,
        _ => 1.5,
    }
}

/// How fast the style's `spin` angle turns (rad/s).
pub fn spin_rate(style: AttackStyle) -> f32 {
    match style {
        AttackStyle::Sunkeeper => 2.0,
        AttackStyle::Stormweaver => 1.0 / 0.3,
        AttackStyle::ChronoWeaver => 2.5,
        _ => 0.0,
    }
}

/// Produce one volley for `style`.  May open new rifts.
pub fn fire_volley(
    style: AttackStyle,
    ctx: &AttackContext,
    rng: &mut GameRng,
    rifts: &mut Vec<TimeRift>,
) -> Vec<Shot> {
    match style {
        AttackStyle::Sunkeeper => sunkeeper(ctx),
        AttackStyle::Stormweaver => stormweaver(ctx),
        AttackStyle::ChronoWeaver => chrono_weaver(ctx, rng, rifts),
        AttackStyle::Aimed | AttackStyle::Spiral | AttackStyle::Scatter => {
            generic(style, ctx, rng)
        }
    }
}

fn sunkeeper(ctx: &AttackContext) -> Vec<Shot> {
    match ctx.phase {
        3 => SUNKEEPER_VENT_ANGLES
            .iter()
            .map(|vent| {
                let a = ctx.spin + vent;
                let origin = ctx.center + Vec2::new(a.cos(), a.sin()) * SUNKEEPER_VENT_RADIUS;
                Shot {
                    origin,
                    angle: angle_to(origin, ctx.player),
                }
            })
            .collect(),
        2 => (-1..=1)
            .map(|i| Shot {
                origin: ctx.muzzle,
                angle: FRAC_PI_2 + i as f32 * 0.25,
            })
            .collect(),
        _ => {
            let aim = angle_to(ctx.muzzle, ctx.player);
            vec![
                Shot {
                    origin: ctx.muzzle,
                    angle: aim,
                },
                Shot {
                    origin: ctx.muzzle,
                    angle: aim + 0.2,
                },
            ]
        }
    }
}

fn stormweaver(ctx: &AttackContext) -> Vec<Shot> {
    match ctx.phase {
        3 => ring(ctx.center, 8, ctx.spin).collect(),
        2 => {
            let aim = angle_to(ctx.muzzle, ctx.player);
            [-30.0, 0.0, 30.0]
                .iter()
                .map(|dx| Shot {
                    origin: ctx.muzzle + Vec2::new(*dx, 0.0),
                    angle: aim,
                })
                .collect()
        }
        _ => ring(ctx.center, 12, ctx.spin * 2.0).collect(),
    }
}

fn chrono_weaver(ctx: &AttackContext, rng: &mut GameRng, rifts: &mut Vec<TimeRift>) -> Vec<Shot> {
    match ctx.phase {
        3 => {
            rifts.push(TimeRift::open(rng, 4));
            ring(ctx.center, 12, ctx.spin).collect()
        }
        2 => {
            let aim = angle_to(ctx.center, ctx.player);
            let burst = (-2..=2)
                .map(|i| Shot {
                    origin: ctx.center,
                    angle: aim + i as f32 * 0.15,
                })
                .collect();
            if rng.chance(0.4) {
                rifts.push(TimeRift::open(rng, 3));
            }
            burst
        }
        _ => ring(ctx.center, 16, ctx.spin * 3.0)
            .chain(ring(ctx.center, 16, -ctx.spin * 3.0))
            .collect(),
    }
}

/// Shared routine for the procedural bosses: intensity grows as the phase
/// counter falls.
fn generic(style: AttackStyle, ctx: &AttackContext, rng: &mut GameRng) -> Vec<Shot> {
    let intensity = (ctx.max_phase - ctx.phase + 1) as u32;
    match style {
        AttackStyle::Spiral => ring(ctx.center, 8 * intensity, ctx.move_time).collect(),
        AttackStyle::Scatter => (0..5 * intensity)
            .map(|_| Shot {
                origin: ctx.center,
                angle: rng.range(0.0, PI),
            })
            .collect(),
        _ => {
            let aim = angle_to(ctx.center, ctx.player);
            (0..intensity)
                .map(|i| Shot {
                    origin: ctx.center,
                    angle: aim + i as f32 * 0.2 - intensity as f32 * 0.1,
                })
                .collect()
        }
    }
}

/// Age every rift by `dt`, collect the shots that fall due, and close spent
/// rifts.
pub fn update_rifts(rifts: &mut Vec<TimeRift>, dt: f32, player: Vec2) -> Vec<Shot> {
    let mut shots = Vec::new();
    for rift in rifts.iter_mut() {
        rift.timer -= dt;
        rift.spin += RIFT_SPIN_RATE * dt;
        if rift.timer <= 0.0 && rift.shots > 0 {
            shots.push(Shot {
                origin: rift.pos,
                angle: angle_to(rift.pos, player),
            });
            rift.timer = RIFT_SHOT_INTERVAL_SECS;
            rift.shots -= 1;
        }
    }
    rifts.retain(|r| r.shots > 0);
    shots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(phase: u8) -> AttackContext {
        AttackContext {
            center: Vec2::new(400.0, 150.0),
            muzzle: Vec2::new(400.0, 200.0),
            player: Vec2::new(400.0, 500.0),
            phase,
            max_phase: 3,
            spin: 0.0,
            move_time: 0.0,
        }
    }

    #[test]
    fn ring_is_evenly_spaced() {
        let shots: Vec<Shot> = ring(Vec2::ZERO, 4, 0.0).collect();
        assert_eq!(shots.len(), 4);
        assert!((shots[1].angle - FRAC_PI_2).abs() < 1e-6);
        assert!((shots[3].angle - 3.0 * FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn story_bosses_change_pattern_per_phase() {
        let mut rng = GameRng::seeded(1);
        let mut rifts = Vec::new();
        let count = |style, phase, rng: &mut GameRng, rifts: &mut Vec<TimeRift>| {
            fire_volley(style, &ctx(phase), rng, rifts).len()
        };
        assert_eq!(count(AttackStyle::Sunkeeper, 3, &mut rng, &mut rifts), 2);
        assert_eq!(count(AttackStyle::Sunkeeper, 2, &mut rng, &mut rifts), 3);
        assert_eq!(count(AttackStyle::Sunkeeper, 1, &mut rng, &mut rifts), 2);
        assert_eq!(count(AttackStyle::Stormweaver, 3, &mut rng, &mut rifts), 8);
        assert_eq!(count(AttackStyle::Stormweaver, 2, &mut rng, &mut rifts), 3);
        assert_eq!(count(AttackStyle::Stormweaver, 1, &mut rng, &mut rifts), 12);
        assert_eq!(count(AttackStyle::ChronoWeaver, 1, &mut rng, &mut rifts), 32);
        assert!(rifts.is_empty());
    }

    #[test]
    fn generic_intensity_grows_as_phase_drops() {
        let mut rng = GameRng::seeded(2);
        let mut rifts = Vec::new();
        for (phase, aimed, spiral, scatter) in [(3, 1, 8, 5), (2, 2, 16, 10), (1, 3, 24, 15)] {
            let c = ctx(phase);
            assert_eq!(fire_volley(AttackStyle::Aimed, &c, &mut rng, &mut rifts).len(), aimed);
            assert_eq!(fire_volley(AttackStyle::Spiral, &c, &mut rng, &mut rifts).len(), spiral);
            let scattered = fire_volley(AttackStyle::Scatter, &c, &mut rng, &mut rifts);
            assert_eq!(scattered.len(), scatter);
            assert!(scattered.iter().all(|s| (0.0..PI).contains(&s.angle)));
        }
    }

    #[test]
    fn rift_fires_after_delay_then_on_interval_until_spent() {
        let mut rng = GameRng::seeded(3);
        let mut rifts = Vec::new();
        let ring_shots = fire_volley(AttackStyle::ChronoWeaver, &ctx(3), &mut rng, &mut rifts);
        assert_eq!(ring_shots.len(), 12);
        assert_eq!(rifts.len(), 1);
        assert_eq!(rifts[0].shots, 4);

        let player = Vec2::new(400.0, 500.0);
        assert!(update_rifts(&mut rifts, 0.4, player).is_empty());
        assert_eq!(update_rifts(&mut rifts, 0.2, player).len(), 1);

        let mut total = 1;
        for _ in 0..40 {
            total += update_rifts(&mut rifts, 0.1, player).len();
        }
        assert_eq!(total, 4);
        assert!(rifts.is_empty());
    }
}
