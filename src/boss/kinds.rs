//! Boss catalog: one closed enum and one static profile per boss.
//!
//! | Chapter | Boss            | HP   | Movement     | Attack      |
//! |---------|-----------------|------|--------------|-------------|
//! | 1       | The Sunkeeper   | 800  | sway         | scripted    |
//! | 2       | The Stormweaver | 1000 | figure-eight | scripted    |
//! | 3       | Chrono-Weaver   | 1200 | drift        | scripted    |
//! | 4       | The Echo        | 1400 | sway         | aimed       |
//! | 5       | The Warden      | 1600 | bounce       | scatter     |
//! | 6       | Siegebreaker    | 1800 | figure-eight | spiral      |
//! | 7       | The Tempest     | 2000 | sway         | aimed       |
//! | 8       | The Leviathan   | 2200 | figure-eight | scatter     |
//! | 9       | The Ringmaster  | 2500 | bounce       | spiral      |
//! | 10      | The Forgemaster | 2800 | sway         | aimed       |
//! | 11      | The Architect   | 3200 | figure-eight | spiral      |
//! | 12      | The Loom Core   | 5000 | sway         | scatter     |

use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossKind {
    Sunkeeper,
    Stormweaver,
    ChronoWeaver,
    Echo,
    Warden,
    Siegebreaker,
    Tempest,
    Leviathan,
    Ringmaster,
    Forgemaster,
    Architect,
    LoomCore,
}

/// How a boss moves once it has finished entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossMovement {
    /// Horizontal sine sway around the centre line.
    Sway,
    /// Sway plus a vertical bob at twice the frequency.
    FigureEight,
    /// Small lateral drift with a bouncing vertical offset.
    Bounce,
    /// Eased pursuit of a Lissajous target.
    Drift,
}

/// Attack routine family.  The three story bosses have bespoke per-phase
/// routines; the rest share a generic routine scaled by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackStyle {
    Sunkeeper,
    Stormweaver,
    ChronoWeaver,
    Aimed,
    Spiral,
    Scatter,
}

#[derive(Debug, Clone, Copy)]
pub struct BossProfile {
    pub name: &'static str,
    pub health: f32,
    pub movement: BossMovement,
    pub attack: AttackStyle,
    /// Resting y once entry completes.
    pub target_y: f32,
    /// Entry descent speed (px/s).
    pub entry_speed: f32,
    /// Rate at which the movement clock advances (rad/s).
    pub move_rate: f32,
    /// Body colour (sRGB).
    pub color: [f32; 3],
    /// Polygon side count for the body mesh; 0 draws a circle.
    pub sides: u8,
    /// Names of the three phases, indexed by `phase - 1`.
    pub phase_names: [&'static str; 3],
}

const GENERIC_PHASES: [&str; 3] = ["DESPERATION", "ASSAULT", "PROBING"];

const fn generic(
    name: &'static str,
    health: f32,
    movement: BossMovement,
    attack: AttackStyle,
    color: [f32; 3],
    sides: u8,
) -> BossProfile {
    BossProfile {
        name,
        health,
        movement,
        attack,
        target_y: 100.0,
        entry_speed: 60.0,
        move_rate: 1.0,
        color,
        sides,
        phase_names: GENERIC_PHASES,
    }
}

const BOSS_PROFILES: [BossProfile; 12] = [
    BossProfile {
        name: "The Sunkeeper",
        health: 800.0,
        movement: BossMovement::Sway,
        attack: AttackStyle::Sunkeeper,
        target_y: 80.0,
        entry_speed: 60.0,
        move_rate: 1.0,
        color: [1.0, 0.55, 0.10],
        sides: 0,
        phase_names: ["MELTDOWN", "FLARE BARRAGE", "SOLAR SHIELD"],
    },
    BossProfile {
        name: "The Stormweaver",
        health: 1000.0,
        movement: BossMovement::FigureEight,
        attack: AttackStyle::Stormweaver,
        target_y: 100.0,
        entry_speed: 90.0,
        move_rate: 1.0 / 1.5,
        color: [0.55, 0.45, 0.33],
        sides: 0,
        phase_names: ["FURY OF VENUS", "LIGHTNING STORM", "STORM GATHERING"],
    },
    BossProfile {
        name: "The Chrono-Weaver",
        health: 1200.0,
        movement: BossMovement::Drift,
        attack: AttackStyle::ChronoWeaver,
        target_y: 100.0,
        entry_speed: 72.0,
        move_rate: 0.5,
        color: [0.60, 0.40, 0.80],
        sides: 6,
        phase_names: ["REALITY COLLAPSE", "TIME DILATION", "TEMPORAL NEXUS"],
    },
    generic("The Echo", 1400.0, BossMovement::Sway, AttackStyle::Aimed, [0.67, 0.67, 0.67], 4),
    generic("The Warden", 1600.0, BossMovement::Bounce, AttackStyle::Scatter, [0.87, 0.0, 0.0], 3),
    generic("The Siegebreaker", 1800.0, BossMovement::FigureEight, AttackStyle::Spiral, [0.53, 0.33, 0.13], 6),
    generic("The Tempest", 2000.0, BossMovement::Sway, AttackStyle::Aimed, [1.0, 0.67, 0.0], 3),
    generic("The Leviathan", 2200.0, BossMovement::FigureEight, AttackStyle::Scatter, [0.0, 0.0, 1.0], 0),
    generic("The Ringmaster", 2500.0, BossMovement::Bounce, AttackStyle::Spiral, [1.0, 0.87, 0.0], 6),
    generic("The Forgemaster", 2800.0, BossMovement::Sway, AttackStyle::Aimed, [0.0, 1.0, 1.0], 4),
    generic("The Architect", 3200.0, BossMovement::FigureEight, AttackStyle::Spiral, [1.0, 0.0, 1.0], 3),
    generic("The Loom Core", 5000.0, BossMovement::Sway, AttackStyle::Scatter, [0.15, 0.15, 0.15], 6),
];

impl BossKind {
    /// Bosses in chapter order.
    pub const ALL: [BossKind; 12] = [
        BossKind::Sunkeeper,
        BossKind::Stormweaver,
        BossKind::ChronoWeaver,
        BossKind::Echo,
        BossKind::Warden,
        BossKind::Siegebreaker,
        BossKind::Tempest,
        BossKind::Leviathan,
        BossKind::Ringmaster,
        BossKind::Forgemaster,
        BossKind::Architect,
        BossKind::LoomCore,
    ];

    #[inline]
    pub fn profile(self) -> &'static BossProfile {
        &BOSS_PROFILES[self as usize]
    }

    /// The boss guarding `chapter` (1-based).
    pub fn for_chapter(chapter: u32) -> GameResult<BossKind> {
        chapter
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
            .ok_or(GameError::UnknownChapter(chapter))
    }

    /// Warning banner shown when the boss wave starts.
    pub fn warning(self) -> &'static str {
        match self {
            BossKind::Sunkeeper => "WARNING - THE SUNKEEPER APPROACHES",
            BossKind::Stormweaver => "WARNING - THE STORMWEAVER AWAKENS",
            BossKind::ChronoWeaver => "WARNING - THE CHRONO-WEAVER MANIFESTS",
            BossKind::Echo => "WARNING - THE ECHO AWAKENS",
            BossKind::Warden => "WARNING - THE WARDEN APPROACHES",
            BossKind::Siegebreaker => "WARNING - ASTEROID ALERT",
            BossKind::Tempest => "WARNING - STORM WARNING",
            BossKind::Leviathan => "WARNING - DEPTH WARNING",
            BossKind::Ringmaster => "WARNING - RING FORTRESS AHEAD",
            BossKind::Forgemaster => "WARNING - FACTORY ONLINE",
            BossKind::Architect => "WARNING - THE ARCHITECT",
            BossKind::LoomCore => "WARNING - TIMELINE COLLAPSE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_chapter_has_a_boss_in_order() {
        for (i, kind) in BossKind::ALL.iter().enumerate() {
            assert_eq!(BossKind::for_chapter(i as u32 + 1).ok(), Some(*kind));
        }
        assert!(BossKind::for_chapter(0).is_err());
        assert!(BossKind::for_chapter(13).is_err());
    }

    #[test]
    fn later_bosses_are_tougher() {
        let hp: Vec<f32> = BossKind::ALL.iter().map(|k| k.profile().health).collect();
        assert!(hp.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(BossKind::LoomCore.profile().health, 5000.0);
    }
}
