//! Floating combat text: damage numbers and pickup labels that pop up,
//! arc under gravity and fade out.

use crate::constants::{FLOATING_TEXT_GRAVITY, FLOATING_TEXT_SECS};
use crate::game::{FrameSet, GameState};
use crate::geometry::Body;
use bevy::prelude::*;
use rand::Rng;

pub const TEXT_WHITE: [f32; 3] = [1.0, 1.0, 1.0];
pub const TEXT_YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
pub const TEXT_RED: [f32; 3] = [1.0, 0.0, 0.0];

#[derive(Component, Debug, Clone)]
pub struct FloatingText {
    pub text: String,
    pub color: [f32; 3],
    pub velocity: Vec2,
    /// Seconds left to live.
    pub life: f32,
}

impl FloatingText {
    /// Remaining life as a fraction of the full lifetime.
    #[inline]
    pub fn progress(&self) -> f32 {
        (self.life / FLOATING_TEXT_SECS).clamp(0.0, 1.0)
    }

    /// Text grows by half its size as it fades.
    #[inline]
    pub fn scale(&self) -> f32 {
        1.0 + (1.0 - self.progress()) * 0.5
    }
}

pub struct FloatingTextPlugin;

impl Plugin for FloatingTextPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            floating_text_system
                .in_set(FrameSet::Simulate)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Spawn `text` at `pos` with a random upward kick.
pub fn spawn_floating_text(commands: &mut Commands, pos: Vec2, text: impl Into<String>, color: [f32; 3]) {
    let mut rng = rand::thread_rng();
    let velocity = Vec2::new(rng.gen_range(-60.0_f32..60.0), rng.gen_range(-240.0_f32..-120.0));
    commands.spawn((
        FloatingText {
            text: text.into(),
            color,
            velocity,
            life: FLOATING_TEXT_SECS,
        },
        Body::new(pos.x, pos.y, 0.0, 0.0),
        Transform::default(),
        Visibility::default(),
    ));
}

/// Damage number for a hit on an enemy; hits above the critical threshold
/// are shown in yellow.
pub fn spawn_damage_number(commands: &mut Commands, pos: Vec2, amount: f32) {
    let color = if amount > crate::constants::CRITICAL_HIT_THRESHOLD {
        TEXT_YELLOW
    } else {
        TEXT_WHITE
    };
    spawn_floating_text(commands, pos, format!("{}", amount.round() as i64), color);
}

pub fn floating_text_system(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut FloatingText, &mut Body)>,
) {
    let dt = time.delta_secs();
    for (entity, mut text, mut body) in query.iter_mut() {
        body.pos += text.velocity * dt;
        text.velocity.y += FLOATING_TEXT_GRAVITY * dt;
        text.life -= dt;
        if text.life <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
