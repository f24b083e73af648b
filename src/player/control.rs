//! Player input and movement systems.
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`player_intent_clear_system`]: resets `PlayerIntent`.
//! 2. [`keyboard_to_intent_system`]: translates keys into `PlayerIntent` fields.
//! 3. [`apply_player_intent_system`]: moves the ship from `PlayerIntent` (Playing only).
//!
//! The **input abstraction layer** (`PlayerIntent`) makes movement, firing and
//! the mode screens testable: tests populate the resource directly and run
//! only the systems that read it.

use super::state::{Player, PlayerIntent, PlayerStats, Stat};
use crate::constants::{HUD_STRIP_HEIGHT, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::geometry::Body;
use bevy::prelude::*;

// ── Step 1: Clear ─────────────────────────────────────────────────────────────

/// Reset [`PlayerIntent`] at the start of every frame.
///
/// Must run before any system that writes to `PlayerIntent`.
pub fn player_intent_clear_system(mut intent: ResMut<PlayerIntent>) {
    *intent = PlayerIntent::default();
}

// ── Step 2: Keyboard → Intent ─────────────────────────────────────────────────

/// Translate keys into [`PlayerIntent`].
///
/// | Key                 | Intent                         |
/// |---------------------|--------------------------------|
/// | Arrows / WASD       | `movement` (y down)            |
/// | Space (held)        | `firing`                       |
/// | Enter / Space (tap) | `confirm`                      |
/// | 1 – 4 (tap)         | `purchase` ATK/DEF/SPD/FIRE    |
pub fn keyboard_to_intent_system(keys: Res<ButtonInput<KeyCode>>, mut intent: ResMut<PlayerIntent>) {
    let mut movement = Vec2::ZERO;
    if keys.any_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        movement.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        movement.x += 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowUp, KeyCode::KeyW]) {
        movement.y -= 1.0;
    }
    if keys.any_pressed([KeyCode::ArrowDown, KeyCode::KeyS]) {
        movement.y += 1.0;
    }
    intent.movement = movement;
    intent.firing = keys.pressed(KeyCode::Space);
    intent.confirm = keys.any_just_pressed([KeyCode::Enter, KeyCode::Space]);

    const PURCHASE_KEYS: [(KeyCode, Stat); 4] = [
        (KeyCode::Digit1, Stat::Attack),
        (KeyCode::Digit2, Stat::Defense),
        (KeyCode::Digit3, Stat::Speed),
        (KeyCode::Digit4, Stat::FireRate),
    ];
    intent.purchase = PURCHASE_KEYS
        .iter()
        .find(|(key, _)| keys.just_pressed(*key))
        .map(|(_, stat)| *stat);
}

// ── Step 3: Apply intent → ship ───────────────────────────────────────────────

/// Move the ship by `movement · speed · dt` and clamp it to the playfield
/// below the HUD strip.
///
/// Diagonal input is normalised so the ship never moves faster than its
/// speed stat.
pub fn apply_player_intent_system(
    time: Res<Time>,
    intent: Res<PlayerIntent>,
    stats: Res<PlayerStats>,
    mut q: Query<&mut Body, With<Player>>,
) {
    let Ok(mut body) = q.single_mut() else {
        return;
    };

    let dir = intent.movement.normalize_or_zero();
    body.pos += dir * stats.speed() * time.delta_secs();
    clamp_to_playfield(&mut body);
}

fn clamp_to_playfield(body: &mut Body) {
    body.pos.x = body.pos.x.clamp(0.0, PLAYFIELD_WIDTH - body.size.x);
    body.pos.y = body
        .pos
        .y
        .clamp(HUD_STRIP_HEIGHT, PLAYFIELD_HEIGHT - body.size.y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{PLAYER_BASE_SPEED, PLAYER_HEIGHT, PLAYER_WIDTH};
    use std::time::Duration;

    /// Build a world with a player ship at `pos` and a 0.1 s frame.
    fn build_world(pos: Vec2, intent: PlayerIntent) -> (World, Entity) {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(100));
        world.insert_resource(time);
        world.insert_resource(intent);
        world.insert_resource(PlayerStats::default());
        let ship = world
            .spawn((
                Player,
                Body::new(pos.x, pos.y, PLAYER_WIDTH, PLAYER_HEIGHT),
            ))
            .id();
        (world, ship)
    }

    fn run_apply(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(apply_player_intent_system);
        schedule.run(world);
    }

    #[test]
    fn movement_uses_speed_stat() {
        let (mut world, ship) = build_world(
            Vec2::new(300.0, 300.0),
            PlayerIntent {
                movement: Vec2::new(1.0, 0.0),
                ..Default::default()
            },
        );
        run_apply(&mut world);
        let body = world.get::<Body>(ship).expect("ship body");
        assert!((body.pos.x - (300.0 + PLAYER_BASE_SPEED * 0.1)).abs() < 1e-3);
        assert_eq!(body.pos.y, 300.0);
    }

    #[test]
    fn diagonal_is_not_faster() {
        let (mut world, ship) = build_world(
            Vec2::new(300.0, 300.0),
            PlayerIntent {
                movement: Vec2::new(1.0, 1.0),
                ..Default::default()
            },
        );
        run_apply(&mut world);
        let body = world.get::<Body>(ship).expect("ship body");
        let travelled = body.pos.distance(Vec2::new(300.0, 300.0));
        assert!((travelled - PLAYER_BASE_SPEED * 0.1).abs() < 1e-3);
    }

    #[test]
    fn ship_cannot_enter_hud_strip_or_leave_playfield() {
        let (mut world, ship) = build_world(
            Vec2::new(5.0, HUD_STRIP_HEIGHT + 5.0),
            PlayerIntent {
                movement: Vec2::new(-1.0, -1.0),
                ..Default::default()
            },
        );
        run_apply(&mut world);
        let body = world.get::<Body>(ship).expect("ship body");
        assert_eq!(body.pos.x, 0.0);
        assert_eq!(body.pos.y, HUD_STRIP_HEIGHT);

        let (mut world, ship) = build_world(
            Vec2::new(PLAYFIELD_WIDTH - PLAYER_WIDTH - 1.0, PLAYFIELD_HEIGHT - PLAYER_HEIGHT - 1.0),
            PlayerIntent {
                movement: Vec2::new(1.0, 1.0),
                ..Default::default()
            },
        );
        run_apply(&mut world);
        let body = world.get::<Body>(ship).expect("ship body");
        assert_eq!(body.pos.x, PLAYFIELD_WIDTH - PLAYER_WIDTH);
        assert_eq!(body.pos.y, PLAYFIELD_HEIGHT - PLAYER_HEIGHT);
    }

    #[test]
    fn clear_resets_previous_intent() {
        let mut world = World::new();
        world.insert_resource(PlayerIntent {
            firing: true,
            confirm: true,
            purchase: Some(Stat::Speed),
            movement: Vec2::X,
        });
        let mut schedule = Schedule::default();
        schedule.add_systems(player_intent_clear_system);
        schedule.run(&mut world);
        assert_eq!(*world.resource::<PlayerIntent>(), PlayerIntent::default());
    }
}
