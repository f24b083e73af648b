//! Coin pickups: dropped by destroyed enemies and bosses, collected by the
//! ship on contact.
//!
//! ## Flow
//!
//! 1. [`spawn_coins`] is called by the collision pass when an enemy dies and
//!    by the chapter flow when a boss falls.  Each call spawns `amount`
//!    single-value coins scattered around the drop point.
//! 2. [`coin_motion_system`] lets coins fall; while the Magnet buff runs,
//!    coins near the ship fly straight at it instead.
//! 3. The collision pass credits overlapping coins via [`collect_coins`].
//! 4. Coins that fall off the bottom are retired and swept.

use crate::constants::{
    COIN_FALL_SPEED, COIN_MAGNET_RANGE, COIN_MAGNET_SPEED, COIN_SCATTER, COIN_SIZE,
    PLAYFIELD_HEIGHT,
};
use crate::game::{FrameSet, GameState};
use crate::geometry::{rect_overlap, Body};
use crate::player::{ActiveBuffs, Player, PlayerScore};
use crate::pool::{sweep_inactive, Pooled};
use crate::rng::GameRng;
use bevy::prelude::*;

/// Distance below the playfield at which a falling coin is retired.
const COIN_EXIT_MARGIN: f32 = 50.0;

#[derive(Component, Debug, Clone)]
pub struct Coin {
    pub value: u32,
    pub active: bool,
}

impl Pooled for Coin {
    fn is_active(&self) -> bool {
        self.active
    }
}

pub struct CoinPlugin;

impl Plugin for CoinPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            coin_motion_system
                .in_set(FrameSet::Simulate)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            sweep_inactive::<Coin>
                .in_set(FrameSet::Sweep)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Spawn `amount` coins of value 1 within ±[`COIN_SCATTER`] of `center`.
pub fn spawn_coins(commands: &mut Commands, rng: &mut GameRng, center: Vec2, amount: u32) {
    for _ in 0..amount {
        let offset = Vec2::new(
            rng.range(-COIN_SCATTER, COIN_SCATTER),
            rng.range(-COIN_SCATTER, COIN_SCATTER),
        );
        commands.spawn((
            Coin {
                value: 1,
                active: true,
            },
            Body::centered(center + offset, Vec2::splat(COIN_SIZE)),
            Transform::default(),
            Visibility::default(),
        ));
    }
}

/// Step one coin.  With the magnet running, coins within range home in on
/// the ship and coins outside it hover in place.
pub fn step_coin(body: &mut Body, ship_center: Vec2, magnet: bool, dt: f32) {
    if magnet {
        let delta = ship_center - body.center();
        if delta.length() < COIN_MAGNET_RANGE {
            body.pos += delta.normalize_or_zero() * COIN_MAGNET_SPEED * dt;
        }
    } else {
        body.pos.y += COIN_FALL_SPEED * dt;
    }
}

pub fn coin_motion_system(
    time: Res<Time>,
    buffs: Res<ActiveBuffs>,
    q_player: Query<&Body, (With<Player>, Without<Coin>)>,
    mut q_coins: Query<(&mut Coin, &mut Body)>,
) {
    let Ok(ship) = q_player.single() else {
        return;
    };
    let dt = time.delta_secs();
    let magnet = buffs.magnet();

    for (mut coin, mut body) in q_coins.iter_mut() {
        if !coin.active {
            continue;
        }
        step_coin(&mut body, ship.center(), magnet, dt);
        if body.pos.y > PLAYFIELD_HEIGHT + COIN_EXIT_MARGIN {
            coin.active = false;
        }
    }
}

/// Credit every active coin overlapping the ship.  Returns the coins gained.
pub fn collect_coins<'a>(
    ship: &Body,
    coins: impl Iterator<Item = (Mut<'a, Coin>, &'a Body)>,
    score: &mut PlayerScore,
) -> u32 {
    let mut gained = 0;
    for (mut coin, body) in coins {
        if coin.active && rect_overlap(ship, body) {
            coin.active = false;
            gained += coin.value;
        }
    }
    score.coins += gained;
    gained
}
