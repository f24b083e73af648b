//! Drone companion granted by the `Drone` weapon modifier.
//!
//! The drone orbits the ship and fires a weak homing shot at the nearest
//! enemy in range.  Its entity exists exactly while the loadout holds the
//! modifier: [`drone_sync_system`] spawns it on pickup and despawns it when
//! the modifier is evicted or cleared.

use super::state::{Player, WeaponLoadout, WeaponMod};
use crate::bullet::{spawn_bullet, Bullet, BulletMods};
use crate::constants::{
    DRONE_DAMAGE, DRONE_FIRE_INTERVAL, DRONE_ORBIT_RADIUS, DRONE_ORBIT_RATE, DRONE_RANGE,
};
use crate::enemy::Enemy;
use crate::geometry::{angle_to, Body};
use bevy::prelude::*;

const DRONE_SIZE: f32 = 15.0;

#[derive(Component, Debug, Clone, Default)]
pub struct Drone {
    /// Orbit angle around the ship (rad).
    pub orbit_angle: f32,
    /// Seconds since the last shot.
    pub fire_timer: f32,
}

impl Drone {
    /// Centre of the drone for a ship centred on `ship_center`.
    pub fn orbit_position(&self, ship_center: Vec2) -> Vec2 {
        ship_center + Vec2::new(self.orbit_angle.cos(), self.orbit_angle.sin()) * DRONE_ORBIT_RADIUS
    }
}

/// Keep the drone entity in step with the loadout.
pub fn drone_sync_system(
    mut commands: Commands,
    loadout: Res<WeaponLoadout>,
    q_drones: Query<Entity, With<Drone>>,
    q_player: Query<&Body, (With<Player>, Without<Drone>)>,
) {
    let wanted = loadout.has(WeaponMod::Drone);
    let present = !q_drones.is_empty();

    if wanted && !present {
        let Ok(ship) = q_player.single() else {
            return;
        };
        let drone = Drone::default();
        let body = Body::centered(drone.orbit_position(ship.center()), Vec2::splat(DRONE_SIZE));
        commands.spawn((drone, body, Transform::default(), Visibility::default()));
        debug!("drone deployed");
    } else if !wanted && present {
        for entity in q_drones.iter() {
            commands.entity(entity).despawn();
        }
        debug!("drone recalled");
    }
}

/// Orbit the ship and fire at the nearest enemy within range.
///
/// The fire timer keeps running while no target is in range, so the drone
/// shoots as soon as one arrives.
pub fn drone_update_system(
    mut commands: Commands,
    time: Res<Time>,
    q_player: Query<&Body, (With<Player>, Without<Drone>)>,
    q_enemies: Query<(&Enemy, &Body), (Without<Drone>, Without<Player>)>,
    mut q_drones: Query<(&mut Drone, &mut Body)>,
) {
    let Ok(ship) = q_player.single() else {
        return;
    };
    let dt = time.delta_secs();

    for (mut drone, mut body) in q_drones.iter_mut() {
        drone.orbit_angle += DRONE_ORBIT_RATE * dt;
        body.set_center(drone.orbit_position(ship.center()));

        drone.fire_timer += dt;
        if drone.fire_timer < DRONE_FIRE_INTERVAL {
            continue;
        }

        let from = body.center();
        let target = q_enemies
            .iter()
            .filter(|(enemy, _)| enemy.active)
            .map(|(_, enemy_body)| enemy_body.center())
            .filter(|c| from.distance(*c) < DRONE_RANGE)
            .min_by(|a, b| from.distance_squared(*a).total_cmp(&from.distance_squared(*b)));

        if let Some(target) = target {
            let mods = BulletMods {
                homing: true,
                ..BulletMods::default()
            };
            spawn_bullet(
                &mut commands,
                Bullet::player(angle_to(from, target), DRONE_DAMAGE, mods),
                from,
            );
            drone.fire_timer = 0.0;
        }
    }
}
