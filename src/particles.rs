//! Particle effects: explosions, bullet impacts, and the ship's thruster trail.
//!
//! ## Design
//!
//! Particles are lightweight ECS entities with a [`Particle`] component that
//! stores motion state (velocity, age, colour) and a [`Body`] holding their
//! playfield position.  One system moves them:
//!
//! | System                   | Schedule | Purpose                                   |
//! |--------------------------|----------|-------------------------------------------|
//! | `particle_update_system` | Update   | Move, apply drag, and despawn expired ones |
//! | `thruster_trail_system`  | Update   | Emit trail particles behind the ship      |
//!
//! Particle entities are spawned by free functions ([`spawn_explosion`],
//! [`spawn_impact`], [`spawn_trail`]) that take only `&mut Commands` and the
//! [`ParticleBudget`].  Meshes are attached by the rendering plugin one frame
//! later, which is imperceptible at 60 Hz.
//!
//! Jitter comes from `rand::thread_rng()`; particles never feed back into
//! gameplay, so they stay out of the seeded [`crate::rng::GameRng`] stream.

use crate::config::GameConfig;
use crate::game::{FrameSet, GameState};
use crate::geometry::{heading, Body};
use crate::player::Player;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

/// Velocity retained per 60 Hz frame.
const DRAG_PER_FRAME: f32 = 0.95;

/// Thruster trail spawn probability per 60 Hz frame.
const TRAIL_CHANCE_PER_FRAME: f32 = 0.3;

const THRUSTER_COLOR: [f32; 3] = [1.0, 0.42, 0.21];

// ── Resources ────────────────────────────────────────────────────────────────

/// Soft limit on live particles.
///
/// Explosions and impacts are skipped outright while the count is above the
/// cap; trails back off earlier, at 80 % of it.
#[derive(Resource, Debug, Clone)]
pub struct ParticleBudget {
    pub live: usize,
    pub cap: usize,
}

impl Default for ParticleBudget {
    fn default() -> Self {
        Self {
            live: 0,
            cap: crate::constants::PARTICLE_CAP,
        }
    }
}

impl ParticleBudget {
    #[inline]
    fn over_cap(&self) -> bool {
        self.live > self.cap
    }

    #[inline]
    fn busy(&self) -> bool {
        self.live as f32 > self.cap as f32 * 0.8
    }
}

// ── Component ────────────────────────────────────────────────────────────────

/// Short-lived visual particle entity.
///
/// After spawning, the rendering plugin inserts the `Mesh2d` /
/// `MeshMaterial2d` pair and writes the material handle into `material`.
#[derive(Component, Debug, Clone)]
pub struct Particle {
    /// Playfield velocity (px/s).
    pub velocity: Vec2,
    /// Time alive so far (s).
    pub age: f32,
    /// Total lifetime (s); the entity is despawned when `age >= lifetime`.
    pub lifetime: f32,
    /// Base colour (sRGB, 0–1).
    pub color: [f32; 3],
    /// This particle's own `ColorMaterial`, so its alpha can fade
    /// individually.  `None` until a mesh is attached.
    pub material: Option<Handle<ColorMaterial>>,
}

impl Particle {
    /// Linear fade from 1 at birth to 0 at end of life.
    #[inline]
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct ParticlesPlugin;

impl Plugin for ParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParticleBudget>()
            .add_systems(Startup, configure_particle_budget)
            .add_systems(Update, particle_update_system)
            .add_systems(
                Update,
                thruster_trail_system
                    .in_set(FrameSet::Simulate)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn configure_particle_budget(config: Res<GameConfig>, mut budget: ResMut<ParticleBudget>) {
    budget.cap = config.particle_cap;
}

// ── Update systems ────────────────────────────────────────────────────────────

/// Advance all particles: translate by velocity, apply drag, and despawn any
/// whose age has exceeded their lifetime.
///
/// Runs in every state so effects spawned on the frame a mode changes still
/// play out.
pub fn particle_update_system(
    mut commands: Commands,
    time: Res<Time>,
    mut budget: ResMut<ParticleBudget>,
    mut query: Query<(Entity, &mut Body, &mut Particle)>,
) {
    let dt = time.delta_secs();
    let drag = DRAG_PER_FRAME.powf(dt * 60.0);
    let mut live = 0;

    for (entity, mut body, mut particle) in query.iter_mut() {
        particle.age += dt;
        if particle.age >= particle.lifetime {
            commands.entity(entity).despawn();
            continue;
        }
        body.pos += particle.velocity * dt;
        particle.velocity *= drag;
        live += 1;
    }
    budget.live = live;
}

/// Emit a thruster puff behind the ship now and then.
pub fn thruster_trail_system(
    mut commands: Commands,
    time: Res<Time>,
    mut budget: ResMut<ParticleBudget>,
    q_player: Query<&Body, With<Player>>,
) {
    let Ok(ship) = q_player.single() else {
        return;
    };
    let chance = (TRAIL_CHANCE_PER_FRAME * time.delta_secs() * 60.0).min(1.0);
    if rand::thread_rng().gen::<f32>() < chance {
        let tail = Vec2::new(ship.center().x, ship.pos.y + ship.size.y);
        spawn_trail(&mut commands, &mut budget, tail, THRUSTER_COLOR);
    }
}

// ── Public spawn helpers ──────────────────────────────────────────────────────

fn spawn_particle(
    commands: &mut Commands,
    budget: &mut ParticleBudget,
    pos: Vec2,
    velocity: Vec2,
    size: f32,
    lifetime: f32,
    color: [f32; 3],
) {
    commands.spawn((
        Particle {
            velocity,
            age: 0.0,
            lifetime,
            color,
            material: None,
        },
        Body::centered(pos, Vec2::splat(size)),
        Transform::default(),
        Visibility::default(),
    ));
    budget.live += 1;
}

/// Burst of `count` particles flying out in every direction.
pub fn spawn_explosion(
    commands: &mut Commands,
    budget: &mut ParticleBudget,
    pos: Vec2,
    color: [f32; 3],
    count: u32,
) {
    if budget.over_cap() {
        return;
    }
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let velocity = heading(rng.gen_range(0.0_f32..TAU)) * rng.gen_range(120.0_f32..480.0);
        let size = rng.gen_range(3.0..6.0);
        // Per-frame decay of 0.02–0.06 at 60 Hz.
        let lifetime = 1.0 / (rng.gen_range(0.02_f32..0.06) * 60.0);
        spawn_particle(commands, budget, pos, velocity, size, lifetime, color);
    }
}

/// Five short-lived sparks sprayed in a ±0.5 rad cone around `angle`.
pub fn spawn_impact(
    commands: &mut Commands,
    budget: &mut ParticleBudget,
    pos: Vec2,
    color: [f32; 3],
    angle: f32,
) {
    if budget.over_cap() {
        return;
    }
    let mut rng = rand::thread_rng();
    for _ in 0..5 {
        let spray = angle + rng.gen_range(-0.5_f32..0.5);
        let velocity = heading(spray) * rng.gen_range(120.0_f32..300.0);
        let size = rng.gen_range(1.0..3.0);
        spawn_particle(commands, budget, pos, velocity, size, 1.0 / 6.0, color);
    }
}

/// One slow particle drifting mostly downward.  Skipped when the budget is
/// busy.
pub fn spawn_trail(commands: &mut Commands, budget: &mut ParticleBudget, pos: Vec2, color: [f32; 3]) {
    if budget.busy() {
        return;
    }
    let mut rng = rand::thread_rng();
    let velocity = heading(FRAC_PI_2 + rng.gen_range(-0.2..0.2)) * rng.gen_range(30.0_f32..90.0);
    spawn_particle(commands, budget, pos, velocity, 3.0, 1.0 / 3.0, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn world(dt_ms: u64) -> World {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(dt_ms));
        world.insert_resource(time);
        world.init_resource::<ParticleBudget>();
        world
    }

    fn spawn_with<F>(world: &mut World, f: F)
    where
        F: FnOnce(&mut Commands, &mut ParticleBudget),
    {
        let mut budget = world.resource::<ParticleBudget>().clone();
        let mut queue = bevy::ecs::world::CommandQueue::default();
        {
            let mut commands = Commands::new(&mut queue, world);
            f(&mut commands, &mut budget);
        }
        queue.apply(world);
        world.insert_resource(budget);
    }

    #[test]
    fn explosion_spawns_requested_count() {
        let mut world = world(16);
        spawn_with(&mut world, |c, b| {
            spawn_explosion(c, b, Vec2::new(100.0, 100.0), [1.0, 0.0, 0.0], 20)
        });
        assert_eq!(world.query::<&Particle>().iter(&world).count(), 20);
        assert_eq!(world.resource::<ParticleBudget>().live, 20);
    }

    #[test]
    fn saturated_budget_drops_new_effects() {
        let mut world = world(16);
        world.resource_mut::<ParticleBudget>().live = 501;
        spawn_with(&mut world, |c, b| {
            spawn_explosion(c, b, Vec2::ZERO, [1.0, 1.0, 1.0], 20);
            spawn_impact(c, b, Vec2::ZERO, [1.0, 1.0, 1.0], 0.0);
        });
        assert_eq!(world.query::<&Particle>().iter(&world).count(), 0);

        // Trails back off earlier than explosions do.
        world.resource_mut::<ParticleBudget>().live = 401;
        spawn_with(&mut world, |c, b| spawn_trail(c, b, Vec2::ZERO, [1.0, 1.0, 1.0]));
        assert_eq!(world.query::<&Particle>().iter(&world).count(), 0);
    }

    #[test]
    fn particles_drag_and_expire() {
        let mut world = world(100);
        let slow = world
            .spawn((
                Particle {
                    velocity: Vec2::new(100.0, 0.0),
                    age: 0.0,
                    lifetime: 1.0,
                    color: [1.0; 3],
                    material: None,
                },
                Body::new(0.0, 0.0, 2.0, 2.0),
            ))
            .id();
        let doomed = world
            .spawn((
                Particle {
                    velocity: Vec2::ZERO,
                    age: 0.95,
                    lifetime: 1.0,
                    color: [1.0; 3],
                    material: None,
                },
                Body::new(0.0, 0.0, 2.0, 2.0),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(particle_update_system);
        schedule.run(&mut world);

        assert!(world.get_entity(doomed).is_err());
        let body = world.get::<Body>(slow).expect("body");
        assert!((body.pos.x - 10.0).abs() < 1e-4);
        let particle = world.get::<Particle>(slow).expect("particle");
        // Six frames' worth of drag.
        assert!((particle.velocity.x - 100.0 * 0.95_f32.powf(6.0)).abs() < 1e-2);
        assert!((particle.alpha() - 0.9).abs() < 1e-4);
        assert_eq!(world.resource::<ParticleBudget>().live, 1);
    }
}
