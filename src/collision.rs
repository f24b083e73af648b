//! The per-frame collision pass.
//!
//! Everything that can hurt, kill or reward is resolved here, in one system,
//! in a fixed order:
//!
//! | Step | Pair                         | Test                        |
//! |------|------------------------------|-----------------------------|
//! | 0    | player bullets × boss        | circle (0.5 / 0.4)          |
//! | 1    | player bullets × enemies     | circle (1.0 / 0.8)          |
//! | 2    | enemy bullets × ship         | circle (1.0 / 0.5)          |
//! | 3    | enemies × ship (ramming)     | rectangle                   |
//! | 4    | power-ups × ship             | rectangle                   |
//! | 5    | coins × ship                 | rectangle                   |
//!
//! Steps 2 and 3 stop the whole pass the moment the ship loses its last
//! life.  The frame's outcome is published as a [`CollisionReport`], which
//! the wave scheduler and the chapter flow consume in `FrameSet::Progress`.

use crate::audio::AudioCue;
use crate::boss::Boss;
use crate::bullet::Bullet;
use crate::coins::{collect_coins, spawn_coins, Coin};
use crate::config::GameConfig;
use crate::constants::{ENEMY_BULLET_DAMAGE, ENEMY_CONTACT_DAMAGE};
use crate::enemy::{spawn_enemy, split_children, Enemy};
use crate::floating_text::{spawn_damage_number, spawn_floating_text, TEXT_RED};
use crate::game::{FrameSet, GameState};
use crate::geometry::{circle_overlap, rect_overlap, Body};
use crate::particles::{spawn_explosion, spawn_impact, ParticleBudget};
use crate::player::{
    apply_player_damage, ActiveBuffs, DamageOutcome, DamageRules, Player, PlayerLives,
    PlayerScore, PlayerStats, WeaponLoadout,
};
use crate::powerups::{apply_power_up, roll_drop, spawn_powerup, PickupTarget, PowerUp};
use crate::rng::GameRng;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use std::f32::consts::PI;

const BOSS_SHOT_SCALE: f32 = 0.5;
const BOSS_HIT_SCALE: f32 = 0.4;
const SHOT_SCALE: f32 = 1.0;
const ENEMY_HIT_SCALE: f32 = 0.8;
const SHIP_HIT_SCALE: f32 = 0.5;

const IMPACT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
const KILL_EXPLOSION_PARTICLES: u32 = 15;

/// Aggregate result of one collision pass.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionReport {
    /// Enemies that died this frame, shot down or rammed.
    pub enemies_killed: u32,
    /// The ship lost its last life.
    pub game_over: bool,
    /// A player bullet landed the boss's killing blow.
    pub boss_defeated: bool,
}

pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<CollisionReport>().add_systems(
            Update,
            collision_system
                .in_set(FrameSet::Collide)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ── System parameters ─────────────────────────────────────────────────────────

/// Player resources the pass reads and changes.
#[derive(SystemParam)]
pub struct PilotState<'w> {
    pub stats: Res<'w, PlayerStats>,
    pub lives: ResMut<'w, PlayerLives>,
    pub buffs: ResMut<'w, ActiveBuffs>,
    pub loadout: ResMut<'w, WeaponLoadout>,
    pub score: ResMut<'w, PlayerScore>,
}

/// Every collidable entity set.  All of them only read [`Body`], so the
/// queries never alias.
#[derive(SystemParam)]
pub struct CollisionTargets<'w, 's> {
    pub player: Query<'w, 's, &'static Body, With<Player>>,
    pub bullets: Query<'w, 's, (&'static mut Bullet, &'static Body)>,
    pub enemies: Query<'w, 's, (&'static mut Enemy, &'static Body)>,
    pub bosses: Query<'w, 's, (&'static mut Boss, &'static Body)>,
    pub powerups: Query<'w, 's, (&'static mut PowerUp, &'static Body)>,
    pub coins: Query<'w, 's, (&'static mut Coin, &'static Body)>,
}

/// Side effects of a hit: particles, sounds and the frame report.
#[derive(SystemParam)]
pub struct CollisionEffects<'w> {
    pub budget: ResMut<'w, ParticleBudget>,
    pub audio: MessageWriter<'w, AudioCue>,
    pub report: MessageWriter<'w, CollisionReport>,
}

// ── System ────────────────────────────────────────────────────────────────────

pub fn collision_system(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut rng: ResMut<GameRng>,
    mut pilot: PilotState,
    mut targets: CollisionTargets,
    mut fx: CollisionEffects,
) {
    let Ok(ship) = targets.player.single().copied() else {
        return;
    };
    let report = resolve_frame(
        &mut commands,
        &config,
        &mut rng,
        &mut pilot,
        &mut targets,
        &mut fx,
        &ship,
    );
    if report.game_over {
        info!("✓ Game over: last life lost");
    }
    fx.report.write(report);
}

fn resolve_frame(
    commands: &mut Commands,
    config: &GameConfig,
    rng: &mut GameRng,
    pilot: &mut PilotState,
    targets: &mut CollisionTargets,
    fx: &mut CollisionEffects,
    ship: &Body,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let multipliers = config.multipliers();
    let rules = DamageRules {
        damage_mult: multipliers.damage,
        defense: pilot.stats.defense(),
        invincibility_secs: config.invincibility_secs,
    };

    // 0. Player bullets against the boss.  Hits while it is entering or
    //    mid-transition still use up the bullet.
    if let Some((mut boss, boss_body)) = targets.bosses.iter_mut().find(|(b, _)| !b.is_defeated()) {
        for (mut bullet, body) in targets.bullets.iter_mut() {
            if !bullet.active
                || !bullet.is_player()
                || !circle_overlap(body, boss_body, BOSS_SHOT_SCALE, BOSS_HIT_SCALE)
            {
                continue;
            }
            let killed = boss.take_damage(bullet.damage);
            spawn_impact(commands, &mut fx.budget, body.center(), IMPACT_COLOR, bullet.angle + PI);
            bullet.on_hit();
            if killed {
                info!("✓ {} defeated", boss.profile().name);
                report.boss_defeated = true;
                break;
            }
        }
    }

    // 1. Player bullets against enemies.
    for (mut bullet, bullet_body) in targets.bullets.iter_mut() {
        if !bullet.active || !bullet.is_player() {
            continue;
        }
        for (mut enemy, enemy_body) in targets.enemies.iter_mut() {
            if !enemy.active
                || !circle_overlap(bullet_body, enemy_body, SHOT_SCALE, ENEMY_HIT_SCALE)
            {
                continue;
            }
            let killed = enemy.take_damage(bullet.damage);
            spawn_damage_number(
                commands,
                Vec2::new(enemy_body.center().x, enemy_body.pos.y),
                bullet.damage,
            );
            bullet.on_hit();

            if killed {
                report.enemies_killed += 1;
                pilot.score.points += enemy.points;

                let center = enemy_body.center();
                spawn_coins(commands, rng, center, enemy.coins);
                if let Some(kind) = roll_drop(rng, config.powerup_drop_chance) {
                    spawn_powerup(commands, kind, center);
                }
                fx.audio.write(AudioCue::Explosion);
                spawn_explosion(
                    commands,
                    &mut fx.budget,
                    center,
                    enemy.kind.profile().color,
                    KILL_EXPLOSION_PARTICLES,
                );
                for (child, body) in split_children(&enemy, enemy_body, &multipliers) {
                    spawn_enemy(commands, child, body);
                }
            }
            if !bullet.active {
                break;
            }
        }
    }

    // 2. Enemy bullets against the ship.  A bullet that touches the ship is
    //    spent even while the ship is invincible.
    for (mut bullet, body) in targets.bullets.iter_mut() {
        if !bullet.active
            || bullet.is_player()
            || !circle_overlap(body, ship, SHOT_SCALE, SHIP_HIT_SCALE)
        {
            continue;
        }
        bullet.active = false;
        if damage_ship(ENEMY_BULLET_DAMAGE, &rules, pilot, commands, fx, ship) {
            report.game_over = true;
            return report;
        }
    }

    // 3. Ramming: the enemy dies outright and the kill counts, score aside.
    for (mut enemy, body) in targets.enemies.iter_mut() {
        if !enemy.active || !rect_overlap(body, ship) {
            continue;
        }
        let game_over = damage_ship(ENEMY_CONTACT_DAMAGE, &rules, pilot, commands, fx, ship);
        let max_health = enemy.max_health;
        if enemy.take_damage(max_health) {
            report.enemies_killed += 1;
            spawn_explosion(
                commands,
                &mut fx.budget,
                body.center(),
                enemy.kind.profile().color,
                KILL_EXPLOSION_PARTICLES,
            );
        }
        if game_over {
            report.game_over = true;
            return report;
        }
    }

    // 4. Power-ups.
    for (mut powerup, body) in targets.powerups.iter_mut() {
        if !powerup.active || !rect_overlap(body, ship) {
            continue;
        }
        powerup.active = false;
        let outcome = apply_power_up(
            powerup.kind,
            &mut PickupTarget {
                lives: &mut *pilot.lives,
                buffs: &mut *pilot.buffs,
                loadout: &mut *pilot.loadout,
                score: &mut *pilot.score,
                life_bonus: config.life_bonus_score,
            },
        );
        debug!("Picked up {}", powerup.kind.label());
        spawn_floating_text(commands, body.center(), outcome.label(), powerup.kind.color());
        fx.audio.write(AudioCue::PowerUp);
    }

    // 5. Coins.
    if collect_coins(ship, targets.coins.iter_mut(), &mut pilot.score) > 0 {
        fx.audio.write(AudioCue::Coin);
    }

    report
}

/// Apply one hit to the ship and show it.  Returns `true` on game over.
fn damage_ship(
    raw: f32,
    rules: &DamageRules,
    pilot: &mut PilotState,
    commands: &mut Commands,
    fx: &mut CollisionEffects,
    ship: &Body,
) -> bool {
    let outcome = apply_player_damage(
        raw,
        rules,
        &mut pilot.lives,
        &mut pilot.buffs,
        &mut pilot.loadout,
    );
    match outcome {
        DamageOutcome::LifeLost { shown, .. } => {
            spawn_floating_text(commands, ship.pos, format!("-{shown}"), TEXT_RED);
            fx.audio.write(AudioCue::Hit);
            debug!("Ship hit, {} lives left", pilot.lives.remaining);
        }
        DamageOutcome::Shielded => debug!("Shield absorbed a hit"),
        DamageOutcome::Ignored => {}
    }
    outcome.is_game_over()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::{BossKind, BossStage};
    use crate::bullet::BulletMods;
    use crate::config::Difficulty;
    use crate::constants::{BULLET_HEIGHT, BULLET_WIDTH, COIN_SIZE, POWERUP_SIZE};
    use crate::enemy::{EnemyKind, MovementPattern};
    use crate::player::WeaponMod;
    use crate::powerups::PowerUpKind;
    use std::f32::consts::FRAC_PI_2;

    const SHIP_CENTER: Vec2 = Vec2::new(400.0, 525.0);

    #[derive(Resource, Default)]
    struct ReportLog(Vec<CollisionReport>);

    fn capture_reports(mut reader: MessageReader<CollisionReport>, mut log: ResMut<ReportLog>) {
        log.0.extend(reader.read().copied());
    }

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(GameConfig {
            difficulty: Difficulty::Hard,
            powerup_drop_chance: 0.0,
            ..Default::default()
        });
        world.insert_resource(GameRng::seeded(21));
        world.init_resource::<PlayerStats>();
        world.init_resource::<PlayerLives>();
        world.init_resource::<ActiveBuffs>();
        world.init_resource::<WeaponLoadout>();
        world.init_resource::<PlayerScore>();
        world.init_resource::<ParticleBudget>();
        world.init_resource::<ReportLog>();
        world.init_resource::<Messages<AudioCue>>();
        world.init_resource::<Messages<CollisionReport>>();
        world.spawn((Player, Body::centered(SHIP_CENTER, Vec2::new(40.0, 50.0))));
        world
    }

    fn run(world: &mut World) -> CollisionReport {
        let mut schedule = Schedule::default();
        schedule.add_systems((collision_system, capture_reports).chain());
        schedule.run(world);
        world
            .resource::<ReportLog>()
            .0
            .last()
            .copied()
            .expect("one report per pass")
    }

    fn drifter(world: &mut World, center: Vec2) -> Entity {
        let enemy = Enemy::new(
            EnemyKind::Drifter,
            &Difficulty::Hard.multipliers(),
            MovementPattern::Dive,
            0.0,
        );
        world
            .spawn((enemy, Body::centered(center, Vec2::splat(35.0))))
            .id()
    }

    fn player_shot(world: &mut World, center: Vec2, damage: f32, mods: BulletMods) -> Entity {
        world
            .spawn((
                Bullet::player(-FRAC_PI_2, damage, mods),
                Body::centered(center, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)),
            ))
            .id()
    }

    fn enemy_shot(world: &mut World, center: Vec2) -> Entity {
        world
            .spawn((
                Bullet::enemy(FRAC_PI_2, ENEMY_BULLET_DAMAGE),
                Body::centered(center, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)),
            ))
            .id()
    }

    #[test]
    fn killing_shot_rewards_the_player() {
        let mut world = world();
        let target = Vec2::new(150.0, 150.0);
        let enemy = drifter(&mut world, target);
        let shot = player_shot(&mut world, target, 100.0, BulletMods::default());

        let report = run(&mut world);
        assert_eq!(report.enemies_killed, 1);
        assert!(!report.game_over);
        assert!(!world.get::<Enemy>(enemy).expect("enemy").active);
        assert!(!world.get::<Bullet>(shot).expect("bullet").active);
        assert_eq!(world.resource::<PlayerScore>().points, 100);
        assert_eq!(world.query::<&Coin>().iter(&world).count(), 1);
        assert_eq!(world.query::<&PowerUp>().iter(&world).count(), 0);
    }

    #[test]
    fn piercing_shot_damages_every_enemy_it_overlaps() {
        let mut world = world();
        let a = drifter(&mut world, Vec2::new(150.0, 150.0));
        let b = drifter(&mut world, Vec2::new(152.0, 150.0));
        let mods = BulletMods {
            piercing: true,
            ..Default::default()
        };
        let shot = player_shot(&mut world, Vec2::new(151.0, 150.0), 5.0, mods);

        let report = run(&mut world);
        assert_eq!(report.enemies_killed, 0);
        assert!(world.get::<Bullet>(shot).expect("bullet").active);
        for e in [a, b] {
            assert_eq!(world.get::<Enemy>(e).expect("enemy").health, 15.0);
        }
    }

    #[test]
    fn splitter_releases_children_on_death() {
        let mut world = world();
        let enemy = Enemy::new(
            EnemyKind::Splitter,
            &Difficulty::Hard.multipliers(),
            MovementPattern::Dive,
            0.0,
        );
        let target = Vec2::new(200.0, 200.0);
        world.spawn((enemy, Body::centered(target, Vec2::splat(40.0))));
        player_shot(&mut world, target, 100.0, BulletMods::default());

        run(&mut world);
        let live = world
            .query::<&Enemy>()
            .iter(&world)
            .filter(|e| e.active && e.kind == EnemyKind::Drifter)
            .count();
        assert_eq!(live, 2);
    }

    #[test]
    fn enemy_bullets_are_spent_even_during_invincibility() {
        let mut world = world();
        let first = enemy_shot(&mut world, SHIP_CENTER);
        let second = enemy_shot(&mut world, SHIP_CENTER + Vec2::new(2.0, 0.0));

        let report = run(&mut world);
        assert!(!report.game_over);
        let lives = world.resource::<PlayerLives>();
        assert_eq!(lives.remaining, lives.max - 1);
        assert!(lives.is_invincible());
        for b in [first, second] {
            assert!(!world.get::<Bullet>(b).expect("bullet").active);
        }
    }

    #[test]
    fn ramming_on_last_life_ends_the_pass_early() {
        let mut world = world();
        world.resource_mut::<PlayerLives>().remaining = 1;
        world.resource_mut::<WeaponLoadout>().add(WeaponMod::Homing);
        let rammer = drifter(&mut world, SHIP_CENTER);
        let powerup = world
            .spawn((
                PowerUp {
                    kind: PowerUpKind::Shield,
                    active: true,
                },
                Body::centered(SHIP_CENTER, Vec2::splat(POWERUP_SIZE)),
            ))
            .id();

        let report = run(&mut world);
        assert!(report.game_over);
        assert_eq!(report.enemies_killed, 1);
        assert!(!world.get::<Enemy>(rammer).expect("enemy").active);
        assert!(world.resource::<WeaponLoadout>().is_empty());
        assert_eq!(world.resource::<PlayerScore>().points, 0);
        assert!(world.get::<PowerUp>(powerup).expect("powerup").active);
    }

    #[test]
    fn ramming_while_invincible_still_kills_the_enemy() {
        let mut world = world();
        world.resource_mut::<PlayerLives>().inv_timer = 1.0;
        let rammer = drifter(&mut world, SHIP_CENTER);

        let report = run(&mut world);
        assert_eq!(report.enemies_killed, 1);
        assert!(!world.get::<Enemy>(rammer).expect("enemy").active);
        let lives = world.resource::<PlayerLives>();
        assert_eq!(lives.remaining, lives.max);
    }

    #[test]
    fn boss_takes_hits_and_reports_its_defeat() {
        let mut world = world();
        let mut boss = Boss::new(BossKind::Stormweaver, &Difficulty::Hard.multipliers());
        boss.stage = BossStage::Fighting;
        let boss_center = Vec2::new(400.0, 130.0);
        let boss_entity = world
            .spawn((boss, Body::centered(boss_center, Vec2::new(120.0, 100.0))))
            .id();

        player_shot(&mut world, boss_center, 50.0, BulletMods::default());
        let report = run(&mut world);
        assert!(!report.boss_defeated);
        assert_eq!(world.get::<Boss>(boss_entity).expect("boss").health, 950.0);

        world.get_mut::<Boss>(boss_entity).expect("boss").health = 10.0;
        player_shot(&mut world, boss_center, 50.0, BulletMods::default());
        let report = run(&mut world);
        assert!(report.boss_defeated);
        assert!(world.get::<Boss>(boss_entity).expect("boss").is_defeated());
    }

    #[test]
    fn pickups_under_the_ship_are_collected() {
        let mut world = world();
        world.spawn((
            PowerUp {
                kind: PowerUpKind::RapidFire,
                active: true,
            },
            Body::centered(SHIP_CENTER, Vec2::splat(POWERUP_SIZE)),
        ));
        for dx in [-5.0, 5.0] {
            world.spawn((
                Coin {
                    value: 1,
                    active: true,
                },
                Body::centered(SHIP_CENTER + Vec2::new(dx, 0.0), Vec2::splat(COIN_SIZE)),
            ));
        }

        run(&mut world);
        assert!(world.resource::<ActiveBuffs>().rapid_fire());
        assert_eq!(world.resource::<PlayerScore>().coins, 2);
        assert!(world.query::<&Coin>().iter(&world).all(|c| !c.active));
    }
}
