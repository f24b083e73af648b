//! Visual layer: camera, meshes, HUD and mode-screen text.
//!
//! Gameplay never touches `Transform`; every entity carries a [`Body`] in
//! playfield space (origin top-left, y down) and this plugin mirrors it into
//! a centred, y-up `Transform` once the frame's gameplay has run.
//!
//! ## Layer model
//!
//! | Layer               | Technology | Attached by                    |
//! |---------------------|------------|--------------------------------|
//! | Ship, drone         | `Mesh2d`   | `Added<Player>` / `Added<Drone>` |
//! | Enemies, boss       | `Mesh2d`   | `Added<Enemy>` / `Added<Boss>` |
//! | Bullets, pickups    | `Mesh2d`   | `Added<Bullet>` / `Added<Coin>` / `Added<PowerUp>` |
//! | Particles           | `Mesh2d`, one material each for fading | `Added<Particle>` |
//! | Floating text       | `Text2d`   | `Added<FloatingText>`          |
//! | Boss bar, rifts, shields | Gizmos | every frame                  |
//! | HUD, mode screens   | UI `Text`  | Startup                        |

use crate::boss::Boss;
use crate::bullet::Bullet;
use crate::coins::Coin;
use crate::constants::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH, PLASMA_CHARGE_THRESHOLD};
use crate::enemy::{Enemy, EnemyKind};
use crate::floating_text::FloatingText;
use crate::game::{ChapterProgress, FrameSet, GameState};
use crate::geometry::Body;
use crate::particles::Particle;
use crate::player::{
    ActiveBuffs, Drone, FireControl, Player, PlayerLives, PlayerScore, PlayerStats, Stat,
    WeaponLoadout,
};
use crate::powerups::PowerUp;
use crate::waves::WaveScheduler;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use std::f32::consts::{FRAC_PI_2, TAU};

// ── Depth ordering ────────────────────────────────────────────────────────────

const Z_PARTICLE: f32 = 0.1;
const Z_COIN: f32 = 0.2;
const Z_POWERUP: f32 = 0.3;
const Z_ENEMY: f32 = 0.4;
const Z_BOSS: f32 = 0.5;
const Z_BULLET: f32 = 0.6;
const Z_SHIP: f32 = 0.7;
const Z_TEXT: f32 = 0.9;

const HIT_FLASH_COLOR: Color = Color::WHITE;
const HUD_FONT_SIZE: f32 = 16.0;
const SCREEN_FONT_SIZE: f32 = 28.0;
const FLOATING_FONT_SIZE: f32 = 20.0;

// ── Shared handles ────────────────────────────────────────────────────────────

/// Unit meshes reused by every particle and coin; per-entity size comes from
/// `Transform::scale`.
#[derive(Resource)]
pub struct SharedMeshes {
    pub disc: Handle<Mesh>,
    pub diamond: Handle<Mesh>,
}

// ── UI markers ────────────────────────────────────────────────────────────────

/// Single-line HUD along the top strip.
#[derive(Component)]
pub struct HudText;

/// Centre-screen text for the title card, results, shop and end screens, and
/// the wave banner during play.
#[derive(Component)]
pub struct ScreenText;

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.06)))
            .add_systems(Startup, (setup_camera, setup_shared_meshes, setup_ui))
            .add_systems(
                Update,
                (
                    (
                        attach_ship_mesh_system,
                        attach_drone_mesh_system,
                        attach_enemy_mesh_system,
                        attach_boss_mesh_system,
                        attach_bullet_mesh_system,
                        attach_pickup_mesh_system,
                        attach_particle_mesh_system,
                        attach_floating_text_system,
                    ),
                    sync_body_transform_system,
                    (
                        particle_fade_system,
                        floating_text_style_system,
                        hit_flash_system,
                        ship_blink_system,
                        hud_text_system,
                        screen_text_system,
                        gizmo_overlay_system,
                    ),
                )
                    .chain()
                    .after(FrameSet::Progress),
            );
    }
}

// ── Coordinate mapping ────────────────────────────────────────────────────────

/// Playfield point (origin top-left, y down) → world point (origin centre,
/// y up).
#[inline]
pub fn to_world(p: Vec2) -> Vec2 {
    Vec2::new(p.x - PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0 - p.y)
}

fn placed(body: &Body, z: f32) -> Transform {
    Transform::from_translation(to_world(body.center()).extend(z))
}

fn srgb(c: [f32; 3]) -> Color {
    Color::srgb(c[0], c[1], c[2])
}

// ── Startup ───────────────────────────────────────────────────────────────────

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
    info!("✓ Camera spawned");
}

fn setup_shared_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    commands.insert_resource(SharedMeshes {
        disc: meshes.add(filled_polygon_mesh(&regular_polygon(12, Vec2::splat(0.5), 0.0))),
        diamond: meshes.add(diamond_mesh(0.5, 0.5)),
    });
}

fn setup_ui(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: HUD_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(0.95, 0.88, 0.45)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            ZIndex(300),
        ))
        .with_children(|overlay| {
            overlay.spawn((
                Text::new(""),
                TextFont {
                    font_size: SCREEN_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::srgb(0.0, 1.0, 1.0)),
                ScreenText,
            ));
        });
}

// ── Spawn-time mesh attachment ────────────────────────────────────────────────

/// Dart-shaped ship, nose up, sized to the ship's body.
fn ship_vertices(size: Vec2) -> Vec<Vec2> {
    let (hw, hh) = (size.x / 2.0, size.y / 2.0);
    vec![
        Vec2::new(0.0, hh),
        Vec2::new(-hw, -hh),
        Vec2::new(-hw * 0.35, -hh * 0.6),
        Vec2::new(0.0, -hh * 0.8),
        Vec2::new(hw * 0.35, -hh * 0.6),
        Vec2::new(hw, -hh),
    ]
}

/// Nose-up outline of the ship; the fan from the nose covers the notch
/// between the fins.
pub fn attach_ship_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Body), Added<Player>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, body) in query.iter() {
        let mesh = meshes.add(filled_polygon_mesh(&ship_vertices(body.size)));
        let mat = materials.add(ColorMaterial::from_color(Color::srgb(0.0, 0.85, 1.0)));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh), MeshMaterial2d(mat), placed(body, Z_SHIP)));
    }
}

pub fn attach_drone_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Body), Added<Drone>>,
    shared: Res<SharedMeshes>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, body) in query.iter() {
        let mat = materials.add(ColorMaterial::from_color(Color::srgb(0.12, 0.56, 1.0)));
        commands.entity(entity).insert((
            Mesh2d(shared.diamond.clone()),
            MeshMaterial2d(mat),
            placed(body, Z_SHIP).with_scale(body.size.extend(1.0)),
        ));
    }
}

fn enemy_sides(kind: EnemyKind) -> u32 {
    match kind {
        EnemyKind::Drifter => 4,
        EnemyKind::Stitcher => 3,
        EnemyKind::Wraith => 5,
        EnemyKind::Harvester => 6,
        EnemyKind::Splitter => 8,
    }
}

/// Regular polygon per enemy kind.  Each enemy gets its own material so the
/// hit flash tints only that enemy.
pub fn attach_enemy_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Enemy, &Body), Added<Enemy>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, enemy, body) in query.iter() {
        let verts = regular_polygon(enemy_sides(enemy.kind), body.size / 2.0, -FRAC_PI_2);
        let mesh = meshes.add(filled_polygon_mesh(&verts));
        let mat = materials.add(ColorMaterial::from_color(srgb(enemy.kind.profile().color)));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh), MeshMaterial2d(mat), placed(body, Z_ENEMY)));
    }
}

pub fn attach_boss_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Boss, &Body), Added<Boss>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, boss, body) in query.iter() {
        let profile = boss.profile();
        let sides = if profile.sides == 0 { 32 } else { profile.sides as u32 };
        let verts = regular_polygon(sides, body.size / 2.0, FRAC_PI_2);
        let mesh = meshes.add(filled_polygon_mesh(&verts));
        let mat = materials.add(ColorMaterial::from_color(srgb(profile.color)));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh), MeshMaterial2d(mat), placed(body, Z_BOSS)));
    }
}

pub fn attach_bullet_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &Bullet, &Body), Added<Bullet>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, bullet, body) in query.iter() {
        let color = if !bullet.is_player() {
            Color::srgb(1.0, 0.3, 0.2)
        } else if bullet.mods.plasma {
            Color::srgb(0.9, 0.2, 1.0)
        } else {
            Color::srgb(0.3, 1.0, 1.0)
        };
        let (hw, hh) = (body.size.x / 2.0, body.size.y / 2.0);
        let rect = [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ];
        let mesh = meshes.add(filled_polygon_mesh(&rect));
        let mat = materials.add(ColorMaterial::from_color(color));
        commands
            .entity(entity)
            .insert((Mesh2d(mesh), MeshMaterial2d(mat), placed(body, Z_BULLET)));
    }
}

/// Coins are gold diamonds; power-ups are discs in their kind's colour.
pub fn attach_pickup_mesh_system(
    mut commands: Commands,
    q_coins: Query<(Entity, &Body), Added<Coin>>,
    q_powerups: Query<(Entity, &PowerUp, &Body), Added<PowerUp>>,
    shared: Res<SharedMeshes>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, body) in q_coins.iter() {
        let mat = materials.add(ColorMaterial::from_color(Color::srgb(1.0, 0.84, 0.0)));
        commands.entity(entity).insert((
            Mesh2d(shared.diamond.clone()),
            MeshMaterial2d(mat),
            placed(body, Z_COIN).with_scale(body.size.extend(1.0)),
        ));
    }
    for (entity, powerup, body) in q_powerups.iter() {
        let mat = materials.add(ColorMaterial::from_color(srgb(powerup.kind.color())));
        commands.entity(entity).insert((
            Mesh2d(shared.disc.clone()),
            MeshMaterial2d(mat),
            placed(body, Z_POWERUP).with_scale(body.size.extend(1.0)),
        ));
    }
}

/// Each particle owns its material so its alpha can fade on its own.
pub fn attach_particle_mesh_system(
    mut commands: Commands,
    shared: Res<SharedMeshes>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &mut Particle, &Body), Added<Particle>>,
) {
    for (entity, mut particle, body) in query.iter_mut() {
        let [r, g, b] = particle.color;
        let mat = materials.add(ColorMaterial::from_color(Color::srgba(r, g, b, 1.0)));
        particle.material = Some(mat.clone());
        commands.entity(entity).insert((
            Mesh2d(shared.disc.clone()),
            MeshMaterial2d(mat),
            placed(body, Z_PARTICLE).with_scale(body.size.extend(1.0)),
        ));
    }
}

pub fn attach_floating_text_system(
    mut commands: Commands,
    query: Query<(Entity, &FloatingText, &Body), Added<FloatingText>>,
) {
    for (entity, text, body) in query.iter() {
        commands.entity(entity).insert((
            Text2d::new(text.text.clone()),
            TextFont {
                font_size: FLOATING_FONT_SIZE,
                ..default()
            },
            TextColor(srgb(text.color)),
            placed(body, Z_TEXT),
        ));
    }
}

// ── Per-frame sync ────────────────────────────────────────────────────────────

/// Mirror every [`Body`] into its `Transform`, keeping depth and scale.
/// Bullets are also turned to face their travel direction.
pub fn sync_body_transform_system(mut query: Query<(&Body, &mut Transform, Option<&Bullet>)>) {
    for (body, mut transform, bullet) in query.iter_mut() {
        let p = to_world(body.center());
        transform.translation.x = p.x;
        transform.translation.y = p.y;
        if let Some(bullet) = bullet {
            // Playfield angles are y-down; the mesh's long axis is local +Y.
            transform.rotation = Quat::from_rotation_z(-bullet.angle - FRAC_PI_2);
        }
    }
}

pub fn particle_fade_system(
    mut materials: ResMut<Assets<ColorMaterial>>,
    query: Query<&Particle>,
) {
    for particle in query.iter() {
        let Some(handle) = &particle.material else {
            continue;
        };
        if let Some(mat) = materials.get_mut(handle) {
            let [r, g, b] = particle.color;
            mat.color = Color::srgba(r, g, b, particle.alpha());
        }
    }
}

pub fn floating_text_style_system(
    mut query: Query<(&FloatingText, &mut TextColor, &mut Transform)>,
) {
    for (text, mut color, mut transform) in query.iter_mut() {
        let [r, g, b] = text.color;
        color.0 = Color::srgba(r, g, b, text.progress());
        transform.scale = Vec3::splat(text.scale());
    }
}

/// Tint enemies and bosses white while their hit flash runs.
pub fn hit_flash_system(
    mut materials: ResMut<Assets<ColorMaterial>>,
    q_enemies: Query<(&Enemy, &MeshMaterial2d<ColorMaterial>)>,
    q_bosses: Query<(&Boss, &MeshMaterial2d<ColorMaterial>)>,
) {
    let tints = q_enemies
        .iter()
        .map(|(e, m)| (e.flash_secs > 0.0, e.kind.profile().color, m))
        .chain(
            q_bosses
                .iter()
                .map(|(b, m)| (b.flash_secs > 0.0, b.profile().color, m)),
        );
    for (flashing, base, material) in tints {
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.color = if flashing { HIT_FLASH_COLOR } else { srgb(base) };
        }
    }
}

/// Blink the ship at 10 Hz while it is invincible.
pub fn ship_blink_system(
    lives: Res<PlayerLives>,
    mut query: Query<&mut Visibility, With<Player>>,
) {
    let visible = !lives.is_invincible() || (lives.inv_timer * 10.0) as u32 % 2 == 0;
    for mut vis in query.iter_mut() {
        *vis = if visible {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

// ── HUD & mode screens ────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn hud_text_system(
    state: Res<State<GameState>>,
    score: Res<PlayerScore>,
    lives: Res<PlayerLives>,
    loadout: Res<WeaponLoadout>,
    buffs: Res<ActiveBuffs>,
    fire: Res<FireControl>,
    progress: Res<ChapterProgress>,
    scheduler: Res<WaveScheduler>,
    mut query: Query<(&mut Text, &mut Visibility), With<HudText>>,
) {
    let Ok((mut text, mut vis)) = query.single_mut() else {
        return;
    };
    if *state.get() != GameState::Playing {
        *vis = Visibility::Hidden;
        return;
    }
    *vis = Visibility::Inherited;

    let mut line = format!(
        "SCORE {}   COINS {}   LIVES {}/{}   CH {}-{}",
        score.points, score.coins, lives.remaining, lives.max, progress.chapter, scheduler.wave
    );
    for m in loadout.iter() {
        line.push_str(&format!("   [{}]", m.label()));
    }
    for label in buffs.labels() {
        line.push_str(&format!("   {label}"));
    }
    let charge = (fire.charge / PLASMA_CHARGE_THRESHOLD * 100.0).min(100.0);
    line.push_str(&format!("   CHARGE {charge:.0}%"));
    *text = Text::new(line);
}

fn shop_lines(stats: &PlayerStats, coins: u32) -> String {
    let keys = ["1", "2", "3", "4"];
    let mut out = format!("UPGRADE SHOP\nCoins: {coins}\n\n");
    for (key, stat) in keys.iter().zip(Stat::ALL) {
        let level = stats.level(stat);
        let cost = match stats.cost_for_next_level(stat) {
            Some(c) => format!("{c} coins"),
            None => "MAX".to_string(),
        };
        out.push_str(&format!(
            "[{key}] {:<10} Lv {level}/{}   {cost}\n",
            stat.label(),
            PlayerStats::MAX
        ));
    }
    out.push_str("\nPress ENTER to continue");
    out
}

pub fn screen_text_system(
    state: Res<State<GameState>>,
    score: Res<PlayerScore>,
    stats: Res<PlayerStats>,
    progress: Res<ChapterProgress>,
    scheduler: Res<WaveScheduler>,
    mut query: Query<&mut Text, With<ScreenText>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };
    let body = match state.get() {
        GameState::WaitingForInput => "THE CHRONO-SPLINTER\n\nPress ENTER to begin".to_string(),
        GameState::Intro => format!(
            "CHAPTER {}\n{}",
            progress.chapter,
            progress.chapter_name().to_uppercase()
        ),
        GameState::Playing if scheduler.banner_secs > 0.0 => scheduler.banner.clone(),
        GameState::Playing => String::new(),
        GameState::ChapterComplete => format!(
            "CHAPTER {} COMPLETE\n\nScore: {}\nCoins: {}\n\nPress ENTER for Upgrade Shop",
            progress.chapter, score.points, score.coins
        ),
        GameState::Shop => shop_lines(&stats, score.coins),
        GameState::GameOver => format!(
            "GAME OVER\n\nScore: {}\n\nPress ENTER to restart",
            score.points
        ),
        GameState::Victory => format!(
            "THE SPLINTER IS MENDED\n\nFinal score: {}\n\nPress ENTER to play again",
            score.points
        ),
    };
    *text = Text::new(body);
}

// ── Gizmo overlays ────────────────────────────────────────────────────────────

/// Boss health bar, time rifts, the Sunkeeper's shield and the ship's shield
/// bubble.
pub fn gizmo_overlay_system(
    mut gizmos: Gizmos,
    state: Res<State<GameState>>,
    buffs: Res<ActiveBuffs>,
    q_boss: Query<(&Boss, &Body)>,
    q_ship: Query<&Body, With<Player>>,
) {
    if *state.get() != GameState::Playing {
        return;
    }

    for (boss, body) in q_boss.iter() {
        let frac = (boss.health / boss.max_health).clamp(0.0, 1.0);
        let left = to_world(Vec2::new(200.0, 40.0));
        let right = to_world(Vec2::new(600.0, 40.0));
        gizmos.line_2d(left, right, Color::srgb(0.3, 0.0, 0.0));
        gizmos.line_2d(left, left.lerp(right, frac), Color::srgb(1.0, 0.1, 0.1));

        if boss.shield_up && boss.phase == 3 {
            gizmos.circle_2d(
                to_world(body.center()),
                body.size.x * 0.7,
                Color::srgb(1.0, 0.85, 0.2),
            );
        }
        for rift in &boss.rifts {
            let center = to_world(rift.pos);
            gizmos.circle_2d(center, 18.0, Color::srgb(0.6, 0.2, 1.0));
            let spoke = Vec2::new(rift.spin.cos(), -rift.spin.sin()) * 18.0;
            gizmos.line_2d(center - spoke, center + spoke, Color::srgb(0.8, 0.5, 1.0));
        }
    }

    if buffs.shield_hits > 0 {
        if let Ok(ship) = q_ship.single() {
            gizmos.circle_2d(
                to_world(ship.center()),
                ship.size.y * 0.7,
                Color::srgb(1.0, 0.84, 0.0),
            );
        }
    }
}

// ── Mesh helpers ──────────────────────────────────────────────────────────────

/// `n` vertices on an ellipse with the given radii, starting at `start` rad.
pub fn regular_polygon(n: u32, radii: Vec2, start: f32) -> Vec<Vec2> {
    (0..n)
        .map(|i| {
            let a = start + TAU * i as f32 / n as f32;
            Vec2::new(a.cos() * radii.x, a.sin() * radii.y)
        })
        .collect()
}

/// Fan-triangulate a polygon that is star-shaped around vertex 0.
pub fn filled_polygon_mesh(vertices: &[Vec2]) -> Mesh {
    let n = vertices.len();
    debug_assert!(n >= 3, "polygon must have ≥ 3 vertices");

    let positions: Vec<[f32; 3]> = vertices.iter().map(|v| [v.x, v.y, 0.0]).collect();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n];

    let mut indices: Vec<u32> = Vec::with_capacity((n - 2) * 3);
    for i in 1..(n as u32 - 1) {
        indices.extend_from_slice(&[0, i, i + 1]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Filled diamond (rhombus) with the given half-extents.
fn diamond_mesh(half_w: f32, half_h: f32) -> Mesh {
    // top, right, bottom, left
    let positions: Vec<[f32; 3]> = vec![
        [0.0, half_h, 0.0],
        [half_w, 0.0, 0.0],
        [0.0, -half_h, 0.0],
        [-half_w, 0.0, 0.0],
    ];
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_indices(Indices::U32(vec![0, 1, 3, 1, 2, 3]));
    mesh
}
