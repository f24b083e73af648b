//! The Chrono-Splinter: a chapter-based vertical shoot-'em-up built on Bevy.
//!
//! Gameplay runs headless through [`game::GamePlugin`]; the window, meshes and
//! text come from [`rendering::RenderingPlugin`].

pub mod audio;
pub mod boss;
pub mod bullet;
pub mod coins;
pub mod collision;
pub mod config;
pub mod constants;
pub mod enemy;
pub mod error;
pub mod floating_text;
pub mod game;
pub mod geometry;
pub mod particles;
pub mod player;
pub mod pool;
pub mod powerups;
pub mod rendering;
pub mod rng;
pub mod waves;
