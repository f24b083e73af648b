use bevy::prelude::*;
use bevy::window::WindowResolution;
use chrono_splinter::constants::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use chrono_splinter::game::GamePlugin;
use chrono_splinter::rendering::RenderingPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "The Chrono-Splinter".into(),
                resolution: WindowResolution::new(PLAYFIELD_WIDTH as u32, PLAYFIELD_HEIGHT as u32),
                resizable: false,
                ..Default::default()
            }),
            ..Default::default()
        }))
        // GameConfig defaults are inserted by GamePlugin; load_game_config
        // overwrites them from assets/game.toml (if present) in PreStartup.
        .add_plugins((GamePlugin, RenderingPlugin))
        .run();
}
