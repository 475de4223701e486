//! Star Catcher
//!
//! Move the catcher up and down to grab scrolling stars. The game loop,
//! entity lifecycles, and scoring live in [`director`]; rendering and
//! animation playback go through the engine's animation seam, audio
//! through its rodio backend.

use std::path::Path;

use macroquad::prelude::Conf;
use macroquad::input::{
    is_key_pressed, is_key_released, is_mouse_button_pressed, KeyCode, MouseButton,
};
use macroquad::window::{next_frame, screen_height, screen_width};
use thiserror::Error;

use catch_engine::anim::vector::{VectorFile, VectorRenderer};
use catch_engine::anim::AnimError;
use catch_engine::foundation::math::Rect;
use catch_engine::input::Key;

mod audio;
mod config;
mod director;
mod player;
mod score;
mod star;

#[cfg(test)]
mod testutil;

use audio::GameAudio;
use config::{ConfigError, GameConfig};
use director::Director;

/// Fatal startup errors
#[derive(Error, Debug)]
enum GameError {
    #[error("animation setup failed: {0}")]
    Anim(#[from] AnimError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn window_conf() -> Conf {
    let config = GameConfig::load_or_default(Path::new(GameConfig::DEFAULT_PATH))
        .unwrap_or_default();
    Conf {
        window_title: config.window.title,
        window_width: config.window.width as i32,
        window_height: config.window.height as i32,
        window_resizable: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(err) = run().await {
        log::error!("fatal: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), GameError> {
    let config = GameConfig::load_or_default(Path::new(GameConfig::DEFAULT_PATH))?;
    log::info!("starting {}", config.window.title);

    let file = VectorFile::new();
    let audio = GameAudio::load(&config.audio);
    let canvas = Rect::sized(screen_width(), screen_height());
    let mut director = Director::new(file, canvas, audio)?;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        pump_input(&mut director);

        // The window may have been resized since the last frame.
        director.resize(screen_width(), screen_height());

        let mut renderer = VectorRenderer::new();
        director.frame(&mut renderer);

        next_frame().await;
    }

    director.shutdown();
    log::info!("goodbye");
    Ok(())
}

fn pump_input(director: &mut Director<VectorFile>) {
    for (code, key) in [(KeyCode::Up, Key::Up), (KeyCode::Down, Key::Down)] {
        if is_key_pressed(code) {
            director.key_event(key, true);
        }
        if is_key_released(code) {
            director.key_event(key, false);
        }
    }

    // Any click satisfies the autoplay gate and starts the music.
    if is_mouse_button_pressed(MouseButton::Left) {
        director.notify_interaction();
    }
}
