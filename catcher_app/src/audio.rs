//! Game audio frontend
//!
//! Loads the two audio assets at startup and gates all playback behind
//! the first user interaction, mirroring browser autoplay rules. Every
//! failure here is logged and non-fatal: a broken audio device or a
//! missing file silences the game but never stops it.

use catch_engine::audio::{create_backend, AudioBackend, SoundHandle};
use std::path::Path;

use crate::config::AudioConfig;

/// Background music plus the pickup effect, gated on user interaction
pub struct GameAudio {
    backend: Option<Box<dyn AudioBackend>>,
    music: Option<Vec<u8>>,
    pickup: Option<Vec<u8>>,
    music_handle: Option<SoundHandle>,
    unlocked: bool,
    volume: f32,
}

impl GameAudio {
    /// Open the audio device and read both assets
    pub fn load(config: &AudioConfig) -> Self {
        let backend = match create_backend() {
            Ok(backend) => Some(backend),
            Err(err) => {
                log::warn!("audio disabled: {err}");
                None
            }
        };

        Self {
            backend,
            music: read_asset("music", &config.music),
            pickup: read_asset("pickup", &config.pickup),
            music_handle: None,
            unlocked: false,
            volume: config.volume,
        }
    }

    /// An audio frontend that never plays anything (tests, headless runs)
    pub fn disabled() -> Self {
        Self {
            backend: None,
            music: None,
            pickup: None,
            music_handle: None,
            unlocked: false,
            volume: 0.0,
        }
    }

    /// First user interaction: unlock playback and start the music loop
    pub fn unlock(&mut self) {
        if self.unlocked {
            return;
        }
        self.unlocked = true;

        let (Some(backend), Some(music)) = (self.backend.as_mut(), self.music.as_ref()) else {
            return;
        };
        match backend.play_looping(music) {
            Ok(handle) => {
                if let Err(err) = backend.set_volume(handle, self.volume) {
                    log::warn!("music volume not applied: {err}");
                }
                self.music_handle = Some(handle);
                log::info!("background music started");
            }
            Err(err) => log::warn!("music playback failed: {err}"),
        }
    }

    /// Whether playback has been unlocked by a user interaction
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Fire the pickup effect; silently skipped before unlock
    pub fn play_pickup(&mut self) {
        if !self.unlocked {
            return;
        }
        let (Some(backend), Some(pickup)) = (self.backend.as_mut(), self.pickup.as_ref()) else {
            return;
        };
        match backend.play_sound(pickup) {
            Ok(handle) => {
                if let Err(err) = backend.set_volume(handle, self.volume) {
                    log::warn!("pickup volume not applied: {err}");
                }
            }
            Err(err) => log::warn!("pickup playback failed: {err}"),
        }
    }

    /// Reap finished one-shots; call once per frame
    pub fn update(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            backend.update();
        }
    }

    /// Stop everything and close the device
    pub fn shutdown(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            if let Some(handle) = self.music_handle.take() {
                if let Err(err) = backend.stop(handle) {
                    log::warn!("music not stopped: {err}");
                }
            }
            backend.stop_all();
            backend.shutdown();
        }
    }
}

fn read_asset(label: &str, path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(data) => Some(data),
        Err(err) => {
            log::warn!("{label} audio not loaded from '{}': {err}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_audio_is_inert() {
        let mut audio = GameAudio::disabled();
        assert!(!audio.is_unlocked());

        // None of these may panic without a device.
        audio.play_pickup();
        audio.unlock();
        audio.play_pickup();
        audio.update();
        audio.shutdown();

        assert!(audio.is_unlocked());
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut audio = GameAudio::disabled();
        audio.unlock();
        audio.unlock();
        assert!(audio.is_unlocked());
    }

    #[test]
    fn test_missing_assets_are_non_fatal() {
        let config = AudioConfig {
            music: "does/not/exist.ogg".into(),
            pickup: "also/missing.ogg".into(),
            volume: 0.4,
        };
        // Works with or without an audio device on the test machine.
        let mut audio = GameAudio::load(&config);
        audio.unlock();
        audio.play_pickup();
        audio.shutdown();
    }
}
