//! Audio output
//!
//! Platform-independent abstraction over audio playback. Playback is
//! fire-and-forget: a failed play is reported to the caller, who is
//! expected to log and move on rather than halt the frame.

mod rodio_backend;

pub use rodio_backend::RodioBackend;

use thiserror::Error;

/// Audio-layer errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// Output device could not be opened
    #[error("audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Operation attempted before `initialize`
    #[error("audio backend is not initialized")]
    BackendNotInitialized,

    /// Decoding or sink creation failed
    #[error("audio playback failed: {0}")]
    PlaybackFailed(String),

    /// Handle does not refer to an active sound
    #[error("invalid sound handle")]
    InvalidHandle,
}

/// Handle for tracking an active sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle {
    id: u32,
}

impl SoundHandle {
    /// Create a handle with the given id
    pub(crate) const fn new(id: u32) -> Self {
        Self { id }
    }
}

/// Audio backend trait for platform abstraction.
///
/// Single-threaded by design: the game loop owns the backend and calls
/// it from the frame callback only.
pub trait AudioBackend {
    /// Initialize the audio output device
    ///
    /// # Errors
    /// `AudioError::BackendInitFailed` if the output cannot be opened.
    fn initialize(&mut self) -> Result<(), AudioError>;

    /// Shut the backend down, stopping all sounds
    fn shutdown(&mut self);

    /// Check whether the backend is initialized
    fn is_initialized(&self) -> bool;

    /// Reap finished sounds (call once per frame)
    fn update(&mut self);

    /// Stop every active sound
    fn stop_all(&mut self);

    /// Play a one-shot sound from an in-memory buffer
    ///
    /// # Errors
    /// `AudioError::BackendNotInitialized` before `initialize`;
    /// `AudioError::PlaybackFailed` if decoding or sink creation fails.
    fn play_sound(&mut self, data: &[u8]) -> Result<SoundHandle, AudioError>;

    /// Play a sound from an in-memory buffer, looping forever
    ///
    /// # Errors
    /// Same conditions as [`AudioBackend::play_sound`].
    fn play_looping(&mut self, data: &[u8]) -> Result<SoundHandle, AudioError>;

    /// Set the volume of an active sound (1.0 = unity gain)
    ///
    /// # Errors
    /// `AudioError::InvalidHandle` if the sound is no longer active.
    fn set_volume(&mut self, handle: SoundHandle, volume: f32) -> Result<(), AudioError>;

    /// Stop an active sound; succeeds for already-finished handles
    ///
    /// # Errors
    /// Currently infallible; the `Result` keeps the contract uniform.
    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError>;

    /// Check whether a sound is still playing
    fn is_playing(&self, handle: SoundHandle) -> bool;
}

/// Create and initialize the default audio backend for the platform
///
/// # Errors
/// `AudioError::BackendInitFailed` if the output cannot be opened.
pub fn create_backend() -> Result<Box<dyn AudioBackend>, AudioError> {
    let mut backend = Box::new(RodioBackend::new());
    backend.initialize()?;
    Ok(backend)
}
