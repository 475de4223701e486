//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback. Rodio is
//! pure Rust and decodes WAV, OGG Vorbis, MP3, and FLAC.

use super::{AudioBackend, AudioError, SoundHandle};
use rodio::source::Source;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::collections::HashMap;
use std::io::Cursor;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Active sound sinks
    active_sounds: HashMap<SoundHandle, Sink>,
    /// Next sound id for handle generation
    next_id: u32,
    /// Initialization state
    initialized: bool,
}

impl RodioBackend {
    /// Create a new, uninitialized Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            active_sounds: HashMap::new(),
            next_id: 0,
            initialized: false,
        }
    }

    fn next_handle(&mut self) -> SoundHandle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        SoundHandle::new(id)
    }

    fn new_sink(&self) -> Result<Sink, AudioError> {
        let stream_handle = self
            .stream_handle
            .as_ref()
            .ok_or(AudioError::BackendNotInitialized)?;
        Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("failed to create sink: {e}")))
    }

    fn decode(data: &[u8]) -> Result<Decoder<Cursor<Vec<u8>>>, AudioError> {
        Decoder::new(Cursor::new(data.to_vec()))
            .map_err(|e| AudioError::PlaybackFailed(format!("failed to decode audio: {e}")))
    }
}

impl AudioBackend for RodioBackend {
    fn initialize(&mut self) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }

        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            AudioError::BackendInitFailed(format!("failed to create audio output: {e}"))
        })?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.initialized = true;

        log::info!("Rodio audio backend initialized");
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        self.stop_all();
        self.stream_handle = None;
        self._output_stream = None;
        self.initialized = false;

        log::info!("Rodio audio backend shutdown");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self) {
        // Remove finished sounds; looping sinks are never empty.
        self.active_sounds.retain(|_handle, sink| !sink.empty());
    }

    fn stop_all(&mut self) {
        for (_handle, sink) in self.active_sounds.drain() {
            sink.stop();
        }
    }

    fn play_sound(&mut self, data: &[u8]) -> Result<SoundHandle, AudioError> {
        let sink = self.new_sink()?;
        sink.append(Self::decode(data)?);

        let handle = self.next_handle();
        self.active_sounds.insert(handle, sink);
        Ok(handle)
    }

    fn play_looping(&mut self, data: &[u8]) -> Result<SoundHandle, AudioError> {
        let sink = self.new_sink()?;
        sink.append(Self::decode(data)?.repeat_infinite());

        let handle = self.next_handle();
        self.active_sounds.insert(handle, sink);
        Ok(handle)
    }

    fn set_volume(&mut self, handle: SoundHandle, volume: f32) -> Result<(), AudioError> {
        let sink = self
            .active_sounds
            .get(&handle)
            .ok_or(AudioError::InvalidHandle)?;
        sink.set_volume(volume);
        Ok(())
    }

    fn stop(&mut self, handle: SoundHandle) -> Result<(), AudioError> {
        if let Some(sink) = self.active_sounds.remove(&handle) {
            sink.stop();
        }
        Ok(())
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.active_sounds
            .get(&handle)
            .map(|sink| !sink.is_paused() && !sink.empty())
            .unwrap_or(false)
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_initialization() {
        let mut backend = RodioBackend::new();
        assert!(!backend.is_initialized());

        // May fail in CI/test environments without an audio device.
        if backend.initialize().is_ok() {
            assert!(backend.is_initialized());
            backend.shutdown();
            assert!(!backend.is_initialized());
        }
    }

    #[test]
    fn test_handle_generation_is_unique() {
        let mut backend = RodioBackend::new();
        let first = backend.next_handle();
        let second = backend.next_handle();

        assert_ne!(first, second);
    }

    #[test]
    fn test_playback_without_initialization() {
        let mut backend = RodioBackend::new();
        let dummy = vec![0u8; 64];

        assert!(matches!(
            backend.play_sound(&dummy),
            Err(AudioError::BackendNotInitialized)
        ));
        assert!(matches!(
            backend.play_looping(&dummy),
            Err(AudioError::BackendNotInitialized)
        ));
    }

    #[test]
    fn test_invalid_handle_operations() {
        let mut backend = RodioBackend::new();

        if backend.initialize().is_ok() {
            let invalid = SoundHandle::new(999);

            assert!(matches!(
                backend.set_volume(invalid, 0.5),
                Err(AudioError::InvalidHandle)
            ));
            // Stop is idempotent and succeeds for unknown handles.
            assert!(backend.stop(invalid).is_ok());
            assert!(!backend.is_playing(invalid));

            backend.shutdown();
        }
    }

    #[test]
    fn test_double_initialization() {
        let mut backend = RodioBackend::new();

        if backend.initialize().is_ok() {
            assert!(backend.initialize().is_ok());
            backend.shutdown();
        }
    }
}
