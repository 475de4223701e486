//! # Catch Engine
//!
//! A small 2D game-engine core with pluggable backends.
//!
//! ## Features
//!
//! - **Animation Seam**: trait contract for an external animation runtime
//!   (artboards, state machines, reported events, renderer transforms)
//! - **Vector Backend**: built-in macroquad renderer implementing the seam
//! - **Mock Backend**: scripted in-memory backend for deterministic tests
//! - **Audio**: rodio-based playback behind a backend trait
//! - **Input**: logical key tracking with press-order preserved
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use catch_engine::prelude::*;
//! use catch_engine::anim::mock::MockFile;
//!
//! let mut file = MockFile::new()
//!     .with_artboard("hero", Rect::sized(64.0, 64.0), &["State Machine 1"], &[]);
//! let mut artboard = file.artboard("hero").unwrap();
//! let mut machine = artboard.state_machine("State Machine 1").unwrap();
//!
//! let mut timer = Timer::new();
//! let dt = timer.tick(); // first frame reports 0.0
//! machine.advance(dt);
//! artboard.advance(dt);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod anim;
pub mod foundation;
pub mod input;

#[cfg(feature = "audio")]
pub mod audio;

mod entity;

pub use entity::Entity;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        anim::{
            Alignment, AnimError, AnimationFile, Artboard, Fit, Renderer, ReportedEvent,
            StateMachine,
        },
        foundation::{
            math::{Rect, Vec2},
            time::Timer,
        },
        input::{Key, KeySet},
        Entity,
    };
}
