//! Animation collaborator contract
//!
//! Trait seam over an external 2D animation runtime. The runtime owns the
//! pre-authored artboards and their state machines; game code looks both
//! up by exact name, advances them each frame, feeds named inputs, and
//! polls the named events each state machine reported since its last
//! advance. Instances must be released exactly once when the owning
//! entity leaves the live set.

use crate::foundation::math::Rect;
use thiserror::Error;

pub mod mock;

#[cfg(feature = "vector-backend")]
pub mod vector;

/// Animation-layer errors
#[derive(Error, Debug)]
pub enum AnimError {
    /// No artboard with the requested name exists in the file
    #[error("artboard not found: {0}")]
    MissingArtboard(String),

    /// The artboard has no state machine with the requested name
    #[error("state machine '{name}' not found on artboard '{artboard}'")]
    MissingStateMachine {
        /// Artboard that was searched
        artboard: String,
        /// Requested state machine name
        name: String,
    },

    /// The artboard has no editable text run with the requested name
    #[error("text run '{name}' not found on artboard '{artboard}'")]
    MissingTextRun {
        /// Artboard that was searched
        artboard: String,
        /// Requested text run name
        name: String,
    },
}

/// How a source rectangle is scaled into a destination rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Scale uniformly until the source covers the destination, cropping
    /// the overflow
    Cover,
    /// No scaling; the source keeps its natural size
    None,
}

/// Where the fitted source rectangle is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Centered in the destination
    Center,
    /// Anchored to the destination's top-left corner
    TopLeft,
}

/// A named event reported by a state machine since its last advance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedEvent {
    /// Event name as authored in the animation file
    pub name: String,
}

impl ReportedEvent {
    /// Create an event with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A loaded animation bundle from which artboards are instantiated
pub trait AnimationFile {
    /// Renderer the file's artboards draw into
    type Renderer: Renderer;
    /// State machine instances produced by this file's artboards
    type StateMachine: StateMachine;
    /// Artboard instances produced by this file
    type Artboard: Artboard<Renderer = Self::Renderer, StateMachine = Self::StateMachine>;

    /// Instantiate the artboard with the given name.
    ///
    /// # Errors
    /// `AnimError::MissingArtboard` if no artboard has that exact name.
    fn artboard(&mut self, name: &str) -> Result<Self::Artboard, AnimError>;
}

/// A live artboard instance
pub trait Artboard {
    /// Renderer this artboard draws into
    type Renderer: Renderer;
    /// State machine instances attached to this artboard
    type StateMachine: StateMachine;

    /// Instantiate the named state machine for this artboard.
    ///
    /// # Errors
    /// `AnimError::MissingStateMachine` if no machine has that name.
    fn state_machine(&mut self, name: &str) -> Result<Self::StateMachine, AnimError>;

    /// Advance the artboard's animations by `dt` seconds
    fn advance(&mut self, dt: f32);

    /// Draw the artboard under the renderer's current transform
    fn draw(&self, renderer: &mut Self::Renderer);

    /// Natural bounding box of the artboard, anchored at the origin
    fn bounds(&self) -> Rect;

    /// Rewrite the named editable text run.
    ///
    /// # Errors
    /// `AnimError::MissingTextRun` if the artboard has no such run.
    fn set_text_run(&mut self, name: &str, value: &str) -> Result<(), AnimError>;

    /// Release the underlying runtime instance
    fn release(&mut self);
}

/// A live state machine instance driving an artboard
pub trait StateMachine {
    /// Advance the machine by `dt` seconds.
    ///
    /// Advancing clears the previous frame's reported events before any
    /// new ones are recorded.
    fn advance(&mut self, dt: f32);

    /// Set a named numeric input; unknown names are ignored
    fn set_number(&mut self, input: &str, value: f32);

    /// Set a named boolean input; unknown names are ignored
    fn set_bool(&mut self, input: &str, value: bool);

    /// The finite batch of events reported since the last advance
    fn reported_events(&self) -> &[ReportedEvent];

    /// Release the underlying runtime instance
    fn release(&mut self);
}

/// Transform and presentation surface the artboards draw into
pub trait Renderer {
    /// Clear the frame
    fn clear(&mut self);

    /// Push the current transform onto the stack
    fn save(&mut self);

    /// Pop the transform stack
    fn restore(&mut self);

    /// Translate the current transform
    fn translate(&mut self, dx: f32, dy: f32);

    /// Compose a fit of `source` into `dest` onto the current transform
    fn align(&mut self, fit: Fit, alignment: Alignment, dest: Rect, source: Rect);
}
