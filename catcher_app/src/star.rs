//! Collectible stars
//!
//! One data-driven star type covers every variant; the variants differ
//! only in the attribute record fixed at spawn time. Lifecycle runs
//! idle -> picked (collision) -> destroyed (collect animation finished),
//! with idle stars silently removed once they drift off the left edge.

use catch_engine::anim::{AnimError, AnimationFile, Artboard, Renderer, StateMachine};
use catch_engine::foundation::math::{Rect, Vec2};
use catch_engine::Entity;
use rand::Rng;

const ARTBOARD: &str = "star";
const STATE_MACHINE: &str = "State Machine 1";

/// Event the animation reports when the collect animation finishes
pub const PICKED_END_EVENT: &str = "picked end";

/// Horizontal spawn offset past the right canvas edge
const SPAWN_X_OFFSET: f32 = 10.0;
/// Vertical band kept clear at the top and bottom of the canvas
const SPAWN_Y_MARGIN: f32 = 200.0;

/// Star variants, differing only in their attribute records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarVariant {
    /// Default attribute set
    Base,
    /// Faster, same value
    Small,
    /// Bigger sprite, double value
    Large,
    /// Fastest, recolored, big sprite
    Special,
}

/// Per-variant attributes, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarAttrs {
    /// Leftward scroll speed in units per second
    pub speed: f32,
    /// Collision inset; bigger sprites use a smaller inset so the usable
    /// hitbox stays comparable
    pub margin: f32,
    /// Score awarded on pickup
    pub value: u32,
    /// `size` animation input
    pub size: f32,
    /// `color` animation input
    pub color: f32,
}

impl StarVariant {
    /// The attribute record for this variant
    pub const fn attrs(self) -> StarAttrs {
        match self {
            Self::Base => StarAttrs {
                speed: 200.0,
                margin: 50.0,
                value: 100,
                size: 0.0,
                color: 0.0,
            },
            Self::Small => StarAttrs {
                speed: 300.0,
                margin: 50.0,
                value: 100,
                size: 0.0,
                color: 0.0,
            },
            Self::Large => StarAttrs {
                speed: 200.0,
                margin: 10.0,
                value: 200,
                size: 1.0,
                color: 0.0,
            },
            Self::Special => StarAttrs {
                speed: 500.0,
                margin: 10.0,
                value: 100,
                size: 1.0,
                color: 1.0,
            },
        }
    }
}

/// Per-frame spawn decision from one uniform draw in [0, 1).
///
/// Thresholds are checked in rarity order, so the bands are mutually
/// exclusive and at most one star spawns per frame: roughly 0.1%
/// Special, 0.4% Large, and 0.5% Small.
pub fn variant_for_roll(roll: f64) -> Option<StarVariant> {
    if roll < 0.001 {
        Some(StarVariant::Special)
    } else if roll < 0.005 {
        Some(StarVariant::Large)
    } else if roll < 0.01 {
        Some(StarVariant::Small)
    } else {
        None
    }
}

/// Star lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarState {
    /// Scrolling, collidable
    Idle,
    /// Caught; the collect animation is playing
    Picked,
    /// Collect animation finished; ready to be released
    Destroyed,
}

/// A live collectible star
pub struct Star<F: AnimationFile> {
    variant: StarVariant,
    attrs: StarAttrs,
    position: Vec2,
    state: StarState,
    artboard: F::Artboard,
    machine: F::StateMachine,
    released: bool,
}

impl<F: AnimationFile> Star<F> {
    /// Spawn a star just past the right canvas edge at a random height.
    ///
    /// # Errors
    /// Propagates missing artboard/state machine errors from the file.
    pub fn spawn(
        file: &mut F,
        canvas: Rect,
        variant: StarVariant,
        rng: &mut impl Rng,
    ) -> Result<Self, AnimError> {
        let y_min = SPAWN_Y_MARGIN as i32;
        let y_max = ((canvas.max_y - SPAWN_Y_MARGIN) as i32).max(y_min);
        let y = rng.gen_range(y_min..=y_max) as f32;
        Self::at_position(
            file,
            variant,
            Vec2::new(canvas.max_x + SPAWN_X_OFFSET, y),
        )
    }

    /// Instantiate a star at an explicit position.
    ///
    /// # Errors
    /// Propagates missing artboard/state machine errors from the file.
    pub fn at_position(
        file: &mut F,
        variant: StarVariant,
        position: Vec2,
    ) -> Result<Self, AnimError> {
        let mut artboard = file.artboard(ARTBOARD)?;
        let mut machine = artboard.state_machine(STATE_MACHINE)?;
        let attrs = variant.attrs();

        machine.set_number("size", attrs.size);
        machine.set_number("color", attrs.color);

        Ok(Self {
            variant,
            attrs,
            position,
            state: StarState::Idle,
            artboard,
            machine,
            released: false,
        })
    }

    /// Transition idle -> picked and raise the `picked` animation input.
    ///
    /// No effect once the star is picked or destroyed.
    pub fn pick(&mut self) {
        if self.state != StarState::Idle {
            return;
        }
        self.state = StarState::Picked;
        self.machine.set_bool("picked", true);
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Which variant this star was spawned as
    pub fn variant(&self) -> StarVariant {
        self.variant
    }

    /// Score awarded when this star is caught
    pub fn value(&self) -> u32 {
        self.attrs.value
    }

    /// Current lifecycle state
    pub fn state(&self) -> StarState {
        self.state
    }

    /// Still scrolling and collidable
    pub fn is_idle(&self) -> bool {
        self.state == StarState::Idle
    }

    /// Caught, playing the collect animation
    pub fn is_picked(&self) -> bool {
        self.state == StarState::Picked
    }

    /// Finished the collect animation
    pub fn is_destroyed(&self) -> bool {
        self.state == StarState::Destroyed
    }
}

impl<F: AnimationFile> Entity for Star<F> {
    type Renderer = F::Renderer;

    fn update(&mut self, dt: f32) {
        if self.released {
            return;
        }
        self.artboard.advance(dt);
        self.machine.advance(dt);
        self.position.x -= self.attrs.speed * dt;

        // The collect animation owns the picked -> destroyed transition;
        // the star only watches for its completion event.
        if self.state == StarState::Picked
            && self
                .machine
                .reported_events()
                .iter()
                .any(|event| event.name == PICKED_END_EVENT)
        {
            self.state = StarState::Destroyed;
        }
    }

    fn draw(&self, renderer: &mut F::Renderer, _canvas: Rect) {
        if self.released {
            return;
        }
        renderer.save();
        renderer.translate(self.position.x, self.position.y);
        self.artboard.draw(renderer);
        renderer.restore();
    }

    fn bounds(&self) -> Rect {
        self.artboard
            .bounds()
            .translated(self.position)
            .inset(self.attrs.margin)
    }

    fn destroy(&mut self) {
        if self.released {
            return;
        }
        self.machine.release();
        self.artboard.release();
        self.released = true;
    }
}
