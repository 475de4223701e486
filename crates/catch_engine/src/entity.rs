//! Entity lifecycle contract

use crate::anim::Renderer;
use crate::foundation::math::Rect;

/// Common contract for on-screen, collidable, destructible game objects.
///
/// All calls are trusted internal calls from the frame orchestrator, in a
/// fixed order: one `update` pass, then one `draw` pass, then lifecycle
/// bookkeeping. `destroy` releases the entity's animation handles and is
/// idempotent; a destroyed entity's `update` and `draw` are no-ops.
pub trait Entity {
    /// Renderer type the entity draws into
    type Renderer: Renderer;

    /// Advance animation state and integrate position by `dt` seconds
    fn update(&mut self, dt: f32);

    /// Render at the current position.
    ///
    /// `canvas` is the current canvas rectangle; entities pinned to the
    /// screen (rather than placed in the world) align against it.
    fn draw(&self, renderer: &mut Self::Renderer, canvas: Rect);

    /// Compute the inset collision rectangle
    fn bounds(&self) -> Rect;

    /// Release the entity's animation resources.
    ///
    /// Safe to call more than once; resources are released exactly once.
    fn destroy(&mut self);
}
