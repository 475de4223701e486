//! The player-controlled catcher

use catch_engine::anim::{AnimError, AnimationFile, Artboard, Renderer, StateMachine};
use catch_engine::foundation::math::{Rect, Vec2};
use catch_engine::input::{Key, KeySet};
use catch_engine::Entity;

const ARTBOARD: &str = "player";
const STATE_MACHINE: &str = "State Machine 1";

/// Vertical movement speed in units per second
const MOVE_SPEED: f32 = 300.0;
/// Fixed spawn distance from the left edge
const START_X: f32 = 50.0;
/// Collision inset on all sides; the hitbox is tighter than the sprite
const COLLISION_MARGIN: f32 = 30.0;

/// The user-controlled entity. Only vertical movement is driven by
/// input; the horizontal speed exists but stays at zero.
pub struct Player<F: AnimationFile> {
    position: Vec2,
    x_speed: f32,
    y_speed: f32,
    artboard: F::Artboard,
    machine: F::StateMachine,
    released: bool,
}

impl<F: AnimationFile> Player<F> {
    /// Instantiate the player artboard, vertically centered on the canvas
    ///
    /// # Errors
    /// Fatal startup error if the artboard or its state machine is
    /// missing from the animation file.
    pub fn new(file: &mut F, canvas: Rect) -> Result<Self, AnimError> {
        let mut artboard = file.artboard(ARTBOARD)?;
        let machine = artboard.state_machine(STATE_MACHINE)?;
        let extent = artboard.bounds();
        let position = Vec2::new(START_X, canvas.height() / 2.0 - extent.max_y / 2.0);

        Ok(Self {
            position,
            x_speed: 0.0,
            y_speed: 0.0,
            artboard,
            machine,
            released: false,
        })
    }

    /// Re-read the held keys after an input event.
    ///
    /// Vertical speed resets to zero, then the most recently pressed of
    /// Up/Down wins: Up moves at -300, Down at +300. The `direction`
    /// animation input mirrors the outcome (0 idle, 1 up, 2 down).
    pub fn handle_keys(&mut self, keys: &KeySet) {
        self.y_speed = 0.0;
        let mut direction = 0.0;

        for key in keys.iter() {
            match key {
                Key::Up => {
                    self.y_speed = -MOVE_SPEED;
                    direction = 1.0;
                }
                Key::Down => {
                    self.y_speed = MOVE_SPEED;
                    direction = 2.0;
                }
            }
        }

        self.machine.set_number("direction", direction);
    }

    /// Current position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current vertical speed
    pub fn y_speed(&self) -> f32 {
        self.y_speed
    }
}

impl<F: AnimationFile> Entity for Player<F> {
    type Renderer = F::Renderer;

    fn update(&mut self, dt: f32) {
        if self.released {
            return;
        }
        self.machine.advance(dt);
        self.artboard.advance(dt);
        self.position.x += self.x_speed * dt;
        self.position.y += self.y_speed * dt;
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
            .inset(COLLISION_MARGIN)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::mock_file;
    use approx::assert_relative_eq;
    use catch_engine::anim::mock::MockFile;

    fn player(canvas: Rect) -> (Player<MockFile>, MockFile) {
        let mut file = mock_file();
        let probe = file.clone();
        let player = Player::new(&mut file, canvas).unwrap();
        (player, probe)
    }

    #[test]
    fn test_initial_position_is_centered() {
        // Player artboard is 160x160 in the mock file.
        let (player, _) = player(Rect::sized(1024.0, 690.0));

        assert_relative_eq!(player.position().x, 50.0);
        assert_relative_eq!(player.position().y, 690.0 / 2.0 - 80.0);
    }

    #[test]
    fn test_missing_artboard_is_fatal() {
        let mut file = MockFile::new();
        assert!(Player::new(&mut file, Rect::sized(800.0, 600.0)).is_err());
    }

    #[test]
    fn test_up_key_moves_up() {
        let (mut player, probe) = player(Rect::sized(800.0, 600.0));
        let mut keys = KeySet::new();

        keys.press(Key::Up);
        player.handle_keys(&keys);

        assert_relative_eq!(player.y_speed(), -300.0);
        assert_eq!(probe.last_machine().unwrap().number("direction"), Some(1.0));
    }

    #[test]
    fn test_down_key_moves_down() {
        let (mut player, probe) = player(Rect::sized(800.0, 600.0));
        let mut keys = KeySet::new();

        keys.press(Key::Down);
        player.handle_keys(&keys);

        assert_relative_eq!(player.y_speed(), 300.0);
        assert_eq!(probe.last_machine().unwrap().number("direction"), Some(2.0));
    }

    #[test]
    fn test_most_recent_key_wins() {
        let (mut player, _) = player(Rect::sized(800.0, 600.0));
        let mut keys = KeySet::new();

        keys.press(Key::Up);
        keys.press(Key::Down);
        player.handle_keys(&keys);
        assert_relative_eq!(player.y_speed(), 300.0);

        // Same keys held, opposite press order.
        let mut keys = KeySet::new();
        keys.press(Key::Down);
        keys.press(Key::Up);
        player.handle_keys(&keys);
        assert_relative_eq!(player.y_speed(), -300.0);
    }

    #[test]
    fn test_release_resets_speed() {
        let (mut player, probe) = player(Rect::sized(800.0, 600.0));
        let mut keys = KeySet::new();

        keys.press(Key::Up);
        player.handle_keys(&keys);
        keys.release(Key::Up);
        player.handle_keys(&keys);

        assert_relative_eq!(player.y_speed(), 0.0);
        assert_eq!(probe.last_machine().unwrap().number("direction"), Some(0.0));
    }

    #[test]
    fn test_update_integrates_speed() {
        let (mut player, _) = player(Rect::sized(800.0, 600.0));
        let start_y = player.position().y;
        let mut keys = KeySet::new();

        keys.press(Key::Down);
        player.handle_keys(&keys);
        player.update(0.5);

        assert_relative_eq!(player.position().y, start_y + 150.0);
        assert_relative_eq!(player.position().x, 50.0);
    }

    #[test]
    fn test_bounds_use_fixed_inset() {
        let (player, _) = player(Rect::sized(1024.0, 690.0));
        let bounds = player.bounds();
        let y = 690.0 / 2.0 - 80.0;

        assert_relative_eq!(bounds.min_x, 50.0 + 30.0);
        assert_relative_eq!(bounds.max_x, 50.0 + 160.0 - 30.0);
        assert_relative_eq!(bounds.min_y, y + 30.0);
        assert_relative_eq!(bounds.max_y, y + 160.0 - 30.0);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut player, probe) = player(Rect::sized(800.0, 600.0));

        player.destroy();
        player.destroy();

        assert_eq!(probe.boards()[0].release_count(), 1);
        assert_eq!(probe.last_machine().unwrap().release_count(), 1);
    }
}
