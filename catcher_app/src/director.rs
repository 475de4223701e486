//! Frame orchestration
//!
//! The director owns every live entity and all loop state: the frame
//! timer, the pressed-key set, the RNG behind the spawn policy, the
//! audio frontend, and the user-interaction flag. One `frame` call runs
//! exactly one update+draw pass; the caller schedules the next frame.

use catch_engine::anim::{Alignment, AnimError, AnimationFile, Artboard, Fit, Renderer, StateMachine};
use catch_engine::foundation::math::Rect;
use catch_engine::foundation::time::Timer;
use catch_engine::input::{Key, KeySet};
use catch_engine::Entity;
use rand::rngs::ThreadRng;
use rand::Rng;

use crate::audio::GameAudio;
use crate::player::Player;
use crate::score::Score;
use crate::star::{variant_for_roll, Star};

const BG_ARTBOARD: &str = "bg";
const BG_STATE_MACHINE: &str = "bg";

/// Stars past this x coordinate are removed from the live set
const OFFSCREEN_X: f32 = -200.0;

/// The ambient background artboard. Not collidable, but it shares the
/// entity lifecycle so teardown treats it like everything else.
struct Background<F: AnimationFile> {
    artboard: F::Artboard,
    machine: F::StateMachine,
    released: bool,
}

impl<F: AnimationFile> Background<F> {
    fn new(file: &mut F) -> Result<Self, AnimError> {
        let mut artboard = file.artboard(BG_ARTBOARD)?;
        let machine = artboard.state_machine(BG_STATE_MACHINE)?;
        Ok(Self {
            artboard,
            machine,
            released: false,
        })
    }
}

impl<F: AnimationFile> Entity for Background<F> {
    type Renderer = F::Renderer;

    fn update(&mut self, dt: f32) {
        if self.released {
            return;
        }
        self.machine.advance(dt);
        self.artboard.advance(dt);
    }

    fn draw(&self, renderer: &mut F::Renderer, canvas: Rect) {
        if self.released {
            return;
        }
        renderer.save();
        // Cover the whole canvas, cropping the overflow.
        renderer.align(Fit::Cover, Alignment::Center, canvas, self.artboard.bounds());
        self.artboard.draw(renderer);
        renderer.restore();
    }

    fn bounds(&self) -> Rect {
        self.artboard.bounds()
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

/// Owns all entities and drives one update+draw pass per frame
pub struct Director<F: AnimationFile, R: Rng = ThreadRng> {
    file: F,
    canvas: Rect,
    timer: Timer,
    keys: KeySet,
    rng: R,
    background: Background<F>,
    player: Player<F>,
    score: Score<F>,
    stars: Vec<Star<F>>,
    audio: GameAudio,
    user_interacted: bool,
}

impl<F: AnimationFile> Director<F, ThreadRng> {
    /// Build the director and all startup entities.
    ///
    /// # Errors
    /// Fatal if any named artboard, state machine, or text run is
    /// missing from the animation file.
    pub fn new(file: F, canvas: Rect, audio: GameAudio) -> Result<Self, AnimError> {
        Self::with_rng(file, canvas, audio, rand::thread_rng())
    }
}

impl<F: AnimationFile, R: Rng> Director<F, R> {
    /// Build the director with an explicit RNG behind the spawn policy.
    ///
    /// # Errors
    /// Same conditions as [`Director::new`].
    pub fn with_rng(mut file: F, canvas: Rect, audio: GameAudio, rng: R) -> Result<Self, AnimError> {
        let background = Background::new(&mut file)?;
        let player = Player::new(&mut file, canvas)?;
        let score = Score::new(&mut file)?;
        log::info!(
            "director initialized ({}x{} canvas)",
            canvas.width(),
            canvas.height()
        );

        Ok(Self {
            file,
            canvas,
            timer: Timer::new(),
            keys: KeySet::new(),
            rng,
            background,
            player,
            score,
            stars: Vec::new(),
            audio,
            user_interacted: false,
        })
    }

    /// Run one frame: timing, spawn policy, updates, draws, lifecycle
    /// bookkeeping, collision, and scoring.
    pub fn frame(&mut self, renderer: &mut F::Renderer) {
        // First frame only captures the baseline; dt is zero.
        let dt = self.timer.tick();

        renderer.clear();

        self.spawn_star();

        self.background.update(dt);
        self.player.update(dt);
        self.score.update(dt);
        for star in &mut self.stars {
            star.update(dt);
        }

        self.background.draw(renderer, self.canvas);
        self.player.draw(renderer, self.canvas);
        self.score.draw(renderer, self.canvas);
        for star in &self.stars {
            star.draw(renderer, self.canvas);
        }

        // Off-screen stars leave the live set unscored, picked or not.
        self.stars.retain_mut(|star| {
            if star.position().x < OFFSCREEN_X {
                star.destroy();
                false
            } else {
                true
            }
        });

        // A star collides at most once: picked stars are no longer idle
        // and drop out of every later pass.
        let player_bounds = self.player.bounds();
        let caught: Vec<usize> = self
            .stars
            .iter()
            .enumerate()
            .filter(|(_, star)| star.is_idle() && player_bounds.overlaps(&star.bounds()))
            .map(|(index, _)| index)
            .collect();

        let mut awarded = Vec::with_capacity(caught.len());
        for &index in &caught {
            self.stars[index].pick();
            self.audio.play_pickup();
            awarded.push(self.stars[index].value());
        }

        self.stars.retain_mut(|star| {
            if star.is_destroyed() {
                star.destroy();
                false
            } else {
                true
            }
        });

        // Score commits at collision time, before the collect animation
        // finishes.
        for value in awarded {
            self.score.add(value);
        }

        self.audio.update();
    }

    fn spawn_star(&mut self) {
        let roll: f64 = self.rng.gen();
        let Some(variant) = variant_for_roll(roll) else {
            return;
        };
        match Star::spawn(&mut self.file, self.canvas, variant, &mut self.rng) {
            Ok(star) => {
                log::debug!("spawned {variant:?} star");
                self.stars.push(star);
            }
            // One bad spawn must not take the frame down.
            Err(err) => log::warn!("star spawn failed: {err}"),
        }
    }

    /// Feed a key transition and let the player re-read the held set
    pub fn key_event(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.keys.press(key);
        } else {
            self.keys.release(key);
        }
        self.player.handle_keys(&self.keys);
    }

    /// First pointer interaction unlocks audio playback
    pub fn notify_interaction(&mut self) {
        if self.user_interacted {
            return;
        }
        self.user_interacted = true;
        self.audio.unlock();
    }

    /// Resync the canvas rect to the current window size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Rect::sized(width, height);
    }

    /// Current score
    pub fn score(&self) -> u32 {
        self.score.get()
    }

    /// Number of live stars
    pub fn star_count(&self) -> usize {
        self.stars.len()
    }

    /// Release every entity's animation resources and stop the audio
    pub fn shutdown(&mut self) {
        for star in &mut self.stars {
            star.destroy();
        }
        self.stars.clear();
        self.background.destroy();
        self.player.destroy();
        self.score.destroy();
        self.audio.shutdown();
        log::info!("director shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::{StarState, StarVariant, PICKED_END_EVENT};
    use crate::testutil::mock_file;
    use catch_engine::anim::mock::{MockFile, MockRenderer};
    use catch_engine::foundation::math::Vec2;
    use rand::rngs::mock::StepRng;

    // Rolls ~0.5 forever: the spawn policy never fires.
    fn quiet_rng() -> StepRng {
        StepRng::new(u64::MAX / 2, 0)
    }

    // Rolls 0.0 forever: a Special star spawns every frame.
    fn eager_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    fn director(rng: StepRng) -> (Director<MockFile, StepRng>, MockFile) {
        let file = mock_file();
        let probe = file.clone();
        // Canvas chosen so the 160x160 player sits at y = 265.
        let canvas = Rect::sized(1024.0, 690.0);
        let director = Director::with_rng(file, canvas, GameAudio::disabled(), rng).unwrap();
        (director, probe)
    }

    fn push_star(
        director: &mut Director<MockFile, StepRng>,
        variant: StarVariant,
        position: Vec2,
    ) {
        let star = Star::at_position(&mut director.file, variant, position).unwrap();
        director.stars.push(star);
    }

    #[test]
    fn test_startup_requires_all_artboards() {
        let file = MockFile::new();
        let result = Director::with_rng(
            file,
            Rect::sized(800.0, 600.0),
            GameAudio::disabled(),
            quiet_rng(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_first_frame_has_zero_dt() {
        let (mut director, _) = director(quiet_rng());
        push_star(&mut director, StarVariant::Small, Vec2::new(500.0, 300.0));

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        // No integration on the baseline frame.
        assert_eq!(director.stars[0].position().x, 500.0);
    }

    #[test]
    fn test_draw_order_back_to_front() {
        let (mut director, _) = director(quiet_rng());
        push_star(&mut director, StarVariant::Small, Vec2::new(900.0, 300.0));

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        assert_eq!(renderer.drawn(), vec!["bg", "player", "score", "star"]);
        assert_eq!(renderer.ops[0], catch_engine::anim::mock::RenderOp::Clear);
    }

    #[test]
    fn test_low_roll_spawns_a_special_star() {
        let (mut director, _) = director(eager_rng());

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        assert_eq!(director.star_count(), 1);
        assert_eq!(director.stars[0].variant(), StarVariant::Special);
    }

    #[test]
    fn test_quiet_roll_spawns_nothing() {
        let (mut director, _) = director(quiet_rng());

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);
        director.frame(&mut renderer);

        assert_eq!(director.star_count(), 0);
    }

    #[test]
    fn test_collision_awards_score_once() {
        let (mut director, _) = director(quiet_rng());
        // Player bounds are (80, 295) .. (180, 395); this star's inset
        // bounds overlap them.
        push_star(&mut director, StarVariant::Small, Vec2::new(20.0, 340.0));

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        assert_eq!(director.score(), 100);
        assert_eq!(director.stars[0].state(), StarState::Picked);

        // Picked stars are excluded from later collision passes.
        director.frame(&mut renderer);
        assert_eq!(director.score(), 100);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let (mut director, _) = director(quiet_rng());
        // Star inset bounds start exactly at the player's right edge
        // (min_x = 130 + 50 = 180): open-interval overlap fails.
        push_star(&mut director, StarVariant::Small, Vec2::new(130.0, 340.0));

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        assert_eq!(director.score(), 0);
        assert!(director.stars[0].is_idle());
    }

    #[test]
    fn test_multiple_collisions_sum_their_values() {
        let (mut director, _) = director(quiet_rng());
        push_star(&mut director, StarVariant::Small, Vec2::new(20.0, 340.0));
        push_star(&mut director, StarVariant::Large, Vec2::new(40.0, 300.0));

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        assert_eq!(director.score(), 300);
    }

    #[test]
    fn test_offscreen_star_is_removed_without_scoring() {
        let (mut director, probe) = director(quiet_rng());
        push_star(&mut director, StarVariant::Small, Vec2::new(-201.0, 300.0));

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        assert_eq!(director.star_count(), 0);
        assert_eq!(director.score(), 0);
        assert_eq!(probe.board("star").unwrap().release_count(), 1);
    }

    #[test]
    fn test_picked_offscreen_star_is_also_removed() {
        let (mut director, _) = director(quiet_rng());
        push_star(&mut director, StarVariant::Small, Vec2::new(-300.0, 300.0));
        director.stars[0].pick();

        let mut renderer = MockRenderer::new();
        director.frame(&mut renderer);

        assert_eq!(director.star_count(), 0);
        assert_eq!(director.score(), 0);
    }

    #[test]
    fn test_destroyed_star_is_released_and_dropped() {
        let (mut director, probe) = director(quiet_rng());
        push_star(&mut director, StarVariant::Small, Vec2::new(20.0, 340.0));

        let mut renderer = MockRenderer::new();
        // Collide and pick.
        director.frame(&mut renderer);
        assert_eq!(director.score(), 100);

        // The collect animation finishes on a later frame.
        probe.last_machine().unwrap().queue_event(PICKED_END_EVENT);
        director.frame(&mut renderer);

        assert_eq!(director.star_count(), 0);
        assert_eq!(probe.board("star").unwrap().release_count(), 1);
        // Score was committed at collision time and stays put.
        assert_eq!(director.score(), 100);
    }

    #[test]
    fn test_key_events_drive_the_player() {
        let (mut director, probe) = director(quiet_rng());

        director.key_event(Key::Up, true);
        // Player machine is the second one instantiated (bg, player, score).
        assert_eq!(probe.machines()[1].number("direction"), Some(1.0));

        director.key_event(Key::Up, false);
        assert_eq!(probe.machines()[1].number("direction"), Some(0.0));
    }

    #[test]
    fn test_resize_resyncs_canvas() {
        let (mut director, _) = director(quiet_rng());
        director.resize(640.0, 480.0);
        assert_eq!(director.canvas, Rect::sized(640.0, 480.0));
    }

    #[test]
    fn test_shutdown_releases_everything_once() {
        let (mut director, probe) = director(quiet_rng());
        push_star(&mut director, StarVariant::Small, Vec2::new(900.0, 300.0));

        director.shutdown();
        director.shutdown();

        for board in probe.boards() {
            assert_eq!(board.release_count(), 1, "board {}", board.name());
        }
        for machine in probe.machines() {
            assert_eq!(machine.release_count(), 1);
        }
    }
}
