//! Score counter and its text display binding

use catch_engine::anim::{Alignment, AnimError, AnimationFile, Artboard, Fit, Renderer, StateMachine};
use catch_engine::foundation::math::{Rect, Vec2};
use catch_engine::Entity;

const ARTBOARD: &str = "score";
const STATE_MACHINE: &str = "State Machine 1";
const TEXT_RUN: &str = "score";

/// Fixed offset from the top-left corner of the screen
const SCREEN_OFFSET: f32 = 10.0;

/// The score counter, mirrored into the artboard's text run on every
/// assignment.
pub struct Score<F: AnimationFile> {
    artboard: F::Artboard,
    machine: F::StateMachine,
    score: u32,
    released: bool,
}

impl<F: AnimationFile> Score<F> {
    /// Instantiate the score artboard and initialize the display to "0".
    ///
    /// # Errors
    /// Fatal startup error if the artboard, its state machine, or the
    /// `score` text run is missing.
    pub fn new(file: &mut F) -> Result<Self, AnimError> {
        let mut artboard = file.artboard(ARTBOARD)?;
        let machine = artboard.state_machine(STATE_MACHINE)?;
        artboard.set_text_run(TEXT_RUN, "0")?;

        Ok(Self {
            artboard,
            machine,
            score: 0,
            released: false,
        })
    }

    /// Current score
    pub fn get(&self) -> u32 {
        self.score
    }

    /// Assign the score, re-rendering the text display.
    ///
    /// A display update failure at runtime is logged and skipped; the
    /// counter itself always updates.
    pub fn set(&mut self, value: u32) {
        self.score = value;
        if let Err(err) = self.artboard.set_text_run(TEXT_RUN, &value.to_string()) {
            log::warn!("score display not updated: {err}");
        }
    }

    /// Add to the score
    pub fn add(&mut self, value: u32) {
        self.set(self.score + value);
    }
}

impl<F: AnimationFile> Entity for Score<F> {
    type Renderer = F::Renderer;

    fn update(&mut self, dt: f32) {
        if self.released {
            return;
        }
        self.artboard.advance(dt);
        self.machine.advance(dt);
    }

    fn draw(&self, renderer: &mut F::Renderer, canvas: Rect) {
        if self.released {
            return;
        }
        renderer.save();
        // Pinned to the corner with no scaling, independent of canvas size.
        renderer.align(
            Fit::None,
            Alignment::TopLeft,
            Rect::new(SCREEN_OFFSET, SCREEN_OFFSET, canvas.max_x, canvas.max_y),
            self.artboard.bounds(),
        );
        self.artboard.draw(renderer);
        renderer.restore();
    }

    fn bounds(&self) -> Rect {
        self.artboard
            .bounds()
            .translated(Vec2::new(SCREEN_OFFSET, SCREEN_OFFSET))
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
    use catch_engine::anim::mock::{MockFile, MockRenderer, RenderOp};

    #[test]
    fn test_display_starts_at_zero() {
        let mut file = mock_file();
        let probe = file.clone();
        let _score = Score::new(&mut file).unwrap();

        assert_eq!(
            probe.board("score").unwrap().text_run("score").as_deref(),
            Some("0")
        );
    }

    #[test]
    fn test_missing_text_run_is_fatal() {
        let mut file = MockFile::new().with_artboard(
            "score",
            Rect::sized(260.0, 70.0),
            &["State Machine 1"],
            &[],
        );
        assert!(Score::new(&mut file).is_err());
    }

    #[test]
    fn test_every_assignment_rewrites_the_display() {
        let mut file = mock_file();
        let probe = file.clone();
        let mut score = Score::new(&mut file).unwrap();
        let board = probe.board("score").unwrap();

        score.add(100);
        assert_eq!(score.get(), 100);
        assert_eq!(board.text_run("score").as_deref(), Some("100"));

        score.add(200);
        assert_eq!(score.get(), 300);
        assert_eq!(board.text_run("score").as_deref(), Some("300"));

        // A plain assignment, not just increments, refreshes the text.
        score.set(0);
        assert_eq!(board.text_run("score").as_deref(), Some("0"));
    }

    #[test]
    fn test_draw_pins_to_screen_offset_without_scaling() {
        let mut file = mock_file();
        let score = Score::new(&mut file).unwrap();
        let mut renderer = MockRenderer::new();

        score.draw(&mut renderer, Rect::sized(1280.0, 720.0));

        assert!(renderer.ops.iter().any(|op| matches!(
            op,
            RenderOp::Align {
                fit: Fit::None,
                alignment: Alignment::TopLeft,
                dest,
                ..
            } if dest.min_x == 10.0 && dest.min_y == 10.0
        )));
        assert_eq!(renderer.drawn(), vec!["score"]);
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut file = mock_file();
        let probe = file.clone();
        let mut score = Score::new(&mut file).unwrap();

        score.destroy();
        score.destroy();

        assert_eq!(probe.board("score").unwrap().release_count(), 1);
    }
}
