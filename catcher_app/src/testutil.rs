//! Shared test fixtures

use catch_engine::anim::mock::MockFile;
use catch_engine::foundation::math::Rect;

/// A mock animation file with the same artboards, state machines, and
/// text runs the shipped bundle exposes. Extents match the built-in
/// vector backend so bounds math lines up across tests.
pub fn mock_file() -> MockFile {
    MockFile::new()
        .with_artboard("bg", Rect::sized(1920.0, 1080.0), &["bg"], &[])
        .with_artboard("player", Rect::sized(160.0, 160.0), &["State Machine 1"], &[])
        .with_artboard("star", Rect::sized(160.0, 160.0), &["State Machine 1"], &[])
        .with_artboard(
            "score",
            Rect::sized(260.0, 70.0),
            &["State Machine 1"],
            &["score"],
        )
}
