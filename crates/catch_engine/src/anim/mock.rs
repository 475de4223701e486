//! Scripted in-memory animation backend
//!
//! Deterministic stand-in for a real animation runtime, used by unit
//! tests and headless runs. Artboards are declared up front with their
//! extents, state machine names, and text runs; probes expose the state
//! the runtime would otherwise hide (recorded inputs, queued events,
//! release counts) so tests can drive and observe entity behavior.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{
    Alignment, AnimError, AnimationFile, Artboard, Fit, Renderer, ReportedEvent, StateMachine,
};
use crate::foundation::math::Rect;

/// One recorded renderer operation
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Frame cleared
    Clear,
    /// Transform pushed
    Save,
    /// Transform popped
    Restore,
    /// Translation applied
    Translate(f32, f32),
    /// Fit composed onto the transform
    Align {
        /// Requested fit mode
        fit: Fit,
        /// Requested anchor
        alignment: Alignment,
        /// Destination rectangle
        dest: Rect,
        /// Source rectangle
        source: Rect,
    },
    /// Artboard drawn, by name
    DrawArtboard(String),
}

/// Renderer that records every operation in call order
#[derive(Debug, Default)]
pub struct MockRenderer {
    /// Recorded operations
    pub ops: Vec<RenderOp>,
}

impl MockRenderer {
    /// Create an empty recording renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the artboards drawn, in draw order
    pub fn drawn(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::DrawArtboard(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for MockRenderer {
    fn clear(&mut self) {
        self.ops.push(RenderOp::Clear);
    }

    fn save(&mut self) {
        self.ops.push(RenderOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(RenderOp::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(RenderOp::Translate(dx, dy));
    }

    fn align(&mut self, fit: Fit, alignment: Alignment, dest: Rect, source: Rect) {
        self.ops.push(RenderOp::Align {
            fit,
            alignment,
            dest,
            source,
        });
    }
}

#[derive(Debug)]
struct BoardState {
    name: String,
    bounds: Rect,
    text_runs: HashMap<String, String>,
    advanced: f32,
    release_count: u32,
}

#[derive(Debug)]
struct MachineState {
    numbers: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    pending: Vec<ReportedEvent>,
    release_count: u32,
}

#[derive(Debug, Clone)]
struct BoardSpec {
    bounds: Rect,
    machines: Vec<String>,
    text_runs: Vec<String>,
}

#[derive(Debug, Default)]
struct FileState {
    specs: HashMap<String, BoardSpec>,
    boards: Vec<Rc<RefCell<BoardState>>>,
    machines: Vec<Rc<RefCell<MachineState>>>,
}

/// Handle to an instantiated mock artboard's observable state
#[derive(Debug, Clone)]
pub struct BoardProbe {
    inner: Rc<RefCell<BoardState>>,
}

impl BoardProbe {
    /// Artboard name
    pub fn name(&self) -> String {
        self.inner.borrow().name.clone()
    }

    /// Total seconds the artboard has been advanced
    pub fn advanced(&self) -> f32 {
        self.inner.borrow().advanced
    }

    /// How many times `release` has been called
    pub fn release_count(&self) -> u32 {
        self.inner.borrow().release_count
    }

    /// Current value of a text run, if the run exists
    pub fn text_run(&self, name: &str) -> Option<String> {
        self.inner.borrow().text_runs.get(name).cloned()
    }
}

/// Handle to an instantiated mock state machine's observable state
#[derive(Debug, Clone)]
pub struct MachineProbe {
    inner: Rc<RefCell<MachineState>>,
}

impl MachineProbe {
    /// Queue a named event to be reported by the next advance
    pub fn queue_event(&self, name: impl Into<String>) {
        self.inner
            .borrow_mut()
            .pending
            .push(ReportedEvent::new(name));
    }

    /// Last value written to a numeric input
    pub fn number(&self, input: &str) -> Option<f32> {
        self.inner.borrow().numbers.get(input).copied()
    }

    /// Last value written to a boolean input
    pub fn boolean(&self, input: &str) -> Option<bool> {
        self.inner.borrow().bools.get(input).copied()
    }

    /// How many times `release` has been called
    pub fn release_count(&self) -> u32 {
        self.inner.borrow().release_count
    }
}

/// Scripted animation file.
///
/// Cloning yields another handle to the same file, so tests can keep a
/// copy for probing after handing the file to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockFile {
    inner: Rc<RefCell<FileState>>,
}

impl MockFile {
    /// Create a file with no artboards declared
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an artboard with its extent, state machines, and text runs
    #[must_use]
    pub fn with_artboard(
        self,
        name: &str,
        bounds: Rect,
        machines: &[&str],
        text_runs: &[&str],
    ) -> Self {
        self.inner.borrow_mut().specs.insert(
            name.to_string(),
            BoardSpec {
                bounds,
                machines: machines.iter().map(ToString::to_string).collect(),
                text_runs: text_runs.iter().map(ToString::to_string).collect(),
            },
        );
        self
    }

    /// Replace a declared artboard's extent
    pub fn set_bounds(&self, name: &str, bounds: Rect) {
        if let Some(spec) = self.inner.borrow_mut().specs.get_mut(name) {
            spec.bounds = bounds;
        }
    }

    /// Probes for every artboard instantiated so far, in creation order
    pub fn boards(&self) -> Vec<BoardProbe> {
        self.inner
            .borrow()
            .boards
            .iter()
            .map(|state| BoardProbe {
                inner: Rc::clone(state),
            })
            .collect()
    }

    /// Probes for every state machine instantiated so far, in creation order
    pub fn machines(&self) -> Vec<MachineProbe> {
        self.inner
            .borrow()
            .machines
            .iter()
            .map(|state| MachineProbe {
                inner: Rc::clone(state),
            })
            .collect()
    }

    /// Probe for the most recently instantiated state machine
    pub fn last_machine(&self) -> Option<MachineProbe> {
        self.machines().pop()
    }

    /// Probe for the most recently instantiated artboard with this name
    pub fn board(&self, name: &str) -> Option<BoardProbe> {
        self.boards()
            .into_iter()
            .rev()
            .find(|probe| probe.name() == name)
    }
}

impl AnimationFile for MockFile {
    type Renderer = MockRenderer;
    type StateMachine = MockStateMachine;
    type Artboard = MockArtboard;

    fn artboard(&mut self, name: &str) -> Result<MockArtboard, AnimError> {
        let mut file = self.inner.borrow_mut();
        let spec = file
            .specs
            .get(name)
            .ok_or_else(|| AnimError::MissingArtboard(name.to_string()))?
            .clone();

        let state = Rc::new(RefCell::new(BoardState {
            name: name.to_string(),
            bounds: spec.bounds,
            text_runs: spec
                .text_runs
                .iter()
                .map(|run| (run.clone(), String::new()))
                .collect(),
            advanced: 0.0,
            release_count: 0,
        }));
        file.boards.push(Rc::clone(&state));

        Ok(MockArtboard {
            state,
            machines: spec.machines,
            registry: Rc::clone(&self.inner),
        })
    }
}

/// Instantiated mock artboard
#[derive(Debug)]
pub struct MockArtboard {
    state: Rc<RefCell<BoardState>>,
    machines: Vec<String>,
    registry: Rc<RefCell<FileState>>,
}

impl Artboard for MockArtboard {
    type Renderer = MockRenderer;
    type StateMachine = MockStateMachine;

    fn state_machine(&mut self, name: &str) -> Result<MockStateMachine, AnimError> {
        if !self.machines.iter().any(|machine| machine == name) {
            return Err(AnimError::MissingStateMachine {
                artboard: self.state.borrow().name.clone(),
                name: name.to_string(),
            });
        }

        let state = Rc::new(RefCell::new(MachineState {
            numbers: HashMap::new(),
            bools: HashMap::new(),
            pending: Vec::new(),
            release_count: 0,
        }));
        self.registry.borrow_mut().machines.push(Rc::clone(&state));

        Ok(MockStateMachine {
            state,
            current: Vec::new(),
        })
    }

    fn advance(&mut self, dt: f32) {
        self.state.borrow_mut().advanced += dt;
    }

    fn draw(&self, renderer: &mut MockRenderer) {
        renderer
            .ops
            .push(RenderOp::DrawArtboard(self.state.borrow().name.clone()));
    }

    fn bounds(&self) -> Rect {
        self.state.borrow().bounds
    }

    fn set_text_run(&mut self, name: &str, value: &str) -> Result<(), AnimError> {
        let mut state = self.state.borrow_mut();
        match state.text_runs.get_mut(name) {
            Some(run) => {
                *run = value.to_string();
                Ok(())
            }
            None => Err(AnimError::MissingTextRun {
                artboard: state.name.clone(),
                name: name.to_string(),
            }),
        }
    }

    fn release(&mut self) {
        self.state.borrow_mut().release_count += 1;
    }
}

/// Instantiated mock state machine
#[derive(Debug)]
pub struct MockStateMachine {
    state: Rc<RefCell<MachineState>>,
    current: Vec<ReportedEvent>,
}

impl StateMachine for MockStateMachine {
    fn advance(&mut self, _dt: f32) {
        self.current = std::mem::take(&mut self.state.borrow_mut().pending);
    }

    fn set_number(&mut self, input: &str, value: f32) {
        self.state
            .borrow_mut()
            .numbers
            .insert(input.to_string(), value);
    }

    fn set_bool(&mut self, input: &str, value: bool) {
        self.state
            .borrow_mut()
            .bools
            .insert(input.to_string(), value);
    }

    fn reported_events(&self) -> &[ReportedEvent] {
        &self.current
    }

    fn release(&mut self) {
        self.state.borrow_mut().release_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file() -> MockFile {
        MockFile::new().with_artboard(
            "board",
            Rect::sized(100.0, 80.0),
            &["State Machine 1"],
            &["label"],
        )
    }

    #[test]
    fn test_unknown_artboard_is_an_error() {
        let mut file = MockFile::new();
        assert!(matches!(
            file.artboard("nope"),
            Err(AnimError::MissingArtboard(_))
        ));
    }

    #[test]
    fn test_unknown_state_machine_is_an_error() {
        let mut file = file();
        let mut board = file.artboard("board").unwrap();
        assert!(matches!(
            board.state_machine("State Machine 2"),
            Err(AnimError::MissingStateMachine { .. })
        ));
    }

    #[test]
    fn test_events_fire_on_next_advance_only() {
        let mut file = file();
        let probe_file = file.clone();
        let mut board = file.artboard("board").unwrap();
        let mut machine = board.state_machine("State Machine 1").unwrap();
        let probe = probe_file.last_machine().unwrap();

        assert!(machine.reported_events().is_empty());

        probe.queue_event("ding");
        assert!(machine.reported_events().is_empty());

        machine.advance(0.016);
        assert_eq!(machine.reported_events(), &[ReportedEvent::new("ding")]);

        // Cleared again by the following advance.
        machine.advance(0.016);
        assert!(machine.reported_events().is_empty());
    }

    #[test]
    fn test_inputs_are_recorded() {
        let mut file = file();
        let probe_file = file.clone();
        let mut board = file.artboard("board").unwrap();
        let mut machine = board.state_machine("State Machine 1").unwrap();
        let probe = probe_file.last_machine().unwrap();

        machine.set_number("size", 1.0);
        machine.set_bool("picked", true);

        assert_eq!(probe.number("size"), Some(1.0));
        assert_eq!(probe.boolean("picked"), Some(true));
        assert_eq!(probe.number("color"), None);
    }

    #[test]
    fn test_text_runs_and_release_counts() {
        let mut file = file();
        let probe_file = file.clone();
        let mut board = file.artboard("board").unwrap();

        board.set_text_run("label", "42").unwrap();
        assert!(matches!(
            board.set_text_run("missing", "x"),
            Err(AnimError::MissingTextRun { .. })
        ));

        let probe = probe_file.board("board").unwrap();
        assert_eq!(probe.text_run("label").as_deref(), Some("42"));

        board.release();
        board.release();
        assert_eq!(probe.release_count(), 2);
    }

    #[test]
    fn test_renderer_records_draw_order() {
        let mut file = file();
        let board = file.artboard("board").unwrap();
        let mut renderer = MockRenderer::new();

        renderer.clear();
        renderer.save();
        renderer.translate(5.0, 6.0);
        board.draw(&mut renderer);
        renderer.restore();

        assert_eq!(renderer.drawn(), vec!["board"]);
        assert_eq!(renderer.ops[0], RenderOp::Clear);
        assert_eq!(renderer.ops[2], RenderOp::Translate(5.0, 6.0));
    }
}
