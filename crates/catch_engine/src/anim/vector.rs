//! Built-in vector animation backend
//!
//! Implements the animation seam with macroquad draw calls. The bundled
//! "file" carries four hand-drawn artboards (`bg`, `player`, `star`,
//! `score`) with the same state machines, inputs, text runs, and
//! reported events a pre-authored animation asset would expose:
//!
//! - `star` / `State Machine 1`: numeric `size` and `color` inputs select
//!   the visual variant; raising the `picked` boolean plays a short
//!   collect animation and reports a `picked end` event when it finishes.
//! - `player` / `State Machine 1`: numeric `direction` input (0 idle,
//!   1 up, 2 down) tilts the sprite.
//! - `score` / `State Machine 1`: editable `score` text run.
//! - `bg` / `bg`: ambient starfield, no inputs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use macroquad::color::{Color, BLACK, DARKPURPLE, GOLD, PINK, SKYBLUE, WHITE};
use macroquad::math::vec2;
use macroquad::shapes::{draw_circle, draw_rectangle, draw_triangle};
use macroquad::text::draw_text;
use macroquad::window::clear_background;

use super::{
    Alignment, AnimError, AnimationFile, Artboard, Fit, Renderer, ReportedEvent, StateMachine,
};
use crate::foundation::math::Rect;

/// Seconds the star's collect animation plays before `picked end` fires
pub const PICK_ANIM_SECS: f32 = 0.6;

const BG_EXTENT: Rect = Rect::sized(1920.0, 1080.0);
const PLAYER_EXTENT: Rect = Rect::sized(160.0, 160.0);
const STAR_EXTENT: Rect = Rect::sized(160.0, 160.0);
const SCORE_EXTENT: Rect = Rect::sized(260.0, 70.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoardKind {
    Background,
    Player,
    Star,
    Score,
}

impl BoardKind {
    fn name(self) -> &'static str {
        match self {
            Self::Background => "bg",
            Self::Player => "player",
            Self::Star => "star",
            Self::Score => "score",
        }
    }

    fn machine_name(self) -> &'static str {
        match self {
            Self::Background => "bg",
            _ => "State Machine 1",
        }
    }

    fn extent(self) -> Rect {
        match self {
            Self::Background => BG_EXTENT,
            Self::Player => PLAYER_EXTENT,
            Self::Star => STAR_EXTENT,
            Self::Score => SCORE_EXTENT,
        }
    }
}

#[derive(Debug)]
struct BoardCore {
    kind: BoardKind,
    clock: f32,
    numbers: HashMap<String, f32>,
    bools: HashMap<String, bool>,
    text_runs: HashMap<String, String>,
    pick_elapsed: f32,
    pick_reported: bool,
    released: bool,
}

impl BoardCore {
    fn new(kind: BoardKind) -> Self {
        let mut text_runs = HashMap::new();
        if kind == BoardKind::Score {
            text_runs.insert("score".to_string(), String::new());
        }
        Self {
            kind,
            clock: 0.0,
            numbers: HashMap::new(),
            bools: HashMap::new(),
            text_runs,
            pick_elapsed: 0.0,
            pick_reported: false,
            released: false,
        }
    }

    fn number(&self, input: &str) -> f32 {
        self.numbers.get(input).copied().unwrap_or(0.0)
    }

    fn boolean(&self, input: &str) -> bool {
        self.bools.get(input).copied().unwrap_or(false)
    }
}

/// The built-in animation bundle
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorFile;

impl VectorFile {
    /// Create a handle to the bundle
    pub fn new() -> Self {
        Self
    }
}

impl AnimationFile for VectorFile {
    type Renderer = VectorRenderer;
    type StateMachine = VectorStateMachine;
    type Artboard = VectorArtboard;

    fn artboard(&mut self, name: &str) -> Result<VectorArtboard, AnimError> {
        let kind = match name {
            "bg" => BoardKind::Background,
            "player" => BoardKind::Player,
            "star" => BoardKind::Star,
            "score" => BoardKind::Score,
            _ => return Err(AnimError::MissingArtboard(name.to_string())),
        };
        Ok(VectorArtboard {
            core: Rc::new(RefCell::new(BoardCore::new(kind))),
        })
    }
}

/// Instantiated vector artboard
#[derive(Debug)]
pub struct VectorArtboard {
    core: Rc<RefCell<BoardCore>>,
}

impl Artboard for VectorArtboard {
    type Renderer = VectorRenderer;
    type StateMachine = VectorStateMachine;

    fn state_machine(&mut self, name: &str) -> Result<VectorStateMachine, AnimError> {
        let kind = self.core.borrow().kind;
        if name != kind.machine_name() {
            return Err(AnimError::MissingStateMachine {
                artboard: kind.name().to_string(),
                name: name.to_string(),
            });
        }
        Ok(VectorStateMachine {
            core: Rc::clone(&self.core),
            events: Vec::new(),
        })
    }

    fn advance(&mut self, dt: f32) {
        let mut core = self.core.borrow_mut();
        if !core.released {
            core.clock += dt;
        }
    }

    fn draw(&self, renderer: &mut VectorRenderer) {
        let core = self.core.borrow();
        if core.released {
            return;
        }
        let transform = renderer.current;
        match core.kind {
            BoardKind::Background => draw_background(&core, transform),
            BoardKind::Player => draw_player(&core, transform),
            BoardKind::Star => draw_star(&core, transform),
            BoardKind::Score => draw_score(&core, transform),
        }
    }

    fn bounds(&self) -> Rect {
        self.core.borrow().kind.extent()
    }

    fn set_text_run(&mut self, name: &str, value: &str) -> Result<(), AnimError> {
        let mut core = self.core.borrow_mut();
        match core.text_runs.get_mut(name) {
            Some(run) => {
                *run = value.to_string();
                Ok(())
            }
            None => Err(AnimError::MissingTextRun {
                artboard: core.kind.name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    fn release(&mut self) {
        self.core.borrow_mut().released = true;
    }
}

/// Instantiated vector state machine
#[derive(Debug)]
pub struct VectorStateMachine {
    core: Rc<RefCell<BoardCore>>,
    events: Vec<ReportedEvent>,
}

impl StateMachine for VectorStateMachine {
    fn advance(&mut self, dt: f32) {
        self.events.clear();
        let mut core = self.core.borrow_mut();
        if core.released {
            return;
        }
        if core.kind == BoardKind::Star && core.boolean("picked") {
            core.pick_elapsed += dt;
            if core.pick_elapsed >= PICK_ANIM_SECS && !core.pick_reported {
                core.pick_reported = true;
                self.events.push(ReportedEvent::new("picked end"));
            }
        }
    }

    fn set_number(&mut self, input: &str, value: f32) {
        self.core
            .borrow_mut()
            .numbers
            .insert(input.to_string(), value);
    }

    fn set_bool(&mut self, input: &str, value: bool) {
        self.core
            .borrow_mut()
            .bools
            .insert(input.to_string(), value);
    }

    fn reported_events(&self) -> &[ReportedEvent] {
        &self.events
    }

    fn release(&mut self) {
        self.core.borrow_mut().released = true;
    }
}

#[derive(Debug, Clone, Copy)]
struct Transform2 {
    dx: f32,
    dy: f32,
    scale: f32,
}

impl Transform2 {
    const IDENTITY: Self = Self {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
    };

    fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (self.dx + x * self.scale, self.dy + y * self.scale)
    }

    fn length(self, value: f32) -> f32 {
        value * self.scale
    }
}

/// Macroquad-backed renderer with a save/restore transform stack
#[derive(Debug)]
pub struct VectorRenderer {
    current: Transform2,
    stack: Vec<Transform2>,
}

impl Default for VectorRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VectorRenderer {
    /// Create a renderer with an identity transform
    pub fn new() -> Self {
        Self {
            current: Transform2::IDENTITY,
            stack: Vec::new(),
        }
    }
}

impl Renderer for VectorRenderer {
    fn clear(&mut self) {
        clear_background(BLACK);
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(transform) = self.stack.pop() {
            self.current = transform;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.current.dx += dx * self.current.scale;
        self.current.dy += dy * self.current.scale;
    }

    fn align(&mut self, fit: Fit, alignment: Alignment, dest: Rect, source: Rect) {
        let scale = match fit {
            Fit::Cover => {
                (dest.width() / source.width()).max(dest.height() / source.height())
            }
            Fit::None => 1.0,
        };
        let (dx, dy) = match alignment {
            Alignment::Center => (
                dest.min_x + (dest.width() - source.width() * scale) / 2.0 - source.min_x * scale,
                dest.min_y + (dest.height() - source.height() * scale) / 2.0 - source.min_y * scale,
            ),
            Alignment::TopLeft => (
                dest.min_x - source.min_x * scale,
                dest.min_y - source.min_y * scale,
            ),
        };
        self.current = Transform2 {
            dx: self.current.dx + dx * self.current.scale,
            dy: self.current.dy + dy * self.current.scale,
            scale: self.current.scale * scale,
        };
    }
}

fn draw_background(core: &BoardCore, t: Transform2) {
    let (x, y) = t.apply(BG_EXTENT.min_x, BG_EXTENT.min_y);
    let width = t.length(BG_EXTENT.width());
    let height = t.length(BG_EXTENT.height());

    // Night-sky gradient, three horizontal bands.
    draw_rectangle(x, y, width, height, Color::new(0.02, 0.02, 0.10, 1.0));
    draw_rectangle(
        x,
        y + height * 0.45,
        width,
        height * 0.55,
        Color::new(0.05, 0.03, 0.16, 1.0),
    );
    draw_rectangle(
        x,
        y + height * 0.80,
        width,
        height * 0.20,
        Color::new(0.10, 0.05, 0.22, 1.0),
    );

    // Twinkling specks on a fixed quasi-random lattice.
    for i in 0..48u32 {
        let fx = (f32::from(i as u16) * 0.618_034).fract();
        let fy = (f32::from(i as u16) * 0.381_966).fract();
        let twinkle = 0.55 + 0.45 * (core.clock * 1.5 + fx * 37.0).sin();
        let (sx, sy) = t.apply(BG_EXTENT.width() * fx, BG_EXTENT.height() * fy);
        draw_circle(
            sx,
            sy,
            t.length(2.5),
            Color::new(0.9, 0.9, 1.0, 0.25 * twinkle),
        );
    }
}

fn draw_player(core: &BoardCore, t: Transform2) {
    let direction = core.number("direction");
    let tilt = match direction as i32 {
        1 => -18.0,
        2 => 18.0,
        _ => 0.0,
    };

    let (cx, cy) = t.apply(80.0, 90.0);
    let radius = t.length(45.0);

    // Hull and canopy.
    draw_circle(cx, cy, radius, SKYBLUE);
    draw_circle(cx, cy - t.length(12.0), t.length(20.0), WHITE);

    // Nose cone, tilted toward the current direction.
    let (nx, ny) = t.apply(150.0, 90.0 + tilt);
    draw_triangle(
        vec2(nx, ny),
        vec2(cx, cy - radius * 0.55),
        vec2(cx, cy + radius * 0.55),
        DARKPURPLE,
    );

    // Thruster flicker.
    let flame = 0.6 + 0.4 * (core.clock * 22.0).sin();
    let (fx, fy) = t.apply(22.0, 90.0);
    draw_circle(fx, fy, t.length(12.0) * flame, GOLD);
}

fn draw_star(core: &BoardCore, t: Transform2) {
    let size = core.number("size");
    let color_flag = core.number("color");
    let picked = core.boolean("picked");

    let mut scale = 1.0 + 0.4 * size;
    let mut alpha = 1.0;
    if picked {
        let progress = (core.pick_elapsed / PICK_ANIM_SECS).min(1.0);
        scale *= 1.0 + 0.4 * progress - 0.9 * progress * progress;
        alpha = 1.0 - progress;
    }

    let body = if color_flag >= 1.0 { PINK } else { GOLD };
    let color = Color::new(body.r, body.g, body.b, alpha);
    let spin = core.clock * 1.2;

    let (cx, cy) = t.apply(80.0, 80.0);
    let outer = t.length(60.0 * scale);
    let inner = t.length(24.0 * scale);

    // Ten-point star outline as a fan around the center.
    let points: Vec<(f32, f32)> = (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 { outer } else { inner };
            let angle = spin + (i as f32) * std::f32::consts::PI / 5.0;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        draw_triangle(vec2(cx, cy), vec2(a.0, a.1), vec2(b.0, b.1), color);
    }

    draw_circle(cx, cy, inner * 0.6, Color::new(1.0, 1.0, 0.9, alpha));
}

fn draw_score(core: &BoardCore, t: Transform2) {
    let (x, y) = t.apply(SCORE_EXTENT.min_x, SCORE_EXTENT.min_y);
    let width = t.length(SCORE_EXTENT.width());
    let height = t.length(SCORE_EXTENT.height());

    draw_rectangle(x, y, width, height, Color::new(0.0, 0.0, 0.0, 0.45));

    let value = core
        .text_runs
        .get("score")
        .map_or("0", |run| if run.is_empty() { "0" } else { run });
    draw_text(
        &format!("Score: {value}"),
        x + t.length(16.0),
        y + height * 0.68,
        t.length(44.0),
        WHITE,
    );
}
