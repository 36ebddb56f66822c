//! Platform abstraction layer
//!
//! The collaborators the game loop talks to but does not own:
//! - Time (`Clock`)
//! - Input devices (`InputSource`)
//! - Drawing (`Renderer`)
//!
//! Each has a production implementation and a deterministic one for
//! headless runs and tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::sim::{GameState, InputCommand};

/// Monotonic time source in milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep a handle and advance the
/// clock owned by a game loop.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance_ms(&self, ms: f64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance_ms(secs * 1000.0);
    }

    pub fn set_ms(&self, ms: f64) {
        self.now_ms.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

/// Produces one `InputCommand` per simulation step
pub trait InputSource {
    fn sample(&mut self) -> InputCommand;

    /// Begin listening (called when the race loop starts)
    fn start(&mut self) {}

    /// Stop listening
    fn stop(&mut self) {}
}

/// Input cell written by host event handlers and read each step
///
/// Keyboard or gamepad callbacks hold a clone and call [`SharedInput::set`];
/// the loop samples whatever was last written. Writes while stopped are
/// kept but sampling returns idle input.
#[derive(Debug, Clone, Default)]
pub struct SharedInput {
    command: Rc<Cell<InputCommand>>,
    active: Rc<Cell<bool>>,
}

impl SharedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, command: InputCommand) {
        self.command.set(command);
    }

    pub fn get(&self) -> InputCommand {
        self.command.get()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl InputSource for SharedInput {
    fn sample(&mut self) -> InputCommand {
        if self.active.get() {
            self.command.get()
        } else {
            InputCommand::IDLE
        }
    }

    fn start(&mut self) {
        self.active.set(true);
    }

    fn stop(&mut self) {
        self.active.set(false);
    }
}

/// Replays a fixed list of commands, then holds the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    commands: Vec<InputCommand>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(commands: Vec<InputCommand>) -> Self {
        Self {
            commands,
            cursor: 0,
        }
    }

    /// The same command `count` times
    pub fn repeat(command: InputCommand, count: usize) -> Self {
        Self::new(vec![command; count])
    }

    /// How many commands have been handed out
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> InputCommand {
        let command = self
            .commands
            .get(self.cursor)
            .or(self.commands.last())
            .copied()
            .unwrap_or_default();
        self.cursor += 1;
        command
    }
}

/// Seeded random driver for fuzzing and determinism checks
#[derive(Debug, Clone)]
pub struct RandomInput {
    rng: Pcg32,
}

impl RandomInput {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl InputSource for RandomInput {
    fn sample(&mut self) -> InputCommand {
        InputCommand::new(
            self.rng.random_range(0.0..=1.0),
            self.rng.random_range(0.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
        )
    }
}

/// Draws the latest committed state once per display frame
///
/// `alpha` in [0, 1) is how far the scheduler is into the next step; a
/// renderer that keeps the previous state can blend between them.
pub trait Renderer {
    fn render(&mut self, state: &GameState, alpha: f64);
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &GameState, _alpha: f64) {}
}

impl<F: FnMut(&GameState, f64)> Renderer for F {
    fn render(&mut self, state: &GameState, alpha: f64) {
        self(state, alpha)
    }
}
