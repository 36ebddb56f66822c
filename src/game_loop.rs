//! Fixed timestep race loop
//!
//! The host calls [`GameLoop::frame`] once per display frame. Elapsed wall
//! time goes into an accumulator which is drained in whole `dt` steps, so the
//! simulation advances at the same rate whatever the display refresh is. The
//! leftover fraction is handed to the renderer as the interpolation alpha.
//!
//! The current state is published as an `Arc<GameState>`: each step swaps in
//! a new value, and anyone still holding an older snapshot keeps seeing it
//! unchanged. The loop itself is single-threaded.

use std::sync::Arc;

use crate::platform::{Clock, InputSource, Renderer, SystemClock};
use crate::sim::{
    CarPhysics, GameState, InputCommand, PhysicsEngine, RaceEvent, RaceStatus, Track, tick,
};
use crate::tuning::{Tuning, TuningError};

type StateObserver = Box<dyn FnMut(&GameState)>;

/// Race driver tying simulation, input, clock and renderer together
pub struct GameLoop<I, R, C = SystemClock, P = CarPhysics> {
    state: Arc<GameState>,
    physics: P,
    input: I,
    renderer: R,
    clock: C,
    tuning: Tuning,
    on_state_change: Option<StateObserver>,
    last_events: Vec<RaceEvent>,
    /// Unsimulated time in seconds
    accumulator: f64,
    last_frame_ms: f64,
    running: bool,
}

impl<I: InputSource, R: Renderer, C: Clock> GameLoop<I, R, C, CarPhysics> {
    /// New race in `Countdown` using the tuned car physics
    ///
    /// `tuning` is validated first; a zero or negative `dt` would otherwise
    /// never drain the accumulator.
    pub fn new(
        track: impl Into<Arc<Track>>,
        tuning: Tuning,
        input: I,
        renderer: R,
        clock: C,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let physics = CarPhysics::new(tuning.physics.clone());
        let now = clock.now_ms();
        let state = GameState::new(track.into(), tuning.race.total_laps, now);
        log::info!(
            "Race on '{}': {} laps, {} checkpoints",
            state.track.name,
            state.total_laps,
            state.track.checkpoint_count()
        );

        Ok(Self {
            state: Arc::new(state),
            physics,
            input,
            renderer,
            clock,
            tuning,
            on_state_change: None,
            last_events: Vec::new(),
            accumulator: 0.0,
            last_frame_ms: now,
            running: false,
        })
    }
}

impl<I: InputSource, R: Renderer, C: Clock, P: PhysicsEngine> GameLoop<I, R, C, P> {
    /// Swap in a different physics engine
    pub fn with_physics<Q: PhysicsEngine>(self, physics: Q) -> GameLoop<I, R, C, Q> {
        GameLoop {
            state: self.state,
            physics,
            input: self.input,
            renderer: self.renderer,
            clock: self.clock,
            tuning: self.tuning,
            on_state_change: self.on_state_change,
            last_events: self.last_events,
            accumulator: self.accumulator,
            last_frame_ms: self.last_frame_ms,
            running: self.running,
        }
    }

    /// Latest committed state
    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// Called synchronously after every committed tick
    pub fn set_on_state_change(&mut self, observer: impl FnMut(&GameState) + 'static) {
        self.on_state_change = Some(Box::new(observer));
    }

    /// Events produced by the most recent committed tick
    pub fn last_events(&self) -> &[RaceEvent] {
        &self.last_events
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Fraction of a step waiting in the accumulator, in [0, 1)
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.tuning.race.dt
    }

    /// Start racing and begin scheduling frames
    ///
    /// A race still in `Countdown` goes green with its clocks set to now.
    pub fn start(&mut self) {
        if self.running {
            return;
        }

        let now = self.clock.now_ms();
        if self.state.status == RaceStatus::Countdown {
            self.state = Arc::new(self.state.started(now));
            log::info!("Race started");
        }

        self.input.start();
        self.accumulator = 0.0;
        self.last_frame_ms = now;
        self.running = true;
    }

    /// Stop scheduling; a step already running always completes
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.input.stop();
        log::info!("Race loop stopped at tick {}", self.state.tick);
    }

    /// Put the car back on the grid with fresh timing and race again
    pub fn restart(&mut self) {
        self.stop();
        self.state = Arc::new(self.state.restarted(self.clock.now_ms()));
        self.last_events.clear();
        log::info!("Race restarted");
        self.start();
    }

    /// Run one simulation step with `input`
    ///
    /// Outside `Racing` this returns the current state and changes nothing.
    pub fn step(&mut self, input: &InputCommand) -> Arc<GameState> {
        if !self.state.is_racing() {
            return self.state();
        }

        let now = self.clock.now_ms();
        let (next, events) = tick(&self.state, &self.physics, input, self.tuning.race.dt, now);

        if next.is_finished() {
            log::info!("Race complete after {} ticks", next.tick);
        }

        self.state = Arc::new(next);
        self.last_events = events;
        if let Some(observer) = self.on_state_change.as_mut() {
            observer(&self.state);
        }
        self.state()
    }

    /// One display frame: catch the simulation up to now and render
    ///
    /// Returns the interpolation alpha, or `None` when the loop is stopped.
    pub fn frame(&mut self) -> Option<f64> {
        if !self.running {
            return None;
        }

        let now = self.clock.now_ms();
        let mut elapsed = ((now - self.last_frame_ms) / 1000.0).max(0.0);
        self.last_frame_ms = now;

        let max_frame_time = self.tuning.race.max_frame_time;
        if elapsed > max_frame_time {
            log::warn!("Frame took {elapsed:.3}s, clamping to {max_frame_time}s");
            elapsed = max_frame_time;
        }
        self.accumulator += elapsed;

        let dt = self.tuning.race.dt;
        while self.accumulator >= dt {
            let input = self.input.sample();
            self.step(&input);
            self.accumulator -= dt;
        }

        let alpha = self.alpha();
        self.renderer.render(&self.state, alpha);
        Some(alpha)
    }
}
