//! Top-down racer headless demo
//!
//! Drives an autopilot around a built-in octagonal circuit using a simulated
//! 90 Hz display and logs the race as it goes. Set `RUST_LOG=debug` to see
//! every checkpoint.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::Cell;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
    use std::rc::Rc;
    use std::sync::Arc;

    use topdown_racer::platform::{Clock, InputSource, ManualClock, Renderer};
    use topdown_racer::sim::vector::{heading, normalize_angle};
    use topdown_racer::sim::{
        CarState, Checkpoint, GameState, InputCommand, LineSegment, StartPose, Track, Vec2,
        best_lap_ms, format_time,
    };
    use topdown_racer::{GameLoop, Tuning, TuningError};

    const DEMO_TUNING: &str = r#"{ "race": { "total_laps": 2 } }"#;

    /// Simulated display refresh, deliberately not a multiple of the sim rate
    const DISPLAY_HZ: f64 = 90.0;
    /// Give up after this much simulated time
    const TIME_LIMIT_SECS: f64 = 300.0;

    const INNER_RADIUS: f64 = 300.0;
    const OUTER_RADIUS: f64 = 500.0;
    const SIDES: usize = 8;

    /// Closed ring of `SIDES` segments around the origin
    fn ring(radius: f64) -> Vec<LineSegment> {
        (0..SIDES)
            .map(|i| {
                let a = i as f64 * std::f64::consts::TAU / SIDES as f64;
                let b = (i + 1) as f64 * std::f64::consts::TAU / SIDES as f64;
                LineSegment::new(heading(a) * radius, heading(b) * radius)
            })
            .collect()
    }

    /// Octagonal circuit driven counter-clockwise, start/finish at the bottom
    fn octagon_track() -> Track {
        let checkpoints = (0..SIDES)
            .map(|i| {
                let angle = -FRAC_PI_2 + i as f64 * FRAC_PI_4;
                let dir = heading(angle);
                Checkpoint::new(i, dir * INNER_RADIUS, dir * OUTER_RADIUS)
            })
            .collect();

        Track::new(
            "Octagon",
            ring(OUTER_RADIUS),
            ring(INNER_RADIUS),
            checkpoints,
            StartPose::new(Vec2::new(-60.0, -400.0), 0.0),
        )
    }

    /// Steers for the middle of the next checkpoint
    struct Autopilot {
        track: Arc<Track>,
        /// Car and last passed checkpoint, refreshed after every tick
        latest: Rc<Cell<(CarState, usize)>>,
    }

    impl InputSource for Autopilot {
        fn sample(&mut self) -> InputCommand {
            let (car, last) = self.latest.get();
            let count = self.track.checkpoint_count().max(1);
            let Some(target) = self.track.checkpoint((last + 1) % count) else {
                return InputCommand::IDLE;
            };

            let to_target = target.segment.midpoint() - car.position;
            let error = normalize_angle(to_target.y.atan2(to_target.x) - car.rotation);
            let throttle = if error.abs() > 0.6 { 0.4 } else { 1.0 };
            InputCommand::new(throttle, 0.0, error * 2.0)
        }

        fn start(&mut self) {
            log::info!("Autopilot engaged");
        }
    }

    /// Logs a status line once per simulated second
    struct LogRenderer {
        frames: u64,
    }

    impl Renderer for LogRenderer {
        fn render(&mut self, state: &GameState, alpha: f64) {
            self.frames += 1;
            if self.frames % DISPLAY_HZ as u64 != 0 {
                return;
            }
            log::info!(
                "tick {:>5} | lap {}/{} | pos ({:>7.1}, {:>7.1}) | speed {:>6.1} | alpha {:.2}",
                state.tick,
                state.timing.current_lap.min(state.total_laps),
                state.total_laps,
                state.car.position.x,
                state.car.position.y,
                state.car.signed_speed(),
                alpha
            );
        }
    }

    pub fn run() -> Result<(), TuningError> {
        let tuning = Tuning::from_json(DEMO_TUNING)?;
        let track = Arc::new(octagon_track());
        let clock = ManualClock::new(0.0);

        let latest = Rc::new(Cell::new((track.start_car(), 0)));
        let autopilot = Autopilot {
            track: Arc::clone(&track),
            latest: Rc::clone(&latest),
        };

        let mut game = GameLoop::new(
            Arc::clone(&track),
            tuning,
            autopilot,
            LogRenderer { frames: 0 },
            clock.clone(),
        )?;
        game.set_on_state_change(move |state| {
            latest.set((state.car, state.lap_progress.last_checkpoint_index));
        });

        game.start();
        let frame_ms = 1000.0 / DISPLAY_HZ;
        while !game.state().is_finished() && clock.now_ms() < TIME_LIMIT_SECS * 1000.0 {
            clock.advance_ms(frame_ms);
            game.frame();
        }
        game.stop();

        let state = game.state();
        for lap in &state.timing.laps {
            log::info!("Lap {}: {}", lap.lap_number, format_time(lap.time_ms));
        }
        match best_lap_ms(&state.timing) {
            Some(best) if state.is_finished() => {
                log::info!("Finished in {} ticks, best lap {}", state.tick, format_time(best));
            }
            _ => log::warn!("Did not finish within {TIME_LIMIT_SECS}s"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Top-down racer (headless demo) starting...");

    if let Err(e) = demo::run() {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; there is no wasm entry point here
}
