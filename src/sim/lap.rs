//! Lap and checkpoint tracking
//!
//! Checkpoints must be crossed strictly in order; the start/finish line only
//! completes a lap once every other checkpoint has been passed. Crossing
//! detection uses the straight motion segment between two ticks, so a fast
//! car cannot skip over a gate between frames.
//!
//! Everything here is a pure function of its inputs. The caller supplies the
//! current time.

use super::collision::{LineSegment, segment_intersection};
use super::state::{LapProgress, LapRecord, RaceEvent, TimingState};
use super::track::{Checkpoint, Track};
use super::vector::Vec2;

/// Result of one tracker update
#[derive(Debug, Clone, PartialEq)]
pub struct LapUpdate {
    pub progress: LapProgress,
    pub timing: TimingState,
    /// The final lap was just completed
    pub finished: bool,
    /// What happened, in processing order
    pub events: Vec<RaceEvent>,
}

/// Process every checkpoint crossed while moving from `prev_pos` to `new_pos`
///
/// Crossings are applied in track order, each against the progress left by
/// the previous one.
pub fn update(
    track: &Track,
    progress: &LapProgress,
    timing: &TimingState,
    prev_pos: Vec2,
    new_pos: Vec2,
    now_ms: f64,
    total_laps: u32,
) -> LapUpdate {
    let motion = LineSegment::new(prev_pos, new_pos);
    let count = track.checkpoint_count();

    let mut out = LapUpdate {
        progress: progress.clone(),
        timing: timing.clone(),
        finished: false,
        events: Vec::new(),
    };

    for checkpoint in track
        .checkpoints
        .iter()
        .filter(|c| segment_intersection(&motion, &c.segment).is_some())
    {
        if checkpoint.is_start_finish() {
            cross_start_finish(&mut out, count, now_ms, total_laps);
        } else {
            cross_checkpoint(&mut out, checkpoint, count);
        }
    }

    out
}

fn cross_start_finish(out: &mut LapUpdate, count: usize, now_ms: f64, total_laps: u32) {
    if !out.progress.passed.contains_all(1..count) {
        // Touching the line mid-lap does nothing
        return;
    }

    let record = LapRecord {
        lap_number: out.timing.current_lap,
        time_ms: now_ms - out.timing.lap_start_ms,
    };
    log::info!(
        "Lap {} complete in {}",
        record.lap_number,
        format_time(record.time_ms)
    );

    out.timing.laps.push(record);
    out.events.push(RaceEvent::LapCompleted(record));
    out.progress = LapProgress::new();
    out.timing.current_lap += 1;
    out.timing.lap_start_ms = now_ms;

    if record.lap_number >= total_laps {
        let total_ms = race_elapsed_ms(&out.timing, now_ms);
        log::info!("Race finished in {}", format_time(total_ms));
        out.events.push(RaceEvent::RaceFinished { total_ms });
        out.finished = true;
    }
}

fn cross_checkpoint(out: &mut LapUpdate, checkpoint: &Checkpoint, count: usize) {
    let index = checkpoint.index;
    if out.progress.passed.contains(index) {
        return;
    }

    let expected = (out.progress.last_checkpoint_index + 1) % count;
    if index != expected {
        log::debug!("Checkpoint {index} out of order (expected {expected})");
        return;
    }

    log::debug!("Checkpoint {index} passed");
    out.progress.passed.insert(index);
    out.progress.last_checkpoint_index = index;
    out.events.push(RaceEvent::CheckpointPassed { index });
}

/// Fastest completed lap
pub fn best_lap_ms(timing: &TimingState) -> Option<f64> {
    timing
        .laps
        .iter()
        .map(|lap| lap.time_ms)
        .min_by(|a, b| a.total_cmp(b))
}

/// Sum of all completed laps
pub fn total_race_ms(timing: &TimingState) -> f64 {
    timing.laps.iter().map(|lap| lap.time_ms).sum()
}

/// Time spent on the lap in progress
pub fn current_lap_elapsed_ms(timing: &TimingState, now_ms: f64) -> f64 {
    now_ms - timing.lap_start_ms
}

/// Time since the start signal
pub fn race_elapsed_ms(timing: &TimingState, now_ms: f64) -> f64 {
    now_ms - timing.race_start_ms
}

/// Format milliseconds as `mm:ss.mmm` (negative values show as zero)
pub fn format_time(ms: f64) -> String {
    let total = if ms.is_finite() { ms.max(0.0) as u64 } else { 0 };
    let minutes = total / 60_000;
    let seconds = (total / 1000) % 60;
    let millis = total % 1000;
    format!("{minutes:02}:{seconds:02}.{millis:03}")
}
