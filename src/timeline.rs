//! Staggered load/rotation sequencer.
//!
//! The combined view loads its three parts at fixed wall-clock offsets and
//! briefly spikes the auto-rotation while the last part arrives. Instead of
//! fire-and-forget timers, the choreography is data: an ordered list of
//! `{delay, action}` steps polled with an elapsed duration from the render
//! loop. That makes it testable without real waits, and cancelling is simply
//! dropping the timeline with the session that owns it.
//!
//! The speed spike is keyed to the load *request* of the last part, not its
//! completion; on a slow network the flourish can visibly decouple from the
//! part appearing.

use instant::Duration;

/// One scheduled effect on the view session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Request the asynchronous fetch of the asset in the given slot.
    LoadAsset(usize),
    /// Change the orbit controller's auto-rotation speed.
    SetAutoRotateSpeed(f32),
}

/// An action and the offset from the timeline epoch it fires at.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub delay: Duration,
    pub action: Action,
}

impl Step {
    pub fn new(delay_ms: u64, action: Action) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            action,
        }
    }
}

/// An ordered, poll-driven sequence of steps. Each step fires exactly once.
#[derive(Clone, Debug)]
pub struct Timeline {
    steps: Vec<Step>,
    cursor: usize,
}

impl Timeline {
    /// Builds a timeline. Steps are sorted by delay (stable, so steps with
    /// the same delay keep their given order).
    pub fn new(mut steps: Vec<Step>) -> Self {
        steps.sort_by_key(|s| s.delay);
        Self { steps, cursor: 0 }
    }

    /// Returns all actions whose delay has elapsed and advances past them.
    pub fn poll(&mut self, elapsed: Duration) -> Vec<Action> {
        let mut due = Vec::new();
        while let Some(step) = self.steps.get(self.cursor) {
            if step.delay > elapsed {
                break;
            }
            due.push(step.action);
            self.cursor += 1;
        }
        due
    }

    /// Drops all remaining steps.
    pub fn cancel(&mut self) {
        self.cursor = self.steps.len();
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.steps.len()
    }
}
