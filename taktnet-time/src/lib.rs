// taktnet-time/src/lib.rs

/*!
# taktnet-time

Timed-transition overlay for a base token net. Every transition carries an
elapsed-time counter and an inclusive firing window `[min_time, max_time]`
(max unbounded if absent); a transition may fire only once its counter falls
inside the window, on top of the ordinary structural token check.

## Key Components:
- **TimerState / FiringWindow:** per-transition counter and window.
- **Mutation hooks:** every token move re-derives structural enablement for
  the downstream transitions and starts/stops their timers.
- **Clock control:** `compute_step` finds the largest advance that crosses no
  window boundary; `advance`/`advance_by` apply it to all running timers in
  lock-step.

There is no stored global clock: the current logical time is implicit in the
set of running counters, which the hooks keep mutually consistent.
*/

use taktnet_core::{NetError, PlaceId, TokenNet, TransitionId};

pub mod error;
pub mod timer;

pub use error::ClockError;
pub use timer::{FiringWindow, TimerState};

#[derive(Debug, Clone)]
struct TimerEntry {
    window: FiringWindow,
    state: TimerState,
}

/// A base net wrapped with timed-transition semantics.
///
/// All token mutation goes through this type so the timers stay consistent;
/// mutating the base net behind its back requires a [`TimedNet::resync`]
/// afterwards.
#[derive(Debug, Clone)]
pub struct TimedNet<N: TokenNet> {
    base: N,
    timers: Vec<TimerEntry>,
}

impl<N: TokenNet> TimedNet<N> {
    /// Wrap a base net with every transition on the default `[0, ∞)` window.
    /// Timers start stopped; call [`TimedNet::resync`] to derive them from
    /// the marking.
    pub fn new(base: N) -> Self {
        let timers = (0..base.transition_count())
            .map(|_| TimerEntry {
                window: FiringWindow::default(),
                state: TimerState::Stopped,
            })
            .collect();
        TimedNet { base, timers }
    }

    /// Wrap a base net, overriding the windows of the named transitions.
    pub fn with_windows(
        base: N,
        windows: impl IntoIterator<Item = (TransitionId, FiringWindow)>,
    ) -> Result<Self, ClockError> {
        let mut net = Self::new(base);
        for (transition, window) in windows {
            let entry = net
                .timers
                .get_mut(transition)
                .ok_or(NetError::UnknownTransition(transition))?;
            entry.window = window;
        }
        Ok(net)
    }

    pub fn base(&self) -> &N {
        &self.base
    }

    pub fn timer(&self, transition: TransitionId) -> TimerState {
        self.timers[transition].state
    }

    pub fn window(&self, transition: TransitionId) -> FiringWindow {
        self.timers[transition].window
    }

    /// Timed enabling predicate.
    ///
    /// With `untimed` set the timing overlay is bypassed entirely and only
    /// the structural check for `mode` runs (tooling that asks "could this
    /// ever fire, ignoring time"). Otherwise the transition must be running
    /// inside its window *and* structurally enabled for `mode`; the timer is
    /// checked first only as a cheap short-circuit.
    pub fn is_enabled(&self, transition: TransitionId, mode: &N::Mode, untimed: bool) -> bool {
        if untimed {
            return self.base.mode_enabled(transition, mode);
        }
        match self.timers[transition].state {
            TimerState::Stopped => false,
            TimerState::Running(elapsed) => {
                self.timers[transition].window.contains(elapsed)
                    && self.base.mode_enabled(transition, mode)
            }
        }
    }

    /// Add tokens to a place, starting the timers of any downstream
    /// transition that becomes structurally enabled. Transitions that stay
    /// enabled keep their accumulated time.
    pub fn add_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError> {
        let before = self.running_snapshot(place);
        self.base.add_tokens(place, count)?;
        self.apply_delta(&before);
        Ok(())
    }

    /// Remove tokens from a place, stopping the timers of any downstream
    /// transition that loses its last mode. Errors from the base net (for
    /// instance removing more tokens than present) propagate with no timer
    /// touched.
    pub fn remove_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError> {
        let before = self.running_snapshot(place);
        self.base.remove_tokens(place, count)?;
        self.apply_delta(&before);
        Ok(())
    }

    /// Replace a place's token content. Unlike the incremental mutators this
    /// re-derives every downstream timer from the new marking, restarting at
    /// zero those that are enabled.
    pub fn set_tokens(&mut self, place: PlaceId, count: u32) -> Result<(), NetError> {
        self.base.set_tokens(place, count)?;
        self.resync_place(place);
        Ok(())
    }

    /// Clear a place to empty; same full re-derivation as [`set_tokens`].
    ///
    /// [`set_tokens`]: TimedNet::set_tokens
    pub fn clear(&mut self, place: PlaceId) -> Result<(), NetError> {
        self.set_tokens(place, 0)
    }

    /// Recompute every transition's timer from the current marking: running
    /// at zero when structurally enabled, stopped otherwise. Idempotent;
    /// used at simulation start and after out-of-band marking changes.
    pub fn resync(&mut self) {
        for transition in 0..self.timers.len() {
            self.timers[transition].state = if self.base.has_mode(transition) {
                TimerState::Running(0.0)
            } else {
                TimerState::Stopped
            };
        }
    }

    /// Largest step that can be added to all running timers without skipping
    /// past any window boundary, or `None` when no running timer caps the
    /// advance.
    ///
    /// A timer below its minimum caps at `min_time - elapsed` (it needs at
    /// least that much to reach its earliest firing point); a bounded timer
    /// inside its window caps at `max_time - elapsed`. The two kinds are
    /// folded into one minimum: callers only need the next instant at which
    /// some timer's regime changes.
    pub fn compute_step(&self) -> Option<f64> {
        let mut step: Option<f64> = None;
        for entry in &self.timers {
            let TimerState::Running(elapsed) = entry.state else {
                continue;
            };
            let cap = if elapsed < entry.window.min_time() {
                entry.window.min_time() - elapsed
            } else {
                match entry.window.max_time() {
                    Some(max) if elapsed <= max => max - elapsed,
                    // Unbounded, or already overran (caught in advance_by).
                    _ => continue,
                }
            };
            step = Some(match step {
                Some(current) => current.min(cap),
                None => cap,
            });
        }
        step
    }

    /// Compute the maximal safe step and apply it. `Ok(None)` means the
    /// clock is stalled: nothing is timing, or every running timer can wait
    /// indefinitely. Nothing is mutated in that case.
    pub fn advance(&mut self) -> Result<Option<f64>, ClockError> {
        match self.compute_step() {
            None => Ok(None),
            Some(step) => self.advance_by(step).map(Some),
        }
    }

    /// Apply an explicit step, clamped so no running timer crosses its
    /// window boundary, and return the step actually applied. Logical time
    /// only moves forward; a negative step is rejected.
    ///
    /// Finding a running timer already past its `max_time` is a broken
    /// invariant: the call fails with [`ClockError::Overrun`] before any
    /// timer is mutated.
    pub fn advance_by(&mut self, step: f64) -> Result<f64, ClockError> {
        if step < 0.0 {
            return Err(ClockError::NegativeStep(step));
        }
        let mut step = step;
        let mut running = Vec::new();
        for (transition, entry) in self.timers.iter().enumerate() {
            let TimerState::Running(elapsed) = entry.state else {
                continue;
            };
            running.push(transition);
            if elapsed < entry.window.min_time() {
                step = step.min(entry.window.min_time() - elapsed);
            } else if let Some(max) = entry.window.max_time() {
                if elapsed <= max {
                    step = step.min(max - elapsed);
                } else {
                    return Err(ClockError::Overrun {
                        transition: self.base.transition_name(transition).to_string(),
                        elapsed,
                        max_time: max,
                    });
                }
            }
        }
        for transition in running {
            if let TimerState::Running(elapsed) = self.timers[transition].state {
                self.timers[transition].state = TimerState::Running(elapsed + step);
            }
        }
        Ok(step)
    }

    /// Fire a transition through the hooked mutation path, so every affected
    /// place updates its downstream timers.
    pub fn fire(&mut self, transition: TransitionId, mode: &N::Mode) -> Result<(), ClockError> {
        if !self.is_enabled(transition, mode, false) {
            return Err(ClockError::NotEnabled {
                transition: self.base.transition_name(transition).to_string(),
            });
        }
        let inputs = self.base.input_arcs(transition).to_vec();
        let outputs = self.base.output_arcs(transition).to_vec();
        for (place, weight) in inputs {
            self.remove_tokens(place, weight)?;
        }
        for (place, weight) in outputs {
            self.add_tokens(place, weight)?;
        }
        Ok(())
    }

    /// Running-state of every downstream transition of `place`, captured
    /// before a mutation. Needed because recomputation after the fact cannot
    /// tell "still enabled" from "became enabled", and only the latter
    /// restarts the timer.
    fn running_snapshot(&self, place: PlaceId) -> Vec<(TransitionId, bool)> {
        self.base
            .postset(place)
            .iter()
            .map(|&t| (t, self.timers[t].state.is_running()))
            .collect()
    }

    fn apply_delta(&mut self, before: &[(TransitionId, bool)]) {
        for &(transition, was_running) in before {
            let enabled = self.base.has_mode(transition);
            match (was_running, enabled) {
                (false, true) => self.timers[transition].state = TimerState::Running(0.0),
                (true, false) => self.timers[transition].state = TimerState::Stopped,
                _ => {}
            }
        }
    }

    fn resync_place(&mut self, place: PlaceId) {
        let postset = self.base.postset(place).to_vec();
        for transition in postset {
            self.timers[transition].state = if self.base.has_mode(transition) {
                TimerState::Running(0.0)
            } else {
                TimerState::Stopped
            };
        }
    }
}
