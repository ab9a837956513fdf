//! Per-transition timer state and firing windows.

use crate::error::ClockError;

/// Elapsed-time counter of one transition.
///
/// `Running` iff the transition currently has at least one structural firing
/// mode; the hooks in [`crate::TimedNet`] keep that invariant under every
/// token mutation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TimerState {
    #[default]
    Stopped,
    Running(f64),
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running(_))
    }

    pub fn elapsed(&self) -> Option<f64> {
        match *self {
            TimerState::Stopped => None,
            TimerState::Running(elapsed) => Some(elapsed),
        }
    }
}

/// Inclusive firing window `[min_time, max_time]`, max unbounded if absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiringWindow {
    min_time: f64,
    max_time: Option<f64>,
}

impl Default for FiringWindow {
    /// `[0, ∞)`: timing never blocks the transition.
    fn default() -> Self {
        FiringWindow {
            min_time: 0.0,
            max_time: None,
        }
    }
}

impl FiringWindow {
    /// `[min, ∞)`.
    pub fn after(min_time: f64) -> Result<Self, ClockError> {
        if min_time < 0.0 {
            return Err(ClockError::InvalidWindow {
                min: min_time,
                max: None,
            });
        }
        Ok(FiringWindow {
            min_time,
            max_time: None,
        })
    }

    /// `[min, max]`, rejecting `max < min` and negative bounds eagerly.
    pub fn bounded(min_time: f64, max_time: f64) -> Result<Self, ClockError> {
        if min_time < 0.0 || max_time < min_time {
            return Err(ClockError::InvalidWindow {
                min: min_time,
                max: Some(max_time),
            });
        }
        Ok(FiringWindow {
            min_time,
            max_time: Some(max_time),
        })
    }

    pub fn min_time(&self) -> f64 {
        self.min_time
    }

    pub fn max_time(&self) -> Option<f64> {
        self.max_time
    }

    /// Both window bounds are inclusive.
    pub fn contains(&self, elapsed: f64) -> bool {
        elapsed >= self.min_time && self.max_time.map_or(true, |max| elapsed <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_is_unbounded() {
        let window = FiringWindow::default();
        assert!(window.contains(0.0));
        assert!(window.contains(1e12));
    }

    #[test]
    fn test_bounded_window_is_inclusive() {
        let window = FiringWindow::bounded(1.0, 2.0).unwrap();
        assert!(!window.contains(0.5));
        assert!(window.contains(1.0));
        assert!(window.contains(1.5));
        assert!(window.contains(2.0));
        assert!(!window.contains(2.5));
    }

    #[test]
    fn test_malformed_windows_rejected() {
        assert!(matches!(
            FiringWindow::bounded(2.0, 1.0),
            Err(ClockError::InvalidWindow { .. })
        ));
        assert!(matches!(
            FiringWindow::after(-1.0),
            Err(ClockError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_timer_state_accessors() {
        assert!(!TimerState::Stopped.is_running());
        assert_eq!(TimerState::Stopped.elapsed(), None);
        assert_eq!(TimerState::Running(1.5).elapsed(), Some(1.5));
    }
}
