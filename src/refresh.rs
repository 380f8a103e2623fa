//! Refresh cycle state machine.
//!
//! Active when the interval is nonzero, suspended at zero. The countdown is
//! derived from the session tick, so changing the interval re-phases the
//! cycle without any timer re-arming of its own. Division by a zero interval
//! is impossible by construction: every tick computation is behind the
//! suspended check.

pub const DEFAULT_INTERVAL_SECS: u32 = 5;

#[derive(Debug, Clone, Copy)]
pub struct RefreshController {
    interval: u32,
    /// Interval restored by `toggle` after a suspension.
    resume_interval: u32,
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_SECS)
    }
}

impl RefreshController {
    pub fn new(interval_secs: u32) -> Self {
        RefreshController {
            interval: interval_secs,
            resume_interval: if interval_secs > 0 {
                interval_secs
            } else {
                DEFAULT_INTERVAL_SECS
            },
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn suspended(&self) -> bool {
        self.interval == 0
    }

    /// Suspend, remembering the current interval; or resume at the
    /// remembered interval (the default if never active).
    pub fn toggle(&mut self) {
        if self.interval == 0 {
            self.interval = self.resume_interval;
        } else {
            self.resume_interval = self.interval;
            self.interval = 0;
        }
    }

    /// Change the interval by one second, clamped at zero. Reaching zero
    /// suspends; leaving zero resumes.
    pub fn adjust(&mut self, delta: i32) {
        let old = self.interval;
        self.interval = self.interval.saturating_add_signed(delta);
        if self.interval == 0 && old > 0 {
            self.resume_interval = old;
        }
    }

    /// Whether the refresh action fires at this tick: the start of a fresh
    /// cycle while active.
    pub fn should_fire(&self, tick: u64) -> bool {
        self.interval != 0 && tick % u64::from(self.interval) == 0
    }

    /// Seconds until the next refresh; `None` while suspended (the display
    /// freezes).
    pub fn countdown(&self, tick: u64) -> Option<u64> {
        if self.interval == 0 {
            return None;
        }
        let interval = u64::from(self.interval);
        Some(interval - tick % interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_on_cycle_boundaries() {
        let refresh = RefreshController::new(5);
        let fired: Vec<u64> = (0..15).filter(|&tick| refresh.should_fire(tick)).collect();
        assert_eq!(fired, vec![0, 5, 10]);
    }

    #[test]
    fn never_fires_while_suspended() {
        let refresh = RefreshController::new(0);
        assert!(refresh.suspended());
        assert!((0..100).all(|tick| !refresh.should_fire(tick)));
        assert_eq!(refresh.countdown(17), None);
    }

    #[test]
    fn toggle_restores_the_previous_interval_not_the_default() {
        let mut refresh = RefreshController::new(60);
        refresh.toggle();
        assert!(refresh.suspended());
        assert!((0..100).all(|tick| !refresh.should_fire(tick)));
        refresh.toggle();
        assert_eq!(refresh.interval(), 60);
    }

    #[test]
    fn toggle_from_never_active_resumes_at_the_default() {
        let mut refresh = RefreshController::new(0);
        refresh.toggle();
        assert_eq!(refresh.interval(), DEFAULT_INTERVAL_SECS);
    }

    #[test]
    fn adjust_crosses_zero_in_both_directions() {
        let mut refresh = RefreshController::new(1);
        refresh.adjust(-1);
        assert!(refresh.suspended());
        // Clamped at zero, not negative.
        refresh.adjust(-1);
        assert_eq!(refresh.interval(), 0);
        refresh.adjust(1);
        assert_eq!(refresh.interval(), 1);
        assert!(!refresh.suspended());
    }

    #[test]
    fn adjusting_down_to_zero_is_resumable_by_toggle() {
        let mut refresh = RefreshController::new(3);
        refresh.adjust(-1);
        refresh.adjust(-1);
        refresh.adjust(-1);
        assert!(refresh.suspended());
        refresh.toggle();
        assert_eq!(refresh.interval(), 1);
    }

    #[test]
    fn countdown_counts_down_within_a_cycle() {
        let refresh = RefreshController::new(5);
        let downs: Vec<u64> = (0..6).map(|tick| refresh.countdown(tick).unwrap()).collect();
        assert_eq!(downs, vec![5, 4, 3, 2, 1, 5]);
    }
}
