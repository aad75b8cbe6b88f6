//! Fixed-period tick source for frame-driven UIs.
//!
//! egui repaints whenever it likes, so nothing calls us every 50 ms. A
//! [`TickTimer`] is polled once per frame with the current [`Instant`] and
//! reports how many whole periods have elapsed since the last poll.

use std::time::{Duration, Instant};

/// Reveal tick period of the greeting animation.
pub const REVEAL_PERIOD: Duration = Duration::from_millis(50);

/// Refresh period of the clock row.
pub const CLOCK_PERIOD: Duration = Duration::from_millis(1000);

/// Upper bound on ticks reported by a single poll. A longer stall (window
/// hidden, machine asleep) drops the backlog instead of replaying it.
pub const MAX_CATCH_UP: u32 = 8;

#[derive(Debug, Clone)]
pub struct TickTimer {
    period: Duration,
    next: Instant,
}

impl TickTimer {
    /// First tick is due one `period` after `start`.
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period,
            next: start + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of ticks due at `now`, capped at [`MAX_CATCH_UP`].
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut due = 0;
        while now >= self.next && due < MAX_CATCH_UP {
            self.next += self.period;
            due += 1;
        }
        if now >= self.next {
            log::debug!("Tick backlog dropped ({:?} period)", self.period);
            self.next = now + self.period;
        }
        due
    }

    /// Time left until the next tick, for `request_repaint_after`.
    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_due_before_first_period() {
        let t0 = Instant::now();
        let mut timer = TickTimer::new(REVEAL_PERIOD, t0);

        assert_eq!(timer.poll(t0), 0);
        assert_eq!(timer.poll(t0 + Duration::from_millis(49)), 0);
        assert_eq!(timer.poll(t0 + Duration::from_millis(50)), 1);
    }

    #[test]
    fn reports_each_period_once() {
        let t0 = Instant::now();
        let mut timer = TickTimer::new(REVEAL_PERIOD, t0);

        assert_eq!(timer.poll(t0 + Duration::from_millis(120)), 2);
        assert_eq!(timer.poll(t0 + Duration::from_millis(140)), 0);
        assert_eq!(timer.poll(t0 + Duration::from_millis(150)), 1);
    }

    #[test]
    fn long_stall_is_capped_and_reanchored() {
        let t0 = Instant::now();
        let mut timer = TickTimer::new(REVEAL_PERIOD, t0);
        let late = t0 + Duration::from_secs(10);

        assert_eq!(timer.poll(late), MAX_CATCH_UP);
        assert_eq!(timer.poll(late), 0);
        assert_eq!(timer.until_next(late), REVEAL_PERIOD);
    }

    #[test]
    fn until_next_counts_down() {
        let t0 = Instant::now();
        let timer = TickTimer::new(CLOCK_PERIOD, t0);

        assert_eq!(timer.until_next(t0), CLOCK_PERIOD);
        assert_eq!(
            timer.until_next(t0 + Duration::from_millis(400)),
            Duration::from_millis(600)
        );
        assert_eq!(timer.until_next(t0 + Duration::from_secs(5)), Duration::ZERO);
    }
}
