//! Live clock row: formatted timestamp plus a day-period icon.
//!
//! Runs on its own 1 s [`TickTimer`] and has no link to the typing
//! animation.

use std::time::Instant;

use chrono::{DateTime, Local, TimeZone, Timelike};

use crate::playback::{TickTimer, CLOCK_PERIOD};

/// `Friday, March 1 2024, 07:05:09 AM`
pub const TIMESTAMP_FORMAT: &str = "%A, %B %-d %Y, %I:%M:%S %p";

// ---------------------------------------------------------------------------
// DayPeriod
// ---------------------------------------------------------------------------

/// Icon bucket for the hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    /// 05:00 – 11:59
    Sunrise,
    /// 12:00 – 17:59
    Sun,
    /// 18:00 – 04:59
    Moon,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPeriod::Sunrise,
            12..=17 => DayPeriod::Sun,
            _ => DayPeriod::Moon,
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            DayPeriod::Sunrise => "sunrise",
            DayPeriod::Sun => "sun",
            DayPeriod::Moon => "moon",
        }
    }

    /// Bundled icon file name, e.g. `sun.png`.
    pub fn icon_file(&self) -> String {
        format!("{}.png", self.icon_name())
    }

    /// Text stand-in used when the icon image is missing.
    pub fn glyph(&self) -> &'static str {
        match self {
            DayPeriod::Sunrise => "🌅",
            DayPeriod::Sun => "☀",
            DayPeriod::Moon => "🌙",
        }
    }
}

/// Render `now` with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(TIMESTAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// ClockWidget
// ---------------------------------------------------------------------------

/// Timestamp label and icon, refreshed once per second.
#[derive(Debug, Clone)]
pub struct ClockWidget {
    timer: TickTimer,
    label: String,
    period: DayPeriod,
}

impl ClockWidget {
    /// Render immediately from the local wall clock.
    pub fn new(start: Instant) -> Self {
        let mut clock = Self {
            timer: TickTimer::new(CLOCK_PERIOD, start),
            label: String::new(),
            period: DayPeriod::Moon,
        };
        clock.refresh(&Local::now());
        clock
    }

    /// Re-render from `now`.
    pub fn refresh<Tz: TimeZone>(&mut self, now: &DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        self.label = format_timestamp(now);
        self.period = DayPeriod::from_hour(now.hour());
    }

    /// Refresh from the local clock if a tick is due; returns whether it did.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.poll(now) == 0 {
            return false;
        }
        self.refresh(&Local::now());
        true
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn period(&self) -> DayPeriod {
        self.period
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    #[test]
    fn hour_buckets() {
        assert_eq!(DayPeriod::from_hour(14), DayPeriod::Sun);
        assert_eq!(DayPeriod::from_hour(4), DayPeriod::Moon);
        assert_eq!(DayPeriod::from_hour(5), DayPeriod::Sunrise);
        assert_eq!(DayPeriod::from_hour(11), DayPeriod::Sunrise);
        assert_eq!(DayPeriod::from_hour(12), DayPeriod::Sun);
        assert_eq!(DayPeriod::from_hour(17), DayPeriod::Sun);
        assert_eq!(DayPeriod::from_hour(18), DayPeriod::Moon);
        assert_eq!(DayPeriod::from_hour(0), DayPeriod::Moon);
        assert_eq!(DayPeriod::from_hour(23), DayPeriod::Moon);
    }

    #[test]
    fn icon_names() {
        assert_eq!(DayPeriod::Sunrise.icon_name(), "sunrise");
        assert_eq!(DayPeriod::Sun.icon_file(), "sun.png");
        assert_eq!(DayPeriod::Moon.icon_file(), "moon.png");
    }

    #[test]
    fn timestamp_format() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 7, 5, 9).unwrap();
        assert_eq!(format_timestamp(&t), "Friday, March 1 2024, 07:05:09 AM");

        let t = Utc.with_ymd_and_hms(2024, 12, 25, 18, 30, 0).unwrap();
        assert_eq!(format_timestamp(&t), "Wednesday, December 25 2024, 06:30:00 PM");
    }

    #[test]
    fn refresh_updates_label_and_period() {
        let mut clock = ClockWidget::new(Instant::now());
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 14, 0, 0).unwrap();

        clock.refresh(&t);

        assert_eq!(clock.period(), DayPeriod::Sun);
        assert!(clock.label().starts_with("Friday, March 1 2024"));
    }

    #[test]
    fn poll_fires_once_per_second() {
        let t0 = Instant::now();
        let mut clock = ClockWidget::new(t0);

        assert!(!clock.poll(t0 + Duration::from_millis(500)));
        assert!(clock.poll(t0 + Duration::from_millis(1000)));
        assert!(!clock.poll(t0 + Duration::from_millis(1500)));
        assert!(!clock.label().is_empty());
    }
}
