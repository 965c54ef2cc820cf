//! Countdown to a target instant.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

/// Time left, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    fn from_delta(delta: TimeDelta) -> Self {
        let total = delta.num_seconds();
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for Remaining {
    /// `3d 04:05:06`; hours, minutes and seconds are zero-padded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// What the countdown shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CountdownState {
    Running(Remaining),
    Ended,
}

/// Countdown to a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target: DateTime<Utc>,
}

impl Countdown {
    #[must_use]
    pub const fn new(target: DateTime<Utc>) -> Self {
        Self { target }
    }

    /// Parse an RFC 3339 target such as `2026-12-25T00:00:00Z`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp is not valid RFC 3339.
    pub fn parse(target: &str) -> Result<Self, chrono::ParseError> {
        let target = DateTime::parse_from_rfc3339(target)?;
        Ok(Self::new(target.with_timezone(&Utc)))
    }

    #[must_use]
    pub const fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// State at `now`. The countdown ends once the target has passed.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> CountdownState {
        let remaining = self.target - now;
        if remaining < TimeDelta::zero() {
            CountdownState::Ended
        } else {
            CountdownState::Running(Remaining::from_delta(remaining))
        }
    }

    #[must_use]
    pub fn state(&self) -> CountdownState {
        self.state_at(Utc::now())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_running() {
        let countdown = Countdown::parse("2026-12-25T00:00:00Z").unwrap();
        let state = countdown.state_at(at("2026-12-21T19:54:53Z"));
        let CountdownState::Running(remaining) = state else {
            panic!("expected running, got {state:?}");
        };
        assert_eq!(
            remaining,
            Remaining {
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 7,
            }
        );
        assert_eq!(remaining.to_string(), "3d 04:05:07");
    }

    #[test]
    fn test_partial_second_truncates() {
        let countdown = Countdown::parse("2026-01-01T00:00:10Z").unwrap();
        let now = at("2026-01-01T00:00:00.400Z");
        assert_eq!(
            countdown.state_at(now),
            CountdownState::Running(Remaining {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 9,
            })
        );
    }

    #[test]
    fn test_ended() {
        let countdown = Countdown::parse("2026-01-01T00:00:00+01:00").unwrap();
        assert_eq!(
            countdown.state_at(at("2026-01-01T00:00:00Z")),
            CountdownState::Ended
        );
        // Exactly at the target the display reads all zeros.
        assert!(matches!(
            countdown.state_at(at("2025-12-31T23:00:00Z")),
            CountdownState::Running(_)
        ));
    }

    #[test]
    fn test_invalid_target() {
        assert!(Countdown::parse("next friday").is_err());
    }
}
