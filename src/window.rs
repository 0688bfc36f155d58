//! Time-window gate.
//!
//! A `within` registration limits how late an `any`, `after` or `sequence`
//! match may happen relative to the first event of the open session. Several
//! windows combine with OR semantics: the gate passes as soon as one budget
//! is still unspent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// Unit a window budget is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    /// Whole units contained in `elapsed` (truncated toward zero).
    #[must_use]
    pub fn whole_units(self, elapsed: Duration) -> i64 {
        match self {
            Self::Milliseconds => elapsed.num_milliseconds(),
            Self::Seconds => elapsed.num_seconds(),
            Self::Minutes => elapsed.num_minutes(),
            Self::Hours => elapsed.num_hours(),
            Self::Days => elapsed.num_days(),
            Self::Weeks => elapsed.num_weeks(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Milliseconds => "milliseconds",
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Weeks => "weeks",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ms" | "millis" | "millisecond" | "milliseconds" => Ok(Self::Milliseconds),
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(Self::Seconds),
            "min" | "mins" | "minute" | "minutes" => Ok(Self::Minutes),
            "h" | "hr" | "hour" | "hours" => Ok(Self::Hours),
            "d" | "day" | "days" => Ok(Self::Days),
            "w" | "week" | "weeks" => Ok(Self::Weeks),
            _ => Err(DetectError::InvalidTimeUnit {
                unit: s.to_string(),
            }),
        }
    }
}

/// One `within` budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub increment: u64,
    pub unit: TimeUnit,
}

impl Window {
    #[must_use]
    pub const fn new(increment: u64, unit: TimeUnit) -> Self {
        Self { increment, unit }
    }

    /// True while `elapsed` is strictly below the budget.
    #[must_use]
    pub fn admits(&self, elapsed: Duration) -> bool {
        i128::from(self.unit.whole_units(elapsed)) < i128::from(self.increment)
    }
}

/// Evaluate the window gate.
///
/// Passes when no window is configured, when the session has not yet seen a
/// second event, or when any window still admits the elapsed session time.
pub fn passes<'a, I>(
    windows: I,
    session_start: Option<DateTime<Utc>>,
    last_event: Option<DateTime<Utc>>,
) -> bool
where
    I: IntoIterator<Item = &'a Window>,
{
    let mut windows = windows.into_iter().peekable();
    if windows.peek().is_none() {
        return true;
    }

    let (Some(start), Some(last)) = (session_start, last_event) else {
        return true;
    };

    let elapsed = last - start;
    windows.any(|w| w.admits(elapsed))
}
