//! Timeframe tokens, reporting periods and comparison periods.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Trailing window selected by a dashboard request.
///
/// `1y` is a 365-day approximation, not calendar-year arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Timeframe {
    SevenDays,
    #[default]
    ThirtyDays,
    NinetyDays,
    OneYear,
}

impl Timeframe {
    /// Parse a timeframe token. Unknown tokens fall back to `30d`.
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "7d" => Timeframe::SevenDays,
            "30d" => Timeframe::ThirtyDays,
            "90d" => Timeframe::NinetyDays,
            "1y" => Timeframe::OneYear,
            other => {
                warn!(token = %other, "Unrecognized timeframe, defaulting to 30d");
                Timeframe::ThirtyDays
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::SevenDays => "7d",
            Timeframe::ThirtyDays => "30d",
            Timeframe::NinetyDays => "90d",
            Timeframe::OneYear => "1y",
        }
    }

    /// Window length in days.
    pub fn days(&self) -> i64 {
        match self {
            Timeframe::SevenDays => 7,
            Timeframe::ThirtyDays => 30,
            Timeframe::NinetyDays => 90,
            Timeframe::OneYear => 365,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Timeframe {
    fn from(token: String) -> Self {
        Timeframe::parse(&token)
    }
}

impl From<Timeframe> for String {
    fn from(timeframe: Timeframe) -> Self {
        timeframe.as_str().to_string()
    }
}

/// Half-open instant range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The window of equal length ending where this one starts.
    pub fn comparison(&self) -> Period {
        comparison_period(self)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// Resolve a timeframe to the trailing window ending at `now`.
pub fn resolve_period(timeframe: Timeframe, now: DateTime<Utc>) -> Period {
    Period {
        start: now - Duration::days(timeframe.days()),
        end: now,
    }
}

/// The period immediately preceding `period`, with identical duration.
pub fn comparison_period(period: &Period) -> Period {
    Period {
        start: period.start - period.duration(),
        end: period.start,
    }
}
