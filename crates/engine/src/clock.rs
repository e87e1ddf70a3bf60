use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Minutes in one day; valid minute offsets are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("Time '{0}' is missing the ':' separator")]
    MissingSeparator(String),
    #[error("Time '{0}' has a non-numeric hour or minute")]
    NotNumeric(String),
    #[error("Time '{0}' is outside 00:00-23:59")]
    OutOfRange(String),
}

// ---------------------------------------------------------------------------
// Lenient conversion
// ---------------------------------------------------------------------------

/// Convert an `"HH:MM"` string to minutes since midnight.
///
/// Only splits on `:` and multiplies out; it does not check that the hour or
/// minute are in range (`"25:00"` yields 1500) and ignores anything after a
/// second colon. Each part is trimmed and must be a plain unsigned integer.
pub fn time_to_minutes(s: &str) -> Result<u32, TimeParseError> {
    let mut parts = s.split(':');
    let hours = parts.next().unwrap_or_default().trim();
    let minutes = parts
        .next()
        .ok_or_else(|| TimeParseError::MissingSeparator(s.to_string()))?
        .trim();

    let parse = |p: &str| -> Result<u32, TimeParseError> {
        if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimeParseError::NotNumeric(s.to_string()));
        }
        p.parse::<u32>()
            .map_err(|_| TimeParseError::OutOfRange(s.to_string()))
    };

    let h = parse(hours)?;
    let m = parse(minutes)?;
    h.checked_mul(60)
        .and_then(|h| h.checked_add(m))
        .ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
}

// ---------------------------------------------------------------------------
// Strict clock time
// ---------------------------------------------------------------------------

/// A wall-clock time of day, always within `00:00..=23:59`.
///
/// Serializes as the canonical zero-padded `"HH:MM"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub fn new(hours: u32, minutes: u32) -> Option<Self> {
        if hours < 24 && minutes < 60 {
            Some(ClockTime((hours * 60 + minutes) as u16))
        } else {
            None
        }
    }

    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(ClockTime(minutes as u16))
    }

    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hours(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| TimeParseError::MissingSeparator(s.to_string()))?;
        let digits = |p: &str| p.len() <= 2 && !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if !digits(h) || !digits(m) {
            return Err(TimeParseError::NotNumeric(s.to_string()));
        }
        let hours: u32 = h.parse().map_err(|_| TimeParseError::NotNumeric(s.to_string()))?;
        let minutes: u32 = m.parse().map_err(|_| TimeParseError::NotNumeric(s.to_string()))?;
        ClockTime::new(hours, minutes).ok_or_else(|| TimeParseError::OutOfRange(s.to_string()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// Day of the week, numbered from Monday = 0.
///
/// The validator itself works on plain integers; this enum is the vocabulary
/// used when parsing section day lists and by calendar callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Parse a three-letter abbreviation such as `"Mon"`. Case-sensitive.
    pub fn from_abbrev(s: &str) -> Option<Self> {
        Weekday::ALL.into_iter().find(|d| d.abbrev() == s)
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    pub fn index(self) -> i64 {
        self as i64
    }

}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
