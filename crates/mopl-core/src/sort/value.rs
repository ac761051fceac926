//! Typed sort values and their cursor text form.

use std::cmp::Ordering;
use std::fmt;

use jiff::Timestamp;
use strum::{AsRefStr, IntoStaticStr};

/// The type of value a sort field produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum SortValueKind {
    Text,
    Timestamp,
    Real,
    Bool,
}

impl SortValueKind {
    /// Rank used only when two values of different kinds meet in one ordering.
    fn rank(self) -> u8 {
        match self {
            Self::Bool => 0,
            Self::Real => 1,
            Self::Timestamp => 2,
            Self::Text => 3,
        }
    }
}

/// A sort key extracted from a record.
///
/// Integer counters are carried as [`SortValue::Real`]; their cursor text has
/// no fractional part (`42`), so it still parses as an integer downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Raw text, compared bytewise.
    Text(String),
    /// Instant, rendered as RFC 3339 (`2024-01-15T10:30:00Z`).
    Timestamp(Timestamp),
    /// Floating-point number, rendered as shortest decimal text.
    Real(f64),
    /// Boolean, rendered as `true` / `false`.
    Bool(bool),
}

impl SortValue {
    /// Returns the kind of this value.
    pub fn kind(&self) -> SortValueKind {
        match self {
            Self::Text(_) => SortValueKind::Text,
            Self::Timestamp(_) => SortValueKind::Timestamp,
            Self::Real(_) => SortValueKind::Real,
            Self::Bool(_) => SortValueKind::Bool,
        }
    }

    /// Parses cursor text as a value of the given kind.
    ///
    /// Returns `None` for text that does not parse; callers treat that as
    /// "no cursor".
    pub fn parse(kind: SortValueKind, text: &str) -> Option<Self> {
        match kind {
            SortValueKind::Text => Some(Self::Text(text.to_owned())),
            SortValueKind::Timestamp => text.trim().parse().ok().map(Self::Timestamp),
            SortValueKind::Real => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Self::Real),
            SortValueKind::Bool => {
                let text = text.trim();
                if text.eq_ignore_ascii_case("true") {
                    Some(Self::Bool(true))
                } else if text.eq_ignore_ascii_case("false") {
                    Some(Self::Bool(false))
                } else {
                    None
                }
            }
        }
    }

    /// Renders the value as cursor text.
    pub fn to_cursor(&self) -> String {
        self.to_string()
    }

    /// Compares two values in ascending order.
    ///
    /// Values of different kinds never occur within one field, but the order
    /// stays total if they do.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Real(a), Self::Real(b)) => a.total_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (a, b) => a.kind().rank().cmp(&b.kind().rank()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the value as an `i32` when it is a whole number in range.
    pub fn as_i32(&self) -> Option<i32> {
        let value = self.as_real()?;
        if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
            return None;
        }
        Some(value as i32)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the score used by score-ordered indexes.
    ///
    /// Timestamps map to epoch milliseconds; booleans to 0 and 1. Text has no
    /// monotonic numeric form.
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::Timestamp(value) => Some(value.as_millisecond() as f64),
            Self::Real(value) => Some(*value),
            Self::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for SortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Timestamp(value) => write!(f, "{value}"),
            Self::Real(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Timestamp> for SortValue {
    fn from(value: Timestamp) -> Self {
        Self::Timestamp(value)
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<i32> for SortValue {
    fn from(value: i32) -> Self {
        Self::Real(f64::from(value))
    }
}

impl From<bool> for SortValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
