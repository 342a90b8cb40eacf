//! Publication dates as reported by search providers.
//!
//! Providers hand back dates in whatever shape the indexed page used:
//! ISO strings, `DD/MM/YYYY`, `Mar 4, 2025`, or relative phrases such as
//! `"3 days ago"`. [`PublishedDate::parse`] folds them into a calendar date
//! and falls back to [`PublishedDate::Unknown`] for anything else.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::NOT_AVAILABLE;

/// A normalized publication date.
///
/// `Unknown` orders before every known date, so a descending sort puts
/// undated results last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PublishedDate {
    #[default]
    Unknown,
    Known(NaiveDate),
}

impl PublishedDate {
    /// Parses a provider date string. `now` anchors relative phrases.
    #[must_use]
    pub fn parse(raw: &str, now: DateTime<Utc>) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(NOT_AVAILABLE) {
            return Self::Unknown;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Self::Known(dt.date_naive());
        }

        for format in ["%Y-%m-%d", "%d/%m/%Y", "%b %d, %Y", "%B %d, %Y", "%d %b %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
                return Self::Known(date);
            }
        }

        parse_relative(raw, now).map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for PublishedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str(NOT_AVAILABLE),
            Self::Known(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for PublishedDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublishedDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_or(Self::Unknown, Self::Known))
    }
}

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,4})\s+(minute|min|hour|day|week|month)s?\s+ago$").expect("valid regex")
});

fn parse_relative(raw: &str, now: DateTime<Utc>) -> Option<NaiveDate> {
    let caps = RELATIVE_RE.captures(raw)?;
    let amount: i64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str().to_ascii_lowercase();
    let delta = match unit.as_str() {
        "minute" | "min" => Duration::minutes(amount),
        "hour" => Duration::hours(amount),
        "day" => Duration::days(amount),
        "week" => Duration::weeks(amount),
        "month" => Duration::days(amount * 30),
        _ => return None,
    };
    Some((now - delta).date_naive())
}
