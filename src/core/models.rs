//! Data structures shared by the filter and summary stages.

use std::path::PathBuf;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::message::NodeRefs;

/// Summary granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SummaryType {
    /// One bucket per calendar month (default)
    #[default]
    Monthly,
    /// One bucket per week, weeks start on Sunday
    Weekly,
}

impl SummaryType {
    /// Returns the window containing `instant`.
    pub fn window(self, instant: NaiveDateTime) -> Window {
        match self {
            SummaryType::Monthly => Window::month_of(instant),
            SummaryType::Weekly => Window::week_of(instant),
        }
    }
}

impl std::fmt::Display for SummaryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryType::Monthly => write!(f, "monthly"),
            SummaryType::Weekly => write!(f, "weekly"),
        }
    }
}

impl std::str::FromStr for SummaryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" | "month" => Ok(SummaryType::Monthly),
            "weekly" | "week" => Ok(SummaryType::Weekly),
            _ => Err(format!(
                "Unknown summary type: '{}'. Expected one of: monthly, weekly",
                s
            )),
        }
    }
}

/// Half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    /// Calendar month containing `instant`.
    pub fn month_of(instant: NaiveDateTime) -> Self {
        let first = instant.date().with_day(1).unwrap_or(instant.date());
        let next = first.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX);
        Self {
            start: first.and_time(chrono::NaiveTime::MIN),
            end: next.and_time(chrono::NaiveTime::MIN),
        }
    }

    /// Week containing `instant`, starting Sunday 00:00.
    pub fn week_of(instant: NaiveDateTime) -> Self {
        let offset = u64::from(instant.weekday().num_days_from_sunday());
        let sunday = instant
            .date()
            .checked_sub_days(Days::new(offset))
            .unwrap_or(NaiveDate::MIN);
        let next = sunday.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
        Self {
            start: sunday.and_time(chrono::NaiveTime::MIN),
            end: next.and_time(chrono::NaiveTime::MIN),
        }
    }

    /// Returns `true` if `instant` falls inside the window.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Canonical bucket key: the window start as `YYYY-MM-DDTHH:MM:SS`.
    pub fn key(&self) -> String {
        self.start.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

/// Aggregate of every message that fell into one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBucket {
    /// Canonical window start, see [`Window::key`]
    pub key: String,
    /// Full window bounds
    pub window: Window,
    /// Earliest timestamp observed in the window
    pub first_seen: NaiveDateTime,
    /// Latest timestamp observed in the window
    pub last_seen: NaiveDateTime,
    /// Number of messages, at least one
    pub count: usize,
    /// Container of the first message, rewritten to show the aggregate
    pub representative: NodeRefs,
}

impl TimeBucket {
    /// Starts a bucket from its first message.
    pub fn new(window: Window, instant: NaiveDateTime, representative: NodeRefs) -> Self {
        Self {
            key: window.key(),
            window,
            first_seen: instant,
            last_seen: instant,
            count: 1,
            representative,
        }
    }

    /// Folds another message of the same window into the bucket.
    pub fn observe(&mut self, instant: NaiveDateTime) {
        debug_assert!(self.window.contains(instant), "instant outside bucket window");
        self.first_seen = self.first_seen.min(instant);
        self.last_seen = self.last_seen.max(instant);
        self.count += 1;
    }
}

/// Result of one output-producing stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    /// Where the output file was written
    pub path: PathBuf,
    /// Retained calls, or number of buckets
    pub count: usize,
}

/// What a completed operation produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Structurally valid messages found in the archive
    pub messages_found: usize,
    /// Call filter result, if requested
    pub call_log: Option<StageOutcome>,
    /// Summary result, if requested
    pub statistic: Option<StageOutcome>,
}
