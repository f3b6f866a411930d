use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Half-open time-of-day window `[start, end)`.
///
/// All schedule intervals in the engine (operating hours, breaks, blocked
/// ranges, slot windows) are half-open: a window ending at 22:00 does not
/// contain 22:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// True when `start < end`. Windows crossing midnight are not modeled.
    pub fn is_ordered(&self) -> bool {
        self.start < self.end
    }

    /// True when `time` lies inside `[start, end)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    /// True when the two half-open windows share at least one instant.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Window length in whole minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod time_tests;
