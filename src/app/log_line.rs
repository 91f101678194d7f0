//! Event-log line formatting.
//!
//! Every persisted line has the shape `[YYYY-MM-DD HH:MM:SS] message`.
//! Before the wall clock is synchronised the bracket carries the literal
//! placeholder `sincronizando relogio...` instead; existing log readers
//! match on that exact text.

use core::fmt;

/// Bracket content used while the wall clock is unsynchronised.
pub const UNSYNCED_STAMP: &str = "sincronizando relogio...";

/// Unix time of 2020-01-01T00:00:00Z. Anything earlier means the RTC still
/// holds its power-on value.
pub const EPOCH_2020: i64 = 1_577_836_800;

/// Broken-down local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CalendarTime {
    /// Build from the fields of a C `struct tm` (years since 1900, months
    /// from 0). Returns `None` if any field is out of range.
    pub fn from_tm(
        tm_year: i32,
        tm_mon: i32,
        tm_mday: i32,
        tm_hour: i32,
        tm_min: i32,
        tm_sec: i32,
    ) -> Option<Self> {
        let field = |v: i32, lo: i32, hi: i32| (lo..=hi).contains(&v).then_some(v as u8);
        Some(Self {
            year: tm_year.checked_add(1900)?,
            month: field(tm_mon, 0, 11)? + 1,
            day: field(tm_mday, 1, 31)?,
            hour: field(tm_hour, 0, 23)?,
            minute: field(tm_min, 0, 59)?,
            // 60 is a leap second.
            second: field(tm_sec, 0, 60)?,
        })
    }
}

impl fmt::Display for CalendarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Build the exact line content written to the event log (no newline).
pub fn format_log_line(wall_clock: Option<CalendarTime>, message: &str) -> String {
    match wall_clock {
        Some(t) => format!("[{}] {}", t, message),
        None => format!("[{}] {}", UNSYNCED_STAMP, message),
    }
}
