//! Non-blocking interval gate.
//!
//! The main loop runs every few milliseconds, but the chat backend is
//! polled every few seconds and the Wi-Fi link checked every ten. Each of
//! those consumers owns a [`PollGate`] and asks it, once per cycle,
//! whether its interval has elapsed.
//!
//! ```text
//!   now ──▶ ┌──────────────┐ ──▶ true  (interval elapsed, fire recorded)
//!           │   PollGate   │
//!           │ last_fire_ms │ ──▶ false (too soon, nothing changes)
//!           └──────────────┘
//! ```
//!
//! The gate never sleeps. The first query after construction always
//! fires so that a freshly booted device checks in immediately.

use log::trace;

#[derive(Debug, Clone)]
pub struct PollGate {
    interval_ms: u32,
    /// Monotonic time of the last `true` answer.
    last_fire_ms: Option<u64>,
}

impl PollGate {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_fire_ms: None,
        }
    }

    /// Returns `true` iff at least `interval_ms` have elapsed since the
    /// last `true` (or this is the first query) and records `now_ms` as
    /// the new fire time.
    ///
    /// A clock that appears to go backwards is treated as "no time has
    /// passed" rather than as a huge elapsed interval.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        let due = match self.last_fire_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= u64::from(self.interval_ms),
        };
        if due {
            trace!("PollGate({} ms): fire at {}", self.interval_ms, now_ms);
            self.last_fire_ms = Some(now_ms);
        }
        due
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Forget the last fire so the next query fires immediately.
    pub fn reset(&mut self) {
        self.last_fire_ms = None;
    }
}
