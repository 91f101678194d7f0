//! Contact-bounce filter for a single binary input.
//!
//! ## Algorithm
//!
//! Works on *logical* levels (`true` = pressed), so the caller resolves
//! active-low wiring before sampling.
//!
//! | Condition                                           | Action                              |
//! |-----------------------------------------------------|-------------------------------------|
//! | `raw != last_raw`                                   | restart window, remember raw, emit nothing |
//! | `raw == last_raw`, window elapsed, `raw != stable`  | `stable = raw`, emit edge once      |
//! | otherwise                                           | nothing                             |
//!
//! Toggling faster than the window never produces an edge; each settled
//! transition produces exactly one.

/// A settled level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    last_raw: bool,
    last_change_ms: u64,
    stable: bool,
}

impl Debouncer {
    /// `idle_level` is the logical level of the released input. Seeding
    /// both raw and stable with it keeps boot from producing an edge.
    pub fn new(idle_level: bool) -> Self {
        Self {
            last_raw: idle_level,
            last_change_ms: 0,
            stable: idle_level,
        }
    }

    /// Feed one raw sample taken at `now_ms`.
    pub fn sample(&mut self, raw: bool, now_ms: u64, window_ms: u32) -> Option<Edge> {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change_ms = now_ms;
            return None;
        }

        let held_ms = now_ms.saturating_sub(self.last_change_ms);
        if held_ms >= u64::from(window_ms) && raw != self.stable {
            self.stable = raw;
            return Some(if raw { Edge::Pressed } else { Edge::Released });
        }

        None
    }

    /// Last settled level.
    pub fn stable_level(&self) -> bool {
        self.stable
    }
}
