//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern, event-driven:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  StateTable                                                │
//! │  ┌───────────┬───────────┬──────────┬─────────────────────┐ │
//! │  │ StateId   │ on_enter  │ on_exit  │ on_input            │ │
//! │  ├───────────┼───────────┼──────────┼─────────────────────┤ │
//! │  │ Disarmed  │ fn(ctx)   │ fn(ctx)  │ fn(ctx,in)->Option<>│ │
//! │  │ Armed     │ fn(ctx)   │ fn(ctx)  │ fn(ctx,in)->Option<>│ │
//! │  │ Triggered │ fn(ctx)   │ fn(ctx)  │ fn(ctx,in)->Option<>│ │
//! │  └───────────┴───────────┴──────────┴─────────────────────┘ │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each dispatched [`AlarmInput`] is handed to `on_input` of the
//! **current** state. If it returns `Some(next_id)`, the engine runs
//! `on_exit` for the current state, then `on_enter` for the next, and
//! updates the current pointer. Handlers never touch hardware; they push
//! [`Effect`](crate::app::effects::Effect)s into the shared
//! [`FsmContext`].

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::app::commands::Source;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all alarm states.
/// Must stay in sync with the state table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Disarmed = 0,
    Armed = 1,
    Triggered = 2,
}

impl StateId {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 3;

    /// Convert a table index back to `StateId`. Out-of-range indices are a
    /// programming error; release builds fall back to `Disarmed`.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Disarmed,
            1 => Self::Armed,
            2 => Self::Triggered,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Disarmed
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and state snapshot
// ---------------------------------------------------------------------------

/// State-changing inputs. Queries (status, log dump) never reach the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmInput {
    Arm(Source),
    Disarm(Source),
    Motion,
}

/// Read-only view of the alarm state handed to input adapters.
///
/// Derived from [`StateId`], so `triggered` can never be set without
/// `armed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemState {
    pub armed: bool,
    pub triggered: bool,
}

impl From<StateId> for SystemState {
    fn from(id: StateId) -> Self {
        Self {
            armed: id != StateId::Disarmed,
            triggered: id == StateId::Triggered,
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the input handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateInputFn = fn(&mut FsmContext, AlarmInput) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_input: StateInputFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Number of transitions taken since start.
    transitions: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            transitions: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `dispatch()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Feed one input to the current state's handler and follow the
    /// transition it requests, if any. Self-transitions are ignored.
    pub fn dispatch(&mut self, input: AlarmInput, ctx: &mut FsmContext) {
        let next = (self.table[self.current].on_input)(ctx, input);

        if let Some(next_id) = next {
            if next_id as usize != self.current {
                self.transition(next_id, ctx);
            }
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.transitions += 1;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
