//! Alarm controller, the hexagonal core.
//!
//! [`AlarmController`] owns the FSM and is the only writer of alarm state.
//! It takes [`Command`]s and motion events and answers with the list of
//! [`Effect`]s to perform; it never does I/O itself, so every rule below
//! is testable without GPIO or network.
//!
//! ```text
//!  Command ──▶ ┌────────────────────────┐ ──▶ Vec<Effect>
//!              │    AlarmController     │
//!  Motion  ──▶ │  FSM · status · dumps  │
//!              └────────────────────────┘
//! ```
//!
//! State-changing commands go through the FSM table. Queries (status, log
//! dump) and unrecognised input are answered here, in any state.

use log::info;

use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{AlarmInput, Fsm, StateId, SystemState};

use super::commands::{Command, Source};
use super::effects::Effect;

pub const UNRECOGNIZED_HELP: &str =
    "Command not recognized. Use /armar, /desarmar, /status or /logs.";

pub struct AlarmController {
    fsm: Fsm,
    ctx: FsmContext,
}

impl AlarmController {
    /// Build the controller in `Disarmed`. Every boot starts here; alarm
    /// state is never persisted.
    pub fn new() -> Self {
        let mut fsm = Fsm::new(build_state_table(), StateId::Disarmed);
        let mut ctx = FsmContext::new();
        fsm.start(&mut ctx);
        ctx.drain();
        Self { fsm, ctx }
    }

    /// Apply one command.
    pub fn handle(&mut self, cmd: Command) -> Vec<Effect> {
        info!("Command {:?} in {:?}", cmd, self.fsm.current_state());
        match cmd {
            Command::Arm { source } => self.dispatch(AlarmInput::Arm(source)),
            Command::Disarm { source } => self.dispatch(AlarmInput::Disarm(source)),
            Command::StatusQuery { .. } => vec![Effect::Notify(self.status_report())],
            Command::LogRequest { .. } => vec![Effect::SendLogDump],
            // Unknown RF codes are audited only; they never reach the chat.
            Command::Unrecognized {
                source: Source::RadioChannel,
                raw,
            } => vec![Effect::LogLine(format!("Unknown RF code received: {}", raw))],
            Command::Unrecognized { .. } => vec![Effect::notify(UNRECOGNIZED_HELP)],
        }
    }

    /// The PIR reported motion.
    pub fn on_motion(&mut self) -> Vec<Effect> {
        self.dispatch(AlarmInput::Motion)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot for input adapters and the dispatcher.
    pub fn state(&self) -> SystemState {
        SystemState::from(self.fsm.current_state())
    }

    pub fn state_id(&self) -> StateId {
        self.fsm.current_state()
    }

    /// Human-readable status message sent in reply to a status query.
    pub fn status_report(&self) -> String {
        let s = self.state();
        format!(
            "Sentinel status\nSystem: {}\nSiren triggered: {}",
            if s.armed { "ARMED" } else { "DISARMED" },
            if s.triggered { "YES" } else { "NO" },
        )
    }

    // ── Internal ──────────────────────────────────────────────

    fn dispatch(&mut self, input: AlarmInput) -> Vec<Effect> {
        self.fsm.dispatch(input, &mut self.ctx);
        let effects = self.ctx.drain();
        debug_assert!(
            !self.state().triggered || self.state().armed,
            "triggered without armed"
        );
        effects
    }
}

impl Default for AlarmController {
    fn default() -> Self {
        Self::new()
    }
}
