//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch.
//!
//! ```text
//!  DISARMED ──[arm]──▶ ARMED ──[motion]──▶ TRIGGERED
//!     ▲                  │                    │
//!     └─────[disarm]─────┴──────[disarm]──────┘
//!
//!  ARMED/TRIGGERED + arm     → "already armed"
//!  DISARMED + disarm         → "already disarmed"
//!  DISARMED/TRIGGERED + motion → ignored
//! ```

use super::context::FsmContext;
use super::{AlarmInput, StateDescriptor, StateId};
use crate::app::effects::Effect;
use log::{debug, info, warn};

pub const ALREADY_ARMED: &str = "The system is already armed.";
pub const ALREADY_DISARMED: &str = "The system is already disarmed.";
pub const MOTION_ALERT: &str = "ALERT! Motion detected! Siren triggered!";
pub const MOTION_LOG: &str = "Motion detected, alarm triggered (siren + notification).";

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0: Disarmed
        StateDescriptor {
            id: StateId::Disarmed,
            name: "Disarmed",
            on_enter: Some(disarmed_enter),
            on_exit: None,
            on_input: disarmed_input,
        },
        // Index 1: Armed
        StateDescriptor {
            id: StateId::Armed,
            name: "Armed",
            on_enter: Some(armed_enter),
            on_exit: None,
            on_input: armed_input,
        },
        // Index 2: Triggered
        StateDescriptor {
            id: StateId::Triggered,
            name: "Triggered",
            on_enter: Some(triggered_enter),
            on_exit: Some(triggered_exit),
            on_input: triggered_input,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  DISARMED state
// ═══════════════════════════════════════════════════════════════════════════

fn disarmed_enter(ctx: &mut FsmContext) {
    // Boot also enters Disarmed; there is nothing to announce then.
    let Some(source) = ctx.cause else {
        return;
    };
    ctx.push(Effect::DeactivateSiren);
    ctx.notify_and_log(format!("System disarmed by {}.", source));
    info!("DISARMED: by {}", source);
}

fn disarmed_input(ctx: &mut FsmContext, input: AlarmInput) -> Option<StateId> {
    match input {
        AlarmInput::Arm(source) => {
            ctx.cause = Some(source);
            Some(StateId::Armed)
        }
        AlarmInput::Disarm(source) => {
            debug!("DISARMED: redundant disarm from {}", source);
            ctx.push(Effect::notify(ALREADY_DISARMED));
            None
        }
        AlarmInput::Motion => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ARMED state: watching the PIR
// ═══════════════════════════════════════════════════════════════════════════

fn armed_enter(ctx: &mut FsmContext) {
    let source = ctx.cause.map_or_else(|| String::from("unknown"), |s| s.to_string());
    ctx.notify_and_log(format!("System armed by {}.", source));
    info!("ARMED: by {}", source);
}

fn armed_input(ctx: &mut FsmContext, input: AlarmInput) -> Option<StateId> {
    match input {
        AlarmInput::Arm(_) => {
            ctx.push(Effect::notify(ALREADY_ARMED));
            None
        }
        AlarmInput::Disarm(source) => {
            ctx.cause = Some(source);
            Some(StateId::Disarmed)
        }
        AlarmInput::Motion => Some(StateId::Triggered),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  TRIGGERED state: siren sounding
// ═══════════════════════════════════════════════════════════════════════════

fn triggered_enter(ctx: &mut FsmContext) {
    ctx.push(Effect::ActivateSiren);
    ctx.push(Effect::notify(MOTION_ALERT));
    ctx.push(Effect::log_line(MOTION_LOG));
    warn!("TRIGGERED: motion detected, siren on");
}

fn triggered_exit(_ctx: &mut FsmContext) {
    info!("TRIGGERED: episode over");
}

fn triggered_input(ctx: &mut FsmContext, input: AlarmInput) -> Option<StateId> {
    match input {
        AlarmInput::Arm(_) => {
            ctx.push(Effect::notify(ALREADY_ARMED));
            None
        }
        AlarmInput::Disarm(source) => {
            ctx.cause = Some(source);
            Some(StateId::Disarmed)
        }
        // Siren already on: no re-fire, no second alert.
        AlarmInput::Motion => None,
    }
}
