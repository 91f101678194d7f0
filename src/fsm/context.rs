//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the scratchpad state handlers write into while one
//! input is being processed: the channel that caused the transition (so
//! `on_enter` can name it) and the effects accumulated so far. The
//! controller drains it after every dispatch.

use crate::app::commands::Source;
use crate::app::effects::Effect;

pub struct FsmContext {
    /// Channel behind the input currently being handled.
    /// `None` for sensor-driven inputs and during startup.
    pub cause: Option<Source>,

    /// Effects produced while handling the current input, in order.
    pub effects: Vec<Effect>,
}

impl FsmContext {
    pub fn new() -> Self {
        Self {
            cause: None,
            effects: Vec::new(),
        }
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Push the same text as a chat notification and an event-log line.
    pub fn notify_and_log(&mut self, text: String) {
        self.effects.push(Effect::Notify(text.clone()));
        self.effects.push(Effect::LogLine(text));
    }

    /// Take the accumulated effects and clear the cause.
    pub fn drain(&mut self) -> Vec<Effect> {
        self.cause = None;
        core::mem::take(&mut self.effects)
    }
}

impl Default for FsmContext {
    fn default() -> Self {
        Self::new()
    }
}
