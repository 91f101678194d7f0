//! 433 MHz fixed-code remote adapter.
//!
//! Checks the receiver mailbox every cycle. Two codes are meaningful (arm,
//! disarm); anything else comes out as `Unrecognized` so the controller
//! can audit it. The mailbox is acknowledged exactly once per code.

use log::info;

use super::InputAdapter;
use crate::app::commands::{Command, Source};
use crate::app::ports::RadioChannel;
use crate::fsm::SystemState;

pub struct RadioAdapter<R: RadioChannel> {
    receiver: R,
    arm_code: u64,
    disarm_code: u64,
}

impl<R: RadioChannel> RadioAdapter<R> {
    pub fn new(receiver: R, arm_code: u64, disarm_code: u64) -> Self {
        Self {
            receiver,
            arm_code,
            disarm_code,
        }
    }

    pub fn receiver(&self) -> &R {
        &self.receiver
    }

    pub fn receiver_mut(&mut self) -> &mut R {
        &mut self.receiver
    }

    fn classify(&self, code: u64) -> Command {
        let source = Source::RadioChannel;
        if code == self.arm_code {
            Command::Arm { source }
        } else if code == self.disarm_code {
            Command::Disarm { source }
        } else {
            Command::Unrecognized {
                source,
                raw: code.to_string(),
            }
        }
    }
}

impl<R: RadioChannel> InputAdapter for RadioAdapter<R> {
    fn poll(&mut self, _now_ms: u64, _state: &SystemState) -> Option<Command> {
        if !self.receiver.available() {
            return None;
        }
        let code = self.receiver.take_code();
        self.receiver.reset_available();
        info!("RF: code {} received", code);
        Some(self.classify(code))
    }
}
