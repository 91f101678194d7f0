//! Input adapters, one per command channel.
//!
//! | Adapter         | Reads from           | Rate            |
//! |-----------------|----------------------|-----------------|
//! | `ChatAdapter`   | [`ChatChannel`] port | PollGate (3 s)  |
//! | `RadioAdapter`  | [`RadioChannel`] port| every cycle     |
//! | `ButtonAdapter` | GPIO `InputPin`      | every cycle, debounced |
//!
//! [`ChatChannel`]: crate::app::ports::ChatChannel
//! [`RadioChannel`]: crate::app::ports::RadioChannel

pub mod button;
pub mod chat;
pub mod radio;

pub use button::ButtonAdapter;
pub use chat::ChatAdapter;
pub use radio::RadioAdapter;

use crate::app::commands::Command;
use crate::fsm::SystemState;

/// A channel that may have a command ready.
///
/// `poll` is called once per dispatcher cycle and must return promptly.
/// `state` is a read-only snapshot taken just before the call; only the
/// button needs it (to decide between arm and disarm).
pub trait InputAdapter {
    fn poll(&mut self, now_ms: u64, state: &SystemState) -> Option<Command>;
}
