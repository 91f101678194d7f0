//! Inbound commands to the alarm controller.
//!
//! Each [`InputAdapter`](crate::inputs::InputAdapter) produces at most one
//! [`Command`] per poll. The [`Source`] tag is audit text only: every
//! channel carries the same authority over the alarm state.

use core::fmt;

/// Channel a command arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    ChatChannel,
    RadioChannel,
    PhysicalButton,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChatChannel => write!(f, "chat"),
            Self::RadioChannel => write!(f, "RF remote"),
            Self::PhysicalButton => write!(f, "physical button"),
        }
    }
}

/// Commands that input adapters can send into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arm { source: Source },
    Disarm { source: Source },
    StatusQuery { source: Source },
    LogRequest { source: Source },
    /// Input the adapter could not map. `raw` is the original text or code.
    Unrecognized { source: Source, raw: String },
}

impl Command {
    /// Originating channel.
    pub fn source(&self) -> Source {
        match self {
            Self::Arm { source }
            | Self::Disarm { source }
            | Self::StatusQuery { source }
            | Self::LogRequest { source }
            | Self::Unrecognized { source, .. } => *source,
        }
    }
}
