//! Unified error type for the Sentinel firmware.
//!
//! Every port error converts into [`Error`], so the startup path in
//! `main.rs` can funnel failures through a single type. Inside the control
//! loop errors never cross component boundaries; the dispatcher logs them
//! and moves on.

use core::fmt;

use crate::app::ports::{ChatError, ConnectError, LogError, NotifyError};

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Outbound notification failed.
    Notify(NotifyError),
    /// Event log append or read failed.
    Log(LogError),
    /// Inbound chat fetch failed.
    Chat(ChatError),
    /// Network association failed.
    Link(ConnectError),
    /// Peripheral or filesystem initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notify(e) => write!(f, "notify: {e}"),
            Self::Log(e) => write!(f, "event log: {e}"),
            Self::Chat(e) => write!(f, "chat: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<NotifyError> for Error {
    fn from(e: NotifyError) -> Self {
        Self::Notify(e)
    }
}

impl From<LogError> for Error {
    fn from(e: LogError) -> Self {
        Self::Log(e)
    }
}

impl From<ChatError> for Error {
    fn from(e: ChatError) -> Self {
        Self::Chat(e)
    }
}

impl From<ConnectError> for Error {
    fn from(e: ConnectError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
