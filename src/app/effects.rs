//! Outbound effects.
//!
//! The [`AlarmController`](super::controller::AlarmController) never
//! performs I/O. It returns a list of [`Effect`]s and the
//! [`Dispatcher`](crate::dispatcher::Dispatcher) carries them out through
//! the siren, notifier and event-log ports, in list order.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Energise the siren relay.
    ActivateSiren,
    /// Release the siren relay.
    DeactivateSiren,
    /// Send a text message to the owner over the chat channel.
    Notify(String),
    /// Append a message to the persistent event log (timestamp added on write).
    LogLine(String),
    /// Send the whole event log to the owner.
    SendLogDump,
}

impl Effect {
    pub fn notify(text: impl Into<String>) -> Self {
        Self::Notify(text.into())
    }

    pub fn log_line(text: impl Into<String>) -> Self {
        Self::LogLine(text.into())
    }
}
