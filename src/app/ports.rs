//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ InputAdapter / Dispatcher ──▶ AlarmController
//! ```
//!
//! Driven adapters (chat bot, RF receiver, siren relay, event log, clock,
//! Wi-Fi) implement these traits. Input adapters own the inbound ports;
//! the dispatcher borrows the outbound ones each cycle. Nothing in the
//! domain core touches hardware directly.
//!
//! Every call here must return promptly: the controller runs a
//! cooperative loop and a port that waits on I/O stalls every channel.
//! The one exception is [`Connectivity::connect`], which is bounded by an
//! explicit timeout.

use super::log_line::CalendarTime;

// ───────────────────────────────────────────────────────────────
// Notifier (domain → owner's chat)
// ───────────────────────────────────────────────────────────────

pub trait Notifier {
    /// Send a plain-text message.
    fn send(&mut self, text: &str) -> Result<(), NotifyError>;

    /// Send a file attachment (used for the event-log dump).
    fn send_document(&mut self, file_name: &str, contents: &[u8]) -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Event log (domain → persistent storage)
// ───────────────────────────────────────────────────────────────

/// Append-only, line-oriented persistent log.
///
/// Lines arrive fully formatted (see [`super::log_line::format_log_line`]);
/// the implementation only stores them.
pub trait EventLog {
    /// Append one line. A trailing newline is added by the implementation.
    fn append(&mut self, line: &str) -> Result<(), LogError>;

    /// Read back the whole log.
    fn dump(&self) -> Result<Vec<u8>, LogError>;
}

// ───────────────────────────────────────────────────────────────
// Chat channel (owner's chat → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic message identifier assigned by the chat service.
pub type ChatCursor = i64;

/// One inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: ChatCursor,
    pub text: String,
}

pub trait ChatChannel {
    /// Fetch queued messages newer than `cursor` (all queued messages when
    /// `None`), oldest first. Must not block waiting for new messages.
    fn fetch_since(&mut self, cursor: Option<ChatCursor>) -> Result<Vec<ChatMessage>, ChatError>;
}

// ───────────────────────────────────────────────────────────────
// Radio channel (RF remote → domain)
// ───────────────────────────────────────────────────────────────

/// Single-slot mailbox filled by the external RF decoder.
pub trait RadioChannel {
    /// A decoded code is waiting.
    fn available(&self) -> bool;

    /// The waiting code. Only meaningful while [`available`](Self::available).
    fn take_code(&mut self) -> u64;

    /// Clear the "available" flag so the decoder can deliver the next code.
    fn reset_available(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock
// ───────────────────────────────────────────────────────────────

pub trait Clock {
    /// Milliseconds since boot. Monotonic; used for debounce and poll gates.
    fn now_ms(&self) -> u64;

    /// Local calendar time, or `None` until the wall clock has been
    /// synchronised. Only used to stamp log lines.
    fn wall_clock(&self) -> Option<CalendarTime>;
}

// ───────────────────────────────────────────────────────────────
// Siren and motion sensor (domain ↔ GPIO)
// ───────────────────────────────────────────────────────────────

pub trait SirenPort {
    fn set_siren(&mut self, on: bool);
}

pub trait MotionSensor {
    /// Current PIR level. `true` while motion is being reported.
    fn motion_detected(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Connectivity (domain ↔ Wi-Fi station)
// ───────────────────────────────────────────────────────────────

pub trait Connectivity {
    fn is_connected(&self) -> bool;

    /// Attempt to associate, giving up after `timeout_ms`.
    /// This is the only blocking call the control loop makes.
    fn connect(&mut self, timeout_ms: u32) -> Result<(), ConnectError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`Notifier`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The network link is down.
    NotConnected,
    /// The remote service rejected the request (HTTP status).
    Rejected(u16),
    /// Transport-level failure.
    Transport,
}

/// Errors from [`EventLog`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogError {
    /// The log file does not exist yet.
    NotFound,
    /// Storage is full.
    Full,
    /// Generic I/O error from the filesystem.
    Io,
}

/// Errors from [`ChatChannel`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatError {
    NotConnected,
    Transport,
    /// The response body could not be parsed.
    Malformed,
    /// The response exceeded the read buffer and was cut off.
    Oversized,
}

/// Errors from [`Connectivity`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    /// Association did not complete within the timeout.
    Timeout,
    /// The driver refused to start the association.
    Driver,
}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Rejected(status) => write!(f, "rejected (HTTP {})", status),
            Self::Transport => write!(f, "transport error"),
        }
    }
}

impl core::fmt::Display for LogError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "log file not found"),
            Self::Full => write!(f, "storage full"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for ChatError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Transport => write!(f, "transport error"),
            Self::Malformed => write!(f, "malformed response"),
            Self::Oversized => write!(f, "response too large"),
        }
    }
}

impl core::fmt::Display for ConnectError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::Timeout => write!(f, "association timed out"),
            Self::Driver => write!(f, "WiFi driver error"),
        }
    }
}
