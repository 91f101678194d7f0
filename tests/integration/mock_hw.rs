//! Mock ports for integration tests.
//!
//! Records every outbound call so tests can assert on the full history
//! without touching GPIO, the filesystem or the network. Inbound mocks
//! share their state through `Rc` handles so a test can inject chat
//! messages, RF codes and button levels while the dispatcher owns the
//! adapters.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use sentinel::app::log_line::CalendarTime;
use sentinel::app::ports::{
    ChatChannel, ChatCursor, ChatError, ChatMessage, Clock, ConnectError, Connectivity, EventLog,
    LogError, MotionSensor, Notifier, NotifyError, RadioChannel, SirenPort,
};
use sentinel::dispatcher::{Dispatcher, LinkMonitor, Ports};
use sentinel::inputs::{ButtonAdapter, ChatAdapter, RadioAdapter};

pub const ARM_CODE: u64 = 1_234_567;
pub const DISARM_CODE: u64 = 7_654_321;

// ── Outbound mocks ────────────────────────────────────────────

#[derive(Default)]
pub struct MockSiren {
    pub writes: Vec<bool>,
}

#[allow(dead_code)]
impl MockSiren {
    pub fn is_on(&self) -> bool {
        self.writes.last().copied().unwrap_or(false)
    }

    pub fn activations(&self) -> usize {
        self.writes.iter().filter(|on| **on).count()
    }
}

impl SirenPort for MockSiren {
    fn set_siren(&mut self, on: bool) {
        self.writes.push(on);
    }
}

#[derive(Default)]
pub struct MockMotion {
    pub level: bool,
    pub reads: u32,
}

impl MotionSensor for MockMotion {
    fn motion_detected(&mut self) -> bool {
        self.reads += 1;
        self.level
    }
}

#[derive(Default)]
pub struct MockNotifier {
    pub sent: Vec<String>,
    pub documents: Vec<(String, Vec<u8>)>,
    pub fail: bool,
}

impl Notifier for MockNotifier {
    fn send(&mut self, text: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport);
        }
        self.sent.push(text.to_string());
        Ok(())
    }

    fn send_document(&mut self, file_name: &str, contents: &[u8]) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport);
        }
        self.documents.push((file_name.to_string(), contents.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLog {
    pub lines: Vec<String>,
    pub fail_append: bool,
    pub missing: bool,
}

impl EventLog for MockLog {
    fn append(&mut self, line: &str) -> Result<(), LogError> {
        if self.fail_append {
            return Err(LogError::Full);
        }
        self.lines.push(line.to_string());
        Ok(())
    }

    fn dump(&self) -> Result<Vec<u8>, LogError> {
        if self.missing {
            return Err(LogError::NotFound);
        }
        Ok(self.lines.iter().flat_map(|l| format!("{l}\n").into_bytes()).collect())
    }
}

/// `now` is shared with [`MockLink`] so a blocking connect can advance it.
#[derive(Default)]
pub struct MockClock {
    pub now: Rc<Cell<u64>>,
    pub wall: Option<CalendarTime>,
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn wall_clock(&self) -> Option<CalendarTime> {
        self.wall
    }
}

pub struct MockLink {
    pub up: bool,
    pub connect_succeeds: bool,
    pub attempts: Vec<u32>,
    /// Time each `connect` call takes on the shared clock.
    pub connect_ms: u64,
    pub clock: Rc<Cell<u64>>,
}

impl Default for MockLink {
    fn default() -> Self {
        Self {
            up: false,
            connect_succeeds: true,
            attempts: Vec::new(),
            connect_ms: 0,
            clock: Rc::default(),
        }
    }
}

impl Connectivity for MockLink {
    fn is_connected(&self) -> bool {
        self.up
    }

    fn connect(&mut self, timeout_ms: u32) -> Result<(), ConnectError> {
        self.attempts.push(timeout_ms);
        self.clock.set(self.clock.get() + self.connect_ms);
        if self.connect_succeeds {
            self.up = true;
            Ok(())
        } else {
            Err(ConnectError::Timeout)
        }
    }
}

// ── Inbound mocks ─────────────────────────────────────────────

/// Chat service holding a queue of messages the test can append to.
#[derive(Clone, Default)]
pub struct MockChat {
    pub inbox: Rc<RefCell<Vec<ChatMessage>>>,
    pub fetches: Rc<Cell<u32>>,
}

impl MockChat {
    pub fn post(&self, id: i64, text: &str) {
        self.inbox.borrow_mut().push(ChatMessage {
            id,
            text: text.to_string(),
        });
    }
}

impl ChatChannel for MockChat {
    fn fetch_since(&mut self, cursor: Option<ChatCursor>) -> Result<Vec<ChatMessage>, ChatError> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self
            .inbox
            .borrow()
            .iter()
            .filter(|m| cursor.is_none_or(|c| m.id > c))
            .cloned()
            .collect())
    }
}

/// Single-slot RF mailbox.
#[derive(Clone, Default)]
pub struct MockRadio {
    pub slot: Rc<Cell<Option<u64>>>,
    pub acks: Rc<Cell<u32>>,
}

impl RadioChannel for MockRadio {
    fn available(&self) -> bool {
        self.slot.get().is_some()
    }

    fn take_code(&mut self) -> u64 {
        self.slot.get().unwrap_or(0)
    }

    fn reset_available(&mut self) {
        self.acks.set(self.acks.get() + 1);
        self.slot.set(None);
    }
}

/// Button pin with pull-up: `high == true` is released.
#[derive(Clone)]
pub struct MockButtonPin {
    pub high: Rc<Cell<bool>>,
}

impl Default for MockButtonPin {
    fn default() -> Self {
        Self {
            high: Rc::new(Cell::new(true)),
        }
    }
}

impl ErrorType for MockButtonPin {
    type Error = Infallible;
}

impl InputPin for MockButtonPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

// ── Test rig ──────────────────────────────────────────────────

pub type TestDispatcher =
    Dispatcher<ChatAdapter<MockChat>, RadioAdapter<MockRadio>, ButtonAdapter<MockButtonPin>>;

/// Every mock port plus handles to the inbound ones.
pub struct Rig {
    pub siren: MockSiren,
    pub motion: MockMotion,
    pub notifier: MockNotifier,
    pub log: MockLog,
    pub clock: MockClock,
    pub link: MockLink,
    pub chat: MockChat,
    pub radio: MockRadio,
    pub button: MockButtonPin,
}

impl Default for Rig {
    fn default() -> Self {
        let clock = MockClock::default();
        let link = MockLink {
            clock: Rc::clone(&clock.now),
            ..MockLink::default()
        };
        Self {
            siren: MockSiren::default(),
            motion: MockMotion::default(),
            notifier: MockNotifier::default(),
            log: MockLog::default(),
            clock,
            link,
            chat: MockChat::default(),
            radio: MockRadio::default(),
            button: MockButtonPin::default(),
        }
    }
}

#[allow(dead_code)]
impl Rig {
    pub fn ports(&mut self) -> Ports<'_> {
        Ports {
            motion: &mut self.motion,
            siren: &mut self.siren,
            notifier: &mut self.notifier,
            event_log: &mut self.log,
            clock: &self.clock,
            link: &mut self.link,
        }
    }

    /// Dispatcher wired with the default intervals (3 s chat, 10 s link,
    /// 15 s connect, 50 ms debounce).
    pub fn dispatcher(&self) -> TestDispatcher {
        Dispatcher::new(
            ChatAdapter::new(self.chat.clone(), 3_000),
            RadioAdapter::new(self.radio.clone(), ARM_CODE, DISARM_CODE),
            ButtonAdapter::new(self.button.clone(), 50),
            LinkMonitor::new(10_000, 15_000),
        )
    }

    /// Booted dispatcher with the link up and the boot log cleared.
    pub fn started(&mut self) -> TestDispatcher {
        let mut d = self.dispatcher();
        d.start(&mut self.ports());
        self.log.lines.clear();
        self.notifier.sent.clear();
        d
    }

    pub fn advance(&self, ms: u64) {
        self.clock.now.set(self.clock.now.get() + ms);
    }

    /// Run cycles 10 ms apart for `ms` milliseconds.
    pub fn run_for(&mut self, d: &mut TestDispatcher, ms: u64) {
        for _ in 0..ms / 10 {
            self.advance(10);
            d.cycle(&mut self.ports());
        }
    }

    /// Press, hold 100 ms, release, settle 100 ms.
    pub fn press_button(&mut self, d: &mut TestDispatcher) {
        self.button.high.set(false);
        self.run_for(d, 100);
        self.button.high.set(true);
        self.run_for(d, 100);
    }

    pub fn log_contains(&self, needle: &str) -> bool {
        self.log.lines.iter().any(|l| l.contains(needle))
    }
}
