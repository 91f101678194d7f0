//! Cooperative main-loop dispatcher.
//!
//! One [`Dispatcher::cycle`] is one iteration of the firmware loop:
//!
//! ```text
//!   LinkMonitor ─▶ ChatAdapter ─▶ RadioAdapter ─▶ ButtonAdapter ─▶ PIR
//!        │              │               │               │           │
//!        ▼              ▼               ▼               ▼           ▼
//!    Vec<Effect>     Command         Command         Command      motion
//!                       └───────────────┴───────┬───────┴───────────┘
//!                                               ▼
//!                                       AlarmController
//!                                               │ Vec<Effect>
//!                                               ▼
//!                          siren · notifier · event log (execute)
//! ```
//!
//! Poll order is fixed, so two commands arriving in the same cycle are
//! applied in that order. Each adapter sees a fresh state snapshot taken
//! after the previous command was applied. Failures from the outbound
//! ports are logged and dropped here; nothing propagates out of a cycle.

use log::{debug, info, warn};

use crate::app::commands::Command;
use crate::app::controller::AlarmController;
use crate::app::effects::Effect;
use crate::app::log_line::format_log_line;
use crate::app::ports::{Clock, Connectivity, EventLog, MotionSensor, Notifier, SirenPort};
use crate::fsm::SystemState;
use crate::inputs::InputAdapter;
use crate::scheduler::PollGate;

pub const STARTUP_LOG: &str = "System started and configured.";
pub const LOG_DUMP_FILE_NAME: &str = "sentinel_log.txt";
pub const LOG_OPEN_ERROR: &str = "Error: could not open the event log.";
pub const LOG_EMPTY: &str = "The event log is empty.";

pub const LINK_UP_LOG: &str = "Wi-Fi connected.";
pub const LINK_LOST_LOG: &str = "Wi-Fi connection lost.";
pub const LINK_FAILED_LOG: &str = "Wi-Fi connection failed.";
pub const LINK_RESTORED_LOG: &str = "Wi-Fi connection restored.";
pub const LINK_RESTORED_NOTIFY: &str = "Wi-Fi connection restored!";

/// Outbound ports borrowed for one cycle.
pub struct Ports<'a> {
    pub motion: &'a mut dyn MotionSensor,
    pub siren: &'a mut dyn SirenPort,
    pub notifier: &'a mut dyn Notifier,
    pub event_log: &'a mut dyn EventLog,
    pub clock: &'a dyn Clock,
    pub link: &'a mut dyn Connectivity,
}

// ═══════════════════════════════════════════════════════════════
//  Link monitor
// ═══════════════════════════════════════════════════════════════

/// Periodic Wi-Fi supervision with bounded reconnect attempts.
pub struct LinkMonitor {
    gate: PollGate,
    connect_timeout_ms: u32,
    was_connected: bool,
}

impl LinkMonitor {
    pub fn new(check_interval_ms: u32, connect_timeout_ms: u32) -> Self {
        Self {
            gate: PollGate::new(check_interval_ms),
            connect_timeout_ms,
            was_connected: false,
        }
    }

    pub fn was_connected(&self) -> bool {
        self.was_connected
    }

    /// Boot-time association. Also arms the check interval so the first
    /// periodic check happens one interval after boot.
    pub fn connect_at_boot(&mut self, now_ms: u64, link: &mut dyn Connectivity) -> Vec<Effect> {
        self.gate.try_fire(now_ms);
        match link.connect(self.connect_timeout_ms) {
            Ok(()) => {
                self.was_connected = true;
                vec![Effect::log_line(LINK_UP_LOG)]
            }
            Err(e) => {
                warn!("Link: boot association failed: {}", e);
                vec![Effect::log_line(LINK_FAILED_LOG)]
            }
        }
    }

    /// Called every cycle; does nothing until the check interval elapses.
    pub fn check(&mut self, now_ms: u64, link: &mut dyn Connectivity) -> Vec<Effect> {
        if !self.gate.try_fire(now_ms) {
            return Vec::new();
        }

        if link.is_connected() {
            if self.was_connected {
                return Vec::new();
            }
            self.was_connected = true;
            info!("Link: restored");
            return Self::restored();
        }

        let mut effects = Vec::new();
        if self.was_connected {
            warn!("Link: lost");
            effects.push(Effect::log_line(LINK_LOST_LOG));
            self.was_connected = false;
        }

        match link.connect(self.connect_timeout_ms) {
            Ok(()) => {
                self.was_connected = true;
                info!("Link: reconnected");
                effects.extend(Self::restored());
            }
            Err(e) => {
                warn!("Link: reconnect failed: {}", e);
                effects.push(Effect::log_line(LINK_FAILED_LOG));
            }
        }
        effects
    }

    fn restored() -> Vec<Effect> {
        vec![
            Effect::log_line(LINK_RESTORED_LOG),
            Effect::notify(LINK_RESTORED_NOTIFY),
        ]
    }
}

// ═══════════════════════════════════════════════════════════════
//  Dispatcher
// ═══════════════════════════════════════════════════════════════

pub struct Dispatcher<C: InputAdapter, R: InputAdapter, B: InputAdapter> {
    controller: AlarmController,
    chat: C,
    radio: R,
    button: B,
    link: LinkMonitor,
    cycles: u64,
}

impl<C: InputAdapter, R: InputAdapter, B: InputAdapter> Dispatcher<C, R, B> {
    pub fn new(chat: C, radio: R, button: B, link: LinkMonitor) -> Self {
        Self {
            controller: AlarmController::new(),
            chat,
            radio,
            button,
            link,
            cycles: 0,
        }
    }

    /// Boot sequence: siren forced off, one bounded association attempt,
    /// then the startup line in the event log.
    pub fn start(&mut self, ports: &mut Ports<'_>) {
        ports.siren.set_siren(false);
        let now = ports.clock.now_ms();
        let mut effects = self.link.connect_at_boot(now, ports.link);
        effects.push(Effect::log_line(STARTUP_LOG));
        execute(&effects, ports);
        info!("Dispatcher: started in {:?}", self.controller.state_id());
    }

    /// One loop iteration.
    pub fn cycle(&mut self, ports: &mut Ports<'_>) {
        self.cycles += 1;
        let now = ports.clock.now_ms();

        let link_effects = self.link.check(now, ports.link);
        execute(&link_effects, ports);
        // A reconnect attempt blocks for up to the connect timeout.
        let now = ports.clock.now_ms();

        // The chat backend is unreachable without the link.
        if ports.link.is_connected() {
            let state = self.controller.state();
            if let Some(cmd) = self.chat.poll(now, &state) {
                self.apply(cmd, ports);
            }
        }

        let state = self.controller.state();
        if let Some(cmd) = self.radio.poll(now, &state) {
            self.apply(cmd, ports);
        }

        let state = self.controller.state();
        if let Some(cmd) = self.button.poll(now, &state) {
            self.apply(cmd, ports);
        }

        let state = self.controller.state();
        if state.armed && !state.triggered && ports.motion.motion_detected() {
            let effects = self.controller.on_motion();
            execute(&effects, ports);
        }
    }

    pub fn state(&self) -> SystemState {
        self.controller.state()
    }

    pub fn controller(&self) -> &AlarmController {
        &self.controller
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    pub fn radio_mut(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn button_mut(&mut self) -> &mut B {
        &mut self.button
    }

    fn apply(&mut self, cmd: Command, ports: &mut Ports<'_>) {
        debug!("Dispatcher: {:?} from {}", cmd, cmd.source());
        let effects = self.controller.handle(cmd);
        execute(&effects, ports);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Effect execution
// ═══════════════════════════════════════════════════════════════

/// Carry out `effects` in order. Never fails; port errors are logged.
pub fn execute(effects: &[Effect], ports: &mut Ports<'_>) {
    for effect in effects {
        match effect {
            Effect::ActivateSiren => ports.siren.set_siren(true),
            Effect::DeactivateSiren => ports.siren.set_siren(false),
            Effect::Notify(text) => notify(ports, text),
            Effect::LogLine(message) => {
                let line = format_log_line(ports.clock.wall_clock(), message);
                info!("{}", line);
                // An append failure is only reported on the diagnostic
                // channel, never appended again.
                if let Err(e) = ports.event_log.append(&line) {
                    warn!("Event log append failed: {}", e);
                }
            }
            Effect::SendLogDump => send_log_dump(ports),
        }
    }
}

fn notify(ports: &mut Ports<'_>, text: &str) {
    if let Err(e) = ports.notifier.send(text) {
        warn!("Notify failed: {}", e);
    }
}

fn send_log_dump(ports: &mut Ports<'_>) {
    let contents = match ports.event_log.dump() {
        Ok(c) => c,
        Err(e) => {
            warn!("Event log dump failed: {}", e);
            notify(ports, LOG_OPEN_ERROR);
            return;
        }
    };
    if contents.is_empty() {
        notify(ports, LOG_EMPTY);
        return;
    }
    if let Err(e) = ports.notifier.send_document(LOG_DUMP_FILE_NAME, &contents) {
        warn!("Log dump upload failed: {}", e);
    }
}
