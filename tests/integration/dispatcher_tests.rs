//! Integration tests for the Dispatcher → AlarmController → ports pipeline.
//!
//! Each test drives full loop cycles against the mock ports in
//! `mock_hw.rs` with synthetic time, the way the firmware loop would.

use crate::mock_hw::{ARM_CODE, DISARM_CODE, Rig};

use sentinel::app::log_line::CalendarTime;
use sentinel::dispatcher::{
    LINK_FAILED_LOG, LINK_LOST_LOG, LINK_RESTORED_LOG, LINK_RESTORED_NOTIFY, LINK_UP_LOG,
    LOG_DUMP_FILE_NAME, LOG_EMPTY, LOG_OPEN_ERROR, STARTUP_LOG,
};
use sentinel::fsm::SystemState;

const DISARMED: SystemState = SystemState {
    armed: false,
    triggered: false,
};
const ARMED: SystemState = SystemState {
    armed: true,
    triggered: false,
};
const TRIGGERED: SystemState = SystemState {
    armed: true,
    triggered: true,
};

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_forces_siren_off_and_logs_boot() {
    let mut rig = Rig::default();
    let mut d = rig.dispatcher();
    d.start(&mut rig.ports());

    assert_eq!(rig.siren.writes, vec![false]);
    assert_eq!(rig.link.attempts, vec![15_000]);
    assert_eq!(
        rig.log.lines,
        vec![
            format!("[sincronizando relogio...] {}", LINK_UP_LOG),
            format!("[sincronizando relogio...] {}", STARTUP_LOG),
        ]
    );
    assert_eq!(d.state(), DISARMED);
}

#[test]
fn boot_without_network_still_starts() {
    let mut rig = Rig::default();
    rig.link.connect_succeeds = false;
    let mut d = rig.dispatcher();
    d.start(&mut rig.ports());

    assert!(rig.log_contains(LINK_FAILED_LOG));
    assert!(rig.log_contains(STARTUP_LOG));

    // RF still works with the link down.
    rig.radio.slot.set(Some(ARM_CODE));
    rig.run_for(&mut d, 10);
    assert_eq!(d.state(), ARMED);
}

#[test]
fn log_lines_carry_wall_clock_once_synced() {
    let mut rig = Rig::default();
    rig.clock.wall = Some(CalendarTime {
        year: 2025,
        month: 6,
        day: 12,
        hour: 21,
        minute: 4,
        second: 9,
    });
    let mut d = rig.started();
    rig.radio.slot.set(Some(ARM_CODE));
    rig.run_for(&mut d, 10);
    assert_eq!(
        rig.log.lines,
        vec!["[2025-06-12 21:04:09] System armed by RF remote.".to_string()]
    );
}

// ── Full scenario ─────────────────────────────────────────────

#[test]
fn chat_arm_motion_button_disarm() {
    let mut rig = Rig::default();
    let mut d = rig.started();

    rig.chat.post(1, "/armar");
    rig.run_for(&mut d, 10);
    assert_eq!(d.state(), ARMED);
    assert_eq!(rig.notifier.sent, vec!["System armed by chat.".to_string()]);

    rig.motion.level = true;
    rig.run_for(&mut d, 10);
    assert_eq!(d.state(), TRIGGERED);
    assert!(rig.siren.is_on());
    assert!(rig.notifier.sent.iter().any(|t| t.contains("Motion detected")));

    // PIR keeps reporting; nothing more happens.
    rig.run_for(&mut d, 500);
    assert_eq!(rig.siren.activations(), 1);

    rig.press_button(&mut d);
    assert_eq!(d.state(), DISARMED);
    assert!(!rig.siren.is_on());
    assert_eq!(
        rig.notifier.sent.last().map(String::as_str),
        Some("System disarmed by physical button.")
    );
    assert!(rig.log_contains("System disarmed by physical button."));
}

#[test]
fn motion_is_not_read_while_disarmed_or_triggered() {
    let mut rig = Rig::default();
    let mut d = rig.started();
    rig.motion.level = true;
    rig.run_for(&mut d, 100);
    assert_eq!(rig.motion.reads, 0);
    assert_eq!(d.state(), DISARMED);

    rig.radio.slot.set(Some(ARM_CODE));
    rig.run_for(&mut d, 10);
    assert_eq!(d.state(), TRIGGERED);
    let reads = rig.motion.reads;
    rig.run_for(&mut d, 100);
    assert_eq!(rig.motion.reads, reads);
}

// ── Arbitration ───────────────────────────────────────────────

#[test]
fn same_cycle_commands_apply_in_poll_order() {
    let mut rig = Rig::default();
    let mut d = rig.started();

    // Chat arms, then RF disarms, within one cycle.
    rig.chat.post(1, "/armar");
    rig.radio.slot.set(Some(DISARM_CODE));
    rig.run_for(&mut d, 10);

    assert_eq!(d.state(), DISARMED);
    assert_eq!(
        rig.notifier.sent,
        vec![
            "System armed by chat.".to_string(),
            "System disarmed by RF remote.".to_string(),
        ]
    );
}

#[test]
fn button_toggle_sees_state_after_earlier_command() {
    let mut rig = Rig::default();
    let mut d = rig.started();

    // Press starts at t=10; the 50 ms window closes at t=60.
    rig.button.high.set(false);
    rig.run_for(&mut d, 50);
    // RF arms in the same cycle the debounced press lands.
    rig.radio.slot.set(Some(ARM_CODE));
    rig.run_for(&mut d, 10);

    // RF armed first, so the press disarms.
    assert_eq!(d.state(), DISARMED);
}

#[test]
fn unknown_rf_code_is_audited_only() {
    let mut rig = Rig::default();
    let mut d = rig.started();

    rig.radio.slot.set(Some(99));
    rig.run_for(&mut d, 10);

    assert_eq!(d.state(), DISARMED);
    assert!(rig.notifier.sent.is_empty());
    assert_eq!(
        rig.log.lines,
        vec!["[sincronizando relogio...] Unknown RF code received: 99".to_string()]
    );
    assert_eq!(rig.radio.acks.get(), 1);
}

#[test]
fn chat_backlog_drains_one_per_cycle_with_single_fetch() {
    let mut rig = Rig::default();
    let mut d = rig.started();

    rig.chat.post(1, "/armar");
    rig.chat.post(2, "/status");
    rig.chat.post(3, "/help");
    rig.run_for(&mut d, 30);

    assert_eq!(rig.chat.fetches.get(), 1);
    assert_eq!(
        rig.notifier.sent,
        vec![
            "System armed by chat.".to_string(),
            "Sentinel status\nSystem: ARMED\nSiren triggered: NO".to_string(),
            "Command not recognized. Use /armar, /desarmar, /status or /logs.".to_string(),
        ]
    );
}

#[test]
fn chat_polls_at_most_every_three_seconds() {
    let mut rig = Rig::default();
    let mut d = rig.started();
    rig.run_for(&mut d, 9_000);
    assert_eq!(rig.chat.fetches.get(), 3);
}

// ── Log dump ──────────────────────────────────────────────────

#[test]
fn logs_request_uploads_file() {
    let mut rig = Rig::default();
    let mut d = rig.dispatcher();
    d.start(&mut rig.ports());

    rig.chat.post(1, "/logs");
    rig.run_for(&mut d, 10);

    assert_eq!(rig.notifier.documents.len(), 1);
    let (name, contents) = &rig.notifier.documents[0];
    assert_eq!(name, LOG_DUMP_FILE_NAME);
    assert!(String::from_utf8_lossy(contents).contains(STARTUP_LOG));
}

#[test]
fn logs_request_reports_empty_and_missing_log() {
    let mut rig = Rig::default();
    let mut d = rig.started();

    rig.chat.post(1, "/logs");
    rig.run_for(&mut d, 10);
    assert_eq!(rig.notifier.sent, vec![LOG_EMPTY.to_string()]);

    rig.log.missing = true;
    rig.chat.post(2, "/logs");
    rig.run_for(&mut d, 3_000);
    assert_eq!(rig.notifier.sent.last().map(String::as_str), Some(LOG_OPEN_ERROR));
    assert!(rig.notifier.documents.is_empty());
}

// ── Failure tolerance ─────────────────────────────────────────

#[test]
fn port_failures_never_stop_the_loop() {
    let mut rig = Rig::default();
    let mut d = rig.started();
    rig.notifier.fail = true;
    rig.log.fail_append = true;

    rig.radio.slot.set(Some(ARM_CODE));
    rig.run_for(&mut d, 10);
    rig.motion.level = true;
    rig.run_for(&mut d, 10);

    assert_eq!(d.state(), TRIGGERED);
    assert!(rig.siren.is_on());
    assert!(rig.notifier.sent.is_empty());
    assert!(rig.log.lines.is_empty());
}

// ── Link supervision ──────────────────────────────────────────

#[test]
fn link_loss_is_logged_and_recovery_announced() {
    let mut rig = Rig::default();
    let mut d = rig.started();

    rig.link.up = false;
    rig.run_for(&mut d, 10_000);

    assert_eq!(rig.link.attempts.len(), 2);
    assert!(rig.log_contains(LINK_LOST_LOG));
    assert!(rig.log_contains(LINK_RESTORED_LOG));
    assert_eq!(rig.notifier.sent, vec![LINK_RESTORED_NOTIFY.to_string()]);
}

#[test]
fn inputs_after_a_blocking_reconnect_see_current_time() {
    let mut rig = Rig::default();
    let mut d = rig.started();
    rig.link.up = false;
    rig.link.connect_ms = 15_000;

    // The check at t=10000 reconnects and the clock jumps to t=25000;
    // chat is polled for the first time in that same cycle.
    rig.run_for(&mut d, 10_000);
    assert_eq!(rig.clock.now.get(), 25_000);
    assert_eq!(rig.chat.fetches.get(), 1);

    // The chat gate fired at t=25000, so 10 ms later it is not due.
    rig.run_for(&mut d, 10);
    assert_eq!(rig.chat.fetches.get(), 1);

    rig.run_for(&mut d, 3_000);
    assert_eq!(rig.chat.fetches.get(), 2);
}

#[test]
fn chat_is_not_polled_while_link_is_down() {
    let mut rig = Rig::default();
    rig.link.connect_succeeds = false;
    let mut d = rig.started();

    rig.chat.post(1, "/armar");
    rig.run_for(&mut d, 9_000);
    assert_eq!(rig.chat.fetches.get(), 0);
    assert_eq!(d.state(), DISARMED);

    rig.link.connect_succeeds = true;
    rig.run_for(&mut d, 1_010);
    assert_eq!(d.state(), ARMED);
}
