//! Integration tests for the AlarmController's public behaviour.
//!
//! These exercise the controller through the crate's public API only,
//! command by command, and check the exact effect lists.

use sentinel::app::commands::{Command, Source};
use sentinel::app::controller::AlarmController;
use sentinel::app::effects::Effect;
use sentinel::fsm::{StateId, SystemState};

fn arm(source: Source) -> Command {
    Command::Arm { source }
}

fn disarm(source: Source) -> Command {
    Command::Disarm { source }
}

#[test]
fn every_source_has_equal_authority() {
    for arm_src in [Source::ChatChannel, Source::RadioChannel, Source::PhysicalButton] {
        for disarm_src in [Source::ChatChannel, Source::RadioChannel, Source::PhysicalButton] {
            let mut c = AlarmController::new();
            c.handle(arm(arm_src));
            c.on_motion();
            c.handle(disarm(disarm_src));
            assert_eq!(c.state(), SystemState::default(), "{arm_src} then {disarm_src}");
        }
    }
}

#[test]
fn source_names_appear_in_notifications() {
    let mut c = AlarmController::new();
    assert_eq!(
        c.handle(arm(Source::PhysicalButton)),
        vec![
            Effect::notify("System armed by physical button."),
            Effect::log_line("System armed by physical button."),
        ]
    );
    assert_eq!(
        c.handle(disarm(Source::RadioChannel)),
        vec![
            Effect::DeactivateSiren,
            Effect::notify("System disarmed by RF remote."),
            Effect::log_line("System disarmed by RF remote."),
        ]
    );
}

#[test]
fn arm_while_armed_has_no_siren_effect_and_no_duplicate_notice() {
    let mut c = AlarmController::new();
    c.handle(arm(Source::ChatChannel));
    let effects = c.handle(arm(Source::ChatChannel));
    assert!(!effects.contains(&Effect::ActivateSiren));
    assert!(!effects.contains(&Effect::DeactivateSiren));
    assert!(!effects.iter().any(|e| matches!(e, Effect::Notify(t) if t.starts_with("System armed"))));
    assert_eq!(effects.len(), 1);
}

#[test]
fn triggered_episode_fires_siren_once() {
    let mut c = AlarmController::new();
    c.handle(arm(Source::RadioChannel));
    let activations: usize = (0..25)
        .map(|_| {
            c.on_motion()
                .iter()
                .filter(|e| **e == Effect::ActivateSiren)
                .count()
        })
        .sum();
    assert_eq!(activations, 1);
    assert_eq!(c.state_id(), StateId::Triggered);
}

#[test]
fn queries_never_change_state() {
    let mut c = AlarmController::new();
    c.handle(arm(Source::ChatChannel));
    c.on_motion();
    let before = c.state();

    c.handle(Command::StatusQuery { source: Source::ChatChannel });
    c.handle(Command::LogRequest { source: Source::ChatChannel });
    c.handle(Command::Unrecognized {
        source: Source::ChatChannel,
        raw: "/sirene".into(),
    });
    c.handle(Command::Unrecognized {
        source: Source::RadioChannel,
        raw: "5".into(),
    });

    assert_eq!(c.state(), before);
}

#[test]
fn status_report_while_disarmed() {
    let mut c = AlarmController::new();
    assert_eq!(
        c.handle(Command::StatusQuery { source: Source::ChatChannel }),
        vec![Effect::notify("Sentinel status\nSystem: DISARMED\nSiren triggered: NO")]
    );
}
