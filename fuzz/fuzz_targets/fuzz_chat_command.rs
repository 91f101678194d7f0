//! Fuzz target: chat command parsing followed by the controller.
//!
//! Each line of the input is parsed as a chat message and fed to a fresh
//! controller; every third line also reports motion. The alarm must never
//! end up triggered while disarmed.
//!
//! cargo fuzz run fuzz_chat_command

#![no_main]

use libfuzzer_sys::fuzz_target;
use sentinel::app::controller::AlarmController;
use sentinel::inputs::chat::parse_command;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut controller = AlarmController::new();

    for (i, line) in text.lines().enumerate() {
        let _ = controller.handle(parse_command(line));
        if i % 3 == 2 {
            let _ = controller.on_motion();
        }
        let s = controller.state();
        assert!(!s.triggered || s.armed, "triggered while disarmed");
    }
});
