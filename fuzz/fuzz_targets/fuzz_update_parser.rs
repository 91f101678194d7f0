//! Fuzz target: `parse_updates`
//!
//! Feeds arbitrary bytes as a getUpdates response body. The parser must
//! return a typed error or a message list without panicking. Every
//! message it yields must sit at or below the reported high-water mark.
//!
//! cargo fuzz run fuzz_update_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use sentinel::adapters::telegram::parse_updates;

const OWNER: i64 = 42;

fuzz_target!(|data: &[u8]| {
    if let Ok(parsed) = parse_updates(data, OWNER) {
        for msg in &parsed.messages {
            let high = parsed
                .last_update_id
                .expect("messages imply a high-water mark");
            assert!(msg.id <= high, "message id above last_update_id");
        }
    }
});
