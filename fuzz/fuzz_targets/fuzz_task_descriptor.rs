#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Parsing must never panic, and a parsed task describes itself verbatim.
        if let Ok(task) = dit::Task::parse(raw) {
            assert_eq!(task.describe(), raw);
        }
    }
});
