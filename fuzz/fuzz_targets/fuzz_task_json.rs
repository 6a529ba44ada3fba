#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(task) = plover_task::format::parse_task_json(s) {
            // Accepted tasks must survive a round trip through the writer.
            let json = plover_task::format::to_task_json(&task).unwrap();
            assert_eq!(plover_task::format::parse_task_json(&json).unwrap(), task);
        }
    }
});
