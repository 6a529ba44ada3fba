#![no_main]
use libfuzzer_sys::fuzz_target;

use plover_engine::{CegarOptions, CegarPatternGenerator};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(task) = plover_task::format::parse_task_json(s) {
            let generator = CegarPatternGenerator::from_options(CegarOptions {
                max_pdb_size: 4096,
                max_time: Some(1.0),
                random_seed: Some(0),
                ..CegarOptions::default()
            });
            if let Ok(info) = generator.generate(&task) {
                assert!(info.pattern.fits(&task, 4096));
            }
        }
    }
});
