#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    match ychaos::validate_data(&value) {
        Ok(plan) => {
            assert!(!plan.attack.agents.is_empty());
        }
        Err(failure) => {
            assert!(!failure.is_empty());
        }
    }
});
