#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let doc = match ychaos::parse_document(&s) {
        Ok(d) => d,
        Err(_) => return,
    };

    // Validation must never panic and must explain every rejection.
    if let Err(failure) = ychaos::validate_data(&doc) {
        assert!(!failure.is_empty(), "rejected plan carried no errors: {:?}", s.get(..200));
    }
});
