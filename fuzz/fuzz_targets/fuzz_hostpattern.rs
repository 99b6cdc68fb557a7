#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let Ok(pattern) = ychaos::HostPattern::parse(&s) else {
        return;
    };

    // An accepted pattern must only produce valid hostnames.
    for host in pattern.iter().take(1000) {
        if let Err(e) = host {
            panic!("accepted pattern {:?} produced an invalid name: {}", s, e);
        }
    }
});
