#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(config) = toml::from_str::<dit::Config>(content) {
            let _ = config.validate();
            for host in &config.hosts {
                let _ = host.display_target();
            }
        }
    }
});
