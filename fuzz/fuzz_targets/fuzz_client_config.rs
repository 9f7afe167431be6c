#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = mercury_client::ClientConfig::from_json(s) {
            // A config that parsed and validated must always yield settings.
            let _ = config.media_settings();
            let _ = config.app_settings();
        }
    }
});
