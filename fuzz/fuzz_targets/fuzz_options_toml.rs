#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Options parsing and validation should never panic
        if let Ok(options) = toml::from_str::<asset_manifest::ManifestOptions>(content) {
            let _ = options.validate();
        }
    }
});
