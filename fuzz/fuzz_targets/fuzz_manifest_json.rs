#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Existing manifests are read back before appending
        if let Ok(manifest) = serde_json::from_str::<asset_manifest::Manifest>(content) {
            let _ = manifest.to_document();
        }
    }
});
