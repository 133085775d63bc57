#![no_main]

use std::path::Path;

use asset_manifest::{MetafileReader, NamingTemplate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let reader = MetafileReader::new(".");
        let template = NamingTemplate::unhashed();
        let _ = reader.parse(content, Path::new("meta.json"), template.clone(), template);
    }
});
