#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // First line is the template, the rest a filename to match against it
        let (template, filename) = content.split_once('\n').unwrap_or((content, ""));
        if let Ok(template) = asset_manifest::NamingTemplate::parse(template) {
            let _ = template.locate(filename);
            let _ = template.strip(filename);
        }
    }
});
