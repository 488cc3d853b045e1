#![no_main]

use doi_bibtex_mcp::doi::normalize;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Anything accepted once must be a fixed point.
    if let Ok(canonical) = normalize(input) {
        assert_eq!(normalize(&canonical).as_deref(), Ok(canonical.as_str()));
    }
});
