#![no_main]

use doi_bibtex_mcp::models::DoiToBibtexInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return Ok or Err
    let _ = serde_json::from_slice::<DoiToBibtexInput>(data);
});
