#![no_main]

use doi_bibtex_mcp::server::protocol::JsonRpcRequest;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(request) = serde_json::from_slice::<JsonRpcRequest>(data) {
        let _ = request.is_notification();
    }
});
