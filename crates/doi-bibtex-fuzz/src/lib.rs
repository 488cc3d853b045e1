//! Fuzzing library for doi-bibtex-mcp.
//!
//! This crate provides fuzzing targets for DOI normalization and for JSON
//! deserialization of tool inputs and JSON-RPC messages.
//!
//! # Usage
//!
//! ```bash
//! cd crates/doi-bibtex-fuzz
//! cargo +nightly fuzz run fuzz_normalize -- -max_total_time=60
//! ```

pub use doi_bibtex_mcp::{doi, models};
