//! Data models for MCP tool inputs.

mod inputs;

pub use inputs::DoiToBibtexInput;
