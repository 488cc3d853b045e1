//! Input models for MCP tool parameters.

use serde::{Deserialize, Serialize};

/// Input for DOI to BibTeX conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoiToBibtexInput {
    /// DOI in any accepted form: `10.1234/example`, `doi:10.1234/example`
    /// or `https://doi.org/10.1234/example`.
    pub doi: String,
}
