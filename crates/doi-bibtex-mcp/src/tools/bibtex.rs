//! Citation tools: doi_to_bibtex.

use serde_json::json;

use super::{McpTool, ToolContext, ToolOutput};
use crate::client::DoiClient;
use crate::doi::Doi;
use crate::error::{ConvertResult, ToolError, ToolResult};
use crate::models::DoiToBibtexInput;

/// Normalize a DOI and fetch its BibTeX record.
///
/// Invalid input fails before any network call is made.
pub async fn convert(client: &DoiClient, input: &str) -> ConvertResult<String> {
    let doi = Doi::parse(input)?;
    client.fetch_bibtex(&doi).await
}

/// DOI to BibTeX conversion tool.
pub struct DoiToBibtexTool;

#[async_trait::async_trait]
impl McpTool for DoiToBibtexTool {
    fn name(&self) -> &'static str {
        "doi_to_bibtex"
    }

    fn description(&self) -> &'static str {
        "Convert a DOI to BibTeX format. Accepts DOIs in various formats like '10.1234/example', \
         'doi:10.1234/example', or full URLs like 'https://doi.org/10.1234/example'."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "doi": {
                    "type": "string",
                    "description": "The DOI to convert. Can be just the DOI (e.g., '10.1234/example'), \
                                    with 'doi:' prefix, or a full URL."
                }
            },
            "required": ["doi"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> ToolResult<ToolOutput> {
        let params: DoiToBibtexInput = serde_json::from_value(input)
            .map_err(|e| ToolError::validation("doi", e.to_string()))?;

        match convert(&ctx.client, &params.doi).await {
            Ok(bibtex) => {
                tracing::info!(doi = %params.doi.trim(), bytes = bibtex.len(), "Converted DOI");
                Ok(ToolOutput::success(bibtex))
            }
            Err(e) => {
                tracing::warn!(doi = %params.doi.trim(), category = e.category(), error = %e, "Conversion failed");
                Ok(ToolOutput::failure(e.to_user_message()))
            }
        }
    }
}
