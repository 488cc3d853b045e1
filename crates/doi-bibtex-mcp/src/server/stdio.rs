//! Stdio transport for MCP protocol.
//!
//! Newline-delimited JSON-RPC 2.0 over stdin/stdout. Logging must go to stderr.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::protocol::{Dispatcher, JsonRpcRequest, JsonRpcResponse};

/// Handle MCP protocol over the process's stdin/stdout.
pub async fn run_stdio(dispatcher: &Dispatcher) -> anyhow::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();

    tracing::info!("MCP stdio server ready, waiting for requests...");

    serve(dispatcher, reader, writer).await?;

    tracing::info!("Stdin closed, shutting down");
    Ok(())
}

/// Serve JSON-RPC lines from `reader` until EOF, writing responses to `writer`.
pub async fn serve<R, W>(dispatcher: &Dispatcher, mut reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        let trimmed = line.trim_ascii();
        if trimmed.is_empty() {
            continue;
        }

        // Invalid UTF-8 surfaces here as a parse error.
        let response = match serde_json::from_slice::<JsonRpcRequest>(trimmed) {
            Ok(request) => dispatcher.handle(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Unparseable message on stdin");
                Some(JsonRpcResponse::parse_error(&e))
            }
        };

        if let Some(response) = response {
            let response_json = serde_json::to_string(&response)?;
            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
