//! MCP protocol tests over the stdio framing.

use std::sync::Arc;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use doi_bibtex_mcp::client::DoiClient;
use doi_bibtex_mcp::config::Config;
use doi_bibtex_mcp::server::Dispatcher;
use doi_bibtex_mcp::server::stdio::serve;
use doi_bibtex_mcp::tools::ToolContext;

fn dispatcher(mock_server: &MockServer) -> Dispatcher {
    let config = Config::for_testing(&mock_server.uri());
    let client = DoiClient::new(&config).unwrap();
    Dispatcher::new(ToolContext::new(Arc::new(client)))
}

/// Feed newline-delimited messages through the stdio loop and collect responses.
async fn run_session(dispatcher: &Dispatcher, messages: &[String]) -> Vec<Value> {
    let input = messages.iter().map(|m| format!("{m}\n")).collect::<String>();
    let mut output = Vec::new();

    serve(dispatcher, input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_initialize_handshake() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let responses = run_session(
        &dispatcher,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize",
                   "params": {"protocolVersion": "2025-03-26", "capabilities": {}}})
            .to_string(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        ],
    )
    .await;

    assert_eq!(responses.len(), 1);
    let result = &responses[0]["result"];
    assert_eq!(result["protocolVersion"], "2025-03-26");
    assert_eq!(result["serverInfo"]["name"], "doi-to-bibtex");
    assert!(result["capabilities"]["tools"].is_object());
}

#[tokio::test]
async fn test_initialize_default_protocol_version() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let responses = run_session(
        &dispatcher,
        &[json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}).to_string()],
    )
    .await;

    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn test_tools_list() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let responses = run_session(
        &dispatcher,
        &[json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"}).to_string()],
    )
    .await;

    assert_eq!(responses[0]["id"], "a");
    let tools = responses[0]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "doi_to_bibtex");
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["doi"]));
}

#[tokio::test]
async fn test_tools_call_success_and_failure_in_order() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/10.1038/nature12373"))
        .respond_with(ResponseTemplate::new(200).set_body_string("@article{Kucsko_2013,\n}\n"))
        .expect(1)
        .mount(&mock_server)
        .await;
    let dispatcher = dispatcher(&mock_server);

    let call = |id: u64, doi: &str| {
        json!({"jsonrpc": "2.0", "id": id, "method": "tools/call",
               "params": {"name": "doi_to_bibtex", "arguments": {"doi": doi}}})
        .to_string()
    };

    let responses = run_session(
        &dispatcher,
        &[call(1, "https://doi.org/10.1038/nature12373"), call(2, "not-a-doi")],
    )
    .await;

    assert_eq!(responses.len(), 2);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["isError"], false);
    assert_eq!(responses[0]["result"]["content"][0]["type"], "text");
    assert_eq!(responses[0]["result"]["content"][0]["text"], "@article{Kucsko_2013,\n}\n");

    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"]["isError"], true);
    let text = responses[1]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error (invalid-doi):"));

    mock_server.verify().await;
}

#[tokio::test]
async fn test_protocol_errors() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let responses = run_session(
        &dispatcher,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}).to_string(),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "bibtex_to_doi", "arguments": {}}})
            .to_string(),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {}}).to_string(),
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/call",
                   "params": {"name": "doi_to_bibtex", "arguments": {}}})
            .to_string(),
            json!({"jsonrpc": "1.0", "id": 5, "method": "ping"}).to_string(),
        ],
    )
    .await;

    let codes: Vec<_> = responses.iter().map(|r| r["error"]["code"].as_i64().unwrap()).collect();
    assert_eq!(codes, [-32601, -32602, -32602, -32602, -32600]);
}

#[tokio::test]
async fn test_parse_error_keeps_loop_alive() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let responses = run_session(
        &dispatcher,
        &[
            "{this is not json".to_string(),
            String::new(),
            json!({"jsonrpc": "2.0", "id": 9, "method": "ping"}).to_string(),
        ],
    )
    .await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert!(responses[0]["id"].is_null());
    assert_eq!(responses[1]["id"], 9);
    assert_eq!(responses[1]["result"], json!({}));
}

#[tokio::test]
async fn test_invalid_utf8_line_keeps_loop_alive() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"x\xff\"}\n".to_vec();
    input.extend_from_slice(b"\xfe\xfd\n");
    input.extend_from_slice(json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}).to_string().as_bytes());
    input.push(b'\n');

    let mut output = Vec::new();
    serve(&dispatcher, input.as_slice(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[2]["id"], 2);
    assert_eq!(responses[2]["result"], json!({}));
}

#[tokio::test]
async fn test_notification_with_wrong_version_ignored() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let responses = run_session(
        &dispatcher,
        &[
            json!({"jsonrpc": "1.0", "method": "notifications/initialized"}).to_string(),
            json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string(),
        ],
    )
    .await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 1);
}

#[tokio::test]
async fn test_notifications_produce_no_output() {
    let mock_server = MockServer::start().await;
    let dispatcher = dispatcher(&mock_server);

    let responses = run_session(
        &dispatcher,
        &[
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
            json!({"jsonrpc": "2.0", "method": "notifications/cancelled", "params": {}}).to_string(),
        ],
    )
    .await;

    assert!(responses.is_empty());
}
