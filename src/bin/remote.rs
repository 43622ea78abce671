//! Chat client for a remote MCP server reached over streamable HTTP.

use anyhow::{Context, Result};
use mcp_chat::{ChatClient, McpSession, OpenAiModel, shell};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::io::BufReader;

// Example server configuration; swap in your own endpoint.
const SERVER_URL: &str = "https://weather-mcp.example.com/mcp";
const MODEL: &str = "gpt-4.1";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let server = McpSession::connect_http(SERVER_URL, auth_headers()?)
        .await
        .context("could not connect to the tool server")?;

    let mut client = ChatClient::new(OpenAiModel::new(MODEL));
    client
        .connect(server)
        .await
        .context("could not fetch the tool catalog")?;

    println!("connected to {SERVER_URL}");
    println!("type your queries, or \"exit\" to quit");
    shell::run(
        client,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Bearer auth for the example server. The header is omitted when the key is
/// not set, for servers that accept anonymous sessions.
fn auth_headers() -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Ok(key) = std::env::var("WEATHER_API_KEY") {
        let value = HeaderValue::from_str(&format!("Bearer {key}"))
            .context("WEATHER_API_KEY is not a valid header value")?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcp_chat=debug,info".parse().expect("valid env filter")),
        )
        .init();
}
