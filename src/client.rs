use crate::model::{ModelError, ModelService};
use crate::server::{ServerError, ToolServer};
use crate::types::{Segment, ToolDescriptor, ToolOutput};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("not connected to a tool server")]
    NotConnected,
    #[error("model turn failed")]
    Model(#[from] ModelError),
    #[error("tool call failed")]
    Server(#[from] ServerError),
}

/// An established session: a connected server plus the tool catalog fetched
/// from it at connect time.
pub struct Session<S> {
    server: S,
    catalog: Vec<ToolDescriptor>,
}

impl<S: ToolServer> Session<S> {
    pub async fn establish(server: S) -> Result<Self, ServerError> {
        let catalog = server.list_tools().await?;
        tracing::info!(tools = catalog.len(), "fetched tool catalog");
        Ok(Self { server, catalog })
    }

    pub fn catalog(&self) -> &[ToolDescriptor] {
        &self.catalog
    }
}

/// Holds the two long-lived handles a client needs: the model service and,
/// once connected, the session. Each query turn is independent; nothing
/// carries over between turns.
pub struct ChatClient<M, S> {
    model: M,
    session: Option<Session<S>>,
}

impl<M, S> ChatClient<M, S>
where
    M: ModelService,
    S: ToolServer,
{
    pub fn new(model: M) -> Self {
        Self {
            model,
            session: None,
        }
    }

    /// Fetches the tool catalog and keeps the session for all later turns.
    pub async fn connect(&mut self, server: S) -> Result<(), ServerError> {
        self.session = Some(Session::establish(server).await?);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// One full turn: ask the model with the catalog attached, execute any
    /// tool call it requests, fold each result back through a second model
    /// request, and return the accumulated text.
    pub async fn process_query(&self, query: &str) -> Result<String, RelayError> {
        let session = self.session.as_ref().ok_or(RelayError::NotConnected)?;

        let prompt = initial_prompt(query, session.catalog());
        let segments = self.model.generate(&prompt, session.catalog()).await?;

        let mut response = String::new();
        for segment in segments {
            match segment {
                Segment::Text(text) => response.push_str(&text),
                Segment::ToolCall(call) => {
                    tracing::info!(tool = %call.name, "executing tool call");
                    let output = session.server.call_tool(&call.name, call.arguments).await?;
                    let follow_up = follow_up_prompt(query, &call.name, &output);
                    for part in self.model.generate(&follow_up, &[]).await? {
                        if let Segment::Text(text) = part {
                            response.push_str(&text);
                        }
                    }
                }
            }
        }
        Ok(response)
    }

    /// Closes the session, if any. Safe to call when never connected.
    pub async fn shutdown(&mut self) -> Result<(), ServerError> {
        if let Some(mut session) = self.session.take() {
            session.server.close().await?;
        }
        Ok(())
    }
}

fn initial_prompt(query: &str, catalog: &[ToolDescriptor]) -> String {
    let tools = serde_json::to_string_pretty(catalog).unwrap_or_else(|_| "[]".to_owned());
    format!("User query: {query}\n\nAvailable tools: {tools}")
}

// The tool result alone is not enough for a good answer, so the original
// query rides along in the follow-up.
fn follow_up_prompt(query: &str, tool: &str, output: &ToolOutput) -> String {
    format!(
        "Tool execution result for {tool}: {content}\nOriginal query: {query}",
        content = output.content
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn initial_prompt_embeds_query_and_catalog() {
        let catalog = vec![ToolDescriptor {
            name: "get_weather".into(),
            description: "Current weather".into(),
            input_schema: json!({ "type": "object" }),
        }];
        let prompt = initial_prompt("What's the weather in Paris?", &catalog);
        assert!(prompt.starts_with("User query: What's the weather in Paris?"));
        assert!(prompt.contains("get_weather"));
        assert!(prompt.contains("Current weather"));
    }

    #[test]
    fn follow_up_prompt_resends_the_query() {
        let output = ToolOutput {
            content: json!([{ "type": "text", "text": "18°C, cloudy" }]),
            is_error: false,
        };
        let prompt = follow_up_prompt("What's the weather in Paris?", "get_weather", &output);
        assert!(prompt.contains("Tool execution result for get_weather:"));
        assert!(prompt.contains("18°C, cloudy"));
        assert!(prompt.contains("Original query: What's the weather in Paris?"));
    }
}
