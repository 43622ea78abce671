use crate::types::{Segment, ToolCallRequest, ToolDescriptor};

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatCompletionResponseMessage, ChatCompletionTool,
    ChatCompletionToolChoiceOption, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed")]
    Api(#[from] async_openai::error::OpenAIError),
    #[error("model returned no choices")]
    EmptyReply,
    #[error("error deserializing tool call arguments (possible hallucination)")]
    MalformedArguments(#[source] serde_json::Error),
}

/// One round trip to the hosted model. An empty tool slice means the request
/// carries no tool definitions at all, so the model can only answer in text.
#[async_trait]
pub trait ModelService: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<Vec<Segment>, ModelError>;
}

pub struct OpenAiModel {
    inner: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiModel {
    /// Reads `OPENAI_API_KEY` from the environment.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            inner: Client::new(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ModelService for OpenAiModel {
    async fn generate(
        &self,
        prompt: &str,
        tools: &[ToolDescriptor],
    ) -> Result<Vec<Segment>, ModelError> {
        let user = ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(prompt.to_owned()),
            name: None,
        });

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.model).messages(vec![user]).n(1);
        if !tools.is_empty() {
            request.tools(tools.iter().map(ChatCompletionTool::from).collect::<Vec<_>>());
            request.tool_choice(ChatCompletionToolChoiceOption::Auto);
        }

        let reply = self.inner.chat().create(request.build()?).await?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or(ModelError::EmptyReply)?;
        segments_from_reply(choice.message)
    }
}

/// Splits a model reply into ordered segments: the text part first (the API
/// returns it as one block), then each requested tool call.
fn segments_from_reply(
    message: ChatCompletionResponseMessage,
) -> Result<Vec<Segment>, ModelError> {
    let mut segments = Vec::new();
    if let Some(text) = message.content {
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
    }
    for call in message.tool_calls.unwrap_or_default() {
        let arguments = serde_json::from_str(&call.function.arguments)
            .map_err(ModelError::MalformedArguments)?;
        segments.push(Segment::ToolCall(ToolCallRequest {
            name: call.function.name,
            arguments,
        }));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(value: serde_json::Value) -> ChatCompletionResponseMessage {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn text_only_reply_yields_one_text_segment() {
        let message = reply(json!({ "role": "assistant", "content": "4" }));
        let segments = segments_from_reply(message).unwrap();
        assert_eq!(segments, vec![Segment::Text("4".into())]);
    }

    #[test]
    fn tool_call_reply_yields_parsed_arguments() {
        let message = reply(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "arguments": "{\"city\":\"Paris\"}"
                }
            }]
        }));
        let segments = segments_from_reply(message).unwrap();
        assert_eq!(
            segments,
            vec![Segment::ToolCall(ToolCallRequest {
                name: "get_weather".into(),
                arguments: json!({ "city": "Paris" }),
            })]
        );
    }

    #[test]
    fn text_precedes_tool_calls() {
        let message = reply(json!({
            "role": "assistant",
            "content": "Let me check.",
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": { "name": "search", "arguments": "{}" }
            }]
        }));
        let segments = segments_from_reply(message).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0], Segment::Text("Let me check.".into()));
        assert!(matches!(segments[1], Segment::ToolCall(_)));
    }

    #[test]
    fn unparseable_arguments_are_rejected() {
        let message = reply(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": { "name": "search", "arguments": "not json" }
            }]
        }));
        assert!(matches!(
            segments_from_reply(message),
            Err(ModelError::MalformedArguments(_))
        ));
    }

    #[test]
    fn empty_content_is_dropped() {
        let message = reply(json!({ "role": "assistant", "content": "" }));
        assert!(segments_from_reply(message).unwrap().is_empty());
    }
}
