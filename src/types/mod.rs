use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use serde::Serialize;
use serde_json::Value;

/// A callable tool as advertised by the server. Immutable for the session.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<&ToolDescriptor> for ChatCompletionTool {
    fn from(value: &ToolDescriptor) -> Self {
        Self {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: value.name.clone(),
                description: Some(value.description.clone()),
                parameters: Some(value.input_schema.clone()),
                strict: None,
            },
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    pub name: String,
    /// Must be a JSON object (or null) to be accepted by the server.
    pub arguments: Value,
}

/// What the server returned for one tool invocation. The content is kept
/// opaque and re-serialized into the follow-up prompt as-is.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: Value,
    pub is_error: bool,
}

/// One part of a model reply, in the order the model produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Text(String),
    ToolCall(ToolCallRequest),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_converts_to_model_tool() {
        let descriptor = ToolDescriptor {
            name: "get_weather".into(),
            description: "Current weather for a city".into(),
            input_schema: json!({
                "type": "object",
                "properties": { "city": { "type": "string" } },
                "required": ["city"]
            }),
        };
        let tool = ChatCompletionTool::from(&descriptor);
        assert_eq!(tool.function.name, "get_weather");
        assert_eq!(
            tool.function.description.as_deref(),
            Some("Current weather for a city")
        );
        assert_eq!(
            tool.function.parameters.as_ref().unwrap()["properties"]["city"]["type"],
            "string"
        );
    }

    #[test]
    fn descriptor_serializes_for_prompt_embedding() {
        let descriptor = ToolDescriptor {
            name: "search".into(),
            description: String::new(),
            input_schema: json!({ "type": "object" }),
        };
        let rendered = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(rendered["name"], "search");
        assert_eq!(rendered["description"], "");
        assert_eq!(rendered["input_schema"]["type"], "object");
    }
}
