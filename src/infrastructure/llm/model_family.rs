use base64::{Engine as _, engine::general_purpose};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::application::ports::{CompletionRequest, ContentBlock, LlmClientError};
use crate::config::ModelFamilySetting;

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
const NOVA_SCHEMA_VERSION: &str = "messages-v1";

/// Request and response shape of a model vendor's invoke API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Anthropic,
    Nova,
}

impl From<ModelFamilySetting> for ModelFamily {
    fn from(setting: ModelFamilySetting) -> Self {
        match setting {
            ModelFamilySetting::Anthropic => Self::Anthropic,
            ModelFamilySetting::Nova => Self::Nova,
        }
    }
}

impl ModelFamily {
    pub fn encode(&self, request: &CompletionRequest) -> Value {
        match self {
            Self::Anthropic => encode_anthropic(request),
            Self::Nova => encode_nova(request),
        }
    }

    /// Concatenated text of the model's reply.
    pub fn decode(&self, body: &[u8]) -> Result<String, LlmClientError> {
        let text = match self {
            Self::Anthropic => {
                let response: AnthropicResponse = parse(body)?;
                join_text(response.content.into_iter().filter_map(|c| c.text))
            }
            Self::Nova => {
                let response: NovaResponse = parse(body)?;
                join_text(
                    response
                        .output
                        .message
                        .content
                        .into_iter()
                        .filter_map(|c| c.text),
                )
            }
        };

        text.ok_or_else(|| LlmClientError::InvalidResponse("no text content in response".into()))
    }
}

fn encode_anthropic(request: &CompletionRequest) -> Value {
    let content: Vec<Value> = request
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text(text) => json!({ "type": "text", "text": text }),
            ContentBlock::Image(image) => json!({
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": "image/png",
                    "data": general_purpose::STANDARD.encode(&image.png),
                }
            }),
        })
        .collect();

    let mut body = json!({
        "anthropic_version": ANTHROPIC_VERSION,
        "max_tokens": request.params.max_tokens,
        "temperature": request.params.temperature,
        "messages": [{ "role": "user", "content": content }],
    });
    if !request.system_prompt.is_empty() {
        body["system"] = Value::String(request.system_prompt.clone());
    }
    body
}

fn encode_nova(request: &CompletionRequest) -> Value {
    let content: Vec<Value> = request
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text(text) => json!({ "text": text }),
            ContentBlock::Image(image) => json!({
                "image": {
                    "format": "png",
                    "source": { "bytes": general_purpose::STANDARD.encode(&image.png) }
                }
            }),
        })
        .collect();

    let mut body = json!({
        "schemaVersion": NOVA_SCHEMA_VERSION,
        "messages": [{ "role": "user", "content": content }],
        "inferenceConfig": {
            "maxTokens": request.params.max_tokens,
            "temperature": request.params.temperature,
        },
    });
    if !request.system_prompt.is_empty() {
        body["system"] = json!([{ "text": request.system_prompt }]);
    }
    body
}

fn parse<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, LlmClientError> {
    serde_json::from_slice(body).map_err(|e| LlmClientError::InvalidResponse(e.to_string()))
}

fn join_text(parts: impl Iterator<Item = String>) -> Option<String> {
    let parts: Vec<String> = parts.collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.concat())
    }
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<TextPart>,
}

#[derive(Deserialize)]
struct NovaResponse {
    output: NovaOutput,
}

#[derive(Deserialize)]
struct NovaOutput {
    message: NovaMessage,
}

#[derive(Deserialize)]
struct NovaMessage {
    content: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    text: Option<String>,
}
