use serde::Serialize;
use serde_json::Value;

/// What a model returned for one request: free text, or JSON when the output parses as
/// an object or array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ModelResponse {
    Text(String),
    Structured(Value),
}

impl ModelResponse {
    pub fn from_completion(raw: &str) -> Self {
        let trimmed = raw.trim();
        let candidate = strip_code_fence(trimmed);

        match serde_json::from_str::<Value>(candidate) {
            Ok(value @ (Value::Object(_) | Value::Array(_))) => Self::Structured(value),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn empty_structured() -> Self {
        Self::Structured(Value::Object(Default::default()))
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Text form used when quoting a response back to a model.
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Structured(value) => value.clone(),
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
