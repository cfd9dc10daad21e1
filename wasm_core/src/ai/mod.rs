//! Generative-text request wrapper shared by the AI-backed tools.
//!
//! Each tool turns its local input into one [`CompletionRequest`], hands it
//! to a [`CompletionTransport`](transport::CompletionTransport) and displays
//! either the response or [`FAILURE_MESSAGE`].

pub mod tools;
pub mod transport;
pub mod widget;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use tools::{AiTool, ToolMode};
pub use transport::{CompletionTransport, HttpTransport};
pub use widget::{GenerativeWidget, WidgetOutput, WidgetState};

/// Text shown in place of the output whenever a request fails.
pub const FAILURE_MESSAGE: &str =
    "Something went wrong while generating a response. Please try again.";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("response contained no text")]
    EmptyResponse,
    #[error("malformed JSON response: {0}")]
    MalformedJson(String),
    #[error("response is missing field `{0}`")]
    MissingField(String),
    #[error("field `{field}` should be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    /// Applied by transports that support deadlines; `None` waits forever.
    pub timeout_ms: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_ms: Some(60_000),
        }
    }
}

/// Uploaded image forwarded inline with the prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    pub data_base64: String,
}

impl InlineImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("image is empty".into());
        }
        let mime_type = mime_type.trim();
        if !mime_type.starts_with("image/") {
            return Err(format!("unsupported image type: {mime_type}"));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data_base64: STANDARD.encode(bytes),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyKind {
    String,
    Number,
    Integer,
    Boolean,
    StringList,
}

impl PropertyKind {
    fn label(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number => "a number",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::StringList => "a list of strings",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }

    /// OpenAPI-subset type declaration understood by the service.
    fn declaration(self) -> Value {
        match self {
            Self::String => serde_json::json!({"type": "STRING"}),
            Self::Number => serde_json::json!({"type": "NUMBER"}),
            Self::Integer => serde_json::json!({"type": "INTEGER"}),
            Self::Boolean => serde_json::json!({"type": "BOOLEAN"}),
            Self::StringList => serde_json::json!({"type": "ARRAY", "items": {"type": "STRING"}}),
        }
    }
}

/// Object shape the service is asked to return.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSchema {
    properties: Vec<(&'static str, PropertyKind)>,
}

impl ResponseSchema {
    pub fn new(properties: Vec<(&'static str, PropertyKind)>) -> Self {
        Self { properties }
    }

    pub fn properties(&self) -> &[(&'static str, PropertyKind)] {
        &self.properties
    }

    pub fn to_declaration(&self) -> Value {
        let mut props = Map::new();
        for (name, kind) in &self.properties {
            props.insert((*name).to_string(), kind.declaration());
        }
        let required: Vec<&str> = self.properties.iter().map(|(name, _)| *name).collect();
        serde_json::json!({
            "type": "OBJECT",
            "properties": props,
            "required": required,
        })
    }

    /// Parses a response body and checks every declared property.
    pub fn validate(&self, text: &str) -> Result<Map<String, Value>, ServiceError> {
        let body = strip_code_fence(text);
        let value: Value =
            serde_json::from_str(body).map_err(|err| ServiceError::MalformedJson(err.to_string()))?;
        let Value::Object(map) = value else {
            return Err(ServiceError::MalformedJson("expected a JSON object".into()));
        };
        for (name, kind) in &self.properties {
            let field = map
                .get(*name)
                .ok_or_else(|| ServiceError::MissingField((*name).to_string()))?;
            if !kind.matches(field) {
                return Err(ServiceError::WrongType {
                    field: (*name).to_string(),
                    expected: kind.label(),
                });
            }
        }
        Ok(map)
    }
}

/// Removes a surrounding Markdown code fence such as "```json ... ```".
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    match rest.find('\n') {
        Some(idx) if !rest[..idx].trim_start().starts_with('{') => rest[idx + 1..].trim(),
        _ => rest.trim(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub model: String,
    pub instruction: String,
    pub input: String,
    pub image: Option<InlineImage>,
    pub schema: Option<ResponseSchema>,
}

impl CompletionRequest {
    /// Prompt text sent ahead of any inline image.
    pub fn prompt(&self) -> String {
        if self.input.is_empty() {
            self.instruction.clone()
        } else {
            format!("{}\n\n{}", self.instruction, self.input)
        }
    }
}
