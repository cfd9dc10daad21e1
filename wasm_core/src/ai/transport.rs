use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{CompletionRequest, ServiceConfig, ServiceError};

/// Outbound channel to the text-generation service, abstracted for mocking.
#[async_trait(?Send)]
pub trait CompletionTransport {
    /// Sends one request and returns the raw text of the reply.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// generateContent client over `reqwest` (fetch-backed on wasm32).
pub struct HttpTransport {
    client: Client,
    config: ServiceConfig,
}

impl HttpTransport {
    pub fn new(config: ServiceConfig) -> Result<Self, String> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match config.timeout_ms {
            Some(ms) => builder.timeout(std::time::Duration::from_millis(ms)),
            None => builder,
        };
        let client = builder.build().map_err(|err| err.to_string())?;
        Ok(Self { client, config })
    }

    fn url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }
}

/// Wire body for a generateContent call.
pub(crate) fn request_body(request: &CompletionRequest) -> Value {
    let mut parts = vec![json!({ "text": request.prompt() })];
    if let Some(image) = &request.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": image.data_base64,
            }
        }));
    }
    let mut body = json!({
        "contents": [{ "role": "user", "parts": parts }],
    });
    if let Some(schema) = &request.schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema.to_declaration(),
        });
    }
    body
}

/// Concatenates the text parts of the first candidate.
pub(crate) fn extract_text(body: &str) -> Result<String, ServiceError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|err| ServiceError::MalformedJson(err.to_string()))?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait(?Send)]
impl CompletionTransport for HttpTransport {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ServiceError> {
        let model = if request.model.is_empty() {
            self.config.model.as_str()
        } else {
            request.model.as_str()
        };
        debug!(model, "sending completion request");
        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "completion request failed");
                ServiceError::Network(err.to_string())
            })?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "completion service rejected request");
            return Err(ServiceError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .await
            .map_err(|err| ServiceError::Network(err.to_string()))?;
        extract_text(&body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiTool, DEFAULT_MODEL, InlineImage};

    #[test]
    fn body_includes_schema_and_image() {
        let image = InlineImage::from_bytes("image/jpeg", b"jpg").unwrap();
        let request = AiTool::ImageToText
            .build_request("", None, Some(image), DEFAULT_MODEL)
            .unwrap();
        let body = request_body(&request);
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert!(body.get("generationConfig").is_none());

        let seo = AiTool::SeoOptimizer
            .build_request("page", None, None, DEFAULT_MODEL)
            .unwrap();
        let body = request_body(&seo);
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(
            body["generationConfig"]["responseSchema"]["properties"]["description"]["type"],
            "STRING"
        );
    }

    #[test]
    fn extract_text_joins_parts() {
        let body =
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello"},{"text":", world"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Hello, world");
    }

    #[test]
    fn extract_text_rejects_empty_or_garbage() {
        assert_eq!(extract_text(r#"{"candidates":[]}"#), Err(ServiceError::EmptyResponse));
        assert_eq!(
            extract_text(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#),
            Err(ServiceError::EmptyResponse)
        );
        assert!(matches!(
            extract_text("<html>"),
            Err(ServiceError::MalformedJson(_))
        ));
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let transport = HttpTransport::new(ServiceConfig {
            endpoint: "https://example.test/v1beta/".into(),
            ..ServiceConfig::default()
        })
        .unwrap();
        assert_eq!(
            transport.url("m1"),
            "https://example.test/v1beta/models/m1:generateContent"
        );
    }
}
