use crate::{
    config::Config,
    domain::{ImageEditor, ImageGenerator},
    errors::UpstreamError,
    models::{EditPayload, GenerationBody},
};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::Serialize;
use std::time::Duration;
use tracing;

/// Longest upstream error text passed on to callers.
const MAX_FORWARDED_ERROR_CHARS: usize = 300;

#[derive(Serialize)]
struct GenerationRequestBody<'a> {
    prompt: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'static str,
}

/// Client for the generation and inpainting HTTP APIs.
#[derive(Clone)]
pub struct HttpImageClient {
    http: Client,
    api_key: String,
    generation_url: String,
    edit_url: String,
    image_size: String,
}

impl HttpImageClient {
    pub fn new(http: Client, config: &Config) -> Self {
        tracing::info!(generation_url = %config.generation_url, edit_url = %config.edit_url, "Initializing HttpImageClient");
        Self {
            http,
            api_key: config.openai_api_key.clone(),
            generation_url: config.generation_url.clone(),
            edit_url: config.edit_url.clone(),
            image_size: config.image_size.clone(),
        }
    }
}

/// Builds the shared outbound client with a deadline on every call.
pub fn create_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .timeout(timeout)
        .build()
}

#[async_trait]
impl ImageGenerator for HttpImageClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationBody, UpstreamError> {
        tracing::debug!(url = %self.generation_url, prompt_len = prompt.len(), "Requesting image generation");

        let response = self
            .http
            .post(&self.generation_url)
            .bearer_auth(&self.api_key)
            .json(&GenerationRequestBody {
                prompt,
                n: 1,
                size: &self.image_size,
                response_format: "b64_json",
            })
            .send()
            .await?;

        let body = read_json_body(response).await?;
        let classified = GenerationBody::from_json(&body);
        tracing::debug!(shape = shape_name(&classified), "Generation response received");
        Ok(classified)
    }
}

#[async_trait]
impl ImageEditor for HttpImageClient {
    async fn edit(&self, payload: EditPayload) -> Result<serde_json::Value, UpstreamError> {
        tracing::debug!(
            url = %self.edit_url,
            image_bytes = payload.image.len(),
            mask_bytes = payload.mask.len(),
            n = payload.n,
            size = %payload.size,
            "Requesting image edit"
        );

        let form = Form::new()
            .part("image", png_part(payload.image, "image.png")?)
            .part("mask", png_part(payload.mask, "mask.png")?)
            .text("prompt", payload.prompt)
            .text("n", payload.n.to_string())
            .text("size", payload.size.as_str());

        let response = self
            .http
            .post(&self.edit_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        read_json_body(response).await
    }
}

fn png_part(bytes: Vec<u8>, file_name: &'static str) -> Result<Part, UpstreamError> {
    Ok(Part::bytes(bytes).file_name(file_name).mime_str("image/png")?)
}

/// Reads the whole body, turning non-2xx statuses into `UpstreamError::Status`.
async fn read_json_body(response: Response) -> Result<serde_json::Value, UpstreamError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .as_ref()
            .and_then(extract_error_message);
        tracing::warn!(status = status.as_u16(), body = %truncate(&text, 1024), "Upstream returned an error status");
        return Err(UpstreamError::Status { status: status.as_u16(), message });
    }

    serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidBody(e.to_string()))
}

/// Reads `error` as a string, or `error.message` as the OpenAI error object carries it.
pub fn extract_error_message(body: &serde_json::Value) -> Option<String> {
    let error = body.get("error")?;
    let raw = match error {
        serde_json::Value::String(s) => s.as_str(),
        serde_json::Value::Object(obj) => obj.get("message")?.as_str()?,
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate(trimmed, MAX_FORWARDED_ERROR_CHARS))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn shape_name(body: &GenerationBody) -> &'static str {
    match body {
        GenerationBody::SinglePhoto(_) => "photo",
        GenerationBody::PhotoList(_) => "photos",
        GenerationBody::Empty => "empty",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_message_from_string_or_object() {
        assert_eq!(extract_error_message(&json!({ "error": "quota exceeded" })), Some("quota exceeded".into()));
        assert_eq!(
            extract_error_message(&json!({ "error": { "message": "Billing hard limit reached", "type": "invalid_request_error" } })),
            Some("Billing hard limit reached".into())
        );
        assert_eq!(extract_error_message(&json!({ "error": "   " })), None);
        assert_eq!(extract_error_message(&json!({ "detail": "nope" })), None);
    }

    #[test]
    fn long_messages_are_truncated() {
        let long = "x".repeat(MAX_FORWARDED_ERROR_CHARS + 50);
        let message = extract_error_message(&json!({ "error": long })).unwrap();
        assert_eq!(message.chars().count(), MAX_FORWARDED_ERROR_CHARS + 3);
        assert!(message.ends_with("..."));
    }
}
