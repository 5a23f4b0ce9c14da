//! Chat-completion HTTP client

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::TranslationProvider;
use catsync_core::catalog::Catalog;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Request correlation ID header
const X_REQUEST_ID: &str = "X-Request-ID";

/// Client for OpenAI-compatible `/chat/completions` endpoints
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ChatClient {
    inner: Client,
    config: Arc<ProviderConfig>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl ChatClient {
    /// Create a new client with specific configuration
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        config.validate()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("catsync/", env!("CARGO_PKG_VERSION"))),
        );

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ProviderError::config("api_key contains invalid header characters"))?;
        auth.set_sensitive(true);
        default_headers.insert(AUTHORIZATION, auth);

        let inner = Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .map_err(ProviderError::Request)?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    #[instrument(skip(self, chunk, system_instructions), fields(keys = chunk.len(), request_id))]
    async fn complete(
        &self,
        chunk: &Catalog,
        target_locale_name: &str,
        system_instructions: &str,
    ) -> ProviderResult<String> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        let user_message = build_user_message(chunk, target_locale_name)?;
        let body = ChatRequest {
            model: &self.config.model,
            temperature: self.config.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_instructions,
                },
                ChatMessage {
                    role: "user",
                    content: &user_message,
                },
            ],
        };

        let start = Instant::now();
        let response = self
            .inner
            .post(self.config.completions_url())
            .header(X_REQUEST_ID, &request_id)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(status = status.as_u16(), "Provider rejected request");
            return Err(ProviderError::api_response(status.as_u16(), message));
        }

        let text = response.text().await?;
        debug!(elapsed_ms = start.elapsed().as_millis(), bytes = text.len(), "Provider responded");
        extract_content(&text)
    }
}

impl TranslationProvider for ChatClient {
    async fn translate(
        &self,
        chunk: &Catalog,
        target_locale_name: &str,
        system_instructions: &str,
    ) -> ProviderResult<String> {
        self.complete(chunk, target_locale_name, system_instructions)
            .await
    }
}

/// User turn: the target language followed by the chunk as JSON
fn build_user_message(chunk: &Catalog, target_locale_name: &str) -> ProviderResult<String> {
    let payload = serde_json::to_string_pretty(chunk)?;
    Ok(format!(
        "Translate the values of the following JSON object into {target_locale_name}.\n\n{payload}"
    ))
}

/// Pull the first choice's message text out of a completion body
fn extract_content(body: &str) -> ProviderResult<String> {
    let parsed: ChatResponse = serde_json::from_str(body)?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or(ProviderError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catsync_core::catalog::catalog_from_pairs;

    #[test]
    fn test_client_creation() {
        let config = ProviderConfig::default().with_api_key("sk-test");
        assert!(ChatClient::new(config).is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        assert!(ChatClient::new(ProviderConfig::default()).is_err());
    }

    #[test]
    fn test_user_message_embeds_chunk_in_order() {
        let chunk = catalog_from_pairs([("b", "Bee"), ("a", "Ay")]);
        let message = build_user_message(&chunk, "French").unwrap();
        assert!(message.starts_with("Translate the values of the following JSON object into French."));
        let b = message.find("\"b\"").unwrap();
        let a = message.find("\"a\"").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"{\"a\": \"b\"}"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), r#"{"a": "b"}"#);
    }

    #[test]
    fn test_extract_content_empty() {
        assert!(matches!(
            extract_content(r#"{"choices":[]}"#),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(
            extract_content(r#"{"choices":[{"message":{"content":null}}]}"#),
            Err(ProviderError::EmptyResponse)
        ));
        assert!(matches!(extract_content("<html>"), Err(ProviderError::Json(_))));
    }
}
