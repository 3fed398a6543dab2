//! Generative Language API adapter
//!
//! Implements [`LlmGateway`] with `models/{model}:generateContent` and
//! [`EmbeddingPort`] with `models/{model}:embedContent`. The API key goes in
//! the `x-goog-api-key` header.

use super::types::{
    Content, EmbedContentRequest, EmbedContentResponse, GenerateContentResponse, build_request,
    convert_response, convert_status, convert_transport_error,
};
use async_trait::async_trait;
use neighborly_application::{EmbeddingPort, GatewayError, GenerationRequest, LlmGateway};
use neighborly_domain::LlmResponse;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
}

impl GeminiGateway {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.base_url.trim_end_matches('/'),
            model.trim_start_matches("models/"),
            method
        )
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, url: &str, body: &B) -> Result<R, GatewayError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| convert_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(convert_status(status.as_u16(), &body));
        }
        response.json().await.map_err(|e| convert_transport_error(&e))
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<LlmResponse, GatewayError> {
        let model = request.model.as_str();
        let body = build_request(request);
        debug!(
            model,
            turns = body.contents.len(),
            tools = request.tools.len(),
            structured = request.response_schema.is_some(),
            "generateContent"
        );

        let response: GenerateContentResponse = self
            .post(&self.endpoint(model, "generateContent"), &body)
            .await?;
        let converted = convert_response(response, model)?;

        if let Some(usage) = &converted.usage {
            trace!(
                model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "generateContent usage"
            );
        }
        Ok(converted)
    }
}

#[async_trait]
impl EmbeddingPort for GeminiGateway {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        let model = self.embedding_model.trim_start_matches("models/");
        let body = EmbedContentRequest {
            model: format!("models/{}", model),
            content: Content::text(None, text),
        };
        let response: EmbedContentResponse = self.post(&self.endpoint(model, "embedContent"), &body).await?;
        if response.embedding.values.is_empty() {
            return Err(GatewayError::InvalidResponse("Empty embedding".to_string()));
        }
        Ok(response.embedding.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neighborly_domain::{Message, Model};

    #[test]
    fn test_endpoints() {
        let gateway = GeminiGateway::new(reqwest::Client::new(), "key")
            .with_base_url("https://example.test/v1beta/");
        assert_eq!(
            gateway.endpoint("gemini-2.0-flash", "generateContent"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            gateway.endpoint("models/text-embedding-004", "embedContent"),
            "https://example.test/v1beta/models/text-embedding-004:embedContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_connection_error() {
        // port 9 (discard) is closed on test machines
        let gateway = GeminiGateway::new(reqwest::Client::new(), "key").with_base_url("http://127.0.0.1:9");
        let request = GenerationRequest::new(Model::Gemini20Flash, vec![Message::user("hi")]);
        let err = gateway.generate(&request).await.unwrap_err();
        assert!(matches!(err, GatewayError::ConnectionError(_)));
    }
}
