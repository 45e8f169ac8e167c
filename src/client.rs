use std::sync::Arc;

use reqwest::multipart::Form;
use reqwest::{Client as HttpClient, Method, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::AuthMode;
use crate::config::{ClientConfig, normalize_base_url};
use crate::error::{ClientError, ClientResult};
use crate::pdf::{PDF_FIELD, PdfSource};
use crate::protocol::{AgentSpec, ChatRequest, EvaluateRequest};
use crate::seed::{SeedSource, ThreadRngSeeds};

/// Body attached to a single request.
#[derive(Debug)]
pub enum Payload {
    Empty,
    Json(Value),
    Multipart(Form),
}

impl Payload {
    pub fn json<T: Serialize>(body: &T) -> ClientResult<Self> {
        Ok(Self::Json(serde_json::to_value(body)?))
    }
}

/// Client for the Rippletide evaluation API.
///
/// Credentials are turned into default headers once, in [`RippletideClient::new`],
/// and sent with every request afterwards. Clones share the connection pool.
#[derive(Clone)]
pub struct RippletideClient {
    base_url: String,
    auth: AuthMode,
    http: HttpClient,
    seeds: Arc<dyn SeedSource>,
}

impl RippletideClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = normalize_base_url(&config.base_url);
        let auth = AuthMode::resolve(config.api_key, config.session_id);

        let mut builder = HttpClient::builder().default_headers(auth.headers()?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            auth,
            http,
            seeds: Arc::new(ThreadRngSeeds),
        })
    }

    /// Client with the default base URL and a freshly generated session id.
    pub fn anonymous() -> ClientResult<Self> {
        Self::new(ClientConfig::default())
    }

    /// Replaces where seeds come from when [`AgentSpec::seed`] is unset.
    pub fn with_seed_source(mut self, seeds: impl SeedSource + 'static) -> Self {
        self.seeds = Arc::new(seeds);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthMode {
        &self.auth
    }

    pub fn api_key(&self) -> Option<&str> {
        self.auth.api_key()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.auth.session_id()
    }

    /// Sends `method` to `base_url + endpoint` and fails on any non-2xx
    /// status, keeping the response body in the error.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload,
    ) -> ClientResult<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %url, "sending request");

        let builder = self.http.request(method, &url);
        let builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart(form) => builder.multipart(form),
        };

        let response = builder.send().await?;
        let status = response.status();
        debug!(%status, %url, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %url, "request failed");
            return Err(ClientError::Status { status, url, body });
        }

        Ok(response)
    }

    async fn request_json(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload,
    ) -> ClientResult<Value> {
        let response = self.request(method, endpoint, payload).await?;
        Ok(response.json().await?)
    }

    /// Creates an evaluation agent. Anonymous clients use the anonymous
    /// endpoint; clients with an API key use the authenticated one.
    pub async fn create_agent(&self, spec: AgentSpec) -> ClientResult<Value> {
        let request = spec.into_request(|| self.seeds.next_seed());
        let endpoint = self.auth.create_agent_path();
        self.request_json(Method::POST, endpoint, Payload::json(&request)?)
            .await
    }

    /// Uploads a PDF so the service can extract question/answer pairs from it.
    pub async fn extract_questions_from_pdf(
        &self,
        agent_id: &str,
        pdf: impl Into<PdfSource>,
    ) -> ClientResult<Value> {
        let part = pdf.into().into_part().await?;
        let form = Form::new().part(PDF_FIELD, part);
        let endpoint = format!("/api/agents/{agent_id}/upload-pdf");
        self.request_json(Method::POST, &endpoint, Payload::Multipart(form))
            .await
    }

    pub async fn get_test_prompts(&self, agent_id: &str) -> ClientResult<Value> {
        let endpoint = format!("/api/agents/{agent_id}/test-prompts");
        self.request_json(Method::GET, &endpoint, Payload::Empty)
            .await
    }

    pub async fn chat(&self, agent_id: &str, message: impl Into<String>) -> ClientResult<Value> {
        let request = ChatRequest {
            message: message.into(),
        };
        let endpoint = format!("/api/agents/{agent_id}/chat");
        self.request_json(Method::POST, &endpoint, Payload::json(&request)?)
            .await
    }

    /// Evaluates one question. Without an expected answer the service falls
    /// back to the agent's knowledge base.
    pub async fn evaluate(
        &self,
        agent_id: &str,
        question: impl Into<String>,
        expected_answer: Option<String>,
    ) -> ClientResult<Value> {
        let request = EvaluateRequest {
            question: question.into(),
            expected_answer,
        };
        let endpoint = format!("/api/agents/{agent_id}/evaluate");
        self.request_json(Method::POST, &endpoint, Payload::json(&request)?)
            .await
    }
}

impl std::fmt::Debug for RippletideClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RippletideClient")
            .field("base_url", &self.base_url)
            .field("anonymous", &self.auth.is_anonymous())
            .field("session_id", &self.auth.session_id())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_normalizes_base_url() {
        let client =
            RippletideClient::new(ClientConfig::default().with_base_url("http://example.test/"))
                .unwrap();
        assert_eq!(client.base_url(), "http://example.test");
    }

    #[test]
    fn anonymous_client_gets_a_session() {
        let client = RippletideClient::anonymous().unwrap();
        assert!(client.api_key().is_none());
        assert!(!client.session_id().unwrap().is_empty());
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let client = RippletideClient::new(ClientConfig::default().with_api_key("secret-key")).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
    }

    #[test]
    fn invalid_credentials_fail_construction() {
        let err = RippletideClient::new(ClientConfig::default().with_session_id("a\r\nb")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader { .. }));
    }
}
