// OpenAI-specific assistants client implementation

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::config::OpenAIConfig;
use crate::error::{AssistantError, Result};
use crate::retry::RetryPolicy;
use crate::traits::AssistantClient;
use crate::types::{FileObject, ListOrder, NewMessage, Run, ThreadMessage};

const ASSISTANTS_BETA_HEADER: &str = "assistants=v2";
const MESSAGE_PAGE_LIMIT: &str = "100";

/// OpenAI assistants client (HTTP direct, no SDK)
pub struct OpenAIAssistantClient {
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

impl OpenAIAssistantClient {
    /// Create new client with API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(OpenAIConfig::new(api_key))
    }

    pub fn from_config(config: OpenAIConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|_| AssistantError::Unauthorized("Invalid API key format".to_string()))?,
        );
        headers.insert(
            HeaderName::from_static("openai-beta"),
            HeaderValue::from_static(ASSISTANTS_BETA_HEADER),
        );
        if let Some(org) = &config.organization {
            headers.insert(
                HeaderName::from_static("openai-organization"),
                HeaderValue::from_str(org)
                    .map_err(|_| AssistantError::Unauthorized("Invalid organization header".to_string()))?,
            );
        }

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url().to_string(),
            retry: config.retry_policy(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn upload_form(bytes: &[u8], filename: &str, purpose: &str) -> Result<Form> {
        let part = Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str("text/plain")?;

        Ok(Form::new().text("purpose", purpose.to_string()).part("file", part))
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "Assistant API request failed");
            return Err(AssistantError::from_status(status.as_u16(), &body, retry_after));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(AssistantError::from)
    }
}

// ============================================================================
// TRAIT IMPLEMENTATION
// ============================================================================

#[async_trait]
impl AssistantClient for OpenAIAssistantClient {
    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        purpose: &str,
    ) -> Result<FileObject> {
        let url = self.url("/files");

        let file: FileObject = self
            .retry
            .run("upload_file", false, || {
                let form = Self::upload_form(&bytes, filename, purpose);
                let url = url.clone();
                async move { self.send(self.http_client.post(url).multipart(form?)).await }
            })
            .await?;

        tracing::debug!(file_id = %file.id, filename, bytes = file.bytes, "Uploaded file");
        Ok(file)
    }

    async fn create_thread_and_run(&self, assistant_id: &str, message: NewMessage) -> Result<Run> {
        let url = self.url("/threads/runs");
        let payload = json!({
            "assistant_id": assistant_id,
            "thread": {
                "messages": [message],
            },
        });

        let run: Run = self
            .retry
            .run("create_thread_and_run", false, || {
                self.send(self.http_client.post(&url).json(&payload))
            })
            .await?;

        tracing::debug!(thread_id = %run.thread_id, run_id = %run.id, "Created thread and run");
        Ok(run)
    }

    async fn create_message(&self, thread_id: &str, message: NewMessage) -> Result<ThreadMessage> {
        let url = self.url(&format!("/threads/{}/messages", thread_id));

        self.retry
            .run("create_message", false, || {
                self.send(self.http_client.post(&url).json(&message))
            })
            .await
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run> {
        let url = self.url(&format!("/threads/{}/runs", thread_id));
        let payload = json!({ "assistant_id": assistant_id });

        let run: Run = self
            .retry
            .run("create_run", false, || {
                self.send(self.http_client.post(&url).json(&payload))
            })
            .await?;

        tracing::debug!(thread_id, run_id = %run.id, "Created run");
        Ok(run)
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let url = self.url(&format!("/threads/{}/runs/{}/cancel", thread_id, run_id));

        let run: Run = self
            .retry
            .run("cancel_run", false, || self.send(self.http_client.post(&url)))
            .await?;

        tracing::debug!(thread_id, run_id, status = %run.status, "Cancelled run");
        Ok(run)
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run> {
        let url = self.url(&format!("/threads/{}/runs/{}", thread_id, run_id));

        self.retry
            .run("get_run", true, || self.send(self.http_client.get(&url)))
            .await
    }

    async fn list_messages(&self, thread_id: &str, order: ListOrder) -> Result<Vec<ThreadMessage>> {
        let url = self.url(&format!("/threads/{}/messages", thread_id));

        let list: MessageList = self
            .retry
            .run("list_messages", true, || {
                self.send(
                    self.http_client
                        .get(&url)
                        .query(&[("order", order.as_str()), ("limit", MESSAGE_PAGE_LIMIT)]),
                )
            })
            .await?;

        Ok(list.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(OpenAIAssistantClient::new("sk-test").is_ok());
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let result = OpenAIAssistantClient::new("bad\nkey");
        assert!(matches!(result, Err(AssistantError::Unauthorized(_))));
    }

    #[test]
    fn test_url_joins_base() {
        let client = OpenAIAssistantClient::from_config(
            OpenAIConfig::new("sk-test").with_base_url("http://localhost:9999/v1/"),
        )
        .unwrap();
        assert_eq!(client.url("/files"), "http://localhost:9999/v1/files");
    }
}
