use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::builder::SupabaseStoreBuilder;
use crate::error::{PersistError, Result};
use crate::models::{Project, ProjectRoutes};
use crate::trait_client::ProjectStore;

/// Project store backed by a Supabase table, queried through PostgREST.
pub struct SupabaseProjectStore {
    http_client: reqwest::Client,
    base_url: String,
    table: String,
}

impl SupabaseProjectStore {
    /// Connect with the default table and timeout
    pub fn connect(url: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        SupabaseStoreBuilder::new().url(url).key(key).build()
    }

    pub fn builder() -> SupabaseStoreBuilder {
        SupabaseStoreBuilder::new()
    }

    pub(crate) fn new_with_config(
        url: String,
        key: String,
        table: String,
        timeout: Duration,
    ) -> Result<Self> {
        let invalid_key = |_| PersistError::Config("Invalid Supabase key format".to_string());

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("apikey"),
            HeaderValue::from_str(&key).map_err(invalid_key)?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid_key)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url: url.trim_end_matches('/').to_string(),
            table,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    async fn select<T: DeserializeOwned>(&self, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let response = self
            .http_client
            .get(self.table_url())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %message, "Supabase request failed");
            return Err(match status.as_u16() {
                401 | 403 => PersistError::Unauthorized(message),
                code => PersistError::Api {
                    status: code,
                    message,
                },
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ProjectStore for SupabaseProjectStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects: Vec<Project> = self.select(&[("select", "name")]).await?;
        tracing::debug!(count = projects.len(), table = %self.table, "Listed projects");
        Ok(projects)
    }

    async fn get_routes(&self, project_name: &str) -> Result<serde_json::Value> {
        let filter = format!("eq.{}", project_name);
        let rows: Vec<ProjectRoutes> = self
            .select(&[("select", "routes"), ("name", filter.as_str())])
            .await?;

        if rows.len() > 1 {
            tracing::warn!(project = project_name, rows = rows.len(), "Project name is not unique, using first record");
        }

        let routes = rows
            .into_iter()
            .next()
            .ok_or_else(|| PersistError::ProjectNotFound(project_name.to_string()))?
            .routes;

        if routes.is_null() {
            return Err(PersistError::RoutesMissing(project_name.to_string()));
        }

        Ok(routes)
    }
}
