use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::Project;
use crate::trait_client::ProjectStore;

/// Map-backed project store, ordered by project name.
#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<BTreeMap<String, serde_json::Value>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, name: impl Into<String>, routes: serde_json::Value) -> Self {
        self.projects.get_mut().insert(name.into(), routes);
        self
    }

    pub async fn upsert_project(&self, name: impl Into<String>, routes: serde_json::Value) {
        self.projects.write().await.insert(name.into(), routes);
    }

    pub async fn remove_project(&self, name: &str) -> bool {
        self.projects.write().await.remove(name).is_some()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self
            .projects
            .read()
            .await
            .keys()
            .map(|name| Project::new(name.clone()))
            .collect())
    }

    async fn get_routes(&self, project_name: &str) -> Result<serde_json::Value> {
        let projects = self.projects.read().await;
        let routes = projects
            .get(project_name)
            .ok_or_else(|| PersistError::ProjectNotFound(project_name.to_string()))?;

        if routes.is_null() {
            return Err(PersistError::RoutesMissing(project_name.to_string()));
        }

        Ok(routes.clone())
    }
}
