use async_trait::async_trait;

use crate::error::Result;
use crate::models::Project;

/// Read-only access to stored projects.
///
/// Implementations provide backend-specific lookups.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// List all projects
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Route table of the named project.
    ///
    /// Fails with `ProjectNotFound` when no record matches and
    /// `RoutesMissing` when the record holds no routes. If several records
    /// share the name, the first is used.
    async fn get_routes(&self, project_name: &str) -> Result<serde_json::Value>;
}
