use serde::{Deserialize, Serialize};

/// A stored project, identified by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Row shape returned when selecting a project's routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRoutes {
    #[serde(default)]
    pub routes: serde_json::Value,
}
