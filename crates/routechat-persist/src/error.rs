use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Project '{0}' has no routes")]
    RoutesMissing(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[cfg(feature = "supabase")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;
