use serde::{Deserialize, Serialize};

/// Purpose tag required for files that assistants can read.
pub const ASSISTANTS_PURPOSE: &str = "assistants";

/// A file persisted to the remote file store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub purpose: String,
}
