use std::time::Duration;

use crate::error::{PersistError, Result};
#[cfg(feature = "supabase")]
use crate::SupabaseProjectStore;

pub const DEFAULT_PROJECTS_TABLE: &str = "projects";

pub struct SupabaseStoreBuilder {
    url: Option<String>,
    key: Option<String>,
    table: String,
    timeout: Duration,
}

impl SupabaseStoreBuilder {
    pub fn new() -> Self {
        Self {
            url: None,
            key: None,
            table: DEFAULT_PROJECTS_TABLE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(self) -> Result<(String, String, String, Duration)> {
        let url = self
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| PersistError::Config("Supabase url is required".to_string()))?;
        let key = self
            .key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PersistError::Config("Supabase key is required".to_string()))?;
        if self.table.trim().is_empty() {
            return Err(PersistError::Config("table name must not be empty".to_string()));
        }

        Ok((url, key, self.table, self.timeout))
    }

    #[cfg(feature = "supabase")]
    pub fn build(self) -> Result<SupabaseProjectStore> {
        let (url, key, table, timeout) = self.validate()?;
        SupabaseProjectStore::new_with_config(url, key, table, timeout)
    }
}

impl Default for SupabaseStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "supabase"))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url() {
        let result = SupabaseStoreBuilder::new().key("k").build();
        match result {
            Err(PersistError::Config(msg)) => assert!(msg.contains("url")),
            _ => panic!("expected config error"),
        }
    }

    #[test]
    fn test_missing_key() {
        let result = SupabaseStoreBuilder::new().url("https://abc.supabase.co").build();
        match result {
            Err(PersistError::Config(msg)) => assert!(msg.contains("key")),
            _ => panic!("expected config error"),
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = SupabaseStoreBuilder::new()
            .url("https://abc.supabase.co")
            .key("k")
            .table(" ")
            .build();
        assert!(matches!(result, Err(PersistError::Config(_))));
    }

    #[test]
    fn test_build_success() {
        let result = SupabaseStoreBuilder::new()
            .url("https://abc.supabase.co")
            .key("k")
            .table("apps")
            .timeout(Duration::from_secs(5))
            .build();
        assert!(result.is_ok());
    }
}
