use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use routechat_llm::OpenAIConfig;
use routechat_session::{ConversationConfig, PollConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub openai: OpenAiSettings,
    pub supabase: SupabaseSettings,
    pub conversation: ConversationSettings,
    pub polling: PollingSettings,
    pub session: SessionSettings,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub assistant_id: String,
    #[serde(default)]
    pub supabase_url: String,
    #[serde(default)]
    pub supabase_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub table: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversationSettings {
    pub tokenizer_model: String,
    pub max_tokens_per_chunk: usize,
    /// Overrides the built-in founding-message preamble
    #[serde(default)]
    pub preamble: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    pub initial_interval_ms: u64,
    pub max_interval_ms: u64,
    pub multiplier: f64,
    pub jitter: f64,
    pub max_wait_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// Sessions unused for this long are dropped
    pub idle_ttl_secs: u64,
    pub prune_interval_secs: u64,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. ROUTECHAT_-prefixed environment variables, `__` between sections
    ///    (e.g. `ROUTECHAT_SERVER__PORT=9000`)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("ROUTECHAT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.openai_api_key = required_env("OPENAI_API_KEY")?;
        cfg.assistant_id = required_env("ASSISTANT_ID")?;
        cfg.supabase_url = required_env("SUPABASE_URL")?;
        cfg.supabase_key = required_env("SUPABASE_KEY")?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        builder.build()?.try_deserialize()
    }

    pub fn openai_config(&self) -> OpenAIConfig {
        let mut config = OpenAIConfig::new(self.openai_api_key.clone())
            .with_timeout(Duration::from_secs(self.openai.timeout_secs))
            .with_max_retries(self.openai.max_retries);
        if let Some(base_url) = &self.openai.base_url {
            config = config.with_base_url(base_url.clone());
        }
        config
    }

    pub fn conversation_config(&self) -> ConversationConfig {
        let mut config = ConversationConfig::new(self.assistant_id.clone())
            .with_tokenizer_model(self.conversation.tokenizer_model.clone())
            .with_max_tokens_per_chunk(self.conversation.max_tokens_per_chunk);
        if let Some(preamble) = &self.conversation.preamble {
            config = config.with_preamble(preamble.clone());
        }
        config
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig::new()
            .with_interval(
                Duration::from_millis(self.polling.initial_interval_ms),
                Duration::from_millis(self.polling.max_interval_ms),
            )
            .with_multiplier(self.polling.multiplier)
            .with_jitter(self.polling.jitter)
            .with_max_wait(Duration::from_secs(self.polling.max_wait_secs))
    }
}

impl SessionSettings {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval_secs.max(1))
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::Message(format!("{} environment variable is required", name)))
}
