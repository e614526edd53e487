use std::sync::Arc;

use routechat_context::{Chunker, TiktokenTokenizer, Tokenizer};
use routechat_llm::AssistantClient;
use routechat_persist::ProjectStore;
use routechat_types::ConversationConfig;

use crate::error::{Result, SessionError};
use crate::manager::SessionManager;
use crate::poller::{PollConfig, RunPoller};

/// Builder for constructing a SessionManager
pub struct SessionManagerBuilder {
    assistant: Option<Arc<dyn AssistantClient>>,
    store: Option<Arc<dyn ProjectStore>>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    config: Option<ConversationConfig>,
    poll_config: PollConfig,
}

impl SessionManagerBuilder {
    pub fn new() -> Self {
        Self {
            assistant: None,
            store: None,
            tokenizer: None,
            config: None,
            poll_config: PollConfig::default(),
        }
    }

    pub fn assistant(mut self, client: Arc<dyn AssistantClient>) -> Self {
        self.assistant = Some(client);
        self
    }

    pub fn store(mut self, store: Arc<dyn ProjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the tokenizer used for chunking. Defaults to tiktoken for
    /// the configured model.
    pub fn tokenizer(mut self, tokenizer: Arc<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn config(mut self, config: ConversationConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn poll_config(mut self, poll_config: PollConfig) -> Self {
        self.poll_config = poll_config;
        self
    }

    pub fn build(self) -> Result<SessionManager> {
        let assistant = self
            .assistant
            .ok_or_else(|| SessionError::Config("assistant client is required".to_string()))?;
        let store = self
            .store
            .ok_or_else(|| SessionError::Config("project store is required".to_string()))?;
        let config = self
            .config
            .ok_or_else(|| SessionError::Config("conversation config is required".to_string()))?;

        if config.assistant_id.trim().is_empty() {
            return Err(SessionError::Config("assistant id must not be empty".to_string()));
        }
        if config.max_tokens_per_chunk == 0 {
            return Err(SessionError::Config(
                "max_tokens_per_chunk must be positive".to_string(),
            ));
        }

        let tokenizer = match self.tokenizer {
            Some(tokenizer) => tokenizer,
            None => Arc::new(TiktokenTokenizer::for_model(&config.tokenizer_model)?),
        };

        let chunker = Chunker::new(tokenizer, config.max_tokens_per_chunk);
        let poller = RunPoller::new(Arc::clone(&assistant), self.poll_config);

        Ok(SessionManager::new(assistant, store, chunker, poller, config))
    }
}

impl Default for SessionManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
