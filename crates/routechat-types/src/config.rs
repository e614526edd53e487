use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TOKENS_PER_CHUNK: usize = 125_000;

/// Model whose tokenization rules are used when none is configured.
pub const DEFAULT_TOKENIZER_MODEL: &str = "gpt-4-turbo-preview";

/// Instruction placed before the user's first message in a new thread.
pub const DEFAULT_PREAMBLE: &str =
    "The file attached is a .txt file which has a json in it, do the following for the json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationConfig {
    pub assistant_id: String,
    #[serde(default = "default_tokenizer_model")]
    pub tokenizer_model: String,
    #[serde(default = "default_max_tokens_per_chunk")]
    pub max_tokens_per_chunk: usize,
    #[serde(default = "default_file_purpose")]
    pub file_purpose: String,
    #[serde(default = "default_preamble")]
    pub preamble: String,
}

fn default_tokenizer_model() -> String {
    DEFAULT_TOKENIZER_MODEL.to_string()
}

fn default_max_tokens_per_chunk() -> usize {
    DEFAULT_MAX_TOKENS_PER_CHUNK
}

fn default_file_purpose() -> String {
    "assistants".to_string()
}

fn default_preamble() -> String {
    DEFAULT_PREAMBLE.to_string()
}

impl ConversationConfig {
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            tokenizer_model: default_tokenizer_model(),
            max_tokens_per_chunk: default_max_tokens_per_chunk(),
            file_purpose: default_file_purpose(),
            preamble: default_preamble(),
        }
    }

    pub fn with_tokenizer_model(mut self, model: impl Into<String>) -> Self {
        self.tokenizer_model = model.into();
        self
    }

    pub fn with_max_tokens_per_chunk(mut self, max: usize) -> Self {
        self.max_tokens_per_chunk = max;
        self
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = preamble.into();
        self
    }

    /// Text of a thread's founding message.
    pub fn founding_message(&self, user_message: &str) -> String {
        format!("{}\n{}", self.preamble, user_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConversationConfig::new("asst_1");
        assert_eq!(config.max_tokens_per_chunk, 125_000);
        assert_eq!(config.tokenizer_model, DEFAULT_TOKENIZER_MODEL);
        assert_eq!(config.file_purpose, "assistants");
    }

    #[test]
    fn test_founding_message() {
        let config = ConversationConfig::new("asst_1").with_preamble("Read the JSON");
        assert_eq!(config.founding_message("list routes"), "Read the JSON\nlist routes");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ConversationConfig =
            serde_json::from_str(r#"{"assistant_id": "asst_9", "max_tokens_per_chunk": 1000}"#).unwrap();
        assert_eq!(config.assistant_id, "asst_9");
        assert_eq!(config.max_tokens_per_chunk, 1000);
        assert_eq!(config.preamble, DEFAULT_PREAMBLE);
    }
}
