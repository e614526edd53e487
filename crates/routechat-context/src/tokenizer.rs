use std::path::Path;
use tiktoken_rs::CoreBPE;

use crate::error::{ContextError, Result};

pub use routechat_types::DEFAULT_TOKENIZER_MODEL;

/// Pluggable token counting.
///
/// Budgets are enforced against the remote model's own limits, so production
/// code should count with the same BPE the model uses.
pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
    fn name(&self) -> &str;
}

/// BPE tokenizer resolved from an OpenAI model name.
pub struct TiktokenTokenizer {
    bpe: CoreBPE,
    model: String,
}

impl TiktokenTokenizer {
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model).map_err(|e| ContextError::Tokenizer {
            model: model.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Count tokens in `text` using the tokenizer of `model`.
pub fn count_tokens(text: &str, model: &str) -> Result<usize> {
    Ok(TiktokenTokenizer::for_model(model)?.count_tokens(text))
}

/// Count tokens in a file. Diagnostic helper: unreadable files count as 0.
pub fn count_file_tokens(path: impl AsRef<Path>, model: &str) -> usize {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot read file for token count");
            return 0;
        }
    };

    match count_tokens(&content, model) {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Cannot count tokens");
            0
        }
    }
}
