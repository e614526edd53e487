use std::sync::Arc;

use crate::tokenizer::Tokenizer;

/// An ordered, 1-indexed slice of a larger text.
///
/// Every line in `content` keeps its terminating `\n`, so concatenating the
/// chunks of a text in index order reproduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
    /// Sum of the token counts of the chunk's lines
    pub token_count: usize,
}

impl Chunk {
    /// Name the chunk is uploaded under, e.g. `chunk1.txt`
    pub fn filename(&self) -> String {
        format!("chunk{}.txt", self.index)
    }

    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }
}

/// Greedy line-based splitter bounded by a token budget.
///
/// Lines are never split. A line whose own count exceeds the budget becomes
/// a chunk on its own, so that chunk is the only one allowed over budget.
/// Empty chunks are never produced.
pub struct Chunker {
    tokenizer: Arc<dyn Tokenizer>,
    max_tokens_per_chunk: usize,
}

impl Chunker {
    pub fn new(tokenizer: Arc<dyn Tokenizer>, max_tokens_per_chunk: usize) -> Self {
        Self {
            tokenizer,
            max_tokens_per_chunk,
        }
    }

    pub fn max_tokens_per_chunk(&self) -> usize {
        self.max_tokens_per_chunk
    }

    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut lines: Vec<&str> = text.split('\n').collect();
        if text.ends_with('\n') {
            // the empty segment after the final newline is not a line
            lines.pop();
        }

        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_tokens = 0;

        for line in lines {
            let line_tokens = self.tokenizer.count_tokens(line);

            if current_tokens + line_tokens > self.max_tokens_per_chunk && !current.is_empty() {
                chunks.push(Chunk {
                    index: chunks.len() + 1,
                    content: std::mem::take(&mut current),
                    token_count: current_tokens,
                });
                current_tokens = 0;
            }

            current.push_str(line);
            current.push('\n');
            current_tokens += line_tokens;
        }

        if !current.is_empty() {
            chunks.push(Chunk {
                index: chunks.len() + 1,
                content: current,
                token_count: current_tokens,
            });
        }

        tracing::debug!(
            tokenizer = self.tokenizer.name(),
            max_tokens_per_chunk = self.max_tokens_per_chunk,
            chunks = chunks.len(),
            "Chunked text"
        );

        chunks
    }
}
