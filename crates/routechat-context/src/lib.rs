mod chunker;
mod error;
mod tokenizer;

pub use chunker::{Chunk, Chunker};
pub use error::{ContextError, Result};
pub use tokenizer::{
    count_file_tokens, count_tokens, TiktokenTokenizer, Tokenizer, DEFAULT_TOKENIZER_MODEL,
};
