pub mod config;
pub mod state;

pub use config::{
    ConversationConfig, DEFAULT_MAX_TOKENS_PER_CHUNK, DEFAULT_PREAMBLE, DEFAULT_TOKENIZER_MODEL,
};
pub use state::{ConversationPhase, SessionState};
