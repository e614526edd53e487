//! # Routechat
//!
//! Converse about a stored project's API route table through the OpenAI
//! Assistants API.
//!
//! Route tables are usually far larger than a model's context window, so the
//! first message of a conversation splits the table into token-bounded
//! chunks, uploads each one as a file and attaches all of them to a new
//! thread. Later messages continue that thread without re-uploading.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routechat::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let assistant = Arc::new(OpenAIAssistantClient::new(
//!         std::env::var("OPENAI_API_KEY")?
//!     )?);
//!     let store = Arc::new(SupabaseProjectStore::connect(
//!         std::env::var("SUPABASE_URL")?,
//!         std::env::var("SUPABASE_KEY")?,
//!     )?);
//!
//!     let manager = SessionManager::builder()
//!         .assistant(assistant)
//!         .store(store)
//!         .config(ConversationConfig::new(std::env::var("ASSISTANT_ID")?))
//!         .build()?;
//!
//!     let cancel = CancellationToken::new();
//!     let first = manager
//!         .handle_message(
//!             SessionState::new(),
//!             TurnRequest::new("Which routes accept POST?").with_project("checkout-service"),
//!             &cancel,
//!         )
//!         .await?;
//!     println!("{}", first.reply);
//!
//!     // same thread, no upload
//!     let next = manager
//!         .handle_message(first.state, TurnRequest::new("And which need auth?"), &cancel)
//!         .await?;
//!     println!("{}", next.reply);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`routechat-llm`**: typed Assistants API client with retries
//! - **`routechat-context`**: tiktoken token counting and the line chunker
//! - **`routechat-persist`**: project store (Supabase, in-memory)
//! - **`routechat-types`**: session state and conversation settings
//! - **`routechat-session`**: session manager and run poller

pub mod prelude;

pub use routechat_session::{
    CancellationToken, PollConfig, PollError, RunPoller, SessionError, SessionManager,
    SessionManagerBuilder, SubmittedTurn, TurnOutcome, TurnRequest,
};

pub use routechat_llm::{
    AssistantClient, AssistantError, Backoff, ListOrder, MessageRole, NewMessage,
    OpenAIAssistantClient, OpenAIConfig, RetryPolicy, Run, RunStatus, ThreadMessage,
};

pub use routechat_persist::{InMemoryProjectStore, PersistError, Project, ProjectStore};

pub use routechat_persist::SupabaseProjectStore;

pub use routechat_context::{count_tokens, Chunk, Chunker, TiktokenTokenizer, Tokenizer};

pub use routechat_types::{ConversationConfig, ConversationPhase, SessionState};
