//! Prelude module for convenient imports
//!
//! ```rust
//! use routechat::prelude::*;
//! ```

pub use crate::{
    AssistantClient, CancellationToken, ConversationConfig, OpenAIAssistantClient, PollConfig,
    ProjectStore, SessionManager, SessionState, SupabaseProjectStore, TurnOutcome, TurnRequest,
};
