use std::time::Duration;
use thiserror::Error;

use routechat_context::ContextError;
use routechat_llm::{AssistantError, RunStatus};
use routechat_persist::PersistError;

/// Why waiting for a run's reply failed.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("Run {run_id} did not complete within {elapsed:?}")]
    Timeout { run_id: String, elapsed: Duration },

    #[error("Waiting for run {run_id} was cancelled")]
    Cancelled { run_id: String },

    #[error("Run {run_id} ended with status {status}: {message}")]
    RunFailed {
        run_id: String,
        status: RunStatus,
        message: String,
    },

    #[error("Run {run_id} requires tool output, which is not supported")]
    RequiresAction { run_id: String },

    #[error("Thread {thread_id} has no assistant reply")]
    NoReply { thread_id: String },

    #[error(transparent)]
    Assistant(#[from] AssistantError),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("A project is required to start a new conversation")]
    MissingProject,

    #[error("Conversation thread {thread_id} no longer exists, choose a project to start over")]
    ThreadGone { thread_id: String },

    #[error("Project store error: {0}")]
    Store(#[from] PersistError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Failed to serialize routes: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] ContextError),

    #[error("Invalid session configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SessionError>;
