pub mod config;
pub mod error;
pub mod openai;
pub mod retry;
pub mod traits;
pub mod types;

pub use config::OpenAIConfig;
pub use error::{AssistantError, Result};
pub use openai::OpenAIAssistantClient;
pub use retry::{Backoff, RetryPolicy};
pub use traits::AssistantClient;
pub use types::{
    Attachment, AttachmentTool, FileObject, ListOrder, MessageContent, MessageRole, NewMessage,
    Run, RunError, RunStatus, TextContent, ThreadMessage, ASSISTANTS_PURPOSE,
};
