use async_trait::async_trait;

use crate::error::Result;
use crate::types::{FileObject, ListOrder, NewMessage, Run, ThreadMessage};

/// Operations on the remote assistant service.
///
/// Implementations are expected to be cheap to share behind an `Arc`.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Persist `bytes` to the remote file store
    async fn upload_file(&self, bytes: Vec<u8>, filename: &str, purpose: &str)
        -> Result<FileObject>;

    /// Create a thread seeded with `message` and start a run on it in one call
    async fn create_thread_and_run(&self, assistant_id: &str, message: NewMessage) -> Result<Run>;

    /// Append a message to an existing thread
    async fn create_message(&self, thread_id: &str, message: NewMessage) -> Result<ThreadMessage>;

    /// Start a run on an existing thread
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    /// Ask the service to stop a run that is still queued or in progress
    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// Fetch the current state of a run
    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    /// List a thread's messages in the requested order
    async fn list_messages(&self, thread_id: &str, order: ListOrder) -> Result<Vec<ThreadMessage>>;
}
