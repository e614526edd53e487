use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use routechat_context::{Chunk, Chunker};
use routechat_llm::{AssistantClient, AssistantError, NewMessage, Run};
use routechat_persist::ProjectStore;
use routechat_types::{ConversationConfig, SessionState};

use crate::builder::SessionManagerBuilder;
use crate::error::{Result, SessionError};
use crate::poller::RunPoller;

/// One user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRequest {
    pub message: String,
    /// Only read when the session has no thread yet
    pub project: Option<String>,
}

impl TurnRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            project: None,
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    fn project_name(&self) -> Option<&str> {
        self.project
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A turn whose run has been started but not yet awaited.
///
/// `state` already carries the thread, so callers can persist it before
/// waiting on the reply.
#[derive(Debug, Clone)]
pub struct SubmittedTurn {
    pub state: SessionState,
    pub run: Run,
    pub new_thread: bool,
    pub attachment_ids: Vec<String>,
}

/// A completed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub state: SessionState,
    pub reply: String,
    pub thread_id: String,
    pub new_thread: bool,
    /// Files attached to the founding message, empty for follow-ups
    pub attachment_ids: Vec<String>,
}

/// Drives a conversation: the first turn uploads the project's routes and
/// opens a thread, later turns reuse that thread.
pub struct SessionManager {
    assistant: Arc<dyn AssistantClient>,
    store: Arc<dyn ProjectStore>,
    chunker: Chunker,
    poller: RunPoller,
    config: ConversationConfig,
}

impl SessionManager {
    pub fn builder() -> SessionManagerBuilder {
        SessionManagerBuilder::new()
    }

    pub(crate) fn new(
        assistant: Arc<dyn AssistantClient>,
        store: Arc<dyn ProjectStore>,
        chunker: Chunker,
        poller: RunPoller,
        config: ConversationConfig,
    ) -> Self {
        Self {
            assistant,
            store,
            chunker,
            poller,
            config,
        }
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    /// Run a full turn and return the assistant's reply with the next state.
    pub async fn handle_message(
        &self,
        state: SessionState,
        request: TurnRequest,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome> {
        let submitted = self.submit(state, request).await?;
        self.await_reply(submitted, cancel).await
    }

    /// Start the run for a turn without waiting for it.
    ///
    /// A stored thread the service no longer knows is replaced by a new one
    /// when the request names a project, otherwise the turn fails with
    /// [`SessionError::ThreadGone`].
    pub async fn submit(&self, state: SessionState, request: TurnRequest) -> Result<SubmittedTurn> {
        if let Some(thread_id) = state.thread_id().map(str::to_owned) {
            match self.continue_thread(&thread_id, &request.message).await {
                Ok(run) => {
                    return Ok(SubmittedTurn {
                        state,
                        run,
                        new_thread: false,
                        attachment_ids: Vec::new(),
                    });
                }
                Err(SessionError::Assistant(AssistantError::NotFound(detail))) => {
                    if request.project_name().is_none() {
                        tracing::warn!(%thread_id, %detail, "Stored thread no longer exists");
                        return Err(SessionError::ThreadGone { thread_id });
                    }
                    tracing::warn!(%thread_id, %detail, "Stored thread no longer exists, starting a new one");
                }
                Err(e) => return Err(e),
            }
        }

        let project = request.project_name().ok_or(SessionError::MissingProject)?;
        let (run, attachment_ids) = self.start_thread(project, &request.message).await?;

        Ok(SubmittedTurn {
            state: SessionState::with_thread(run.thread_id.clone()),
            run,
            new_thread: true,
            attachment_ids,
        })
    }

    /// Wait for a submitted turn's run and fetch the reply.
    pub async fn await_reply(
        &self,
        turn: SubmittedTurn,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome> {
        let reply = self.poller.wait_for_reply(&turn.run, cancel).await?;

        Ok(TurnOutcome {
            thread_id: turn.run.thread_id,
            state: turn.state,
            reply,
            new_thread: turn.new_thread,
            attachment_ids: turn.attachment_ids,
        })
    }

    async fn start_thread(&self, project: &str, message: &str) -> Result<(Run, Vec<String>)> {
        let routes = self.store.get_routes(project).await?;
        let text = serde_json::to_string_pretty(&routes)?;
        let chunks = self.chunker.chunk(&text);

        tracing::info!(
            project,
            chunks = chunks.len(),
            max_tokens = self.chunker.max_tokens_per_chunk(),
            "Starting conversation"
        );

        let attachment_ids = self.upload_chunks(&chunks).await?;
        let founding = NewMessage::user(self.config.founding_message(message))
            .with_file_ids(attachment_ids.iter().cloned());

        match self
            .assistant
            .create_thread_and_run(&self.config.assistant_id, founding)
            .await
        {
            Ok(run) => {
                tracing::info!(thread_id = %run.thread_id, run_id = %run.id, "Thread created");
                Ok((run, attachment_ids))
            }
            Err(e) => {
                tracing::warn!(orphaned = ?attachment_ids, error = %e, "Thread creation failed after upload");
                Err(e.into())
            }
        }
    }

    /// Upload chunks one at a time, in index order.
    async fn upload_chunks(&self, chunks: &[Chunk]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            let filename = chunk.filename();
            let result = self
                .assistant
                .upload_file(
                    chunk.content.clone().into_bytes(),
                    &filename,
                    &self.config.file_purpose,
                )
                .await;

            match result {
                Ok(file) => {
                    tracing::debug!(file_id = %file.id, %filename, tokens = chunk.token_count, "Uploaded chunk");
                    ids.push(file.id);
                }
                Err(e) => {
                    if !ids.is_empty() {
                        tracing::warn!(orphaned = ?ids, %filename, "Chunk upload failed, earlier uploads are orphaned");
                    }
                    return Err(e.into());
                }
            }
        }

        Ok(ids)
    }

    async fn continue_thread(&self, thread_id: &str, message: &str) -> Result<Run> {
        self.assistant
            .create_message(thread_id, NewMessage::user(message))
            .await?;
        let run = self
            .assistant
            .create_run(thread_id, &self.config.assistant_id)
            .await?;

        tracing::debug!(thread_id, run_id = %run.id, "Continuing conversation");
        Ok(run)
    }
}
