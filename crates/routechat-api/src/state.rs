use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use routechat_persist::ProjectStore;
use routechat_session::SessionManager;

use crate::config::Config;
use crate::session::SessionStore;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub manager: Arc<SessionManager>,
    pub projects: Arc<dyn ProjectStore>,
    pub sessions: Arc<SessionStore>,
    /// Cancelled on shutdown; in-flight polls observe a child of it
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(
        config: Config,
        manager: SessionManager,
        projects: Arc<dyn ProjectStore>,
        sessions: Arc<SessionStore>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config: Arc::new(config),
            manager: Arc::new(manager),
            projects,
            sessions,
            shutdown,
        }
    }
}
