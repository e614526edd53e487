pub mod builder;
pub mod error;
pub mod manager;
pub mod poller;

pub use builder::SessionManagerBuilder;
pub use error::{PollError, SessionError};
pub use manager::{SessionManager, SubmittedTurn, TurnOutcome, TurnRequest};
pub use poller::{PollConfig, RunPoller};

pub use tokio_util::sync::CancellationToken;
pub use routechat_context::{TiktokenTokenizer, Tokenizer};
pub use routechat_types::{ConversationConfig, ConversationPhase, SessionState};
