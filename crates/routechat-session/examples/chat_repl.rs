//! Interactive conversation about one project's routes.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! export ASSISTANT_ID=asst_...
//! export SUPABASE_URL=https://xyz.supabase.co
//! export SUPABASE_KEY=...
//! cargo run -p routechat-session --example chat_repl -- checkout-service
//! ```

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use routechat_llm::OpenAIAssistantClient;
use routechat_persist::SupabaseProjectStore;
use routechat_session::{
    CancellationToken, ConversationConfig, SessionManager, SessionState, TurnRequest,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let project = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: chat_repl <project>"))?;

    let assistant = Arc::new(OpenAIAssistantClient::new(std::env::var("OPENAI_API_KEY")?)?);
    let store = Arc::new(SupabaseProjectStore::connect(
        std::env::var("SUPABASE_URL")?,
        std::env::var("SUPABASE_KEY")?,
    )?);

    let manager = SessionManager::builder()
        .assistant(assistant)
        .store(store)
        .config(ConversationConfig::new(std::env::var("ASSISTANT_ID")?))
        .build()?;

    let cancel = CancellationToken::new();
    let mut state = SessionState::new();

    println!("Talking about '{}'. Empty line to quit.", project);
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().is_empty() {
            break;
        }

        let outcome = manager
            .handle_message(
                state,
                TurnRequest::new(line.trim()).with_project(project.clone()),
                &cancel,
            )
            .await?;

        if outcome.new_thread {
            println!(
                "[thread {} opened with {} attachment(s)]",
                outcome.thread_id,
                outcome.attachment_ids.len()
            );
        }
        println!("{}\n", outcome.reply);
        state = outcome.state;
    }

    Ok(())
}
