use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use routechat_api::{build_router, config::Config, session::SessionStore, state::AppState};
use routechat_llm::{AssistantClient, OpenAIAssistantClient};
use routechat_persist::{ProjectStore, SupabaseProjectStore};
use routechat_session::SessionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!("Starting Routechat API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    let assistant: Arc<dyn AssistantClient> =
        Arc::new(OpenAIAssistantClient::from_config(config.openai_config())?);

    tracing::info!(table = %config.supabase.table, "Connecting project store");
    let projects: Arc<dyn ProjectStore> = Arc::new(
        SupabaseProjectStore::builder()
            .url(config.supabase_url.clone())
            .key(config.supabase_key.clone())
            .table(config.supabase.table.clone())
            .timeout(std::time::Duration::from_secs(config.supabase.timeout_secs))
            .build()?,
    );

    tracing::info!(
        tokenizer = %config.conversation.tokenizer_model,
        max_tokens_per_chunk = config.conversation.max_tokens_per_chunk,
        "Initializing session manager"
    );
    let manager = SessionManager::builder()
        .assistant(assistant)
        .store(Arc::clone(&projects))
        .config(config.conversation_config())
        .poll_config(config.poll_config())
        .build()?;

    let shutdown = CancellationToken::new();
    let sessions = Arc::new(SessionStore::new(config.session.idle_ttl()));
    Arc::clone(&sessions).spawn_reaper(config.session.prune_interval(), shutdown.clone());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, manager, projects, sessions, shutdown.clone()));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down, cancelling in-flight conversations");
    shutdown.cancel();
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
