//! Imagind Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imagind_engine::api;
use imagind_engine::app::App;
use imagind_engine::infrastructure::{
    anthropic::AnthropicClient,
    clock::SystemClock,
    config::{EngineConfig, LlmProvider},
    llm_resolver::LlmIntentResolver,
    ollama::OllamaClient,
    ports::{ClockPort, EventLogRepo, IntentResolverPort, LlmPort, WorldRepo},
    resilient_llm::{ResilientLlmClient, RetryConfig},
    sqlite_event_log::SqliteEventLog,
    world_seed::WorldSeed,
    world_store::InMemoryWorldRepo,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from the repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imagind_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Imagind Engine");

    let config = EngineConfig::from_env()?;

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    // World graph
    let world: Arc<dyn WorldRepo> = Arc::new(InMemoryWorldRepo::new());
    let seed = match &config.world_file {
        Some(path) => {
            tracing::info!(path = %path, "Loading world file");
            WorldSeed::load_from_path(path).await?
        }
        None => {
            tracing::info!("IMAGIND_WORLD_FILE not set, using the demo world");
            WorldSeed::demo()
        }
    };
    seed.install(world.as_ref()).await?;

    // Event log
    tracing::info!(path = %config.db_path, "Opening event log");
    let event_log: Arc<dyn EventLogRepo> = Arc::new(SqliteEventLog::new(&config.db_path).await?);

    // LLM and intent resolution
    let provider: Arc<dyn LlmPort> = match &config.llm {
        LlmProvider::Ollama { base_url, model } => {
            tracing::info!(base_url = %base_url, model = %model, "Using Ollama");
            Arc::new(OllamaClient::new(base_url, model))
        }
        LlmProvider::Anthropic { api_key, model } => {
            tracing::info!(model = %model, "Using Anthropic");
            Arc::new(AnthropicClient::new(api_key, model))
        }
    };
    let retry_config = RetryConfig::default();
    tracing::info!(
        "LLM client configured with retry: max_retries={}, base_delay_ms={}",
        retry_config.max_retries,
        retry_config.base_delay_ms
    );
    let llm: Arc<dyn LlmPort> = Arc::new(ResilientLlmClient::new(provider, retry_config));
    let resolver: Arc<dyn IntentResolverPort> = Arc::new(LlmIntentResolver::new(llm));

    // Create application
    let app = Arc::new(App::new(
        world,
        event_log,
        resolver,
        clock,
        config.event_history_limit,
    ));

    // Spawn the autonomous tick
    match config.tick_interval {
        Some(interval) => {
            let tick_app = app.clone();
            tokio::spawn(async move {
                loop {
                    tokio::time::sleep(interval).await;
                    if let Err(e) = tick_app.use_cases.tick.execute().await {
                        tracing::warn!(error = %e, "Autonomous tick failed");
                    }
                }
            });
            tracing::info!(interval_secs = interval.as_secs(), "Autonomous tick enabled");
        }
        None => tracing::info!("Autonomous tick disabled"),
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
