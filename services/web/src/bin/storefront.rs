//! services/web/src/bin/storefront.rs

use lessonflow_core::generation::GenerationDispatcher;
use lessonflow_core::ports::{ChatCompletionService, SessionRepository};
use lessonflow_core::Catalog;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use web_lib::{
    adapters::{
        spawn_idle_sweeper, InMemorySessionStore, OllamaGenerateAdapter, OpenAiChatAdapter,
    },
    config::Config,
    error::ApiError,
    telemetry::init_tracing,
    web::{pages::Pages, storefront_router, AppState},
};

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    init_tracing(&config);
    info!("Configuration loaded. Starting storefront...");

    // --- 2. Initialize Generation Backends ---
    let chat: Option<Arc<dyn ChatCompletionService>> = match &config.deepseek_api_key {
        Some(key) => {
            info!(base_url = %config.deepseek_base_url, "Chat-completion client initialized");
            let adapter = OpenAiChatAdapter::from_credentials(key, &config.deepseek_base_url);
            Some(Arc::new(adapter) as Arc<dyn ChatCompletionService>)
        }
        None => {
            warn!("DEEPSEEK_API_KEY is not set; DeepSeek and GPT models will be unavailable");
            None
        }
    };

    let generate =
        OllamaGenerateAdapter::new(config.ollama_api_url.clone(), config.ollama_api_key.clone())?;
    if !generate.is_configured() {
        warn!(
            "OLLAMA_CLOUD_API_URL still holds the placeholder host; \
             Qwen and Llama 3 models will be unavailable"
        );
    }

    // --- 3. Build the Shared AppState ---
    let pages = Arc::new(Pages::new()?);
    let sessions: Arc<dyn SessionRepository> = Arc::new(InMemorySessionStore::new());
    spawn_idle_sweeper(sessions.clone(), config.session_idle_ttl, SESSION_SWEEP_INTERVAL);
    let app_state = Arc::new(AppState {
        sessions,
        catalog: Arc::new(Catalog::builtin()),
        generator: GenerationDispatcher::new(chat, Arc::new(generate)),
        default_model: config.default_model.clone(),
        pages,
    });

    // --- 4. Start the Server ---
    let app = storefront_router(app_state);
    info!("Starting server on {}", config.bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
