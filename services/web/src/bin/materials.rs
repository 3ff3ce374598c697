//! services/web/src/bin/materials.rs

use lessonflow_core::lesson::LessonPlanner;
use lessonflow_core::ports::StructuredGenerationService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use web_lib::{
    adapters::GeminiAdapter,
    config::Config,
    error::ApiError,
    prompt::load_base_prompt,
    telemetry::init_tracing,
    web::{materials_router, pages::Pages, MaterialsState},
};

const GEMINI_TIMEOUT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    init_tracing(&config);
    info!("Configuration loaded. Starting lesson-material generator...");

    // --- 2. Load the Base Prompt & Initialize the Backend ---
    let base_prompt = load_base_prompt(&config.base_prompt_path);

    let backend: Option<Arc<dyn StructuredGenerationService>> = match &config.gemini_api_key {
        Some(key) => {
            let client = reqwest::Client::builder().timeout(GEMINI_TIMEOUT).build()?;
            info!(model = %config.gemini_model, "Gemini client initialized");
            let adapter = GeminiAdapter::new(
                client,
                config.gemini_base_url.clone(),
                key.clone(),
                config.gemini_model.clone(),
            );
            Some(Arc::new(adapter) as Arc<dyn StructuredGenerationService>)
        }
        None => {
            warn!("GEMINI_API_KEY is not set; generation requests fail until it is provided");
            None
        }
    };

    let state = Arc::new(MaterialsState {
        planner: LessonPlanner::new(backend, base_prompt),
        pages: Arc::new(Pages::new()?),
    });

    // --- 3. Start the Server ---
    let app = materials_router(state);
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
