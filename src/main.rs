use anyhow::Context;
use clap::Parser;
use edunex_ai::adapters::services::llm::GoogleService;
use edunex_ai::adapters::services::transcript::YoutubeTranscriptService;
use edunex_ai::commands::Commands;
use edunex_ai::config::AppConfig;
use edunex_ai::error::Result;
use edunex_ai::flows::{FlowOrchestrator, FlowRegistry};
use edunex_ai::ports::ModelGatewayPort;
use edunex_ai::server::{self, AppState};
use std::path::PathBuf;
use std::sync::Arc;

/// EduNex AI flow service
#[derive(Debug, Parser)]
#[command(name = "edunex-ai", version, about)]
struct Cli {
    /// Configuration file (defaults to ./edunex.toml when present)
    #[arg(long, env = "EDUNEX_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on, overrides server.bind
    #[arg(long)]
    bind: Option<String>,
}

/// Initialize the application
///
/// Builds the gateway and transcript adapters, the orchestrator and the flow
/// registry.
fn initialize_app(config: &AppConfig) -> Result<AppState> {
    let gateway = GoogleService::new(&config.gateway)?;
    if !gateway.is_configured() {
        log::warn!(
            "No Gemini API key configured; every model call will fail until one is provided"
        );
    }
    let transcripts = YoutubeTranscriptService::new(&config.transcripts)?;

    let orchestrator =
        FlowOrchestrator::new(Arc::new(gateway), Arc::new(transcripts), config.flows.clone())?;
    let registry = FlowRegistry::new();
    log::info!(
        "Registered {} flows, model {}",
        registry.kinds().len(),
        config.flows.model_id
    );

    Ok(AppState {
        commands: Commands::new(Arc::new(orchestrator), Arc::new(registry)),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config =
        AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    let state = initialize_app(&config).context("failed to initialize flows")?;
    let app = server::router(state, &config.server);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    log::info!("EduNex AI listening on {}", config.server.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
