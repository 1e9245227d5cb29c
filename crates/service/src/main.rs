use platen_service::{build_router, config::Config, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting platen service...");

    let config = Config::load()?;
    tracing::info!("Configuration loaded");

    let state = AppState::new(config.clone());

    if state.ghostscript.probe().await {
        tracing::info!("Ghostscript available at {}", state.ghostscript.binary.display());
    } else {
        tracing::warn!(
            "Ghostscript not found at {}; CMYK exports will fall back to RGB",
            state.ghostscript.binary.display()
        );
    }

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Platen service listening on {}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  - POST /render-vector");
    tracing::info!("  - POST /batch-render-vector");
    tracing::info!("  - POST /export-multipage");
    tracing::info!("  - POST /export-labels");
    tracing::info!("  - POST /compose-pdfs");
    tracing::info!("  - GET  /health");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,platen_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
