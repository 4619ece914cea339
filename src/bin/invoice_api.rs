use anyhow::Context;
use invoice_extract::api::{router, AppState};
use invoice_extract::utils::{logger, validation::Validate};
use invoice_extract::{make_inferencer, BackendOverrides, InvoiceWorkflow, Settings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    logger::init_server_logger(settings.api.json_logs);
    settings.validate()?;

    let overrides = BackendOverrides {
        model: settings.api.model.clone(),
        ..BackendOverrides::default()
    };
    let inferencer = make_inferencer(settings.api.backend, &settings, &overrides)?;
    tracing::info!(
        "🚀 Invoice API using {} backend at {}",
        inferencer.kind(),
        inferencer.base_url()
    );

    let workflow =
        InvoiceWorkflow::new(Arc::from(inferencer)).with_model(settings.api.model.clone());
    let app = router(AppState { workflow }, &settings.api.frontend_dir);

    let listener = tokio::net::TcpListener::bind(&settings.api.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", settings.api.bind_addr))?;
    tracing::info!("📡 Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
