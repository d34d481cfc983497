use demand_dashboard::{load_accuracy, router, AppConfig, AppState, PredictorClient};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();
    let state = AppState::new(PredictorClient::new(config.predictor_url.clone()));
    info!("using prediction service at {}", state.client.base_url());

    let loader_state = state.clone();
    tokio::spawn(async move {
        load_accuracy(&loader_state).await;
    });

    let app = router(state);
    let addr = config.listen_addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("session closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
