use ac_policy_simulator::{api, config, state, telemetry};
use anyhow::Result;
use config::Config;
use state::AppState;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::load()?;
    init_tracing(&cfg.logging);

    let app_state = AppState::from_config(&cfg)?;
    let app = api::router(app_state, &cfg.server);

    let addr = cfg.server.socket_addr()?;
    info!(
        %addr,
        latitude = cfg.weather.latitude,
        longitude = cfg.weather.longitude,
        "starting AC policy simulator"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
