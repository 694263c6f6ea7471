use std::time::Duration;

use shared::{AppError, AppResult};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::core::{Config, ServerState};

/// Interval between coupon expiry sweeps
const EXPIRY_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// HTTP server wrapper; owns the state and the background tasks
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Run until a shutdown signal arrives
    pub async fn run(self) -> AppResult<()> {
        self.spawn_expiry_sweep();

        let app = api::router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::internal(format!("failed to bind {addr}: {e}")))?;
        tracing::info!("HTTP server listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("server error: {e}")))
    }

    /// Hourly sweep marking overdue coupons as expired
    fn spawn_expiry_sweep(&self) {
        let rewards = self.state.rewards.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(EXPIRY_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(e) = rewards.expire_coupons().await {
                    tracing::warn!(error = %e, "coupon expiry sweep failed");
                }
            }
        });
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
