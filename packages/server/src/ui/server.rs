//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{http, websocket::session_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Campaign session server
///
/// Serves the JSON API and the per-campaign WebSocket endpoint. When the server stops, the
/// session hub is shut down so every open connection is closed.
///
/// # Example
///
/// ```ignore
/// let (hub, _task) = SessionHub::start();
/// let state = AppState::in_memory(hub, Arc::new(SystemClock), ConnectionConfig::default());
/// Server::new(state).run("127.0.0.1", 8090).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Build the router with all endpoints.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws/campaigns/{campaign_id}", get(session_handler))
            // HTTP エンドポイント
            .route("/api/health", get(http::health_check))
            .route(
                "/api/campaigns",
                get(http::list_campaigns).post(http::create_campaign),
            )
            .route("/api/campaigns/{campaign_id}", get(http::get_campaign))
            .route(
                "/api/campaigns/{campaign_id}/increment-day",
                post(http::increment_day),
            )
            .route(
                "/api/campaigns/{campaign_id}/connections",
                get(http::count_connections),
            )
            .route(
                "/api/campaigns/{campaign_id}/characters",
                get(http::list_characters),
            )
            .route(
                "/api/campaigns/{campaign_id}/challenges",
                get(http::list_challenges),
            )
            .route("/api/characters", post(http::create_character))
            .route(
                "/api/characters/{character_id}",
                get(http::get_character).put(http::update_character),
            )
            .route(
                "/api/characters/{character_id}/dice-pool",
                get(http::get_current_pool).post(http::roll_pool),
            )
            .route(
                "/api/characters/{character_id}/dice-pool/manual",
                post(http::roll_manual_pool),
            )
            .route("/api/dice/{die_id}/use", post(http::use_die))
            .route(
                "/api/rolls",
                get(http::roll_history).post(http::record_roll),
            )
            .route("/api/challenges", post(http::create_challenge))
            .route(
                "/api/challenges/{challenge_id}/complete",
                post(http::complete_challenge),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Session server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws/campaigns/{{campaign_id}}?user_id={{user_id}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let hub = self.state.hub.clone();
        // Stopping the hub closes every outbound queue, which ends open sessions.
        let shutdown = async move {
            shutdown.await;
            hub.shutdown();
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
