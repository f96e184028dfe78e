//! Server execution logic.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::domain::RelayRegistry;

use super::{
    handler::{
        http::{get_room_detail, get_rooms, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Watch-together relay server.
///
/// Encapsulates the registry and static-asset configuration and runs the
/// axum server.
///
/// # Example
///
/// ```ignore
/// let registry = Arc::new(InMemoryRelayRegistry::new());
/// let server = Server::new(registry, PathBuf::from("public"));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// Registry (connection, room, and playback bookkeeping)
    registry: Arc<dyn RelayRegistry>,
    /// Directory holding the entry page and static assets
    public_dir: PathBuf,
}

impl Server {
    pub fn new(registry: Arc<dyn RelayRegistry>, public_dir: PathBuf) -> Self {
        Self {
            registry,
            public_dir,
        }
    }

    /// Run the relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            registry: self.registry,
        });

        // Define handlers
        let mut app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room}", get(get_room_detail))
            .with_state(app_state);

        // Static asset delivery is an external collaborator: mount the
        // directory only when it exists
        if self.public_dir.is_dir() {
            app = app
                .route_service("/", ServeFile::new(self.public_dir.join("index.html")))
                .nest_service("/static", ServeDir::new(self.public_dir.join("static")));
            tracing::info!("Serving static assets from {}", self.public_dir.display());
        }

        let app = app.layer(TraceLayer::new_for_http());

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
