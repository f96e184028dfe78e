//! Watch-together relay server binary.
//!
//! Accepts WebSocket connections, assigns each a client id, and relays
//! playback control, chat, and metadata messages among the members of each
//! named room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchroom-server
//! cargo run --bin watchroom-server -- --host 0.0.0.0 --port 3000
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use watchroom_server::infrastructure::registry::InMemoryRelayRegistry;
use watchroom_server::ui::Server;
use watchroom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "watchroom-server")]
#[command(about = "Watch-together synchronization relay server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Directory holding the entry page and static assets
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let registry = Arc::new(InMemoryRelayRegistry::new());

    let server = Server::new(registry, args.public_dir);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
