//! Campaign session server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sleeper-server
//! cargo run --bin sleeper-server -- --host 0.0.0.0 --port 3000
//! PORT=3000 cargo run --bin sleeper-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use sleeper_server::{
    infrastructure::hub::{
        ConnectionConfig, DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_OUTBOUND_CAPACITY, SessionHub,
    },
    ui::{AppState, Server},
};
use sleeper_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "sleeper-server")]
#[command(about = "Campaign session server with live dice events", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "8090")]
    port: u16,

    /// Seconds without any frame from a client before it is dropped (pings go out at 9/10)
    #[arg(long, default_value = "60", value_parser = clap::value_parser!(u64).range(1..))]
    pong_wait_secs: u64,

    /// Seconds allowed for one write to a client
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..))]
    write_wait_secs: u64,

    /// Events queued per connection before a slow client is evicted
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY)]
    outbound_capacity: usize,

    /// Largest frame accepted from a client, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_SIZE)]
    max_message_size: usize,
}

impl Args {
    fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            outbound_capacity: self.outbound_capacity,
            write_wait: Duration::from_secs(self.write_wait_secs),
            max_message_size: self.max_message_size,
            ..ConnectionConfig::with_pong_wait(Duration::from_secs(self.pong_wait_secs))
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let connection_config = args.connection_config();
    tracing::debug!("Connection config: {:?}", connection_config);

    // 1. Start the session hub
    let (hub, hub_task) = SessionHub::start();

    // 2. Wire repository and use cases
    let state = AppState::in_memory(hub, Arc::new(SystemClock), connection_config);

    // 3. Run the server; the hub stops with it
    if let Err(e) = Server::new(state).run(&args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = hub_task.await {
        tracing::error!("Session hub task failed: {}", e);
    }
}
