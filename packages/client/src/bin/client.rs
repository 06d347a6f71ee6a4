//! Session watcher for a Sleeper campaign.
//!
//! Joins the session room of a campaign and prints dice pools, rolls, challenges and day
//! changes as they happen. Reconnects on connection loss (5 attempts, 5 seconds apart by
//! default). Exits on Ctrl+C.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sleeper-client -- --campaign-id 1 --user-id 2
//! cargo run --bin sleeper-client -- -c 1 -u 2 --server ws://127.0.0.1:8090
//! ```

use std::time::Duration;

use clap::Parser;

use sleeper_client::{ReconnectPolicy, domain::session_url, run_client};
use sleeper_shared::{
    logger::setup_logger,
    time::SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "sleeper-client")]
#[command(about = "Watch the live event feed of a Sleeper campaign", long_about = None)]
struct Args {
    /// Campaign whose session room to join
    #[arg(short = 'c', long)]
    campaign_id: i64,

    /// User joining the session
    #[arg(short = 'u', long)]
    user_id: i64,

    /// WebSocket origin of the server
    #[arg(short = 's', long, env = "SLEEPER_SERVER", default_value = "ws://127.0.0.1:8090")]
    server: String,

    /// Reconnection attempts before giving up
    #[arg(long, default_value_t = 5)]
    max_reconnects: u32,

    /// Seconds to wait between reconnection attempts
    #[arg(long, default_value_t = 5)]
    reconnect_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let url = session_url(&args.server, args.campaign_id, args.user_id);
    let policy = ReconnectPolicy {
        max_attempts: args.max_reconnects,
        interval: Duration::from_secs(args.reconnect_interval_secs),
    };

    let watch = async {
        let mut stdout = std::io::stdout();
        run_client(&url, policy, &SystemClock, &mut stdout).await
    };

    tokio::select! {
        error = watch => {
            tracing::error!("Client error: {}", error);
            std::process::exit(1);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }
}
