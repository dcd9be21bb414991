use anyhow::{Result, bail};
use clap::Parser;
use relaygate::{Gateway, RELAY_PORT, StaticAuthority, StaticSelector, UserPass};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "A transparent SOCKS5-to-SOCKS5 relay gateway", long_about = None)]
struct Args {
    /// Listener address for inbound clients
    #[arg(short, long, default_value = "0.0.0.0:10000")]
    listen: String,

    /// Country relay hostname used by the static selection policy
    #[arg(long, default_value = "it.skynetproxy.com")]
    relay_host: String,

    /// Port country relays listen on
    #[arg(long, default_value_t = RELAY_PORT)]
    relay_port: u16,

    /// Client credential as user:pass (repeatable)
    #[arg(short, long = "user")]
    users: Vec<String>,

    /// Username the gateway presents to relays
    #[arg(long, default_value = "gateway")]
    service_username: String,

    /// Password the gateway presents to relays
    #[arg(long, default_value = "gateway")]
    service_password: String,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse args
    let args = Args::parse();

    // Initialize tracing subscriber
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt().with_max_level(level).init();

    // Build the credential table for the auth authority
    let mut authority = StaticAuthority::new();
    for entry in &args.users {
        let Some((username, password)) = entry.split_once(':') else {
            bail!("[ERR] user entry must be user:pass, got {entry:?}");
        };
        authority = authority.with_user(username, password);
    }

    // Static relay selection policy
    let selector = StaticSelector::new(args.relay_host, args.relay_port);

    // Instantiate gateway
    let mut gateway = Gateway::new(args.listen, Arc::new(authority), Arc::new(selector))
        .with_service_credentials(UserPass {
            username: args.service_username,
            password: args.service_password,
        });

    // Run it
    info!("starting relay gateway: {}", gateway.listen_addr);
    gateway.run().await
}
