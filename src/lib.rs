pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod relay;
pub mod server;

use cli::Args;
use config::RelayConfig;
use log::info;
use relay::Relay;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let relay_config = RelayConfig::from_args(&args)?;

    info!("--- Relay Configuration ---");
    info!("Server Address: {}", args.server_addr);
    let (_, base_url_source) = args.upstream_base_url();
    info!("Upstream Chat Endpoint: {} (from {})", relay_config.chat_endpoint(), base_url_source);
    info!("Max Duration: {}s", relay_config.max_duration.as_secs());
    info!("Max Request Body: {} bytes", args.max_body_bytes);
    info!("Static UI Dir: {}", args.static_dir.as_deref().unwrap_or("disabled"));
    info!("Environment: {} ({})", args.environment, args.region);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("---------------------------");

    let relay = Relay::new(relay_config)?;
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, relay, args);
    server.run().await?;

    Ok(())
}
