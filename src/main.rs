//! Robot control server - Entry Point
//!
//! Relays control commands between authenticated clients and elects a
//! master among slaves by vote.

use log::{error, info};
use robo_ctl_server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Launching control server...");

    match Server::new(config).await {
        Ok(server) => server.start().await,
        Err(e) => {
            error!("Server startup failed: {}", e);
            std::process::exit(1);
        }
    }
}
