//! Configuration management for the robot control server
//!
//! Values come from built-in defaults, an optional `config.toml`, and
//! `ROBO_CTL_*` environment variables, in increasing priority. Everything
//! here is fixed once the server has started.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::client::connection::DEFAULT_QUEUE_LENGTH;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5080;
const DEFAULT_MAX_CLIENTS: usize = 128;
const DEFAULT_MAX_LINE_LENGTH: usize = 512;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// IP address to listen on
    pub bind_address: String,

    /// TCP port to listen on; 0 picks an ephemeral port
    pub port: u16,

    /// Registry capacity. Connections beyond it are closed on accept.
    /// Environment: ROBO_CTL_MAX_CLIENTS
    pub max_clients: usize,

    /// Longest accepted inbound line in bytes, terminator included
    pub max_line_length: usize,

    /// Outbound lines queued per client before sends to it start failing
    pub outbound_queue_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            max_clients: DEFAULT_MAX_CLIENTS,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            outbound_queue_length: DEFAULT_QUEUE_LENGTH,
        }
    }
}

impl ServerConfig {
    /// Load configuration from ./config.toml (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file (extension optional, file optional)
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("max_clients", DEFAULT_MAX_CLIENTS as i64)?
            .set_default("max_line_length", DEFAULT_MAX_LINE_LENGTH as i64)?
            .set_default("outbound_queue_length", DEFAULT_QUEUE_LENGTH as i64)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("ROBO_CTL"))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_line_length == 0 {
            return Err(config::ConfigError::Message(
                "max_line_length must be greater than 0".into(),
            ));
        }

        if self.outbound_queue_length == 0 {
            return Err(config::ConfigError::Message(
                "outbound_queue_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
