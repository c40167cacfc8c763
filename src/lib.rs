pub mod client;
pub mod config;
pub mod election;
pub mod error;
pub mod protocol;
pub mod server;

pub use self::config::ServerConfig;
pub use server::Server;
