//! Server core functionality
//!
//! Contains the TCP acceptor and the broadcast service shared by sessions.

pub mod broadcast;
pub mod core;

pub use broadcast::broadcast;
pub use self::core::Server;
