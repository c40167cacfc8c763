//! Error types
//!
//! Defines domain-specific error types for the registry, the line protocol
//! and server startup.

use std::fmt;
use std::io;

use crate::client::ClientId;

/// Client registry errors
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    CapacityExceeded { capacity: usize },
    ClientNotFound(ClientId),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::CapacityExceeded { capacity } => {
                write!(f, "Registry full ({} clients)", capacity)
            }
            RegistryError::ClientNotFound(id) => write!(f, "Client not found: {}", id),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Line protocol errors raised while handling one client line.
///
/// None of these end the session; see `error::handlers::reply_for` for the
/// variants that produce a reply to the sender.
#[derive(Debug, PartialEq, Eq)]
pub enum ProtocolError {
    MalformedLine,
    LineTooLong(usize),
    Unauthenticated,
    Unauthorized(String),
    OutOfRangeVote(String),
    PeerSendFailure(String),
    Registry(RegistryError),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedLine => write!(f, "Malformed line"),
            ProtocolError::LineTooLong(len) => write!(f, "Line too long: {} bytes", len),
            ProtocolError::Unauthenticated => write!(f, "Authentication required"),
            ProtocolError::Unauthorized(cmd) => write!(f, "Unauthorized command: {}", cmd),
            ProtocolError::OutOfRangeVote(v) => write!(f, "Vote out of range: {}", v),
            ProtocolError::PeerSendFailure(addr) => write!(f, "Failed to send to {}", addr),
            ProtocolError::Registry(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<RegistryError> for ProtocolError {
    fn from(error: RegistryError) -> Self {
        ProtocolError::Registry(error)
    }
}

/// Errors that stop the server from starting or accepting
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Io(io::Error),
    Registry(RegistryError),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Io(e) => write!(f, "I/O error: {}", e),
            ServerError::Registry(e) => write!(f, "Registry error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::Io(error)
    }
}

impl From<RegistryError> for ServerError {
    fn from(error: RegistryError) -> Self {
        ServerError::Registry(error)
    }
}
