//! Client management system
//!
//! Handles the client registry, per-connection sessions and their outbound
//! connections.

pub mod connection;
pub mod handler;
pub mod registry;
pub mod session;
pub mod state;

pub use connection::ConnectionHandle;
pub use handler::handle_client;
pub use registry::{ClientRegistry, SharedRegistry};
pub use session::Session;
pub use state::{ClientId, ClientRecord, NO_VOTE, Role};
