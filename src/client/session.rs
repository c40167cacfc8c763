//! Client session
//!
//! Ties one connection to its registry record for the connection's lifetime.

use crate::client::connection::ConnectionHandle;
use crate::client::registry::SharedRegistry;
use crate::client::state::{ClientId, ClientRecord};
use crate::error::{ProtocolError, RegistryError};

/// A registered connection as seen by its own handler.
///
/// Holds the record's stable `ClientId`, never a position in the registry.
pub struct Session {
    id: ClientId,
    address: String,
    connection: ConnectionHandle,
    registry: SharedRegistry,
}

impl Session {
    /// Adds a record for the connection and returns the session owning it.
    pub async fn register(
        registry: SharedRegistry,
        address: String,
        connection: ConnectionHandle,
    ) -> Result<Self, RegistryError> {
        let id = registry
            .lock()
            .await
            .add(address.clone(), connection.clone())?;

        Ok(Self {
            id,
            address,
            connection,
            registry,
        })
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Sends a line to this client only.
    pub fn reply(&self, line: &str) -> Result<(), ProtocolError> {
        self.connection
            .send_line(line)
            .map_err(|_| ProtocolError::PeerSendFailure(self.address.clone()))
    }

    /// Removes the record and drops this session's connection handle.
    pub async fn close(self) -> Option<ClientRecord> {
        self.registry.lock().await.remove(self.id)
    }
}
