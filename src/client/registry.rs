//! Client registry
//!
//! Capacity-bounded table of connected clients, kept in registration order.
//! Shared between sessions as a `SharedRegistry`; every read and write of
//! membership, roles or votes happens with its mutex held.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::client::connection::ConnectionHandle;
use crate::client::state::{ClientId, ClientRecord, Role};
use crate::error::RegistryError;

pub type SharedRegistry = Arc<Mutex<ClientRegistry>>;

/// Registry for tracking connected clients
#[derive(Debug)]
pub struct ClientRegistry {
    clients: Vec<ClientRecord>,
    capacity: usize,
    next_id: u64,
}

impl ClientRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            clients: Vec::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Wraps a new registry for sharing between sessions.
    pub fn shared(capacity: usize) -> SharedRegistry {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    /// Registers a new unauthenticated client and returns its identity.
    pub fn add(
        &mut self,
        address: String,
        connection: ConnectionHandle,
    ) -> Result<ClientId, RegistryError> {
        if self.is_full() {
            return Err(RegistryError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let id = ClientId(self.next_id);
        self.next_id += 1;
        self.clients.push(ClientRecord::new(id, address, connection));
        Ok(id)
    }

    /// Removes the client with `id`. Unknown ids are ignored.
    ///
    /// Registration order of the remaining clients is preserved.
    pub fn remove(&mut self, id: ClientId) -> Option<ClientRecord> {
        let pos = self.position(id)?;
        Some(self.clients.remove(pos))
    }

    pub fn get(&self, id: ClientId) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: ClientId) -> Option<&mut ClientRecord> {
        self.clients.iter_mut().find(|c| c.id() == id)
    }

    pub fn role_of(&self, id: ClientId) -> Result<Role, RegistryError> {
        self.get(id)
            .map(ClientRecord::role)
            .ok_or(RegistryError::ClientNotFound(id))
    }

    /// First client registered from `address`, if any.
    pub fn find_by_address(&self, address: &str) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| c.address() == address)
    }

    /// Point-in-time copy of every record, in registration order.
    pub fn snapshot(&self) -> Vec<ClientRecord> {
        self.clients.clone()
    }

    pub fn addresses(&self) -> Vec<String> {
        self.clients.iter().map(|c| c.address().to_string()).collect()
    }

    /// Starts a voting round: every non-admin becomes a slave with no vote.
    pub fn reset_votes_except_admins(&mut self) {
        for client in self.clients.iter_mut().filter(|c| c.role() != Role::Admin) {
            client.set_role(Role::Slave);
            client.clear_vote();
        }
    }

    /// True once every slave has a vote this round.
    pub fn all_votes_cast(&self) -> bool {
        self.slaves().all(ClientRecord::has_voted)
    }

    /// Slave with the strictly greatest vote; the earliest registered wins ties.
    pub fn tally_winner(&self) -> Option<ClientId> {
        let mut winner: Option<&ClientRecord> = None;
        for client in self.slaves().filter(|c| c.has_voted()) {
            match winner {
                Some(best) if client.vote() <= best.vote() => {}
                _ => winner = Some(client),
            }
        }
        winner.map(ClientRecord::id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.clients.len() >= self.capacity
    }

    pub(crate) fn records_mut(&mut self) -> impl Iterator<Item = &mut ClientRecord> {
        self.clients.iter_mut()
    }

    fn slaves(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.iter().filter(|c| c.role() == Role::Slave)
    }

    fn position(&self, id: ClientId) -> Option<usize> {
        self.clients.iter().position(|c| c.id() == id)
    }
}
