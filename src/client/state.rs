//! Module `state`
//!
//! Defines the per-connection record kept in the registry: its stable
//! identity, peer address, role and vote for the current round.

use std::fmt;

use crate::client::connection::ConnectionHandle;

/// Vote value meaning "nothing cast this round".
pub const NO_VOTE: i16 = -1;

/// Stable identity of a registered connection.
///
/// Assigned by the registry and never reused, so a session keeps pointing
/// at its own record however many other clients come and go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub(crate) u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Privilege level of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Unauthenticated,
    Slave,
    Admin,
    Master,
}

impl Role {
    /// Whether this role may relay control commands and list clients.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Master)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Unauthenticated => "UNAUTHENTICATED",
            Role::Slave => "SLAVE",
            Role::Admin => "ADMIN",
            Role::Master => "MASTER",
        };
        f.write_str(name)
    }
}

/// Represents one connected client.
///
/// `role` and `vote` are only touched through the registry, under its lock.
#[derive(Debug, Clone)]
pub struct ClientRecord {
    id: ClientId,
    address: String,
    connection: ConnectionHandle,
    role: Role,
    vote: i16,
}

impl ClientRecord {
    pub(crate) fn new(id: ClientId, address: String, connection: ConnectionHandle) -> Self {
        Self {
            id,
            address,
            connection,
            role: Role::Unauthenticated,
            vote: NO_VOTE,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Returns the peer address used as the client's display name.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn connection(&self) -> &ConnectionHandle {
        &self.connection
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the vote for the current round, or `NO_VOTE`.
    pub fn vote(&self) -> i16 {
        self.vote
    }

    pub fn has_voted(&self) -> bool {
        self.vote != NO_VOTE
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub fn set_vote(&mut self, vote: u8) {
        self.vote = i16::from(vote);
    }

    pub fn clear_vote(&mut self) {
        self.vote = NO_VOTE;
    }
}
