//! Protocol responses
//!
//! Fixed server-originated lines and the reserved server address.

/// Target naming the server itself rather than a peer.
pub const SERVER_TARGET: &str = "0.0.0.0";

pub const AUTHENTICATION_REQUIRED: &str = "[0.0.0.0] Authentication required\n";
pub const UNAUTHORIZED_COMMAND: &str = "[0.0.0.0] Unauthorized command\n";
pub const VOTE_STARTED: &str = "[0.0.0.0] vote\n";

/// Announces the winner of a voting round.
pub fn master_announcement(address: &str) -> String {
    crate::protocol::message::encode(address, "master")
}

/// Lists every registered address, prefixed with the requesting client's.
pub fn clients_listing<S: AsRef<str>>(caller: &str, addresses: &[S]) -> String {
    let body = addresses
        .iter()
        .map(|a| a.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    crate::protocol::message::encode(caller, &body)
}
