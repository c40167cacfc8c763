//! Master election
//!
//! A round completes once every slave has voted. The slave with the highest
//! vote is promoted to master; the caller announces it.

use log::info;

use crate::client::{ClientRegistry, Role};

/// Completes the current round if every slave has voted.
///
/// Returns the address of the new master. Any previous master is demoted to
/// a slave without a vote so only one master exists at a time. Returns
/// `None`, changing nothing, while votes are outstanding or when there are
/// no slaves.
pub fn crown_winner(registry: &mut ClientRegistry) -> Option<String> {
    if !registry.all_votes_cast() {
        return None;
    }

    let winner = registry.tally_winner()?;

    for client in registry.records_mut() {
        if client.role() == Role::Master {
            client.set_role(Role::Slave);
            client.clear_vote();
        }
    }

    let record = registry.get_mut(winner)?;
    record.set_role(Role::Master);
    info!("Crowned {} with vote {}", record.address(), record.vote());
    Some(record.address().to_string())
}
