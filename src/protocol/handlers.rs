//! Command handlers for the control protocol.
//!
//! Applies the role state machine to each decoded client line and mutates
//! the shared registry accordingly.

use log::{debug, info};

use crate::client::{ClientRecord, Role, Session};
use crate::election;
use crate::error::{ProtocolError, RegistryError};
use crate::protocol::message::{Message, strip_terminator};
use crate::protocol::responses::{SERVER_TARGET, VOTE_STARTED, clients_listing, master_announcement};
use crate::protocol::{Command, parse_command, parse_vote};
use crate::server::broadcast;

/// Dispatches one raw line received from `session`'s client.
///
/// Rules, in precedence order:
/// 1. unauthenticated clients may only send `[0.0.0.0] slave|admin`;
/// 2. `vote` from any authenticated client starts a round;
/// 3. `clients` lists every client (admin or master only);
/// 4. `move`/`stop`/`reset` are relayed verbatim (admin or master only);
/// 5. a slave addressing the server submits a vote;
/// 6. anything else is ignored.
///
/// `raw` may still carry its line terminator; relayed control lines are sent
/// exactly as received.
pub async fn handle_line(session: &Session, raw: &str) -> Result<(), ProtocolError> {
    let message = Message::parse(strip_terminator(raw)).ok_or(ProtocolError::MalformedLine)?;
    let command = parse_command(message.command);

    let role = {
        let mut registry = session.registry().lock().await;
        let client = registry
            .get_mut(session.id())
            .ok_or(RegistryError::ClientNotFound(session.id()))?;

        if client.role() == Role::Unauthenticated {
            return authenticate(client, &message, command);
        }
        client.role()
    };

    match command {
        Command::Vote => handle_cmd_vote(session).await,
        Command::Clients => handle_cmd_clients(session, role).await,
        cmd if cmd.is_control() => handle_cmd_control(session, role, raw).await,
        Command::Other(token) if role == Role::Slave && message.target == SERVER_TARGET => {
            handle_vote_submission(session, token).await
        }
        _ => {
            debug!("Ignoring {:?} from {} ({})", message, session.address(), role);
            Ok(())
        }
    }
}

/// Handles a line from a client that has not picked a role yet.
fn authenticate(
    client: &mut ClientRecord,
    message: &Message<'_>,
    command: Command<'_>,
) -> Result<(), ProtocolError> {
    let role = match command {
        Command::Slave if message.target == SERVER_TARGET => Role::Slave,
        Command::Admin if message.target == SERVER_TARGET => Role::Admin,
        _ => return Err(ProtocolError::Unauthenticated),
    };

    client.set_role(role);
    info!("Client {} authenticated as {}", client.address(), role);
    Ok(())
}

/// Starts a voting round: announce it, then reset every non-admin.
async fn handle_cmd_vote(session: &Session) -> Result<(), ProtocolError> {
    info!("Vote initiated by {}", session.address());
    broadcast(session.registry(), VOTE_STARTED).await;
    session.registry().lock().await.reset_votes_except_admins();
    Ok(())
}

/// Broadcasts the address of every registered client.
async fn handle_cmd_clients(session: &Session, role: Role) -> Result<(), ProtocolError> {
    if !role.is_privileged() {
        return Err(ProtocolError::Unauthorized("clients".into()));
    }

    let addresses = session.registry().lock().await.addresses();
    let listing = clients_listing(session.address(), &addresses);
    broadcast(session.registry(), &listing).await;
    Ok(())
}

/// Relays a control command to every client, unmodified.
async fn handle_cmd_control(session: &Session, role: Role, raw: &str) -> Result<(), ProtocolError> {
    if !role.is_privileged() {
        return Err(ProtocolError::Unauthorized(strip_terminator(raw).to_string()));
    }

    info!("Relaying from {} ({}): {}", session.address(), role, strip_terminator(raw));
    broadcast(session.registry(), raw).await;
    Ok(())
}

/// Records a slave's vote and completes the round once everyone has voted.
async fn handle_vote_submission(session: &Session, token: &str) -> Result<(), ProtocolError> {
    let vote = parse_vote(token).ok_or_else(|| ProtocolError::OutOfRangeVote(token.to_string()))?;

    let winner = {
        let mut registry = session.registry().lock().await;
        let client = registry
            .get_mut(session.id())
            .ok_or(RegistryError::ClientNotFound(session.id()))?;

        // Promoted or reset by another session since the role was read.
        if client.role() != Role::Slave {
            return Ok(());
        }

        client.set_vote(vote);
        info!("Vote from SLAVE {}: {}", session.address(), vote);
        election::crown_winner(&mut registry)
    };

    if let Some(address) = winner {
        broadcast(session.registry(), &master_announcement(&address)).await;
    }
    Ok(())
}
