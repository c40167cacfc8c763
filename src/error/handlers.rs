//! Error handlers
//!
//! Maps protocol errors to the reply line, if any, owed to the sender.

use crate::error::types::ProtocolError;
use crate::protocol::responses::{AUTHENTICATION_REQUIRED, UNAUTHORIZED_COMMAND};

/// Returns the line to send back to the client for `err`.
///
/// Only role check failures are answered; everything else is dropped
/// without telling the client.
pub fn reply_for(err: &ProtocolError) -> Option<&'static str> {
    match err {
        ProtocolError::Unauthenticated => Some(AUTHENTICATION_REQUIRED),
        ProtocolError::Unauthorized(_) => Some(UNAUTHORIZED_COMMAND),
        ProtocolError::MalformedLine
        | ProtocolError::LineTooLong(_)
        | ProtocolError::OutOfRangeVote(_)
        | ProtocolError::PeerSendFailure(_)
        | ProtocolError::Registry(_) => None,
    }
}
