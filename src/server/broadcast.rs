//! Broadcast service
//!
//! Delivers one line to every registered client, best effort.

use log::{debug, warn};
use tokio::sync::mpsc::error::TrySendError;

use crate::client::SharedRegistry;
use crate::error::ProtocolError;

/// Sends `line` to every registered client in registration order.
///
/// Recipients are copied out under the lock and the lock is released before
/// sending. A client whose queue is full or whose writer has stopped is
/// logged and skipped; the owning session notices the dead connection on
/// its own. Returns the number of clients reached.
pub async fn broadcast(registry: &SharedRegistry, line: &str) -> usize {
    let recipients = registry.lock().await.snapshot();

    let mut delivered = 0;
    for client in &recipients {
        match client.connection().send_line(line) {
            Ok(()) => delivered += 1,
            Err(e) => {
                let reason = match e {
                    TrySendError::Full(_) => "queue full",
                    TrySendError::Closed(_) => "connection closed",
                };
                let err = ProtocolError::PeerSendFailure(client.address().to_string());
                warn!("Broadcast to {} skipped ({}): {}", client.id(), reason, err);
            }
        }
    }

    debug!(
        "Broadcast {:?} to {}/{} clients",
        line.trim_end(),
        delivered,
        recipients.len()
    );
    delivered
}
