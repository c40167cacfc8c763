//! Outbound side of a client connection.
//!
//! Lines for a client are queued on a bounded channel and written to the
//! socket by a dedicated writer task, so nobody ever awaits a slow peer while
//! holding the registry lock. A peer that stops reading fills its queue and
//! further lines for it are refused rather than buffered.

use log::{debug, warn};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

/// Lines that may wait for one client's writer before sends start failing.
pub const DEFAULT_QUEUE_LENGTH: usize = 128;

/// Cloneable handle used to send lines to one client.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    tx: mpsc::Sender<String>,
}

impl ConnectionHandle {
    /// Creates a handle with the default queue length.
    pub fn channel() -> (Self, mpsc::Receiver<String>) {
        Self::with_capacity(DEFAULT_QUEUE_LENGTH)
    }

    /// Creates a handle and the receiving end its writer task drains.
    ///
    /// `capacity` must be greater than zero.
    pub fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Queues `line` for delivery without waiting.
    ///
    /// Fails with `Full` while the peer is behind by a whole queue and with
    /// `Closed` once the writer task has stopped.
    pub fn send_line(&self, line: &str) -> Result<(), TrySendError<String>> {
        self.tx.try_send(line.to_string())
    }
}

/// Spawns the task writing queued lines to `writer`.
///
/// The task ends when every handle has been dropped or a write fails, and
/// shuts the write side down on the way out.
pub fn spawn_writer<W>(
    mut writer: W,
    mut rx: mpsc::Receiver<String>,
    peer: String,
) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                warn!("Failed to write to {}: {}", peer, e);
                break;
            }
        }
        rx.close();
        if let Err(e) = writer.shutdown().await {
            debug!("Shutdown of {} failed: {}", peer, e);
        }
    })
}
