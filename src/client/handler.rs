use log::{debug, error, info, warn};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, BufReader};
use tokio::sync::mpsc::Receiver;

use crate::client::Session;
use crate::client::connection::spawn_writer;
use crate::error::{ProtocolError, reply_for};
use crate::protocol::handle_line;

/// Runs a registered client's session until the connection ends.
///
/// - Uses BufReader to read protocol lines from the client.
/// - Dispatches each line with `handle_line`.
/// - Writes queued outbound lines through a separate writer task.
/// - Removes the client from the registry once reading stops.
pub async fn handle_client<S>(
    stream: S,
    session: Session,
    outbound: Receiver<String>,
    max_line_length: usize,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let client_addr = session.address().to_string();
    let (read_half, write_half) = tokio::io::split(stream);
    let writer = spawn_writer(write_half, outbound, client_addr.clone());
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    loop {
        match read_bounded_line(&mut reader, &mut buf, max_line_length).await {
            Ok(LineRead::Closed) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(LineRead::TooLong(len)) => {
                debug!(
                    "Dropped line from {}: {}",
                    client_addr,
                    ProtocolError::LineTooLong(len)
                );
            }
            Ok(LineRead::Line) => {
                let line = String::from_utf8_lossy(&buf);
                debug!("Received from {}: {:?}", client_addr, line);

                if let Err(e) = handle_line(&session, &line).await {
                    match reply_for(&e) {
                        Some(reply) => {
                            if let Err(send_err) = session.reply(reply) {
                                warn!("{}", send_err);
                            }
                        }
                        None => debug!("Dropped line from {}: {}", client_addr, e),
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }

    let id = session.id();
    drop(session.close().await);
    if let Err(e) = writer.await {
        warn!("Writer for {} ended abnormally: {}", client_addr, e);
    }
    info!("Client {} ({}) disconnected", client_addr, id);
}

/// Outcome of reading one line with a length cap.
#[derive(Debug, PartialEq, Eq)]
enum LineRead {
    /// `buf` holds a line of at most the cap, terminator included.
    Line,
    /// A line over the cap was read and discarded, `buf` is empty.
    TooLong(usize),
    Closed,
}

/// Reads the next line into `buf`, never buffering more than `max + 1` bytes.
///
/// An overlong line is consumed up to and including its newline (or EOF) in
/// capped chunks, so the next call starts at the following line.
async fn read_bounded_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max: usize,
) -> io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let cap = max as u64 + 1;

    buf.clear();
    if (&mut *reader).take(cap).read_until(b'\n', buf).await? == 0 {
        return Ok(LineRead::Closed);
    }
    if buf.len() <= max {
        return Ok(LineRead::Line);
    }

    let mut total = buf.len();
    while buf.last() != Some(&b'\n') {
        buf.clear();
        let n = (&mut *reader).take(cap).read_until(b'\n', buf).await?;
        if n == 0 {
            break;
        }
        total += n;
    }
    buf.clear();
    Ok(LineRead::TooLong(total))
}
