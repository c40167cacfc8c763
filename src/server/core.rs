use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

use crate::client::{ClientRegistry, ConnectionHandle, Session, SharedRegistry, handle_client};
use crate::config::ServerConfig;
use crate::error::ServerError;

pub struct Server {
    client_registry: SharedRegistry,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listening socket described by `config`.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let socket = config.listen_socket();

        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => {
                info!("Server bound to {}", socket);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };

        Ok(Self {
            client_registry: ClientRegistry::shared(config.max_clients),
            listener,
            config: Arc::new(config),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> SharedRegistry {
        Arc::clone(&self.client_registry)
    }

    /// Accepts connections forever, one task per client.
    pub async fn start(&self) {
        info!(
            "Starting control server on {} (max {} clients)",
            self.config.listen_socket(),
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let client_registry = Arc::clone(&self.client_registry);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, client_registry, config).await
                        {
                            warn!("Connection from {} refused: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a freshly accepted connection and runs its session.
///
/// When the registry is full the stream is dropped, closing the connection
/// without a record ever existing.
async fn handle_new_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    client_registry: SharedRegistry,
    config: Arc<ServerConfig>,
) -> Result<(), ServerError> {
    let (connection, outbound) = ConnectionHandle::with_capacity(config.outbound_queue_length);
    let session =
        Session::register(client_registry, client_addr.ip().to_string(), connection).await?;

    info!("Client connected: {} as {}", client_addr, session.id());

    handle_client(stream, session, outbound, config.max_line_length).await;
    Ok(())
}
