use std::net::SocketAddr;
use std::time::Duration;

use robo_ctl_server::client::{Role, SharedRegistry};
use robo_ctl_server::{Server, ServerConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> String {
        let mut line = String::new();
        timeout(Duration::from_secs(2), self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for a line")
            .unwrap();
        line
    }

    /// Returns true if nothing arrives within a short window.
    async fn is_quiet(&mut self) -> bool {
        let mut line = String::new();
        timeout(Duration::from_millis(150), self.reader.read_line(&mut line))
            .await
            .is_err()
    }
}

async fn start_server(max_clients: usize) -> (SocketAddr, SharedRegistry) {
    let config = ServerConfig {
        bind_address: "127.0.0.1".into(),
        port: 0,
        max_clients,
        ..ServerConfig::default()
    };
    let server = Server::new(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let registry = server.registry();
    tokio::spawn(async move { server.start().await });
    (addr, registry)
}

/// Waits until the registry holds `count` clients.
async fn wait_for_clients(registry: &SharedRegistry, count: usize) {
    timeout(Duration::from_secs(2), async {
        while registry.lock().await.len() != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("registry never reached the expected size");
}

/// Waits until every client registered from 127.0.0.1 has `role`.
async fn wait_for_roles(registry: &SharedRegistry, roles: &[Role]) {
    timeout(Duration::from_secs(2), async {
        loop {
            let current: Vec<Role> = registry
                .lock()
                .await
                .snapshot()
                .iter()
                .map(|c| c.role())
                .collect();
            if current == roles {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("roles never reached the expected state");
}

#[tokio::test]
async fn test_unauthenticated_client_is_told_to_authenticate() {
    let (addr, registry) = start_server(8).await;
    let mut client = TestClient::connect(addr).await;
    wait_for_clients(&registry, 1).await;

    client.send("[0.0.0.0] move go\n").await;

    assert_eq!(client.recv().await, "[0.0.0.0] Authentication required\n");
    assert!(client.is_quiet().await);
    wait_for_roles(&registry, &[Role::Unauthenticated]).await;
}

#[tokio::test]
async fn test_vote_round_over_tcp() {
    let (addr, registry) = start_server(8).await;

    let mut admin = TestClient::connect(addr).await;
    wait_for_clients(&registry, 1).await;
    admin.send("[0.0.0.0] admin\n").await;
    wait_for_roles(&registry, &[Role::Admin]).await;

    let mut slave = TestClient::connect(addr).await;
    wait_for_clients(&registry, 2).await;
    slave.send("[0.0.0.0] slave\n").await;
    wait_for_roles(&registry, &[Role::Admin, Role::Slave]).await;

    admin.send("[0.0.0.0] vote\n").await;
    assert_eq!(admin.recv().await, "[0.0.0.0] vote\n");
    assert_eq!(slave.recv().await, "[0.0.0.0] vote\n");

    slave.send("[0.0.0.0] 200\n").await;
    assert_eq!(admin.recv().await, "[127.0.0.1] master\n");
    assert_eq!(slave.recv().await, "[127.0.0.1] master\n");
    wait_for_roles(&registry, &[Role::Admin, Role::Master]).await;

    // The new master may now drive the robots.
    slave.send("[0.0.0.0] move left\r\n").await;
    assert_eq!(admin.recv().await, "[0.0.0.0] move left\r\n");
    assert_eq!(slave.recv().await, "[0.0.0.0] move left\r\n");
}

#[tokio::test]
async fn test_admin_move_reaches_everyone_verbatim() {
    let (addr, registry) = start_server(8).await;

    let mut admin = TestClient::connect(addr).await;
    let mut slave = TestClient::connect(addr).await;
    let mut fresh = TestClient::connect(addr).await;
    wait_for_clients(&registry, 3).await;

    admin.send("[0.0.0.0] admin\n").await;
    slave.send("[0.0.0.0] slave\n").await;
    timeout(Duration::from_secs(2), async {
        loop {
            let roles: Vec<Role> = registry
                .lock()
                .await
                .snapshot()
                .iter()
                .map(|c| c.role())
                .collect();
            if roles.contains(&Role::Admin) && roles.contains(&Role::Slave) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    slave.send("[0.0.0.0] stop\n").await;
    assert_eq!(slave.recv().await, "[0.0.0.0] Unauthorized command\n");

    admin.send("[0.0.0.0] move left\n").await;
    for client in [&mut admin, &mut slave, &mut fresh] {
        assert_eq!(client.recv().await, "[0.0.0.0] move left\n");
    }
}

#[tokio::test]
async fn test_connections_beyond_capacity_are_closed() {
    let (addr, registry) = start_server(1).await;

    let mut first = TestClient::connect(addr).await;
    wait_for_clients(&registry, 1).await;

    let mut second = TestClient::connect(addr).await;
    let mut line = String::new();
    let read = timeout(Duration::from_secs(2), second.reader.read_line(&mut line))
        .await
        .expect("refused connection was not closed");
    assert!(matches!(read, Ok(0) | Err(_)));
    assert_eq!(registry.lock().await.len(), 1);

    first.send("[0.0.0.0] slave\n").await;
    wait_for_roles(&registry, &[Role::Slave]).await;
}

#[tokio::test]
async fn test_disconnect_removes_client() {
    let (addr, registry) = start_server(8).await;

    let stay = TestClient::connect(addr).await;
    let leave = TestClient::connect(addr).await;
    wait_for_clients(&registry, 2).await;

    drop(leave);
    wait_for_clients(&registry, 1).await;
    drop(stay);
    wait_for_clients(&registry, 0).await;
}
