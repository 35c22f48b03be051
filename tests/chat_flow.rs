//! End-to-end wire-protocol scenarios against a server on a random port.

use std::net::SocketAddr;
use std::time::Duration;

use parley_server::{
    config::ServerConfig,
    domain::registry::RoomRegistry,
    net::{Connection, DEFAULT_MAX_LINE},
    server,
};
use tokio::{
    net::{TcpListener, TcpStream},
    time::timeout,
};

const WAIT: Duration = Duration::from_secs(5);

async fn start_server() -> (SocketAddr, RoomRegistry) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let registry = RoomRegistry::new();
    tokio::spawn(server::serve(
        listener,
        registry.clone(),
        ServerConfig::default(),
    ));
    (addr, registry)
}

struct Client {
    conn: Connection<TcpStream>,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        Client {
            conn: Connection::new(stream, DEFAULT_MAX_LINE),
        }
    }

    async fn send(&mut self, line: &str) {
        self.conn.send(line).await.expect("send failed");
    }

    async fn recv(&mut self) -> String {
        timeout(WAIT, self.conn.receive())
            .await
            .expect("timed out waiting for the server")
            .expect("receive failed")
    }

    async fn expect_closed(&mut self) {
        let result = timeout(WAIT, self.conn.receive())
            .await
            .expect("timed out waiting for the server to close");
        assert!(result.is_err(), "expected a closed connection");
    }
}

#[tokio::test]
async fn sender_broadcast_reaches_receiver() {
    let (addr, _registry) = start_server().await;

    let mut alice = Client::connect(addr).await;
    alice.send("slogin:alice").await;
    assert_eq!(alice.recv().await, "ok:hello");
    alice.send("join:lobby").await;
    assert_eq!(alice.recv().await, "ok:joined");

    let mut bob = Client::connect(addr).await;
    bob.send("rlogin:bob").await;
    assert_eq!(bob.recv().await, "ok:hello");
    bob.send("join:lobby").await;
    assert_eq!(bob.recv().await, "ok:joined");

    alice.send("sendall:hi there").await;
    assert_eq!(alice.recv().await, "ok:sent");

    let delivered = bob.recv().await;
    assert!(delivered.contains("alice") && delivered.contains("hi there"));
    assert_eq!(delivered, "msg:alice: hi there");
}

#[tokio::test]
async fn quit_closes_and_removes_membership() {
    let (addr, registry) = start_server().await;

    let mut alice = Client::connect(addr).await;
    alice.send("slogin:alice").await;
    assert_eq!(alice.recv().await, "ok:hello");
    alice.send("join:lobby").await;
    assert_eq!(alice.recv().await, "ok:joined");
    assert_eq!(registry.get_or_create("lobby").member_count(), 1);

    alice.send("quit").await;
    assert_eq!(alice.recv().await, "ok:bye");
    alice.expect_closed().await;

    // The session task runs the cleanup after replying; give it a beat.
    timeout(WAIT, async {
        while registry.get_or_create("lobby").member_count() != 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("membership was not released");
}

#[tokio::test]
async fn unknown_tag_ends_the_session() {
    let (addr, _registry) = start_server().await;

    let mut alice = Client::connect(addr).await;
    alice.send("slogin:alice").await;
    assert_eq!(alice.recv().await, "ok:hello");

    alice.send("foo:bar").await;
    assert_eq!(alice.recv().await, "err:unexpected tag");
    alice.expect_closed().await;
}

#[tokio::test]
async fn bad_login_is_refused_without_a_session() {
    let (addr, registry) = start_server().await;

    let mut stranger = Client::connect(addr).await;
    stranger.send("join:lobby").await;
    assert_eq!(stranger.recv().await, "err:bad login");
    stranger.expect_closed().await;
    assert_eq!(registry.room_count(), 0);
}

#[tokio::test]
async fn roomless_sendall_gets_err_and_the_sender_stays_connected() {
    let (addr, _registry) = start_server().await;

    let mut alice = Client::connect(addr).await;
    alice.send("slogin:alice").await;
    assert_eq!(alice.recv().await, "ok:hello");

    alice.send("sendall:anyone?").await;
    assert_eq!(alice.recv().await, "err:not in a room");
    alice.send("join:lobby").await;
    assert_eq!(alice.recv().await, "ok:joined");
}

#[tokio::test]
async fn departed_sender_is_not_broadcast_to_but_receivers_are() {
    let (addr, registry) = start_server().await;

    let mut bob = Client::connect(addr).await;
    bob.send("rlogin:bob").await;
    assert_eq!(bob.recv().await, "ok:hello");
    bob.send("join:news").await;
    assert_eq!(bob.recv().await, "ok:joined");

    let mut carol = Client::connect(addr).await;
    carol.send("rlogin:carol").await;
    assert_eq!(carol.recv().await, "ok:hello");
    carol.send("join:news").await;
    assert_eq!(carol.recv().await, "ok:joined");
    assert_eq!(registry.get_or_create("news").member_count(), 2);

    let mut alice = Client::connect(addr).await;
    alice.send("slogin:alice").await;
    assert_eq!(alice.recv().await, "ok:hello");
    alice.send("join:news").await;
    assert_eq!(alice.recv().await, "ok:joined");
    alice.send("sendall:extra extra").await;
    assert_eq!(alice.recv().await, "ok:sent");

    assert_eq!(bob.recv().await, "msg:alice: extra extra");
    assert_eq!(carol.recv().await, "msg:alice: extra extra");
}
