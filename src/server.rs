use anyhow::Context;
use log::{info, warn};
use tokio::net::{TcpListener, TcpStream};

use crate::{
    config::ServerConfig,
    domain::registry::RoomRegistry,
    handlers::{
        login::{dispatch_login, Login},
        receiver::run_receiver_session,
        sender::run_sender_session,
    },
    net::Connection,
};

pub struct Server {
    config: ServerConfig,
    registry: RoomRegistry,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Server {
            config,
            registry: RoomRegistry::new(),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        info!("Listening on: {}", addr);
        serve(listener, self.registry.clone(), self.config.clone()).await
    }
}

/// Accept loop: one spawned session per connection. The registry handle is
/// the only state shared into the sessions. Split out of [`Server::run`] so
/// tests can bind port 0 and pass the listener in.
pub async fn serve(
    listener: TcpListener,
    registry: RoomRegistry,
    config: ServerConfig,
) -> anyhow::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await.context("accept failed")?;
        info!("connection from: {}", peer);
        tokio::spawn(handle_connection(stream, registry.clone(), config.max_line));
    }
}

async fn handle_connection(stream: TcpStream, registry: RoomRegistry, max_line: usize) {
    let mut conn = Connection::new(stream, max_line);
    match dispatch_login(&mut conn).await {
        Ok(Login::Sender(user)) => {
            info!("sender {} logged in", user.name);
            let name = user.name.clone();
            if let Err(e) = run_sender_session(conn, user, registry).await {
                warn!("sender session for {name} ended: {e}");
            }
        }
        Ok(Login::Receiver(user)) => {
            info!("receiver {} logged in", user.name);
            let name = user.name.clone();
            if let Err(e) = run_receiver_session(conn, user, registry).await {
                warn!("receiver session for {name} ended: {e}");
            }
        }
        Err(e) => {
            warn!("login rejected: {e}");
            conn.close().await;
        }
    }
}
