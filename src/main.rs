use anyhow::Context;
use parley_server::{config::ServerConfig, server::Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::try_init();

    let mut config = ServerConfig::from_env();
    if let Some(port) = std::env::args().nth(1) {
        config.port = port.parse().context("port argument must be a number")?;
    }

    Server::new(config).run().await
}
