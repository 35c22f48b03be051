use log::warn;

use crate::net::DEFAULT_MAX_LINE;

pub const DEFAULT_PORT: u16 = 8080;

fn getenv(name: &str) -> String {
    match std::env::var(name) {
        Ok(var) => var,
        _ => "".to_string(),
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Upper bound on one inbound protocol message, in bytes.
    pub max_line: usize,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let port = match getenv("PARLEY_PORT").parse() {
            Ok(port) => port,
            Err(_) => {
                warn!("Could not read PARLEY_PORT. Falling back to {DEFAULT_PORT}.");
                DEFAULT_PORT
            }
        };
        let max_line = match getenv("PARLEY_MAX_LINE").parse() {
            Ok(len) => len,
            Err(_) => DEFAULT_MAX_LINE,
        };
        ServerConfig { port, max_line }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: DEFAULT_PORT,
            max_line: DEFAULT_MAX_LINE,
        }
    }
}
