pub mod config;
pub mod domain;
pub mod handlers;
pub mod net;
pub mod protocol;
pub mod server;
