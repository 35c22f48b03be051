pub mod message;
pub mod registry;
pub mod room;
pub mod types;
pub mod user;
