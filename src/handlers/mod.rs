pub mod login;
pub mod receiver;
pub mod sender;

use thiserror::Error;

use crate::net::NetError;

/// How a running session ended abnormally. Transport failures and protocol
/// violations are both fatal to the session; the distinction only matters
/// for logging.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("protocol violation: unexpected tag `{0}`")]
    Protocol(String),
}
