use log::warn;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    domain::user::{Role, User},
    net::{Connection, NetError},
    protocol::{tag_of, Reply, Request},
};

/// Outcome of a successful login exchange: which session state machine the
/// connection should be handed to.
pub enum Login {
    Sender(User),
    Receiver(User),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Net(#[from] NetError),
    #[error("bad login tag `{0}`")]
    BadTag(String),
}

/// Reads exactly one message and expects a login tag. On success replies
/// `ok` and builds the user; anything else gets a best-effort `err` and the
/// connection is torn down without spawning a session.
pub async fn dispatch_login<S>(conn: &mut Connection<S>) -> Result<Login, LoginError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let line = conn.receive().await?;
    match Request::parse(&line) {
        Request::SenderLogin(name) => {
            conn.send(&Reply::Ok("hello").to_line()).await?;
            Ok(Login::Sender(User::new(name, Role::Sender)))
        }
        Request::ReceiverLogin(name) => {
            conn.send(&Reply::Ok("hello").to_line()).await?;
            Ok(Login::Receiver(User::new(name, Role::Receiver)))
        }
        _ => {
            let tag = tag_of(&line).to_string();
            warn!("bad first tag: {tag}");
            let _ = conn.send(&Reply::Err("bad login").to_line()).await;
            Err(LoginError::BadTag(tag))
        }
    }
}
