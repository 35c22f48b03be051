use futures_channel::mpsc::unbounded;
use futures_util::StreamExt;
use log::{info, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    domain::{registry::RoomRegistry, types::Inbox, user::User},
    net::{Connection, MessageSink, MessageSource, NetError},
    protocol::{tag_of, Reply, Request},
};

use super::SessionError;

/// Drives a logged-in receiver: one mandatory join, then deliveries are
/// forwarded from its queue until the connection dies. There is no graceful
/// quit for receivers; the asymmetry with senders is part of the protocol.
pub async fn run_receiver_session<S>(
    mut conn: Connection<S>,
    user: User,
    registry: RoomRegistry,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // The first message after login must be a join.
    let line = match conn.receive().await {
        Ok(line) => line,
        Err(e) => {
            conn.close().await;
            return Err(e.into());
        }
    };
    let (room, inbox) = match Request::parse(&line) {
        Request::Join(room_name) => {
            let room = registry.get_or_create(&room_name);
            let (postbox, inbox) = unbounded();
            room.add_member(user.clone(), Some(postbox));
            if let Err(e) = conn.send(&Reply::Ok("joined").to_line()).await {
                room.remove_member(&user.id);
                conn.close().await;
                return Err(e.into());
            }
            (room, inbox)
        }
        _ => {
            let tag = tag_of(&line).to_string();
            let _ = conn.send(&Reply::Err("expected join").to_line()).await;
            conn.close().await;
            return Err(SessionError::Protocol(tag));
        }
    };

    let (mut source, mut sink) = conn.split();
    let outcome = deliver_loop(&mut source, &mut sink, inbox, &user).await;
    room.remove_member(&user.id);
    sink.close().await;
    outcome
}

/// Forwards queued deliveries to the socket. The read half is watched too,
/// so a vanished client is noticed instead of blocking on an idle queue
/// forever.
async fn deliver_loop<S>(
    source: &mut MessageSource<S>,
    sink: &mut MessageSink<S>,
    mut inbox: Inbox,
    user: &User,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            delivery = inbox.next() => {
                let Some(delivery) = delivery else {
                    return Ok(());
                };
                sink.send(&delivery.to_line()).await?;
            }
            inbound = source.receive() => {
                match inbound {
                    Err(NetError::Closed) => {
                        info!("receiver {} disconnected", user.name);
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                    Ok(line) => {
                        let tag = tag_of(&line).to_string();
                        warn!("receiver {} sent `{tag}` mid-delivery", user.name);
                        let _ = sink.send(&Reply::Err("unexpected tag").to_line()).await;
                        return Err(SessionError::Protocol(tag));
                    }
                }
            }
        }
    }
}
