use log::info;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    domain::{registry::RoomRegistry, room::Room, user::User},
    net::Connection,
    protocol::{tag_of, Reply, Request},
};

use super::SessionError;

/// Drives a logged-in sender until it quits, violates the protocol or loses
/// its connection. Membership is released on every exit path before the
/// connection is closed.
pub async fn run_sender_session<S>(
    mut conn: Connection<S>,
    user: User,
    registry: RoomRegistry,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut current: Option<Room> = None;
    let outcome = sender_loop(&mut conn, &user, &registry, &mut current).await;
    if let Some(room) = current.take() {
        room.remove_member(&user.id);
    }
    conn.close().await;
    outcome
}

async fn sender_loop<S>(
    conn: &mut Connection<S>,
    user: &User,
    registry: &RoomRegistry,
    current: &mut Option<Room>,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let line = conn.receive().await?;
        match Request::parse(&line) {
            Request::Join(room_name) => {
                // Joining implies leaving wherever the sender was.
                if let Some(room) = current.take() {
                    room.remove_member(&user.id);
                }
                let room = registry.get_or_create(&room_name);
                room.add_member(user.clone(), None);
                *current = Some(room);
                conn.send(&Reply::Ok("joined").to_line()).await?;
            }
            Request::SendAll(body) => match current {
                Some(room) => {
                    room.broadcast(&user.name, &body);
                    conn.send(&Reply::Ok("sent").to_line()).await?;
                }
                None => conn.send(&Reply::Err("not in a room").to_line()).await?,
            },
            Request::Leave => match current.take() {
                Some(room) => {
                    room.remove_member(&user.id);
                    conn.send(&Reply::Ok("left").to_line()).await?;
                }
                None => conn.send(&Reply::Err("not in a room").to_line()).await?,
            },
            Request::Quit => {
                info!("sender {} quit", user.name);
                conn.send(&Reply::Ok("bye").to_line()).await?;
                return Ok(());
            }
            Request::SenderLogin(_) | Request::ReceiverLogin(_) | Request::Unknown(_) => {
                let tag = tag_of(&line).to_string();
                let _ = conn.send(&Reply::Err("unexpected tag").to_line()).await;
                return Err(SessionError::Protocol(tag));
            }
        }
    }
}
