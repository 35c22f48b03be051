use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures_channel::mpsc::{UnboundedReceiver, UnboundedSender};

use super::{
    message::Delivery,
    room::{Member, Room},
};

/// Write end of a receiver's delivery queue, held by the room it joined.
pub type Postbox = UnboundedSender<Delivery>;
/// Read end, drained by the owning receiver session.
pub type Inbox = UnboundedReceiver<Delivery>;

pub type MemberMap = HashMap<String, Member>;
pub type LockedMemberMap = Arc<Mutex<MemberMap>>;
pub type RoomMap = HashMap<String, Room>;
pub type LockedRoomMap = Arc<Mutex<RoomMap>>;
