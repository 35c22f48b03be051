use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use log::info;

use super::{room::Room, types::LockedRoomMap};

/// Shared map of room name to room, handed to every session. Rooms are
/// created on first reference and never deleted.
#[derive(Clone, Default)]
pub struct RoomRegistry {
    rooms: LockedRoomMap,
}

impl RoomRegistry {
    pub fn new() -> Self {
        RoomRegistry {
            rooms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the unique room for `name`, creating it if absent. The
    /// existence check and insert happen under one lock, so concurrent
    /// callers racing on a fresh name all observe the same room.
    pub fn get_or_create(&self, name: &str) -> Room {
        let mut rooms = self.rooms.lock().unwrap();
        rooms
            .entry(name.to_string())
            .or_insert_with(|| {
                info!("creating room: {name}");
                Room::new(name)
            })
            .clone()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}
