use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use log::error;

use super::{
    message::Delivery,
    types::{LockedMemberMap, Postbox},
    user::User,
};

/// One room occupant. Receivers carry the write end of their delivery queue;
/// senders are tracked as members but have nothing to deliver to.
pub struct Member {
    pub user: User,
    pub postbox: Option<Postbox>,
}

/// A named chat room. Cloning yields another handle onto the same shared
/// membership set, so every session that joins "lobby" mutates one instance.
#[derive(Clone)]
pub struct Room {
    pub name: String,
    members: LockedMemberMap,
}

impl Room {
    pub fn new(name: &str) -> Self {
        Room {
            name: name.to_string(),
            members: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Inserts the user into the membership set. Keyed by user id, so
    /// re-adding the same user is idempotent.
    pub fn add_member(&self, user: User, postbox: Option<Postbox>) {
        let mut members = self.members.lock().unwrap();
        members.insert(user.id.clone(), Member { user, postbox });
    }

    /// Removes a member if present. Absence is not an error.
    pub fn remove_member(&self, user_id: &str) {
        let mut members = self.members.lock().unwrap();
        members.remove(user_id);
    }

    pub fn member_count(&self) -> usize {
        self.members.lock().unwrap().len()
    }

    /// Enqueues one delivery onto the queue of every current member that has
    /// one. The membership lock is held across the whole iteration, so a
    /// broadcast sees a consistent snapshot; enqueueing never blocks, so no
    /// deadlock against a concurrent add/remove.
    pub fn broadcast(&self, sender_name: &str, body: &str) {
        let delivery = Delivery::broadcast(sender_name, body);
        let members = self.members.lock().unwrap();
        for member in members.values() {
            if let Some(postbox) = &member.postbox {
                postbox
                    .unbounded_send(delivery.clone())
                    .unwrap_or_else(|e| error!("dropping delivery in {}: {}", self.name, e));
            }
        }
    }
}
