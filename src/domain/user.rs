use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Sender,
    Receiver,
}

/// One user per connection, created at login, dropped when the session ends.
/// Membership maps are keyed by `id` rather than `name`, so two clients
/// logging in under the same username never clobber each other.
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(name: String, role: Role) -> Self {
        User {
            id: format!("{:X}", Uuid::new_v4().as_u128()),
            name,
            role,
        }
    }
}
