use crate::protocol::TAG_DELIVERY;

/// A message in transit between a broadcast and a receiver's socket.
/// Ephemeral: never persisted, exists only on delivery queues.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub tag: String,
    pub data: String,
}

impl Delivery {
    /// Forms the delivery for one `sendall`, prefixing the body with the
    /// sending user's name.
    pub fn broadcast(sender_name: &str, body: &str) -> Self {
        Delivery {
            tag: TAG_DELIVERY.to_string(),
            data: format!("{sender_name}: {body}"),
        }
    }

    pub fn to_line(&self) -> String {
        format!("{}:{}", self.tag, self.data)
    }
}
