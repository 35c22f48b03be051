//! Wire grammar: colon-delimited `tag:payload` text messages.

pub const TAG_SLOGIN: &str = "slogin";
pub const TAG_RLOGIN: &str = "rlogin";
pub const TAG_JOIN: &str = "join";
pub const TAG_SENDALL: &str = "sendall";
pub const TAG_LEAVE: &str = "leave";
pub const TAG_QUIT: &str = "quit";
pub const TAG_DELIVERY: &str = "msg";

/// One inbound client message. Only the first colon delimits; the payload
/// may itself contain colons. A line with no colon is all tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    SenderLogin(String),
    ReceiverLogin(String),
    Join(String),
    SendAll(String),
    Leave,
    Quit,
    Unknown(String),
}

/// The tag portion of a raw line, for error replies and logs.
pub fn tag_of(line: &str) -> &str {
    line.split_once(':').map_or(line, |(tag, _)| tag)
}

impl Request {
    pub fn parse(line: &str) -> Request {
        let (tag, payload) = line.split_once(':').unwrap_or((line, ""));
        match tag {
            TAG_SLOGIN => Request::SenderLogin(payload.to_string()),
            TAG_RLOGIN => Request::ReceiverLogin(payload.to_string()),
            TAG_JOIN => Request::Join(payload.to_string()),
            TAG_SENDALL => Request::SendAll(payload.to_string()),
            TAG_LEAVE => Request::Leave,
            TAG_QUIT => Request::Quit,
            other => Request::Unknown(other.to_string()),
        }
    }
}

/// Server reply to a request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok(&'static str),
    Err(&'static str),
}

impl Reply {
    pub fn to_line(self) -> String {
        match self {
            Reply::Ok(info) => format!("ok:{info}"),
            Reply::Err(info) => format!("err:{info}"),
        }
    }
}
