use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Connection-scoped identifier minted by the relay. Unique for the lifetime
/// of one connection; a reconnect yields a fresh one, so it must never be
/// cached across connections.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Mint a fresh id. Only a relay (or a relay stand-in) should call this.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Pending,
    Architect,
    Observer,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Participant {
    pub sid: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Participant {
    pub fn new(sid: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            sid,
            name: name.into(),
            role: Role::default(),
            avatar: None,
        }
    }
}
