mod lobby;
mod roster;

pub use lobby::{Identity, Lobby};
pub use roster::Roster;
