pub use peerlink_core::model::ParticipantId;

pub mod model {
    pub use peerlink_core::model::*;
}

pub mod protocol {
    pub use peerlink_core::protocol::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use peerlink_client::*;
}
