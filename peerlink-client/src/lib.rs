pub mod config;
pub mod error;
pub mod games;
pub mod media;
pub mod room;
pub mod session;
pub mod sync;
pub mod transport;

pub use config::SessionConfig;
pub use error::ClientError;
pub use room::Identity;
pub use session::{Outcome, Session, SessionCommand, SessionHandle, SessionView};
