mod channel;
mod wire;
mod ws;

pub use channel::{TransportChannel, TransportEvent};
pub use wire::{Wire, WireConn, WireEvent};
pub use ws::WsWire;
