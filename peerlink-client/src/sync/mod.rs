mod liveness;
mod sequence;
mod synchronizer;

pub use liveness::Liveness;
pub use sequence::SeqTracker;
pub use synchronizer::Synchronizer;
